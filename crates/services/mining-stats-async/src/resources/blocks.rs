use crate::{client::Client, config::Config, error::MiningStatsError, types::BlockSummary};

impl<C: Config> Client<C> {
    /// Up to 15 blocks, newest first, ending at `start_height` when given
    pub async fn blocks(
        &self,
        start_height: Option<u64>,
    ) -> Result<Vec<BlockSummary>, MiningStatsError> {
        match start_height {
            Some(h) => self.get(&format!("/api/v1/blocks/{h}")).await,
            None => self.get("/api/v1/blocks").await,
        }
    }
}
