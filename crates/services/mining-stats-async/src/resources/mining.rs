use crate::{
    client::Client,
    config::Config,
    error::MiningStatsError,
    types::{DifficultyAdjustment, DifficultyAdjustmentPoint, HashrateSummary, PoolsSummary},
};

impl<C: Config> Client<C> {
    /// Hashrate and difficulty history over `period` (`1w`, `3d`, ...)
    pub async fn hashrate(&self, period: &str) -> Result<HashrateSummary, MiningStatsError> {
        self.get(&format!("/api/v1/mining/hashrate/{period}")).await
    }

    /// Progress of the current difficulty epoch
    pub async fn difficulty_adjustment(&self) -> Result<DifficultyAdjustment, MiningStatsError> {
        self.get("/api/v1/difficulty-adjustment").await
    }

    /// Past retargets within `interval`, newest first
    pub async fn difficulty_adjustments(
        &self,
        interval: &str,
    ) -> Result<Vec<DifficultyAdjustmentPoint>, MiningStatsError> {
        self.get(&format!("/api/v1/mining/difficulty-adjustments/{interval}"))
            .await
    }

    /// Pool ranking over `period`
    pub async fn pools(&self, period: &str) -> Result<PoolsSummary, MiningStatsError> {
        self.get(&format!("/api/v1/mining/pools/{period}")).await
    }
}
