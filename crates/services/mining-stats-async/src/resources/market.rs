use crate::{
    client::Client,
    config::Config,
    error::MiningStatsError,
    types::{Prices, RecommendedFees},
};

impl<C: Config> Client<C> {
    /// Latest exchange rates
    pub async fn prices(&self) -> Result<Prices, MiningStatsError> {
        self.get("/api/v1/prices").await
    }

    /// Recommended fee rates
    pub async fn recommended_fees(&self) -> Result<RecommendedFees, MiningStatsError> {
        self.get("/api/v1/fees/recommended").await
    }
}
