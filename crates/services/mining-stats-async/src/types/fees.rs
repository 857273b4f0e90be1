use serde::{Deserialize, Serialize};

/// Recommended fee rates in sat/vB, `GET /api/v1/fees/recommended`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedFees {
    /// Next block
    pub fastest_fee: f64,
    /// Within about 30 minutes
    pub half_hour_fee: f64,
    /// Within about an hour
    pub hour_fee: f64,
    /// No time preference
    pub economy_fee: f64,
    /// Relay floor
    pub minimum_fee: f64,
}
