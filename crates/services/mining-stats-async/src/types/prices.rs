use serde::{Deserialize, Serialize};

/// Latest BTC exchange rates, `GET /api/v1/prices`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prices {
    /// Unix seconds of the snapshot
    pub time: i64,
    /// US dollars per BTC
    #[serde(rename = "USD")]
    pub usd: f64,
    /// Euros per BTC
    #[serde(rename = "EUR")]
    pub eur: f64,
    /// Pounds sterling per BTC
    #[serde(rename = "GBP")]
    pub gbp: f64,
    /// Canadian dollars per BTC
    #[serde(rename = "CAD")]
    pub cad: f64,
    /// Swiss francs per BTC
    #[serde(rename = "CHF")]
    pub chf: f64,
    /// Australian dollars per BTC
    #[serde(rename = "AUD")]
    pub aud: f64,
    /// Japanese yen per BTC
    #[serde(rename = "JPY")]
    pub jpy: f64,
}

impl Prices {
    /// `(code, rate)` pairs in display order
    #[must_use]
    pub fn rates(&self) -> [(&'static str, f64); 7] {
        [
            ("USD", self.usd),
            ("EUR", self.eur),
            ("GBP", self.gbp),
            ("CAD", self.cad),
            ("CHF", self.chf),
            ("AUD", self.aud),
            ("JPY", self.jpy),
        ]
    }
}
