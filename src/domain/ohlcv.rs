//! OHLCV bar representation.

use chrono::NaiveDate;
use serde::Serialize;

/// One OHLCV observation for a discrete time unit. Bars arrive from a data
/// port as an ordered sequence with strictly increasing dates and are never
/// mutated after ingestion.
#[derive(Debug, Clone, Serialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// Close-to-close change against the previous bar.
    pub fn change(&self, prev_close: f64) -> f64 {
        self.close - prev_close
    }
}
