//! Data access port trait.

use crate::domain::error::StratsimError;
use crate::domain::ohlcv::PriceBar;

/// Supplies ordered, duplicate-free price history. Ordering is part of the
/// port contract; the simulation core does not re-sort.
pub trait DataPort: std::fmt::Debug {
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<PriceBar>, StratsimError>;

    fn list_symbols(&self) -> Result<Vec<String>, StratsimError>;
}
