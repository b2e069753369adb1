//! Seeded mock data adapter.
//!
//! Generates a random-walk OHLCV series for demos and tests without any
//! market-data dependency. The walk is seeded, so a given (symbol, seed,
//! days) triple always produces the same series.

use crate::domain::error::StratsimError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_DAYS: usize = 250;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug)]
pub struct MockDataAdapter {
    days: usize,
    seed: u64,
    start_date: NaiveDate,
}

impl MockDataAdapter {
    pub fn new(days: usize, seed: u64) -> Self {
        Self {
            days,
            seed,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        }
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Base price keyed on well-known tickers so demo output looks plausible.
    fn base_price(symbol: &str) -> f64 {
        let upper = symbol.to_uppercase();
        if upper.contains("BTC") {
            40_000.0
        } else if upper.contains("ETH") {
            2_000.0
        } else if upper.contains("AAPL") {
            150.0
        } else {
            100.0
        }
    }
}

impl Default for MockDataAdapter {
    fn default() -> Self {
        Self::new(DEFAULT_DAYS, DEFAULT_SEED)
    }
}

impl DataPort for MockDataAdapter {
    fn fetch_ohlcv(&self, symbol: &str) -> Result<Vec<PriceBar>, StratsimError> {
        if self.days == 0 {
            return Err(StratsimError::NoData);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let floor = Self::base_price(symbol) * 0.1;
        let mut price = Self::base_price(symbol);
        let mut bars = Vec::with_capacity(self.days);

        for i in 0..self.days {
            // random walk with a slight upward bias
            let change: f64 = rng.gen_range(-0.03..0.035);
            price = (price * (1.0 + change)).max(floor);

            bars.push(PriceBar {
                date: self.start_date + Duration::days(i as i64),
                open: price * rng.gen_range(0.99..1.01),
                high: price * rng.gen_range(1.0..1.03),
                low: price * rng.gen_range(0.97..1.0),
                close: price,
                volume: rng.gen_range(1_000_000..5_000_000),
            });
        }

        Ok(bars)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StratsimError> {
        Ok(vec!["MOCK".into()])
    }
}
