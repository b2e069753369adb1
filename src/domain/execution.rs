//! Single-position execution simulator.
//!
//! Two states: flat (shares == 0) and invested (shares > 0). A buy converts
//! all cash into shares at the bar's close; a sell converts all shares back
//! into cash. Shares are real-valued; there are no fees, slippage, or
//! rounding. Signals that do not apply to the current state are no-ops, so
//! the simulator never fails on any signal sequence.

use crate::domain::signal::Signal;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub date: NaiveDate,
    pub side: TradeSide,
    pub price: f64,
    pub shares: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Cash and share holdings. Exactly one of cash > 0 or shares > 0 holds at
/// any time: the position is either fully cash or fully invested.
#[derive(Debug, Clone, Serialize)]
pub struct PositionState {
    pub cash: f64,
    pub shares: f64,
}

impl PositionState {
    pub fn new(initial_capital: f64) -> Self {
        PositionState {
            cash: initial_capital,
            shares: 0.0,
        }
    }

    pub fn is_flat(&self) -> bool {
        self.shares == 0.0
    }

    pub fn is_invested(&self) -> bool {
        self.shares > 0.0
    }

    /// Mark-to-market value at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        self.cash + self.shares * price
    }

    /// Apply one signal at one bar. Returns the trade executed, if any.
    pub fn apply(&mut self, signal: Signal, date: NaiveDate, price: f64) -> Option<Trade> {
        match signal {
            Signal::Buy if self.is_flat() => {
                let shares = self.cash / price;
                self.shares = shares;
                self.cash = 0.0;
                Some(Trade {
                    date,
                    side: TradeSide::Buy,
                    price,
                    shares,
                })
            }
            Signal::Sell if self.is_invested() => {
                let shares = self.shares;
                self.cash = shares * price;
                self.shares = 0.0;
                Some(Trade {
                    date,
                    side: TradeSide::Sell,
                    price,
                    shares,
                })
            }
            _ => None,
        }
    }
}
