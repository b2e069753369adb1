//! Technical indicator implementations.
//!
//! Every indicator maps a bar series to one or more derived series aligned
//! 1:1 with the input. Positions inside the warm-up window carry
//! `valid == false` and a NaN payload, never a numeric stand-in.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;

pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;

use chrono::NaiveDate;
use std::fmt;

/// A single point in an indicator time series.
#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn undefined(date: NaiveDate) -> Self {
        IndicatorPoint {
            date,
            valid: false,
            value: f64::NAN,
        }
    }

    pub fn defined(date: NaiveDate, value: f64) -> Self {
        IndicatorPoint {
            date,
            valid: true,
            value,
        }
    }
}

/// Indicator identity plus parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Sma { window: usize },
    Rsi { window: usize },
    Macd { fast: usize, slow: usize, signal: usize },
}

impl IndicatorKind {
    /// Index of the first bar at which every column of this indicator is
    /// defined.
    pub fn warmup(&self) -> usize {
        match self {
            IndicatorKind::Sma { window } => window.saturating_sub(1),
            IndicatorKind::Rsi { window } => *window,
            IndicatorKind::Macd { fast, slow, signal } => {
                (*fast).max(*slow).saturating_sub(1) + signal.saturating_sub(1)
            }
        }
    }

    /// Bars required for this indicator to produce a single defined value.
    pub fn min_bars(&self) -> usize {
        self.warmup() + 1
    }

    /// Column names this indicator contributes to an augmented series.
    /// Single-valued indicators emit their label; MACD emits the label plus
    /// `_signal` and `_hist` derivatives.
    pub fn column_names(&self, label: &str) -> Vec<String> {
        match self {
            IndicatorKind::Sma { .. } | IndicatorKind::Rsi { .. } => vec![label.to_string()],
            IndicatorKind::Macd { .. } => vec![
                label.to_string(),
                format!("{label}_signal"),
                format!("{label}_hist"),
            ],
        }
    }

    /// Compute all columns over `bars`, in the same order as
    /// [`IndicatorKind::column_names`].
    pub fn compute(&self, bars: &[crate::domain::ohlcv::PriceBar]) -> Vec<Vec<IndicatorPoint>> {
        match self {
            IndicatorKind::Sma { window } => vec![calculate_sma(bars, *window)],
            IndicatorKind::Rsi { window } => vec![calculate_rsi(bars, *window)],
            IndicatorKind::Macd { fast, slow, signal } => {
                let triple = calculate_macd(bars, *fast, *slow, *signal);
                vec![triple.line, triple.signal, triple.histogram]
            }
        }
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorKind::Sma { window } => write!(f, "SMA({})", window),
            IndicatorKind::Rsi { window } => write!(f, "RSI({})", window),
            IndicatorKind::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}

/// One configured indicator: the label rules refer to it by, plus its kind.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSpec {
    pub label: String,
    pub kind: IndicatorKind,
}
