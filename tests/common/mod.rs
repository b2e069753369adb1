//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use stratsim::domain::indicator::{IndicatorKind, IndicatorSpec};
use stratsim::domain::ohlcv::PriceBar;
use stratsim::domain::replay::{ReplaySession, ReplaySummary, StepOutcome, StepSnapshot};
use stratsim::domain::rule::{CmpOp, Condition, Rule, Side};
use stratsim::domain::strategy::StrategySpec;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Bars on consecutive days with flat OHLC at the close price.
pub fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    prices
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn sma(label: &str, window: usize) -> IndicatorSpec {
    IndicatorSpec {
        label: label.into(),
        kind: IndicatorKind::Sma { window },
    }
}

/// Buy on fast crossing above slow, sell on fast crossing below slow.
pub fn sma_cross_spec(fast: usize, slow: usize) -> StrategySpec {
    StrategySpec {
        name: format!("SMA({fast}) x SMA({slow})"),
        indicators: vec![sma("fast", fast), sma("slow", slow)],
        rules: vec![
            Rule {
                side: Side::Buy,
                condition: Condition::Crossover {
                    left: "fast".into(),
                    right: "slow".into(),
                },
            },
            Rule {
                side: Side::Sell,
                condition: Condition::Crossunder {
                    left: "fast".into(),
                    right: "slow".into(),
                },
            },
        ],
    }
}

/// Buy below `buy_below`, sell above `sell_above`, on the raw close.
pub fn threshold_spec(buy_below: f64, sell_above: f64) -> StrategySpec {
    StrategySpec {
        name: "price threshold".into(),
        indicators: vec![sma("px", 1)],
        rules: vec![
            Rule {
                side: Side::Buy,
                condition: Condition::Threshold {
                    indicator: "px".into(),
                    op: CmpOp::Lt,
                    value: buy_below,
                },
            },
            Rule {
                side: Side::Sell,
                condition: Condition::Threshold {
                    indicator: "px".into(),
                    op: CmpOp::Gt,
                    value: sell_above,
                },
            },
        ],
    }
}

/// Step a session to completion, collecting every snapshot and the summary.
pub fn drain(session: &mut ReplaySession) -> (Vec<StepSnapshot>, ReplaySummary) {
    let mut snapshots = Vec::new();
    loop {
        match session.step() {
            StepOutcome::Snapshot(s) => snapshots.push(*s),
            StepOutcome::Complete(summary) => return (snapshots, summary),
        }
    }
}

/// The regression price list from the golden scenario.
pub const GOLDEN_PRICES: [f64; 10] = [
    100.0, 101.0, 99.0, 105.0, 110.0, 108.0, 120.0, 115.0, 130.0, 125.0,
];

/// A series whose SMA(3) genuinely crosses above and then below SMA(5):
/// one buy at index 7 (price 114), one sell at index 11 (price 100).
pub const ROUND_TRIP_PRICES: [f64; 12] = [
    110.0, 108.0, 106.0, 104.0, 102.0, 103.0, 108.0, 114.0, 118.0, 112.0, 104.0, 100.0,
];
