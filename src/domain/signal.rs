//! Per-bar trade signal generation.
//!
//! A buy fires at index i iff the buy-rule set is non-empty and every buy
//! rule holds at i; sell is analogous over the sell rules. An empty rule set
//! never fires. When both sides trigger on the same bar, buy wins. Index 0
//! is always Hold (crossover checks need a prior bar).

use crate::domain::rule::{Rule, Side};
use crate::domain::rule_eval::evaluate;
use crate::domain::series::AugmentedSeries;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn as_int(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Sell => -1,
            Signal::Hold => 0,
        }
    }
}

/// Signal at one index of an augmented series.
pub fn signal_at(series: &AugmentedSeries, rules: &[Rule], index: usize) -> Signal {
    if index == 0 {
        return Signal::Hold;
    }

    if all_hold(series, rules, Side::Buy, index) {
        Signal::Buy
    } else if all_hold(series, rules, Side::Sell, index) {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Signal at every index; index 0 is always Hold.
pub fn signal_series(series: &AugmentedSeries, rules: &[Rule]) -> Vec<Signal> {
    (0..series.len())
        .map(|i| signal_at(series, rules, i))
        .collect()
}

fn all_hold(series: &AugmentedSeries, rules: &[Rule], side: Side, index: usize) -> bool {
    let mut any = false;
    for rule in rules.iter().filter(|r| r.side == side) {
        if !evaluate(&rule.condition, series, index) {
            return false;
        }
        any = true;
    }
    any
}
