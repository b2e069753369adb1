//! Strategy configuration and validation.

use crate::domain::error::StratsimError;
use crate::domain::indicator::{IndicatorKind, IndicatorSpec};
use crate::domain::ohlcv::PriceBar;
use crate::domain::rule::Rule;
use std::collections::HashSet;

/// Ordered indicator configs plus ordered rules. Validated once at
/// construction time; rule evaluation never revisits these checks.
#[derive(Debug, Clone)]
pub struct StrategySpec {
    pub name: String,
    pub indicators: Vec<IndicatorSpec>,
    pub rules: Vec<Rule>,
}

impl StrategySpec {
    /// Fail-fast validation: parameter sanity, duplicate labels, and every
    /// rule referencing a declared indicator column. An empty rule list is
    /// valid — such a strategy simply never trades.
    pub fn validate(&self) -> Result<(), StratsimError> {
        let mut columns = HashSet::new();

        for spec in &self.indicators {
            if spec.label.is_empty() {
                return Err(StratsimError::StrategyInvalid {
                    reason: format!("indicator {} has an empty label", spec.kind),
                });
            }
            let zero_param = match spec.kind {
                IndicatorKind::Sma { window } | IndicatorKind::Rsi { window } => window == 0,
                IndicatorKind::Macd { fast, slow, signal } => {
                    fast == 0 || slow == 0 || signal == 0
                }
            };
            if zero_param {
                return Err(StratsimError::StrategyInvalid {
                    reason: format!("indicator '{}' has a zero window", spec.label),
                });
            }
            for name in spec.kind.column_names(&spec.label) {
                if !columns.insert(name.clone()) {
                    return Err(StratsimError::StrategyInvalid {
                        reason: format!("duplicate indicator label '{}'", name),
                    });
                }
            }
        }

        for rule in &self.rules {
            for name in rule.condition.referenced_columns() {
                if !columns.contains(name) {
                    return Err(StratsimError::StrategyInvalid {
                        reason: format!("rule references unknown indicator '{}'", name),
                    });
                }
            }
        }

        Ok(())
    }

    /// Bars required for every configured indicator to produce at least one
    /// defined value.
    pub fn min_bars(&self) -> usize {
        self.indicators
            .iter()
            .map(|s| s.kind.min_bars())
            .max()
            .unwrap_or(1)
    }
}

/// Shared data gate for both execution modes: an empty series and a series
/// shorter than the longest warm-up are surfaced, never partially simulated.
pub fn ensure_sufficient_data(spec: &StrategySpec, bars: &[PriceBar]) -> Result<(), StratsimError> {
    if bars.is_empty() {
        return Err(StratsimError::NoData);
    }
    let minimum = spec.min_bars();
    if bars.len() < minimum {
        return Err(StratsimError::InsufficientData {
            bars: bars.len(),
            minimum,
        });
    }
    Ok(())
}
