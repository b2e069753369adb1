//! Configuration validation.
//!
//! All config-derived inputs are validated here, before any simulation step
//! runs. Batch and replay share these checks, so both modes reject the same
//! invalid configs with the same errors.

use crate::domain::error::StratsimError;
use crate::domain::replay::DEFAULT_TRAIN_FRACTION;
use crate::domain::rule::Side;
use crate::domain::rule_parser::{parse_indicators, parse_rules};
use crate::domain::strategy::StrategySpec;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;

/// Validated `[simulation]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    pub initial_capital: f64,
    pub train_fraction: f64,
}

pub fn validate_simulation_config(
    config: &dyn ConfigPort,
) -> Result<SimulationConfig, StratsimError> {
    let initial_capital =
        config.get_double("simulation", "initial_capital", DEFAULT_INITIAL_CAPITAL);
    if initial_capital <= 0.0 {
        return Err(StratsimError::ConfigInvalid {
            section: "simulation".into(),
            key: "initial_capital".into(),
            reason: "initial_capital must be positive".into(),
        });
    }

    let train_fraction =
        config.get_double("simulation", "train_fraction", DEFAULT_TRAIN_FRACTION);
    if !(0.0..1.0).contains(&train_fraction) {
        return Err(StratsimError::ConfigInvalid {
            section: "simulation".into(),
            key: "train_fraction".into(),
            reason: "train_fraction must be in [0, 1)".into(),
        });
    }

    Ok(SimulationConfig {
        initial_capital,
        train_fraction,
    })
}

/// Build and validate a [`StrategySpec`] from the `[strategy]` section.
pub fn build_strategy_spec(config: &dyn ConfigPort) -> Result<StrategySpec, StratsimError> {
    let name = config
        .get_string("strategy", "name")
        .unwrap_or_else(|| "unnamed strategy".into());

    let indicators_text =
        config
            .get_string("strategy", "indicators")
            .ok_or_else(|| StratsimError::ConfigMissing {
                section: "strategy".into(),
                key: "indicators".into(),
            })?;
    let indicators = parse_indicators(&indicators_text)?;

    let buy_text = config.get_string("strategy", "buy_rules").unwrap_or_default();
    let sell_text = config
        .get_string("strategy", "sell_rules")
        .unwrap_or_default();

    let mut rules = parse_rules(&buy_text, Side::Buy)?;
    rules.extend(parse_rules(&sell_text, Side::Sell)?);

    let spec = StrategySpec {
        name,
        indicators,
        rules,
    };
    spec.validate()?;
    Ok(spec)
}
