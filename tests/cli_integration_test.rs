//! CLI and pipeline integration tests.
//!
//! Tests cover:
//! - Config file loading from disk
//! - Data port resolution from the `[data]` section
//! - Full config → data port → engine pipelines over the mock and CSV
//!   adapters, in both execution modes

mod common;

use common::*;
use std::io::Write;
use stratsim::adapters::file_config_adapter::FileConfigAdapter;
use stratsim::cli;
use stratsim::domain::backtest::run_backtest;
use stratsim::domain::config_validation::{build_strategy_spec, validate_simulation_config};
use stratsim::domain::error::StratsimError;
use stratsim::domain::replay::ReplaySession;

const VALID_INI: &str = r#"
[data]
source = mock
symbol = MOCK
mock_days = 120
mock_seed = 7

[simulation]
initial_capital = 10000
train_fraction = 0.7

[strategy]
name = SMA Crossover
indicators = fast = SMA(3), slow = SMA(5)
buy_rules = fast crossover slow
sell_rules = fast crossunder slow
"#;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

mod config_loading {
    use super::*;

    #[test]
    fn load_config_from_disk() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(&file.path().to_path_buf()).unwrap();

        let spec = build_strategy_spec(&adapter).unwrap();
        assert_eq!(spec.name, "SMA Crossover");
        assert_eq!(spec.indicators.len(), 2);
        assert_eq!(spec.rules.len(), 2);
    }

    #[test]
    fn load_config_missing_file() {
        let err = cli::load_config(&"/nonexistent/stratsim.ini".into()).unwrap_err();
        assert!(matches!(err, StratsimError::ConfigParse { .. }));
    }

    #[test]
    fn resolve_symbol_override_wins() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        assert_eq!(cli::resolve_symbol(Some("AAPL"), &adapter), "AAPL");
        assert_eq!(cli::resolve_symbol(None, &adapter), "MOCK");
    }

    #[test]
    fn resolve_symbol_defaults_to_mock() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        assert_eq!(cli::resolve_symbol(None, &adapter), "MOCK");
    }
}

mod data_port_resolution {
    use super::*;

    #[test]
    fn mock_source_resolves() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let port = cli::build_data_port(&adapter).unwrap();

        let bars = port.fetch_ohlcv("MOCK").unwrap();
        assert_eq!(bars.len(), 120);
    }

    #[test]
    fn source_defaults_to_mock() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        let port = cli::build_data_port(&adapter).unwrap();
        assert_eq!(port.list_symbols().unwrap(), vec!["MOCK"]);
    }

    #[test]
    fn csv_source_requires_path() {
        let adapter = FileConfigAdapter::from_string("[data]\nsource = csv\n").unwrap();
        let err = cli::build_data_port(&adapter).unwrap_err();
        assert!(matches!(err, StratsimError::ConfigMissing { key, .. } if key == "path"));
    }

    #[test]
    fn unknown_source_rejected() {
        let adapter = FileConfigAdapter::from_string("[data]\nsource = postgres\n").unwrap();
        let err = cli::build_data_port(&adapter).unwrap_err();
        assert!(matches!(err, StratsimError::ConfigInvalid { key, .. } if key == "source"));
    }

    #[test]
    fn nonpositive_mock_days_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[data]\nsource = mock\nmock_days = 0\n").unwrap();
        let err = cli::build_data_port(&adapter).unwrap_err();
        assert!(matches!(err, StratsimError::ConfigInvalid { key, .. } if key == "mock_days"));
    }
}

mod full_pipeline {
    use super::*;

    #[test]
    fn mock_pipeline_batch() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let sim_config = validate_simulation_config(&adapter).unwrap();
        let spec = build_strategy_spec(&adapter).unwrap();
        let port = cli::build_data_port(&adapter).unwrap();

        let bars = port.fetch_ohlcv("MOCK").unwrap();
        let result = run_backtest(&bars, &spec, sim_config.initial_capital).unwrap();

        assert_eq!(result.equity_curve.len(), bars.len());
        assert_eq!(result.initial_capital, 10_000.0);
        assert!(result.final_capital > 0.0);
    }

    #[test]
    fn mock_pipeline_replay_consistent_with_batch_signals() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let sim_config = validate_simulation_config(&adapter).unwrap();
        let spec = build_strategy_spec(&adapter).unwrap();
        let port = cli::build_data_port(&adapter).unwrap();

        let bars = port.fetch_ohlcv("MOCK").unwrap();
        let mut session = ReplaySession::with_train_fraction(
            bars,
            spec,
            sim_config.initial_capital,
            sim_config.train_fraction,
        )
        .unwrap();

        let info = session.info();
        assert_eq!(info.training_bars, 84); // 70% of 120
        assert_eq!(info.simulation_bars, 36);

        let (snapshots, summary) = drain(&mut session);
        assert_eq!(snapshots.len(), 36);
        assert_eq!(summary.bars_replayed, 36);
        assert_eq!(
            summary.total_trades,
            snapshots.iter().filter(|s| s.trade.is_some()).count()
        );
    }

    #[test]
    fn mock_pipeline_deterministic() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let spec = build_strategy_spec(&adapter).unwrap();
        let port = cli::build_data_port(&adapter).unwrap();

        let a = run_backtest(&port.fetch_ohlcv("MOCK").unwrap(), &spec, 10_000.0).unwrap();
        let b = run_backtest(&port.fetch_ohlcv("MOCK").unwrap(), &spec, 10_000.0).unwrap();

        assert_eq!(a.final_capital, b.final_capital);
        assert_eq!(a.trades.len(), b.trades.len());
    }

    #[test]
    fn csv_pipeline_batch() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut csv = String::from("Date,Open,High,Low,Close,Volume\n");
        for (i, price) in ROUND_TRIP_PRICES.iter().enumerate() {
            let d = date(2024, 1, 1) + chrono::Duration::days(i as i64);
            csv.push_str(&format!("{d},{price},{price},{price},{price},1000\n"));
        }
        std::fs::write(dir.path().join("DEMO.csv"), csv).unwrap();

        let ini = format!(
            r#"
[data]
source = csv
path = {}
symbol = DEMO

[strategy]
name = SMA Crossover
indicators = fast = SMA(3), slow = SMA(5)
buy_rules = fast crossover slow
sell_rules = fast crossunder slow
"#,
            dir.path().display()
        );
        let adapter = FileConfigAdapter::from_string(&ini).unwrap();
        let spec = build_strategy_spec(&adapter).unwrap();
        let port = cli::build_data_port(&adapter).unwrap();

        let symbol = cli::resolve_symbol(None, &adapter);
        let bars = port.fetch_ohlcv(&symbol).unwrap();
        let result = run_backtest(&bars, &spec, 10_000.0).unwrap();

        // same round-trip fixture as the engine tests, end to end
        assert_eq!(result.trades.len(), 2);
        let expected_final = 10_000.0 * 100.0 / 114.0;
        assert!((result.final_capital - expected_final).abs() < 1e-9);
    }

    #[test]
    fn bad_strategy_config_fails_before_data_access() {
        let ini = r#"
[data]
source = csv
path = /nonexistent

[strategy]
name = broken
indicators = fast = SMA(3)
buy_rules = slow crossover fast
"#;
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        let err = build_strategy_spec(&adapter).unwrap_err();
        assert!(matches!(err, StratsimError::StrategyInvalid { .. }));
    }
}
