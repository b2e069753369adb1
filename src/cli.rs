//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::mock_data::{MockDataAdapter, DEFAULT_DAYS, DEFAULT_SEED};
use crate::domain::backtest::run_backtest;
use crate::domain::config_validation::{build_strategy_spec, validate_simulation_config};
use crate::domain::error::StratsimError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::replay::{ReplaySession, StepOutcome, StepSnapshot};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "stratsim", about = "Trading strategy backtester with replay")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a batch backtest
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol
        #[arg(long)]
        symbol: Option<String>,
        /// Emit the full result as JSON instead of a text report
        #[arg(long)]
        json: bool,
    },
    /// Replay the simulation suffix bar by bar
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
        /// Playback pace in bars per second (0 = unpaced)
        #[arg(long, default_value_t = 0.0)]
        speed: f64,
        /// Emit one JSON line per step instead of the live view
        #[arg(long)]
        json: bool,
    },
    /// Validate a strategy configuration without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List symbols available from the configured data source
    ListSymbols {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Backtest {
            config,
            symbol,
            json,
        } => run_backtest_command(&config, symbol.as_deref(), json),
        Command::Replay {
            config,
            symbol,
            speed,
            json,
        } => run_replay_command(&config, symbol.as_deref(), speed, json),
        Command::Validate { config } => run_validate_command(&config),
        Command::ListSymbols { config } => run_list_symbols_command(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, StratsimError> {
    FileConfigAdapter::from_file(path).map_err(|e| StratsimError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn resolve_symbol(override_symbol: Option<&str>, config: &dyn ConfigPort) -> String {
    match override_symbol {
        Some(s) => s.to_string(),
        None => config
            .get_string("data", "symbol")
            .unwrap_or_else(|| "MOCK".into()),
    }
}

pub fn build_data_port(config: &dyn ConfigPort) -> Result<Box<dyn DataPort>, StratsimError> {
    let source = config
        .get_string("data", "source")
        .unwrap_or_else(|| "mock".into());

    match source.to_lowercase().as_str() {
        "csv" => {
            let path = config.get_string("data", "path").ok_or_else(|| {
                StratsimError::ConfigMissing {
                    section: "data".into(),
                    key: "path".into(),
                }
            })?;
            Ok(Box::new(CsvAdapter::new(PathBuf::from(path))))
        }
        "mock" => {
            let days = config.get_int("data", "mock_days", DEFAULT_DAYS as i64);
            if days <= 0 {
                return Err(StratsimError::ConfigInvalid {
                    section: "data".into(),
                    key: "mock_days".into(),
                    reason: "mock_days must be positive".into(),
                });
            }
            let seed = config.get_int("data", "mock_seed", DEFAULT_SEED as i64);
            Ok(Box::new(MockDataAdapter::new(days as usize, seed as u64)))
        }
        other => Err(StratsimError::ConfigInvalid {
            section: "data".into(),
            key: "source".into(),
            reason: format!("unknown data source '{}', expected csv or mock", other),
        }),
    }
}

fn load_bars(
    config: &dyn ConfigPort,
    override_symbol: Option<&str>,
) -> Result<(String, Vec<PriceBar>), StratsimError> {
    let symbol = resolve_symbol(override_symbol, config);
    let port = build_data_port(config)?;

    eprintln!("Fetching price history for {symbol}");
    let bars = port.fetch_ohlcv(&symbol)?;
    if bars.is_empty() {
        return Err(StratsimError::NoData);
    }
    eprintln!(
        "Loaded {} bars ({} to {})",
        bars.len(),
        bars[0].date,
        bars[bars.len() - 1].date
    );
    Ok((symbol, bars))
}

fn run_backtest_command(
    config_path: &PathBuf,
    symbol: Option<&str>,
    json: bool,
) -> Result<(), StratsimError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    let sim_config = validate_simulation_config(&adapter)?;
    let spec = build_strategy_spec(&adapter)?;
    eprintln!("Loaded strategy: {}", spec.name);

    let (symbol, bars) = load_bars(&adapter, symbol)?;
    let result = run_backtest(&bars, &spec, sim_config.initial_capital)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result).expect("serializable result"));
        return Ok(());
    }

    let total_return = result.final_capital - result.initial_capital;
    println!("Backtest: {} on {}", spec.name, symbol);
    println!("Initial capital: {:>12.2}", result.initial_capital);
    println!("Final capital:   {:>12.2}", result.final_capital);
    println!(
        "Total return:    {:>12.2} ({:+.2}%)",
        total_return,
        total_return / result.initial_capital * 100.0
    );
    println!("Trades:          {:>12}", result.trades.len());

    if !result.trades.is_empty() {
        println!("\nTrades:");
        for trade in &result.trades {
            println!(
                "  {} {:?} {:.4} @ {:.2}",
                trade.date, trade.side, trade.shares, trade.price
            );
        }
    }

    Ok(())
}

fn run_replay_command(
    config_path: &PathBuf,
    symbol: Option<&str>,
    speed: f64,
    json: bool,
) -> Result<(), StratsimError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    let sim_config = validate_simulation_config(&adapter)?;
    let spec = build_strategy_spec(&adapter)?;
    eprintln!("Loaded strategy: {}", spec.name);

    let (symbol, bars) = load_bars(&adapter, symbol)?;

    let mut session = ReplaySession::with_train_fraction(
        bars,
        spec,
        sim_config.initial_capital,
        sim_config.train_fraction,
    )?;

    let info = session.info();
    if !json {
        println!("Replay: {}", symbol);
        if let Some((start, end)) = info.training_range {
            println!("Training:   {} to {} ({} bars)", start, end, info.training_bars);
        }
        let (sim_start, sim_end) = info.simulation_range;
        println!(
            "Simulation: {} to {} ({} bars)\n",
            sim_start, sim_end, info.simulation_bars
        );
    }

    let pause = (speed > 0.0).then(|| Duration::from_secs_f64(1.0 / speed));

    loop {
        match session.step() {
            StepOutcome::Snapshot(snapshot) => {
                if json {
                    println!(
                        "{}",
                        serde_json::to_string(&snapshot).expect("serializable snapshot")
                    );
                } else {
                    print_snapshot(&snapshot);
                }
                if let Some(pause) = pause {
                    thread::sleep(pause);
                }
            }
            StepOutcome::Complete(summary) => {
                if json {
                    println!(
                        "{}",
                        serde_json::to_string(&summary).expect("serializable summary")
                    );
                } else {
                    println!("\nReplay complete");
                    println!("Final equity: {:>12.2}", summary.final_equity);
                    println!(
                        "Total return: {:>12.2} ({:+.2}%)",
                        summary.total_return, summary.return_pct
                    );
                    println!("Trades:       {:>12}", summary.total_trades);
                    println!("Max equity:   {:>12.2}", summary.max_equity);
                    println!("Min equity:   {:>12.2}", summary.min_equity);
                }
                return Ok(());
            }
        }
    }
}

fn print_snapshot(snapshot: &StepSnapshot) {
    println!(
        "[{}/{}] {} | price {:>9.2} | equity {:>11.2} | return {:+7.2}%",
        snapshot.day,
        snapshot.total_days,
        snapshot.date,
        snapshot.price,
        snapshot.equity,
        snapshot.return_pct
    );
    if let Some(trade) = &snapshot.trade {
        println!(
            "    >>> {:?} {:.4} shares @ {:.2}",
            trade.side, trade.shares, trade.price
        );
    }
}

fn run_validate_command(config_path: &PathBuf) -> Result<(), StratsimError> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;

    validate_simulation_config(&adapter)?;
    let spec = build_strategy_spec(&adapter)?;

    println!(
        "OK: strategy '{}' ({} indicators, {} rules, needs >= {} bars)",
        spec.name,
        spec.indicators.len(),
        spec.rules.len(),
        spec.min_bars()
    );
    Ok(())
}

fn run_list_symbols_command(config_path: &PathBuf) -> Result<(), StratsimError> {
    let adapter = load_config(config_path)?;
    let port = build_data_port(&adapter)?;

    for symbol in port.list_symbols()? {
        println!("{symbol}");
    }
    Ok(())
}
