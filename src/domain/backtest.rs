//! Batch backtest runner.
//!
//! Computes indicators and the full signal series up front, then folds the
//! execution simulator over every bar. Indicators may be computed over the
//! whole series as a convenience; signal evaluation at index i still reads
//! only indices <= i, so batch results match an incremental replay of the
//! same inputs. Stateless and reentrant: all state lives in locals.

use crate::domain::error::StratsimError;
use crate::domain::execution::{EquityPoint, PositionState, Trade};
use crate::domain::ohlcv::PriceBar;
use crate::domain::series::augment;
use crate::domain::signal::signal_series;
use crate::domain::strategy::{ensure_sufficient_data, StrategySpec};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct BacktestResult {
    pub initial_capital: f64,
    pub final_capital: f64,
    pub trades: Vec<Trade>,
    pub equity_curve: Vec<EquityPoint>,
}

pub fn run_backtest(
    bars: &[PriceBar],
    spec: &StrategySpec,
    initial_capital: f64,
) -> Result<BacktestResult, StratsimError> {
    spec.validate()?;
    ensure_sufficient_data(spec, bars)?;

    let series = augment(bars, &spec.indicators);
    let signals = signal_series(&series, &spec.rules);

    let mut state = PositionState::new(initial_capital);
    let mut trades = Vec::new();
    let mut equity_curve = Vec::with_capacity(bars.len());

    for (bar, signal) in bars.iter().zip(signals) {
        if let Some(trade) = state.apply(signal, bar.date, bar.close) {
            trades.push(trade);
        }
        equity_curve.push(EquityPoint {
            date: bar.date,
            equity: state.equity(bar.close),
        });
    }

    // mark-to-market, not a forced sell
    let final_capital = state.equity(bars[bars.len() - 1].close);

    Ok(BacktestResult {
        initial_capital,
        final_capital,
        trades,
        equity_curve,
    })
}
