//! Incremental replay session.
//!
//! Plays history back one bar at a time for live-style playback. History is
//! split into a training prefix (warms indicators only, default 70%) and a
//! simulation suffix. Each step recomputes indicators over the history seen
//! so far, evaluates the signal at the newest bar, applies one execution
//! transition, and returns a snapshot; once the suffix is consumed, every
//! further step returns the terminal summary.
//!
//! Recomputing from scratch each step keeps the causal contract trivially
//! honest: the signal at index i is derived from bars [0..=i] and nothing
//! else, and therefore matches the batch runner's signal at the same index.
//! A session is exclusively owned by its creator and mutated only by
//! `step()`; validation happens at construction, so a step has no failure
//! path and is atomic.

use crate::domain::error::StratsimError;
use crate::domain::execution::{EquityPoint, PositionState, Trade};
use crate::domain::ohlcv::PriceBar;
use crate::domain::series::augment;
use crate::domain::signal::{signal_at, Signal};
use crate::domain::strategy::{ensure_sufficient_data, StrategySpec};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_TRAIN_FRACTION: f64 = 0.7;

/// State of the replay after one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepSnapshot {
    /// 1-based position within the simulation suffix.
    pub day: usize,
    pub total_days: usize,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub price: f64,
    pub volume: i64,
    /// Indicator columns at this bar; `None` inside a warm-up window.
    pub indicators: BTreeMap<String, Option<f64>>,
    pub signal: Signal,
    pub cash: f64,
    pub shares: f64,
    pub equity: f64,
    pub trade: Option<Trade>,
    pub total_trades: usize,
    pub return_pct: f64,
}

/// Terminal marker carrying the aggregate outcome of the replay.
#[derive(Debug, Clone, Serialize)]
pub struct ReplaySummary {
    pub initial_capital: f64,
    pub final_equity: f64,
    pub total_return: f64,
    pub return_pct: f64,
    pub total_trades: usize,
    pub max_equity: f64,
    pub min_equity: f64,
    pub bars_replayed: usize,
}

#[derive(Debug, Clone)]
pub enum StepOutcome {
    Snapshot(Box<StepSnapshot>),
    Complete(ReplaySummary),
}

/// Description of the training/simulation split.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayInfo {
    pub training_bars: usize,
    pub simulation_bars: usize,
    pub training_range: Option<(NaiveDate, NaiveDate)>,
    pub simulation_range: (NaiveDate, NaiveDate),
    pub initial_capital: f64,
}

/// One incremental simulation run over a fixed bar sequence.
#[derive(Debug)]
pub struct ReplaySession {
    bars: Vec<PriceBar>,
    spec: StrategySpec,
    initial_capital: f64,
    split: usize,
    cursor: usize,
    state: PositionState,
    trades: Vec<Trade>,
    equity_curve: Vec<EquityPoint>,
}

impl ReplaySession {
    pub fn new(
        bars: Vec<PriceBar>,
        spec: StrategySpec,
        initial_capital: f64,
    ) -> Result<Self, StratsimError> {
        Self::with_train_fraction(bars, spec, initial_capital, DEFAULT_TRAIN_FRACTION)
    }

    /// `train_fraction` must lie in [0, 1): the leading fraction of bars
    /// warms indicators without trading, the rest is stepped.
    pub fn with_train_fraction(
        bars: Vec<PriceBar>,
        spec: StrategySpec,
        initial_capital: f64,
        train_fraction: f64,
    ) -> Result<Self, StratsimError> {
        if !(0.0..1.0).contains(&train_fraction) {
            return Err(StratsimError::ConfigInvalid {
                section: "simulation".into(),
                key: "train_fraction".into(),
                reason: "train_fraction must be in [0, 1)".into(),
            });
        }
        spec.validate()?;
        ensure_sufficient_data(&spec, &bars)?;

        let split = (bars.len() as f64 * train_fraction).floor() as usize;

        Ok(ReplaySession {
            split,
            cursor: 0,
            state: PositionState::new(initial_capital),
            trades: Vec::new(),
            equity_curve: Vec::new(),
            bars,
            spec,
            initial_capital,
        })
    }

    pub fn info(&self) -> ReplayInfo {
        ReplayInfo {
            training_bars: self.split,
            simulation_bars: self.bars.len() - self.split,
            training_range: (self.split > 0)
                .then(|| (self.bars[0].date, self.bars[self.split - 1].date)),
            simulation_range: (
                self.bars[self.split].date,
                self.bars[self.bars.len() - 1].date,
            ),
            initial_capital: self.initial_capital,
        }
    }

    /// Advance one bar, or report the terminal summary once the suffix is
    /// consumed. Each call yields exactly one value; pacing is the caller's
    /// concern.
    pub fn step(&mut self) -> StepOutcome {
        let total_days = self.bars.len() - self.split;
        if self.cursor >= total_days {
            return StepOutcome::Complete(self.summary());
        }

        let index = self.split + self.cursor;
        let history = &self.bars[..=index];
        let series = augment(history, &self.spec.indicators);
        let signal = signal_at(&series, &self.spec.rules, index);

        let bar = &self.bars[index];
        let trade = self.state.apply(signal, bar.date, bar.close);
        if let Some(t) = &trade {
            self.trades.push(t.clone());
        }

        let equity = self.state.equity(bar.close);
        self.equity_curve.push(EquityPoint {
            date: bar.date,
            equity,
        });

        let indicators = series
            .column_names()
            .map(|name| {
                let value = series.value(name, index);
                (name.to_string(), (!value.is_nan()).then_some(value))
            })
            .collect();

        let snapshot = StepSnapshot {
            day: self.cursor + 1,
            total_days,
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            price: bar.close,
            volume: bar.volume,
            indicators,
            signal,
            cash: self.state.cash,
            shares: self.state.shares,
            equity,
            trade,
            total_trades: self.trades.len(),
            return_pct: (equity - self.initial_capital) / self.initial_capital * 100.0,
        };

        self.cursor += 1;
        StepOutcome::Snapshot(Box::new(snapshot))
    }

    pub fn summary(&self) -> ReplaySummary {
        let final_equity = self
            .equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_capital);
        let max_equity = self
            .equity_curve
            .iter()
            .map(|p| p.equity)
            .fold(f64::NEG_INFINITY, f64::max);
        let min_equity = self
            .equity_curve
            .iter()
            .map(|p| p.equity)
            .fold(f64::INFINITY, f64::min);

        ReplaySummary {
            initial_capital: self.initial_capital,
            final_equity,
            total_return: final_equity - self.initial_capital,
            return_pct: (final_equity - self.initial_capital) / self.initial_capital * 100.0,
            total_trades: self.trades.len(),
            max_equity: if self.equity_curve.is_empty() {
                self.initial_capital
            } else {
                max_equity
            },
            min_equity: if self.equity_curve.is_empty() {
                self.initial_capital
            } else {
                min_equity
            },
            bars_replayed: self.equity_curve.len(),
        }
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn equity_curve(&self) -> &[EquityPoint] {
        &self.equity_curve
    }
}
