//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! Main line = EMA(fast) - EMA(slow)
//! Signal line = EMA(signal) of the main line
//! Histogram = main line - signal line
//!
//! Default parameters: fast=12, slow=26, signal=9.
//! The main line is defined from max(fast, slow) - 1; the signal line and
//! histogram from max(fast, slow) - 1 + signal - 1.

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::IndicatorPoint;
use crate::domain::ohlcv::PriceBar;

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

/// The three aligned output columns of a MACD computation.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub line: Vec<IndicatorPoint>,
    pub signal: Vec<IndicatorPoint>,
    pub histogram: Vec<IndicatorPoint>,
}

pub fn calculate_macd(
    bars: &[PriceBar],
    fast: usize,
    slow: usize,
    signal_window: usize,
) -> MacdSeries {
    if fast == 0 || slow == 0 || signal_window == 0 {
        let undefined: Vec<IndicatorPoint> = bars
            .iter()
            .map(|b| IndicatorPoint::undefined(b.date))
            .collect();
        return MacdSeries {
            line: undefined.clone(),
            signal: undefined.clone(),
            histogram: undefined,
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ema_fast = ema_values(&closes, 0, fast);
    let ema_slow = ema_values(&closes, 0, slow);

    let line_values: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => f - s,
            _ => f64::NAN,
        })
        .collect();

    let line_warmup = fast.max(slow).saturating_sub(1);
    let signal_values = ema_values(&line_values, line_warmup, signal_window);

    let mut line = Vec::with_capacity(bars.len());
    let mut signal = Vec::with_capacity(bars.len());
    let mut histogram = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if line_values[i].is_nan() {
            line.push(IndicatorPoint::undefined(bar.date));
        } else {
            line.push(IndicatorPoint::defined(bar.date, line_values[i]));
        }

        match signal_values[i] {
            Some(s) => {
                signal.push(IndicatorPoint::defined(bar.date, s));
                histogram.push(IndicatorPoint::defined(bar.date, line_values[i] - s));
            }
            None => {
                signal.push(IndicatorPoint::undefined(bar.date));
                histogram.push(IndicatorPoint::undefined(bar.date));
            }
        }
    }

    MacdSeries {
        line,
        signal,
        histogram,
    }
}

pub fn calculate_macd_default(bars: &[PriceBar]) -> MacdSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
