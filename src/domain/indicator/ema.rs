//! Exponential Moving Average, the smoothing primitive behind MACD.
//!
//! k = 2/(n+1), seeded with the SMA of the first n values, then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Warmup: first (n-1) bars are undefined.
//! The same seeding convention applies everywhere exponential smoothing is
//! used, including the MACD signal line.

use crate::domain::indicator::IndicatorPoint;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_ema(bars: &[PriceBar], window: usize) -> Vec<IndicatorPoint> {
    if window == 0 {
        return bars.iter().map(|b| IndicatorPoint::undefined(b.date)).collect();
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let smoothed = ema_values(&closes, 0, window);

    bars.iter()
        .zip(smoothed)
        .map(|(bar, v)| match v {
            Some(value) => IndicatorPoint::defined(bar.date, value),
            None => IndicatorPoint::undefined(bar.date),
        })
        .collect()
}

/// Exponential smoothing over `values[start..]`, aligned with `values`.
/// Positions before `start + window - 1` are `None`; the seed at
/// `start + window - 1` is the mean of the first `window` smoothed inputs.
pub(crate) fn ema_values(values: &[f64], start: usize, window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || start + window > values.len() {
        return out;
    }

    let k = 2.0 / (window as f64 + 1.0);
    let seed_index = start + window - 1;
    let mut ema = values[start..=seed_index].iter().sum::<f64>() / window as f64;
    out[seed_index] = Some(ema);

    for i in (seed_index + 1)..values.len() {
        ema = values[i] * k + ema * (1.0 - k);
        out[i] = Some(ema);
    }

    out
}
