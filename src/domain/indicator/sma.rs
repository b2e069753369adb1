//! Simple Moving Average indicator.
//!
//! SMA[i] = mean(close[i-n+1..=i]). Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::IndicatorPoint;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_sma(bars: &[PriceBar], window: usize) -> Vec<IndicatorPoint> {
    if window == 0 {
        return bars.iter().map(|b| IndicatorPoint::undefined(b.date)).collect();
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= window {
            sum -= bars[i - window].close;
        }

        if i + 1 < window {
            values.push(IndicatorPoint::undefined(bar.date));
        } else {
            values.push(IndicatorPoint::defined(bar.date, sum / window as f64));
        }
    }

    values
}
