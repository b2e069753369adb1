//! RSI (Relative Strength Index) indicator.
//!
//! Rolling-mean form: average gain and average loss are simple means over the
//! last n close-to-close changes.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are undefined (n changes require n+1 bars).

use crate::domain::indicator::IndicatorPoint;
use crate::domain::ohlcv::PriceBar;

pub fn calculate_rsi(bars: &[PriceBar], window: usize) -> Vec<IndicatorPoint> {
    if window == 0 {
        return bars.iter().map(|b| IndicatorPoint::undefined(b.date)).collect();
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut gains: Vec<f64> = Vec::with_capacity(bars.len());
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len());
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            values.push(IndicatorPoint::undefined(bar.date));
            continue;
        }

        let change = bar.change(bars[i - 1].close);
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
        gain_sum += change.max(0.0);
        loss_sum += (-change).max(0.0);

        // gains[j] is the change from bar j to bar j+1
        if gains.len() > window {
            gain_sum -= gains[gains.len() - window - 1];
            loss_sum -= losses[losses.len() - window - 1];
        }

        if i < window {
            values.push(IndicatorPoint::undefined(bar.date));
        } else {
            let avg_gain = gain_sum / window as f64;
            let avg_loss = loss_sum / window as f64;
            let rsi = if avg_loss == 0.0 {
                100.0
            } else {
                100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
            };
            values.push(IndicatorPoint::defined(bar.date, rsi));
        }
    }

    values
}
