//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain/loss use exponential smoothing with centre-of-mass
//! `period - 1` (alpha = 1/period), seeded from the first bar where the
//! change is taken as zero:
//! - avg = alpha * current + (1 - alpha) * prev_avg
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 the value is undefined.
//!
//! Warmup: first `period` bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{com_alpha, ewm};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(period),
            values: bars
                .iter()
                .map(|b| IndicatorPoint::simple(b.date, None))
                .collect(),
        };
    }

    let mut gains: Vec<Option<f64>> = Vec::with_capacity(bars.len());
    let mut losses: Vec<Option<f64>> = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        let change = if i == 0 {
            bar.close.map(|_| 0.0)
        } else {
            bar.close.zip(bars[i - 1].close).map(|(c, p)| c - p)
        };
        gains.push(change.map(|c| if c > 0.0 { c } else { 0.0 }));
        losses.push(change.map(|c| if c < 0.0 { -c } else { 0.0 }));
    }

    let alpha = com_alpha((period - 1) as f64);
    let avg_gain = ewm(&gains, alpha);
    let avg_loss = ewm(&losses, alpha);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let rsi = match (avg_gain[i], avg_loss[i]) {
                (Some(gain), Some(loss)) if i >= period && loss > 0.0 => {
                    Some(100.0 - (100.0 / (1.0 + gain / loss)))
                }
                _ => None,
            };
            IndicatorPoint::simple(bar.date, rsi)
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(period),
        values,
    }
}
