//! KDJ stochastic oscillator.
//!
//! RSV[i] = (C[i] - min(L, n)) / (max(H, n) - min(L, n)) * 100
//! K = EWM(RSV, com = 2), D = EWM(K, com = 2), both without bias adjustment
//! and seeded with their first defined input.
//!
//! A flat window (max == min) or a gap (missing or non-finite value) in the
//! window leaves RSV, K and D undefined at that bar; the smoothing resumes
//! from the last defined K/D.
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{com_alpha, ewm, rolling_max, rolling_min};
use crate::domain::ohlcv::OhlcvBar;

const SMOOTHING_COM: f64 = 2.0;

/// Raw stochastic value per bar.
pub fn raw_stochastic(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    let highs: Vec<Option<f64>> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<Option<f64>> = bars.iter().map(|b| b.low).collect();
    let hn = rolling_max(&highs, period);
    let ln = rolling_min(&lows, period);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let (close, high, low) = (bar.close?, hn[i]?, ln[i]?);
            let range = high - low;
            if range == 0.0 {
                return None;
            }
            Some((close - low) / range * 100.0)
        })
        .collect()
}

pub fn calculate_kdj(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let alpha = com_alpha(SMOOTHING_COM);
    let rsv = raw_stochastic(bars, period);
    let k = ewm(&rsv, alpha);
    let d = ewm(&k, alpha);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match k[i].zip(d[i]) {
            Some((k, d)) if k.is_finite() && d.is_finite() => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Kdj { k, d },
            },
            _ => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Kdj { k: 0.0, d: 0.0 },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Kdj(period),
        values,
    }
}
