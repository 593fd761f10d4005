//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{closes, rolling_mean, rolling_sample_std};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let mult = stddev_mult_x100 as f64 / 100.0;
    let close = closes(bars);
    let middle = rolling_mean(&close, period);
    let stddev = rolling_sample_std(&close, period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| match middle[i].zip(stddev[i]) {
            Some((middle, stddev)) => IndicatorPoint {
                date: bar.date,
                valid: true,
                value: IndicatorValue::Bollinger {
                    upper: middle + mult * stddev,
                    middle,
                    lower: middle - mult * stddev,
                },
            },
            None => IndicatorPoint {
                date: bar.date,
                valid: false,
                value: IndicatorValue::Bollinger {
                    upper: 0.0,
                    middle: 0.0,
                    lower: 0.0,
                },
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}
