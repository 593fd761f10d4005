//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]). Warmup: first (n-1) bars are invalid.
//! The volume variant averages traded volume instead of close.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{closes, rolling_mean, simple_series, volumes};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rolling_mean(&closes(bars), period);
    simple_series(bars, IndicatorType::Sma(period), &values)
}

pub fn calculate_volume_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rolling_mean(&volumes(bars), period);
    simple_series(bars, IndicatorType::VolumeSma(period), &values)
}
