//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), EMA[0] = C[0], then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: the series is valid from the first bar with a close.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::{closes, ewm, simple_series, span_alpha};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return simple_series(bars, IndicatorType::Ema(period), &vec![None; bars.len()]);
    }

    let values = ewm(&closes(bars), span_alpha(period));
    simple_series(bars, IndicatorType::Ema(period), &values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: Some(close),
                high: Some(close),
                low: Some(close),
                close: Some(close),
                volume: Some(1000.0),
            })
            .collect()
    }

    fn simple(series: &IndicatorSeries, i: usize) -> f64 {
        match series.values[i].value {
            IndicatorValue::Simple(v) => v,
            _ => panic!("Expected Simple value"),
        }
    }

    #[test]
    fn ema_valid_from_first_bar() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0]), 3);
        assert!(series.values.iter().all(|p| p.valid));
        assert!((simple(&series, 0) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_recursive_calculation() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0, 30.0, 40.0]), 3);
        let k = 2.0 / 4.0;

        let ema_1 = 20.0 * k + 10.0 * (1.0 - k);
        let ema_2 = 30.0 * k + ema_1 * (1.0 - k);
        let ema_3 = 40.0 * k + ema_2 * (1.0 - k);

        assert!((simple(&series, 1) - ema_1).abs() < f64::EPSILON);
        assert!((simple(&series, 2) - ema_2).abs() < f64::EPSILON);
        assert!((simple(&series, 3) - ema_3).abs() < f64::EPSILON);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&make_bars(&[100.0; 5]), 3);
        for i in 0..5 {
            assert!((simple(&series, i) - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn ema_indicator_type() {
        let series = calculate_ema(&make_bars(&[10.0]), 5);
        assert_eq!(series.indicator_type, IndicatorType::Ema(5));
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.values.is_empty());
    }

    #[test]
    fn ema_period_0() {
        let series = calculate_ema(&make_bars(&[10.0, 20.0]), 0);
        assert_eq!(series.values.len(), 2);
        assert!(series.values.iter().all(|p| !p.valid));
    }
}
