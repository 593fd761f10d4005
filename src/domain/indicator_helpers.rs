//! Shared helper functions for indicator calculations.
//!
//! The rolling helpers work on `Option<f64>` columns: `None` is a gap in the
//! input or an undefined output. Non-finite inputs count as gaps. A window
//! containing a gap is undefined.

use crate::domain::indicator::{self, IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use std::collections::HashMap;

/// Rolling arithmetic mean over `period` values; first `period - 1` are `None`.
pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        window.iter().sum::<f64>() / window.len() as f64
    })
}

/// Rolling sample standard deviation (divisor `n - 1`).
///
/// Undefined everywhere for `period < 2`.
pub fn rolling_sample_std(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period < 2 {
        return vec![None; values.len()];
    }
    rolling(values, period, |window| {
        let n = window.len() as f64;
        let mean = window.iter().sum::<f64>() / n;
        let sum_sq: f64 = window.iter().map(|v| (v - mean) * (v - mean)).sum();
        (sum_sq / (n - 1.0)).sqrt()
    })
}

pub fn rolling_min(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        window.iter().copied().fold(f64::INFINITY, f64::min)
    })
}

pub fn rolling_max(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |window| {
        window.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Maximum over the last `period` values allowing partial windows, skipping gaps.
///
/// Defined from the first non-gap value onwards.
pub fn expanding_window_max(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(period.max(1));
            values[start..=i]
                .iter()
                .flatten()
                .copied()
                .reduce(f64::max)
        })
        .collect()
}

fn rolling<F>(values: &[Option<f64>], period: usize, f: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut window: Vec<f64> = Vec::with_capacity(period);

    for i in 0..values.len() {
        if i + 1 < period {
            out.push(None);
            continue;
        }
        window.clear();
        window.extend(values[i + 1 - period..=i].iter().flatten().filter(|v| v.is_finite()));
        if window.len() < period {
            out.push(None);
        } else {
            out.push(Some(f(&window)));
        }
    }

    out
}

/// Exponentially weighted mean without bias adjustment.
///
/// y[0] = x[first defined], y[t] = alpha * x[t] + (1 - alpha) * y[t-1].
/// A `None` or non-finite input yields `None` at that position and leaves
/// the running state untouched.
pub fn ewm(values: &[Option<f64>], alpha: f64) -> Vec<Option<f64>> {
    let mut state: Option<f64> = None;
    values
        .iter()
        .map(|value| {
            let x = value.filter(|v| v.is_finite())?;
            let next = match state {
                None => x,
                Some(prev) => alpha * x + (1.0 - alpha) * prev,
            };
            state = Some(next);
            Some(next)
        })
        .collect()
}

/// Smoothing factor for a centre-of-mass parameterisation: alpha = 1 / (1 + com).
pub fn com_alpha(com: f64) -> f64 {
    1.0 / (1.0 + com)
}

/// Smoothing factor for a span parameterisation: alpha = 2 / (span + 1).
pub fn span_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

pub fn closes(bars: &[OhlcvBar]) -> Vec<Option<f64>> {
    bars.iter().map(|b| b.close).collect()
}

pub fn volumes(bars: &[OhlcvBar]) -> Vec<Option<f64>> {
    bars.iter().map(|b| b.volume).collect()
}

/// Wrap an `Option` column into a simple-valued indicator series.
pub fn simple_series(
    bars: &[OhlcvBar],
    indicator_type: IndicatorType,
    values: &[Option<f64>],
) -> IndicatorSeries {
    IndicatorSeries {
        indicator_type,
        values: bars
            .iter()
            .zip(values)
            .map(|(bar, v)| IndicatorPoint::simple(bar.date, *v))
            .collect(),
    }
}

pub fn calculate(bars: &[OhlcvBar], indicator_type: &IndicatorType) -> IndicatorSeries {
    match *indicator_type {
        IndicatorType::Sma(period) => indicator::sma::calculate_sma(bars, period),
        IndicatorType::Ema(period) => indicator::ema::calculate_ema(bars, period),
        IndicatorType::VolumeSma(period) => indicator::sma::calculate_volume_sma(bars, period),
        IndicatorType::Rsi(period) => indicator::rsi::calculate_rsi(bars, period),
        IndicatorType::Kdj(period) => indicator::kdj::calculate_kdj(bars, period),
        IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        } => indicator::bollinger::calculate_bollinger(bars, period, stddev_mult_x100),
        IndicatorType::Vwap => indicator::vwap::calculate_vwap(bars),
        IndicatorType::Obv => indicator::obv::calculate_obv(bars),
    }
}

/// Compute every requested indicator once; duplicates are collapsed.
pub fn compute_indicators(
    bars: &[OhlcvBar],
    types: &[IndicatorType],
) -> HashMap<IndicatorType, IndicatorSeries> {
    let mut out = HashMap::with_capacity(types.len());
    for t in types {
        out.entry(t.clone()).or_insert_with(|| calculate(bars, t));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn rolling_mean_warmup_and_values() {
        let out = rolling_mean(&some(&[1.0, 2.0, 3.0, 4.0]), 3);
        assert_eq!(out, vec![None, None, Some(2.0), Some(3.0)]);
    }

    #[test]
    fn rolling_mean_gap_poisons_window() {
        let values = vec![Some(1.0), None, Some(3.0), Some(4.0), Some(5.0)];
        let out = rolling_mean(&values, 2);
        assert_eq!(out, vec![None, None, None, Some(3.5), Some(4.5)]);
    }

    #[test]
    fn rolling_mean_period_zero() {
        assert_eq!(rolling_mean(&some(&[1.0, 2.0]), 0), vec![None, None]);
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let out = rolling_sample_std(&some(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 8);
        // population std is 2.0; sample std is sqrt(32 / 7)
        let expected = (32.0_f64 / 7.0).sqrt();
        assert!((out[7].unwrap() - expected).abs() < 1e-12);
        assert!(out[..7].iter().all(Option::is_none));
    }

    #[test]
    fn sample_std_period_one_is_undefined() {
        let out = rolling_sample_std(&some(&[1.0, 2.0, 3.0]), 1);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn rolling_min_max() {
        let values = some(&[5.0, 1.0, 4.0, 2.0]);
        assert_eq!(rolling_min(&values, 2), vec![None, Some(1.0), Some(1.0), Some(2.0)]);
        assert_eq!(rolling_max(&values, 2), vec![None, Some(5.0), Some(4.0), Some(4.0)]);
    }

    #[test]
    fn expanding_window_max_allows_partial_windows() {
        let values = vec![Some(3.0), None, Some(1.0), Some(5.0), Some(2.0)];
        let out = expanding_window_max(&values, 3);
        assert_eq!(
            out,
            vec![Some(3.0), Some(3.0), Some(3.0), Some(5.0), Some(5.0)]
        );
    }

    #[test]
    fn ewm_seeds_with_first_value() {
        let out = ewm(&some(&[10.0, 20.0, 30.0]), 0.5);
        assert_eq!(out, vec![Some(10.0), Some(15.0), Some(22.5)]);
    }

    #[test]
    fn ewm_skips_leading_gaps_and_carries_state() {
        let values = vec![None, Some(10.0), None, Some(20.0)];
        let out = ewm(&values, 0.5);
        assert_eq!(out, vec![None, Some(10.0), None, Some(15.0)]);
    }

    #[test]
    fn ewm_treats_non_finite_as_gap() {
        let values = vec![Some(10.0), Some(f64::NAN), Some(f64::INFINITY), Some(20.0)];
        let out = ewm(&values, 0.5);
        assert_eq!(out, vec![Some(10.0), None, None, Some(15.0)]);
    }

    #[test]
    fn rolling_window_with_nan_is_undefined_then_recovers() {
        let values = vec![Some(1.0), Some(f64::NAN), Some(3.0), Some(5.0)];
        assert_eq!(rolling_mean(&values, 2), vec![None, None, None, Some(4.0)]);
    }

    #[test]
    fn alpha_parameterisations() {
        assert!((com_alpha(2.0) - 1.0 / 3.0).abs() < f64::EPSILON);
        assert!((span_alpha(10) - 2.0 / 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn compute_indicators_collapses_duplicates() {
        use chrono::NaiveDate;
        let bars: Vec<OhlcvBar> = (1..=5)
            .map(|d| OhlcvBar {
                date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
                open: Some(1.0),
                high: Some(2.0),
                low: Some(0.5),
                close: Some(d as f64),
                volume: Some(100.0),
            })
            .collect();
        let map = compute_indicators(
            &bars,
            &[IndicatorType::Sma(2), IndicatorType::Sma(2), IndicatorType::Vwap],
        );
        assert_eq!(map.len(), 2);
        assert_eq!(map[&IndicatorType::Sma(2)].values.len(), 5);
    }
}
