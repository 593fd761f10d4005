//! OBV (On-Balance Volume) indicator implementation.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

/// Calculate OBV (On-Balance Volume) indicator.
///
/// OBV[0] = 0
/// If close[i] > close[i-1]: OBV[i] = OBV[i-1] + volume[i]
/// If close[i] < close[i-1]: OBV[i] = OBV[i-1] - volume[i]
/// Otherwise (unchanged, either close missing, or volume missing or
/// non-finite): OBV[i] = OBV[i-1]
///
/// No warmup period; all bars are valid.
pub fn calculate_obv(bars: &[OhlcvBar]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let mut obv: f64 = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        if i > 0 {
            let prev_close = bars[i - 1].close;
            if let (Some(close), Some(prev), Some(volume)) =
                (bar.close, prev_close, bar.volume.filter(|v| v.is_finite()))
            {
                if close > prev {
                    obv += volume;
                } else if close < prev {
                    obv -= volume;
                }
            }
        }

        values.push(IndicatorPoint::simple(bar.date, Some(obv)));
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Obv,
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::IndicatorValue;
    use chrono::NaiveDate;

    fn make_bar(date: &str, close: f64, volume: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: Some(close),
            high: Some(close),
            low: Some(close),
            close: Some(close),
            volume: Some(volume),
        }
    }

    fn obv_values(series: &IndicatorSeries) -> Vec<f64> {
        series
            .values
            .iter()
            .map(|p| match p.value {
                IndicatorValue::Simple(v) => v,
                _ => panic!("Expected Simple value"),
            })
            .collect()
    }

    #[test]
    fn obv_empty() {
        assert!(calculate_obv(&[]).values.is_empty());
    }

    #[test]
    fn obv_starts_at_zero() {
        let series = calculate_obv(&[make_bar("2024-01-01", 100.0, 5000.0)]);
        assert!(series.values[0].valid);
        assert_eq!(obv_values(&series), vec![0.0]);
    }

    #[test]
    fn obv_up_down_flat() {
        let bars = vec![
            make_bar("2024-01-01", 100.0, 1000.0),
            make_bar("2024-01-02", 105.0, 2000.0),
            make_bar("2024-01-03", 103.0, 500.0),
            make_bar("2024-01-04", 103.0, 700.0),
        ];
        let series = calculate_obv(&bars);
        assert_eq!(obv_values(&series), vec![0.0, 2000.0, 1500.0, 1500.0]);
    }

    #[test]
    fn obv_nan_volume_is_skipped() {
        let mut bars = vec![
            make_bar("2024-01-01", 100.0, 1000.0),
            make_bar("2024-01-02", 105.0, 2000.0),
            make_bar("2024-01-03", 110.0, 500.0),
        ];
        bars[1].volume = Some(f64::NAN);
        let series = calculate_obv(&bars);
        assert_eq!(obv_values(&series), vec![0.0, 0.0, 500.0]);
    }

    #[test]
    fn obv_indicator_type() {
        let series = calculate_obv(&[make_bar("2024-01-01", 100.0, 1.0)]);
        assert_eq!(series.indicator_type, IndicatorType::Obv);
    }
}
