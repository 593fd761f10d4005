//! OHLCV bar representation.
//!
//! Every price and volume field is optional: data sources leave gaps on
//! suspended days and some markets do not publish all fields.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl OhlcvBar {
    /// (high + low + close) / 3, undefined if any of the three is missing.
    pub fn typical_price(&self) -> Option<f64> {
        Some((self.high? + self.low? + self.close?) / 3.0)
    }
}

/// Sort bars ascending by date and drop repeated dates (first occurrence wins).
///
/// Data sources may hand back either ordering; rolling windows assume
/// strictly increasing dates.
pub fn sort_bars(mut bars: Vec<OhlcvBar>) -> Vec<OhlcvBar> {
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);
    bars
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> OhlcvBar {
        OhlcvBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: Some(close),
            high: Some(close + 10.0),
            low: Some(close - 10.0),
            close: Some(close),
            volume: Some(1000.0),
        }
    }

    #[test]
    fn typical_price() {
        let b = OhlcvBar {
            high: Some(110.0),
            low: Some(90.0),
            close: Some(105.0),
            ..bar("2024-01-15", 105.0)
        };
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((b.typical_price().unwrap() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn typical_price_with_gap() {
        let b = OhlcvBar {
            high: None,
            ..bar("2024-01-15", 105.0)
        };
        assert!(b.typical_price().is_none());
    }

    #[test]
    fn sort_bars_reverses_descending_input() {
        let bars = vec![
            bar("2024-01-03", 3.0),
            bar("2024-01-02", 2.0),
            bar("2024-01-01", 1.0),
        ];
        let sorted = sort_bars(bars);
        let closes: Vec<f64> = sorted.iter().map(|b| b.close.unwrap()).collect();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn sort_bars_drops_duplicate_dates() {
        let bars = vec![
            bar("2024-01-01", 1.0),
            bar("2024-01-02", 2.0),
            bar("2024-01-02", 99.0),
        ];
        let sorted = sort_bars(bars);
        assert_eq!(sorted.len(), 2);
        assert_eq!(sorted[1].close, Some(2.0));
    }
}
