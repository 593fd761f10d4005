#![allow(dead_code)]

use chrono::NaiveDate;
pub use stockdash::domain::ohlcv::OhlcvBar;
use stockdash::domain::error::StockdashError;
use stockdash::ports::data_port::DataPort;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, code: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(code.to_string(), bars);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, StockdashError> {
        if let Some(reason) = self.errors.get(code) {
            return Err(StockdashError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(code).cloned().unwrap_or_default())
    }

    fn list_codes(&self) -> Result<Vec<String>, StockdashError> {
        let mut codes: Vec<String> = self.data.keys().cloned().collect();
        codes.sort();
        Ok(codes)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: Some(close - 1.0),
        high: Some(close + 1.0),
        low: Some(close - 2.0),
        close: Some(close),
        volume: Some(1000.0),
    }
}

/// One bar per calendar day from 2024-01-01, with a volume that varies so
/// volume-based rules have something to react to.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    let start = date(2024, 1, 1);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            date: start + chrono::Duration::days(i as i64),
            open: Some(close - 0.5),
            high: Some(close + 1.5),
            low: Some(close - 1.5),
            close: Some(close),
            volume: Some(1000.0 + ((i * 37) % 11) as f64 * 150.0),
        })
        .collect()
}

/// 100 closes: down from 130 to 101 (bars 0-29), up to 136 (bars 30-64),
/// then down to 101 (bars 65-99).
pub fn valley_then_peak_closes() -> Vec<f64> {
    (0..100)
        .map(|i| {
            if i < 30 {
                130.0 - i as f64
            } else if i < 65 {
                101.0 + (i - 29) as f64
            } else {
                136.0 - (i - 64) as f64
            }
        })
        .collect()
}

/// Deterministic zig-zag around a drifting mean; exercises every indicator.
pub fn wavy_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.1 * t + 8.0 * (t / 6.0).sin() + 3.0 * (t / 2.3).cos()
        })
        .collect()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub fn write_bars_csv(dir: &Path, code: &str, bars: &[OhlcvBar]) {
    let mut out = String::from("date,open,high,low,close,volume\n");
    let cell = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
    for b in bars {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            b.date,
            cell(b.open),
            cell(b.high),
            cell(b.low),
            cell(b.close),
            cell(b.volume)
        ));
    }
    std::fs::write(dir.join(format!("{}.csv", code)), out).unwrap();
}
