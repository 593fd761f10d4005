//! CSV file data adapter.
//!
//! Reads `<base_path>/<CODE>.csv`. The header must name a `date` column
//! (`YYYY-MM-DD`) and the five price/volume columns; matching is
//! case-insensitive and the FinMind spellings `max`, `min` and
//! `Trading_Volume` are accepted for high, low and volume. Empty cells and
//! non-finite numbers (`NaN`, `inf`) are gaps. Rows may come in any order.

use crate::domain::error::StockdashError;
use crate::domain::ohlcv::{OhlcvBar, sort_bars};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", code))
    }
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, StockdashError> {
        let path = self.csv_path(code);
        let file = match fs::File::open(&path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StockdashError::NoData {
                    code: code.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let bars = read_bars(file).map_err(|e| match e {
            StockdashError::Data { reason } => StockdashError::Data {
                reason: format!("{}: {}", path.display(), reason),
            },
            other => other,
        })?;
        tracing::debug!(code, bars = bars.len(), path = %path.display(), "loaded bars");
        Ok(bars)
    }

    fn list_codes(&self) -> Result<Vec<String>, StockdashError> {
        let mut codes = Vec::new();
        for entry in fs::read_dir(&self.base_path)? {
            let path = entry?.path();
            let is_csv = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                codes.push(stem.to_string_lossy().into_owned());
            }
        }
        codes.sort();
        Ok(codes)
    }
}

#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, StockdashError> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
                .ok_or_else(|| StockdashError::Data {
                    reason: format!("missing {} column", names[0]),
                })
        };
        Ok(Self {
            date: find(&["date"])?,
            open: find(&["open"])?,
            high: find(&["high", "max"])?,
            low: find(&["low", "min"])?,
            close: find(&["close"])?,
            volume: find(&["volume", "trading_volume"])?,
        })
    }
}

/// Parse bars from CSV text; the result is sorted by date with duplicates dropped.
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<OhlcvBar>, StockdashError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(csv_error)?.clone();
    let columns = Columns::from_headers(&headers)?;

    let mut bars = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(csv_error)?;
        // header is line 1
        let row = line + 2;

        let date_str = record.get(columns.date).unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            StockdashError::Data {
                reason: format!("row {}: invalid date '{}': {}", row, date_str, e),
            }
        })?;

        let field = |index: usize, name: &str| -> Result<Option<f64>, StockdashError> {
            let raw = record.get(index).unwrap_or_default();
            if raw.is_empty() {
                return Ok(None);
            }
            raw.parse::<f64>()
                .map(|v| Some(v).filter(|v| v.is_finite()))
                .map_err(|e| StockdashError::Data {
                    reason: format!("row {}: invalid {} value '{}': {}", row, name, raw, e),
                })
        };

        bars.push(OhlcvBar {
            date,
            open: field(columns.open, "open")?,
            high: field(columns.high, "high")?,
            low: field(columns.low, "low")?,
            close: field(columns.close, "close")?,
            volume: field(columns.volume, "volume")?,
        });
    }

    Ok(sort_bars(bars))
}

fn csv_error(e: csv::Error) -> StockdashError {
    StockdashError::Data {
        reason: format!("CSV parse error: {}", e),
    }
}
