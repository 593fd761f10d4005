//! CSV screening report.
//!
//! One row per bar, newest first, with the columns of [`ScreenRow`]. Gaps and
//! undefined indicator values are empty cells; the signal column holds `Buy`,
//! `Sell` or nothing.

use crate::domain::error::StockdashError;
use crate::domain::screen::ScreenRow;
use crate::ports::report_port::ReportPort;
use std::fs;
use std::io::Write;
use std::path::Path;

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn write_to<W: Write>(rows: &[ScreenRow], writer: W) -> Result<(), StockdashError> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in rows {
            wtr.serialize(row).map_err(report_error)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, code: &str, rows: &[ScreenRow], output_path: &Path) -> Result<(), StockdashError> {
        let file = fs::File::create(output_path)?;
        Self::write_to(rows, file)?;
        tracing::info!(code, rows = rows.len(), path = %output_path.display(), "report written");
        Ok(())
    }
}

fn report_error(e: csv::Error) -> StockdashError {
    match e.into_kind() {
        csv::ErrorKind::Io(io) => StockdashError::Io(io),
        other => StockdashError::Data {
            reason: format!("failed to write report row: {:?}", other),
        },
    }
}
