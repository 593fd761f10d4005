//! Report output port trait.

use crate::domain::error::StockdashError;
use crate::domain::screen::ScreenRow;
use std::path::Path;

/// Port for writing screening tables.
pub trait ReportPort {
    fn write(&self, code: &str, rows: &[ScreenRow], output_path: &Path) -> Result<(), StockdashError>;
}
