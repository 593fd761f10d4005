//! Data access port trait.

use crate::domain::error::StockdashError;
use crate::domain::ohlcv::OhlcvBar;

pub trait DataPort {
    /// Daily bars for `code`, in any date order.
    fn fetch_ohlcv(&self, code: &str) -> Result<Vec<OhlcvBar>, StockdashError>;

    /// Codes this source has data for, sorted.
    fn list_codes(&self) -> Result<Vec<String>, StockdashError>;
}
