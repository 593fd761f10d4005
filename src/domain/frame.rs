//! Feature frame: date-sorted bars plus the indicator series computed on them.

use crate::domain::error::StockdashError;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::indicator_helpers::compute_indicators;
use crate::domain::ohlcv::{OhlcvBar, sort_bars};
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct FeatureFrame {
    pub bars: Vec<OhlcvBar>,
    pub indicators: HashMap<IndicatorType, IndicatorSeries>,
}

impl FeatureFrame {
    /// Build a frame from bars in any order; bars are sorted ascending by date.
    pub fn new(bars: Vec<OhlcvBar>) -> Self {
        Self {
            bars: sort_bars(bars),
            indicators: HashMap::new(),
        }
    }

    pub fn with_indicators(mut self, types: &[IndicatorType]) -> Self {
        self.add_indicators(types);
        self
    }

    /// Compute the indicators not yet present. Existing columns are kept as is.
    pub fn add_indicators(&mut self, types: &[IndicatorType]) {
        let missing: Vec<IndicatorType> = types
            .iter()
            .filter(|t| !self.indicators.contains_key(t))
            .cloned()
            .collect();
        self.indicators
            .extend(compute_indicators(&self.bars, &missing));
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn series(&self, indicator_type: &IndicatorType) -> Result<&IndicatorSeries, StockdashError> {
        self.indicators
            .get(indicator_type)
            .ok_or_else(|| StockdashError::MissingColumn {
                column: indicator_type.to_string(),
            })
    }

    /// Fail with `MissingColumn` for the first indicator not present.
    pub fn require(&self, types: &[IndicatorType]) -> Result<(), StockdashError> {
        for t in types {
            self.series(t)?;
        }
        Ok(())
    }
}
