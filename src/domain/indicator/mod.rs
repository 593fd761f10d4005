//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: A single point in an indicator time series
//! - `IndicatorValue`: Enum for different indicator output shapes
//! - `IndicatorType`: Enum for indicator identity + parameters (serves as HashMap key)
//! - `IndicatorSeries`: A time series of indicator values
//!
//! Every series has one point per input bar and is causal: the point at
//! index `i` only looks at bars `0..=i`.

pub mod bollinger;
pub mod ema;
pub mod kdj;
pub mod obv;
pub mod rsi;
pub mod sma;
pub mod vwap;

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

impl IndicatorPoint {
    /// A simple-valued point, invalid when `value` is `None` or not finite.
    pub fn simple(date: NaiveDate, value: Option<f64>) -> Self {
        match value.filter(|v| v.is_finite()) {
            Some(v) => Self {
                date,
                valid: true,
                value: IndicatorValue::Simple(v),
            },
            None => Self {
                date,
                valid: false,
                value: IndicatorValue::Simple(0.0),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Kdj { k: f64, d: f64 },
    Bollinger { upper: f64, middle: f64, lower: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    VolumeSma(usize),
    Rsi(usize),
    Kdj(usize),
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Vwap,
    Obv,
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::VolumeSma(period) => write!(f, "VOLUME_SMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Kdj(period) => write!(f, "KDJ({})", period),
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Vwap => write!(f, "VWAP"),
            IndicatorType::Obv => write!(f, "OBV"),
        }
    }
}
