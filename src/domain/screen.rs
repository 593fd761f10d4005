//! Screening table.
//!
//! Joins each bar with its standard indicator values, the combined signal and
//! the "highest close / highest volume of the look-back window" flags. Rows
//! come out newest first.

use crate::domain::error::StockdashError;
use crate::domain::frame::FeatureFrame;
use crate::domain::indicator::{IndicatorPoint, IndicatorType, IndicatorValue};
use crate::domain::indicator_helpers::{closes, expanding_window_max, volumes};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::registry::StrategyRegistry;
use crate::domain::settings::IndicatorSettings;
use crate::domain::signal::{Signal, combine, evaluate_rules};
use crate::domain::strategy::Strategy;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenRow {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub k: Option<f64>,
    pub d: Option<f64>,
    pub rsi: Option<f64>,
    pub upper: Option<f64>,
    pub middle: Option<f64>,
    pub lower: Option<f64>,
    pub obv: Option<f64>,
    pub signal: Signal,
    pub high_close: bool,
    pub high_volume: bool,
}

/// Frame with the standard indicators plus everything `strategy` reads.
pub fn build_frame(
    bars: Vec<OhlcvBar>,
    settings: &IndicatorSettings,
    strategy: &Strategy,
) -> FeatureFrame {
    let mut types = settings.standard_indicators();
    for t in strategy.required_indicators() {
        if !types.contains(&t) {
            types.push(t);
        }
    }
    FeatureFrame::new(bars).with_indicators(&types)
}

/// Screen `bars` with the named (buy, sell) pair.
pub fn screen(
    bars: Vec<OhlcvBar>,
    registry: &StrategyRegistry,
    buy_name: &str,
    sell_name: &str,
) -> Result<Vec<ScreenRow>, StockdashError> {
    let strategy = registry.strategy(buy_name, sell_name);
    screen_strategy(bars, registry.settings(), &strategy)
}

pub fn screen_strategy(
    bars: Vec<OhlcvBar>,
    settings: &IndicatorSettings,
    strategy: &Strategy,
) -> Result<Vec<ScreenRow>, StockdashError> {
    let frame = build_frame(bars, settings, strategy);
    let (buy, sell) = evaluate_rules(&frame, &strategy.entry, &strategy.exit)?;
    let signals = combine(&buy, &sell);
    tracing::debug!(
        bars = frame.len(),
        buys = buy.iter().filter(|b| **b).count(),
        sells = sell.iter().filter(|s| **s).count(),
        %strategy,
        "screened"
    );
    rows(&frame, settings, &signals)
}

fn rows(
    frame: &FeatureFrame,
    settings: &IndicatorSettings,
    signals: &[Signal],
) -> Result<Vec<ScreenRow>, StockdashError> {
    let kdj = frame.series(&settings.kdj())?;
    let bollinger = frame.series(&settings.bollinger())?;
    let rsi = frame.series(&settings.rsi())?;
    let obv = frame.series(&IndicatorType::Obv)?;

    let close_col = closes(&frame.bars);
    let volume_col = volumes(&frame.bars);
    let max_close = expanding_window_max(&close_col, settings.high_window);
    let max_volume = expanding_window_max(&volume_col, settings.high_window);

    let is_high = |value: Option<f64>, max: Option<f64>| {
        matches!((value, max), (Some(v), Some(m)) if v >= m)
    };

    let mut out = Vec::with_capacity(frame.len());
    for (i, bar) in frame.bars.iter().enumerate().rev() {
        let (k, d) = match valid_value(&kdj.values[i]) {
            Some(IndicatorValue::Kdj { k, d }) => (Some(*k), Some(*d)),
            _ => (None, None),
        };
        let (upper, middle, lower) = match valid_value(&bollinger.values[i]) {
            Some(IndicatorValue::Bollinger {
                upper,
                middle,
                lower,
            }) => (Some(*upper), Some(*middle), Some(*lower)),
            _ => (None, None, None),
        };

        out.push(ScreenRow {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            k,
            d,
            rsi: simple_value(&rsi.values[i]),
            upper,
            middle,
            lower,
            obv: simple_value(&obv.values[i]),
            signal: signals.get(i).copied().unwrap_or_default(),
            high_close: is_high(bar.close, max_close[i]),
            high_volume: is_high(bar.volume, max_volume[i]),
        });
    }
    Ok(out)
}

fn valid_value(point: &IndicatorPoint) -> Option<&IndicatorValue> {
    point.valid.then_some(&point.value)
}

fn simple_value(point: &IndicatorPoint) -> Option<f64> {
    match valid_value(point) {
        Some(IndicatorValue::Simple(v)) => Some(*v),
        _ => None,
    }
}
