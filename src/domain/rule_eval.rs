//! Rule evaluation engine.
//!
//! Evaluates rules against a feature frame of bars and pre-computed indicator values.
//!
//! # Evaluation Semantics
//!
//! - Comparison rules: Evaluate at the given bar index; an undefined operand
//!   (bar gap, invalid indicator point) makes the comparison false
//! - `Crossover`: false before index `max(n1, n2)` and whenever one of the
//!   four averages involved is undefined
//! - `AND`: Short-circuits on first `false`
//! - A referenced indicator missing from the frame is a `MissingColumn` error

use crate::domain::error::StockdashError;
use crate::domain::frame::FeatureFrame;
use crate::domain::indicator::IndicatorValue;
use crate::domain::rule::{IndicatorField, IndicatorRef, MaKind, Operand, Rule};

/// Evaluate `rule` on every bar of `frame`.
///
/// An empty frame yields an empty series. Otherwise every indicator the rule
/// reads must be present in the frame.
pub fn evaluate_series(rule: &Rule, frame: &FeatureFrame) -> Result<Vec<bool>, StockdashError> {
    if frame.is_empty() {
        return Ok(Vec::new());
    }
    frame.require(&rule.required_indicators())?;
    (0..frame.len())
        .map(|i| evaluate(rule, frame, i))
        .collect()
}

pub fn evaluate(rule: &Rule, frame: &FeatureFrame, bar_index: usize) -> Result<bool, StockdashError> {
    let result = match rule {
        Rule::Never => false,
        Rule::Above { left, right } => compare(left, right, frame, bar_index, |l, r| l > r)?,
        Rule::Below { left, right } => compare(left, right, frame, bar_index, |l, r| l < r)?,
        Rule::AtOrAbove { left, right } => {
            compare(left, right, frame, bar_index, |l, r| l >= r)?
        }
        Rule::AtOrBelow { left, right } => {
            compare(left, right, frame, bar_index, |l, r| l <= r)?
        }
        Rule::Crossover { ma, n1, n2 } => crossover(*ma, *n1, *n2, frame, bar_index)?,
        Rule::And(rules) => {
            for r in rules {
                if !evaluate(r, frame, bar_index)? {
                    return Ok(false);
                }
            }
            true
        }
    };
    Ok(result)
}

fn compare<F>(
    left: &Operand,
    right: &Operand,
    frame: &FeatureFrame,
    bar_index: usize,
    op: F,
) -> Result<bool, StockdashError>
where
    F: Fn(f64, f64) -> bool,
{
    let left_val = resolve_operand(left, frame, bar_index)?;
    let right_val = resolve_operand(right, frame, bar_index)?;
    Ok(match (left_val, right_val) {
        (Some(l), Some(r)) => op(l, r),
        _ => false,
    })
}

fn crossover(
    ma: MaKind,
    n1: usize,
    n2: usize,
    frame: &FeatureFrame,
    bar_index: usize,
) -> Result<bool, StockdashError> {
    let first = frame.series(&ma.indicator(n1))?;
    let second = frame.series(&ma.indicator(n2))?;

    if bar_index == 0 || bar_index < n1.max(n2) {
        return Ok(false);
    }

    let value = |series: &crate::domain::indicator::IndicatorSeries, i: usize| {
        series
            .values
            .get(i)
            .filter(|p| p.valid)
            .and_then(|p| extract_field(&p.value, IndicatorField::Value))
    };

    let first_curr = value(first, bar_index);
    let second_curr = value(second, bar_index);
    let first_prev = value(first, bar_index - 1);
    let second_prev = value(second, bar_index - 1);

    Ok(match (first_curr, second_curr, first_prev, second_prev) {
        (Some(fc), Some(sc), Some(fp), Some(sp)) => fc > sc && fp <= sp,
        _ => false,
    })
}

fn resolve_operand(
    operand: &Operand,
    frame: &FeatureFrame,
    bar_index: usize,
) -> Result<Option<f64>, StockdashError> {
    let bar = &frame.bars[bar_index];
    let value = match operand {
        Operand::Open => bar.open,
        Operand::High => bar.high,
        Operand::Low => bar.low,
        Operand::Close => bar.close,
        Operand::Volume => bar.volume,
        Operand::Constant(v) => Some(*v),
        Operand::Indicator(ind_ref) => return resolve_indicator(ind_ref, frame, bar_index),
    };
    Ok(value)
}

fn resolve_indicator(
    ind_ref: &IndicatorRef,
    frame: &FeatureFrame,
    bar_index: usize,
) -> Result<Option<f64>, StockdashError> {
    let series = frame.series(&ind_ref.indicator_type)?;

    let point = match series.values.get(bar_index) {
        Some(p) if p.valid => p,
        _ => return Ok(None),
    };

    Ok(extract_field(&point.value, ind_ref.field))
}

pub fn extract_field(value: &IndicatorValue, field: IndicatorField) -> Option<f64> {
    match (value, field) {
        (IndicatorValue::Simple(v), IndicatorField::Value) => Some(*v),
        (IndicatorValue::Kdj { k, .. }, IndicatorField::K) => Some(*k),
        (IndicatorValue::Kdj { d, .. }, IndicatorField::D) => Some(*d),
        (IndicatorValue::Bollinger { upper, .. }, IndicatorField::BollingerUpper) => Some(*upper),
        (IndicatorValue::Bollinger { middle, .. }, IndicatorField::BollingerMiddle) => {
            Some(*middle)
        }
        (IndicatorValue::Bollinger { lower, .. }, IndicatorField::BollingerLower) => Some(*lower),
        _ => None,
    }
}
