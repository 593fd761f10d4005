//! Signal evaluation.
//!
//! Evaluates a (buy, sell) pair on a feature frame and folds the two boolean
//! series into one tri-state column. Buy wins when both fire on the same bar.
//! Shared unchanged by the screen and the backtest adapter.

use crate::domain::error::StockdashError;
use crate::domain::frame::FeatureFrame;
use crate::domain::registry::StrategyRegistry;
use crate::domain::rule::Rule;
use crate::domain::rule_eval::evaluate_series;
use serde::{Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Buy,
    Sell,
    #[default]
    None,
}

impl Signal {
    pub fn from_pair(buy: bool, sell: bool) -> Self {
        if buy {
            Signal::Buy
        } else if sell {
            Signal::Sell
        } else {
            Signal::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Sell => "Sell",
            Signal::None => "",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Buy and sell series for the named pair. Unknown or empty names evaluate
/// to all-false series of the frame's length.
pub fn evaluate(
    frame: &FeatureFrame,
    registry: &StrategyRegistry,
    buy_name: &str,
    sell_name: &str,
) -> Result<(Vec<bool>, Vec<bool>), StockdashError> {
    evaluate_rules(frame, registry.buy(buy_name), registry.sell(sell_name))
}

pub fn evaluate_rules(
    frame: &FeatureFrame,
    entry: &Rule,
    exit: &Rule,
) -> Result<(Vec<bool>, Vec<bool>), StockdashError> {
    let buy = evaluate_series(entry, frame)?;
    let sell = evaluate_series(exit, frame)?;
    Ok((buy, sell))
}

pub fn combine(buy: &[bool], sell: &[bool]) -> Vec<Signal> {
    buy.iter()
        .zip(sell)
        .map(|(&b, &s)| Signal::from_pair(b, s))
        .collect()
}

pub fn evaluate_signals(
    frame: &FeatureFrame,
    registry: &StrategyRegistry,
    buy_name: &str,
    sell_name: &str,
) -> Result<Vec<Signal>, StockdashError> {
    let (buy, sell) = evaluate(frame, registry, buy_name, sell_name)?;
    Ok(combine(&buy, &sell))
}
