//! Named strategies.
//!
//! Two disjoint families: entry (`Buy`) and exit (`Sell`). Each family has a
//! catalogue of fixed rules registered under literal names, and buy crossovers
//! are generated from a closed list of `(indicator, n1, n2)` triples. Any other
//! crossover can be named with the `{SMA|EMA}_{N1}_{N2}` grammar.

use crate::domain::error::StockdashError;
use crate::domain::indicator::IndicatorType;
use crate::domain::rule::{MaKind, Rule};
use crate::domain::settings::IndicatorSettings;
use crate::domain::strategy_name::{CrossoverName, parse_crossover_name};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Buy,
    Sell,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Family::Buy => "buy",
            Family::Sell => "sell",
        })
    }
}

pub const BUY_FIXED: [&str; 6] = [
    "BOLL_KD30",
    "BOLL_RSI30",
    "VOL_KD30",
    "KD30",
    "KD20",
    "EMA_VWAP",
];

pub const SELL_FIXED: [&str; 5] = ["BOLL_UP", "KD70", "KD75", "KD80", "KD85"];

/// Crossovers every buy registry carries.
pub const BUY_CROSSOVERS: [CrossoverName; 5] = [
    CrossoverName {
        ma: MaKind::Sma,
        n1: 5,
        n2: 20,
    },
    CrossoverName {
        ma: MaKind::Sma,
        n1: 20,
        n2: 60,
    },
    CrossoverName {
        ma: MaKind::Ema,
        n1: 20,
        n2: 60,
    },
    CrossoverName {
        ma: MaKind::Ema,
        n1: 10,
        n2: 50,
    },
    CrossoverName {
        ma: MaKind::Ema,
        n1: 9,
        n2: 20,
    },
];

/// Period of the average volume the `VOL_KD30` surge is measured against.
pub const VOLUME_SURGE_PERIOD: usize = 5;

pub fn fixed_names(family: Family) -> &'static [&'static str] {
    match family {
        Family::Buy => &BUY_FIXED,
        Family::Sell => &SELL_FIXED,
    }
}

/// The fixed rule registered under `name`, if any.
pub fn fixed_rule(family: Family, name: &str, settings: &IndicatorSettings) -> Option<Rule> {
    let rule = match (family, name) {
        (Family::Buy, "BOLL_KD30") => Rule::And(vec![
            Rule::lower_band_touch(settings),
            Rule::kd_below(settings, 30.0),
        ]),
        (Family::Buy, "BOLL_RSI30") => Rule::And(vec![
            Rule::lower_band_touch(settings),
            Rule::rsi_below(settings, 30.0),
        ]),
        (Family::Buy, "VOL_KD30") => Rule::And(vec![
            Rule::volume_surge(VOLUME_SURGE_PERIOD),
            Rule::kd_below(settings, 30.0),
        ]),
        (Family::Buy, "KD30") => Rule::kd_below(settings, 30.0),
        (Family::Buy, "KD20") => Rule::kd_below(settings, 20.0),
        (Family::Buy, "EMA_VWAP") => Rule::And(vec![
            Rule::Crossover {
                ma: MaKind::Ema,
                n1: 9,
                n2: 20,
            },
            Rule::above_vwap(),
        ]),
        (Family::Sell, "BOLL_UP") => Rule::upper_band_touch(settings),
        (Family::Sell, "KD70") => Rule::kd_above(settings, 70.0),
        (Family::Sell, "KD75") => Rule::kd_above(settings, 75.0),
        (Family::Sell, "KD80") => Rule::kd_above(settings, 80.0),
        (Family::Sell, "KD85") => Rule::kd_above(settings, 85.0),
        _ => return None,
    };
    Some(rule)
}

/// Resolve a name to its rule: literal names first, then the crossover grammar.
///
/// The empty name is the neutral rule. A name that is neither a literal of
/// `family` nor a well-formed crossover is a `NameFormat` error.
pub fn resolve(family: Family, name: &str, settings: &IndicatorSettings) -> Result<Rule, StockdashError> {
    if name.is_empty() {
        return Ok(Rule::Never);
    }
    if let Some(rule) = fixed_rule(family, name, settings) {
        return Ok(rule);
    }
    Ok(parse_crossover_name(name)?.to_rule())
}

/// A selected (buy, sell) pair with the rules it resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct Strategy {
    pub buy_name: String,
    pub sell_name: String,
    pub entry: Rule,
    pub exit: Rule,
}

impl Strategy {
    /// Indicator columns needed by either side, entry first.
    pub fn required_indicators(&self) -> Vec<IndicatorType> {
        let mut out = self.entry.required_indicators();
        for t in self.exit.required_indicators() {
            if !out.contains(&t) {
                out.push(t);
            }
        }
        out
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |name: &str| if name.is_empty() { "-".to_string() } else { name.to_string() };
        write!(f, "buy {} / sell {}", show(&self.buy_name), show(&self.sell_name))
    }
}
