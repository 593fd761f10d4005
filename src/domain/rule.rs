//! Rule AST data structures.
//!
//! This module defines the abstract syntax tree for trading rules:
//! - `Operand`: What can be compared (price fields, constants, indicators)
//! - `IndicatorRef`: Reference to an indicator with a specific field
//! - `IndicatorField`: Which field of a multi-value indicator to use
//! - `Rule`: The rule AST with comparison, crossover and composite variants
//!
//! Named strategies (KD thresholds, band touches, moving-average crossovers)
//! are built from these variants by the constructors on `Rule`.

use crate::domain::indicator::IndicatorType;
use crate::domain::settings::IndicatorSettings;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Open,
    High,
    Low,
    Close,
    Volume,
    Constant(f64),
    Indicator(IndicatorRef),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorRef {
    pub indicator_type: IndicatorType,
    pub field: IndicatorField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorField {
    Value,
    K,
    D,
    BollingerUpper,
    BollingerMiddle,
    BollingerLower,
}

/// Moving-average flavour of a crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaKind {
    Sma,
    Ema,
}

impl MaKind {
    pub fn token(&self) -> &'static str {
        match self {
            MaKind::Sma => "SMA",
            MaKind::Ema => "EMA",
        }
    }

    pub fn indicator(&self, period: usize) -> IndicatorType {
        match self {
            MaKind::Sma => IndicatorType::Sma(period),
            MaKind::Ema => IndicatorType::Ema(period),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Neutral rule: false on every bar.
    Never,
    Above {
        left: Operand,
        right: Operand,
    },
    Below {
        left: Operand,
        right: Operand,
    },
    AtOrAbove {
        left: Operand,
        right: Operand,
    },
    AtOrBelow {
        left: Operand,
        right: Operand,
    },
    /// MA(n1) strictly above MA(n2) now and at-or-below on the previous bar.
    ///
    /// With n1 < n2 this is the fast average crossing above the slow one;
    /// with n1 > n2 it is the fast average crossing below the slow one.
    Crossover {
        ma: MaKind,
        n1: usize,
        n2: usize,
    },
    And(Vec<Rule>),
}

impl Operand {
    pub fn indicator(indicator_type: IndicatorType, field: IndicatorField) -> Self {
        Operand::Indicator(IndicatorRef {
            indicator_type,
            field,
        })
    }
}

impl Rule {
    /// K and D both strictly below `level`.
    pub fn kd_below(settings: &IndicatorSettings, level: f64) -> Self {
        Rule::And(vec![
            Rule::Below {
                left: Operand::indicator(settings.kdj(), IndicatorField::K),
                right: Operand::Constant(level),
            },
            Rule::Below {
                left: Operand::indicator(settings.kdj(), IndicatorField::D),
                right: Operand::Constant(level),
            },
        ])
    }

    /// K and D both strictly above `level`.
    pub fn kd_above(settings: &IndicatorSettings, level: f64) -> Self {
        Rule::And(vec![
            Rule::Above {
                left: Operand::indicator(settings.kdj(), IndicatorField::K),
                right: Operand::Constant(level),
            },
            Rule::Above {
                left: Operand::indicator(settings.kdj(), IndicatorField::D),
                right: Operand::Constant(level),
            },
        ])
    }

    pub fn rsi_below(settings: &IndicatorSettings, level: f64) -> Self {
        Rule::Below {
            left: Operand::indicator(settings.rsi(), IndicatorField::Value),
            right: Operand::Constant(level),
        }
    }

    /// Close at or below the lower Bollinger band.
    pub fn lower_band_touch(settings: &IndicatorSettings) -> Self {
        Rule::AtOrBelow {
            left: Operand::Close,
            right: Operand::indicator(settings.bollinger(), IndicatorField::BollingerLower),
        }
    }

    /// Close at or above the upper Bollinger band.
    pub fn upper_band_touch(settings: &IndicatorSettings) -> Self {
        Rule::AtOrAbove {
            left: Operand::Close,
            right: Operand::indicator(settings.bollinger(), IndicatorField::BollingerUpper),
        }
    }

    /// Volume strictly above its `period`-bar average.
    pub fn volume_surge(period: usize) -> Self {
        Rule::Above {
            left: Operand::Volume,
            right: Operand::indicator(IndicatorType::VolumeSma(period), IndicatorField::Value),
        }
    }

    pub fn above_vwap() -> Self {
        Rule::Above {
            left: Operand::Close,
            right: Operand::indicator(IndicatorType::Vwap, IndicatorField::Value),
        }
    }

    /// Indicator columns this rule reads, in first-use order without duplicates.
    pub fn required_indicators(&self) -> Vec<IndicatorType> {
        let mut out = Vec::new();
        self.collect_indicators(&mut out);
        out
    }

    fn collect_indicators(&self, out: &mut Vec<IndicatorType>) {
        fn push(out: &mut Vec<IndicatorType>, t: IndicatorType) {
            if !out.contains(&t) {
                out.push(t);
            }
        }
        match self {
            Rule::Never => {}
            Rule::Above { left, right }
            | Rule::Below { left, right }
            | Rule::AtOrAbove { left, right }
            | Rule::AtOrBelow { left, right } => {
                for operand in [left, right] {
                    if let Operand::Indicator(r) = operand {
                        push(out, r.indicator_type.clone());
                    }
                }
            }
            Rule::Crossover { ma, n1, n2 } => {
                push(out, ma.indicator(*n1));
                push(out, ma.indicator(*n2));
            }
            Rule::And(rules) => {
                for r in rules {
                    r.collect_indicators(out);
                }
            }
        }
    }
}

impl fmt::Display for IndicatorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IndicatorField::Value => "",
            IndicatorField::K => ".k",
            IndicatorField::D => ".d",
            IndicatorField::BollingerUpper => ".upper",
            IndicatorField::BollingerMiddle => ".middle",
            IndicatorField::BollingerLower => ".lower",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Open => write!(f, "open"),
            Operand::High => write!(f, "high"),
            Operand::Low => write!(f, "low"),
            Operand::Close => write!(f, "close"),
            Operand::Volume => write!(f, "volume"),
            Operand::Constant(v) => write!(f, "{}", v),
            Operand::Indicator(r) => write!(f, "{}{}", r.indicator_type, r.field),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Never => write!(f, "NEVER"),
            Rule::Above { left, right } => write!(f, "{} > {}", left, right),
            Rule::Below { left, right } => write!(f, "{} < {}", left, right),
            Rule::AtOrAbove { left, right } => write!(f, "{} >= {}", left, right),
            Rule::AtOrBelow { left, right } => write!(f, "{} <= {}", left, right),
            Rule::Crossover { ma, n1, n2 } => {
                write!(f, "CROSS({}({}), {}({}))", ma.token(), n1, ma.token(), n2)
            }
            Rule::And(rules) => {
                write!(f, "AND(")?;
                for (i, r) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", r)?;
                }
                write!(f, ")")
            }
        }
    }
}
