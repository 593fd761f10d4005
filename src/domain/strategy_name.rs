//! Parametric strategy names.
//!
//! A crossover strategy is named `{INDICATOR}_{N1}_{N2}` where `INDICATOR` is
//! `SMA` or `EMA` and both periods are positive decimal integers, e.g.
//! `SMA_5_20` or `EMA_60_20`. The name describes the rule completely, so the
//! rule is derived from it rather than looked up.

use crate::domain::error::StockdashError;
use crate::domain::rule::{MaKind, Rule};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CrossoverName {
    pub ma: MaKind,
    pub n1: usize,
    pub n2: usize,
}

impl CrossoverName {
    pub fn to_rule(&self) -> Rule {
        Rule::Crossover {
            ma: self.ma,
            n1: self.n1,
            n2: self.n2,
        }
    }
}

impl fmt::Display for CrossoverName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.ma.token(), self.n1, self.n2)
    }
}

impl FromStr for CrossoverName {
    type Err = StockdashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_crossover_name(s)
    }
}

/// Parse a crossover name. Anything other than exactly
/// `{SMA|EMA}_{digits}_{digits}` with two distinct positive periods is a
/// `NameFormat` error.
pub fn parse_crossover_name(name: &str) -> Result<CrossoverName, StockdashError> {
    let fail = |reason: String| StockdashError::NameFormat {
        name: name.to_string(),
        reason,
    };

    let tokens: Vec<&str> = name.split('_').collect();
    if tokens.len() != 3 {
        return Err(fail(format!(
            "expected INDICATOR_N1_N2, found {} token(s)",
            tokens.len()
        )));
    }

    let ma = match tokens[0] {
        "SMA" => MaKind::Sma,
        "EMA" => MaKind::Ema,
        other => return Err(fail(format!("unknown indicator token '{}'", other))),
    };

    let n1 = parse_period(tokens[1]).map_err(fail)?;
    let n2 = parse_period(tokens[2]).map_err(fail)?;

    if n1 == n2 {
        return Err(fail(format!("periods must differ, both are {}", n1)));
    }

    Ok(CrossoverName { ma, n1, n2 })
}

fn parse_period(token: &str) -> Result<usize, String> {
    // `usize::from_str` accepts a leading '+', digits only here
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("period '{}' is not a decimal integer", token));
    }
    let period: usize = token
        .parse()
        .map_err(|_| format!("period '{}' is out of range", token))?;
    if period == 0 {
        return Err("period must be positive".to_string());
    }
    Ok(period)
}
