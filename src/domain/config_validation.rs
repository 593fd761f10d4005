//! Configuration validation.
//!
//! Reads the `[indicators]`, `[strategies]` and `[screen]` sections into
//! domain settings, failing on the first invalid value before any run.

use crate::domain::error::StockdashError;
use crate::domain::registry::RegistryConfig;
use crate::domain::settings::IndicatorSettings;
use crate::domain::strategy_name::parse_crossover_name;
use crate::ports::config_port::ConfigPort;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    registry_config(config)?;
    validate_screen_rows(config)?;
    Ok(())
}

/// `[indicators]` section with defaults for absent keys.
pub fn indicator_settings(config: &dyn ConfigPort) -> Result<IndicatorSettings, StockdashError> {
    let defaults = IndicatorSettings::default();
    Ok(IndicatorSettings {
        kdj_period: period(config, "kdj_period", defaults.kdj_period)?,
        bollinger_period: period(config, "bollinger_period", defaults.bollinger_period)?,
        bollinger_mult_x100: bollinger_mult(config, defaults.bollinger_mult_x100)?,
        rsi_period: period(config, "rsi_period", defaults.rsi_period)?,
        high_window: period(config, "high_window", defaults.high_window)?,
    })
}

/// Indicator settings plus the extra crossover names of `[strategies]`.
///
/// Every crossover name is parsed here so a typo fails before the registry
/// is built.
pub fn registry_config(config: &dyn ConfigPort) -> Result<RegistryConfig, StockdashError> {
    let indicators = indicator_settings(config)?;
    let buy_crossovers = crossover_list(config, "buy_crossovers")?;
    let sell_crossovers = crossover_list(config, "sell_crossovers")?;
    Ok(RegistryConfig {
        indicators,
        buy_crossovers,
        sell_crossovers,
    })
}

/// Split a comma-separated list, trimming blanks.
pub fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn crossover_list(config: &dyn ConfigPort, key: &str) -> Result<Vec<String>, StockdashError> {
    let names = config
        .get_string("strategies", key)
        .map(|raw| parse_name_list(&raw))
        .unwrap_or_default();
    for name in &names {
        parse_crossover_name(name)?;
    }
    Ok(names)
}

fn period(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, StockdashError> {
    let raw = match config.get_string("indicators", key) {
        None => return Ok(default),
        Some(raw) => raw,
    };
    match raw.trim().parse::<i64>() {
        Ok(value) if value >= 1 => Ok(value as usize),
        Ok(_) => Err(StockdashError::ConfigInvalid {
            section: "indicators".to_string(),
            key: key.to_string(),
            reason: format!("{} must be at least 1", key),
        }),
        Err(_) => Err(StockdashError::ConfigInvalid {
            section: "indicators".to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not an integer", raw.trim()),
        }),
    }
}

fn bollinger_mult(config: &dyn ConfigPort, default_x100: u32) -> Result<u32, StockdashError> {
    let raw = match config.get_string("indicators", "bollinger_mult") {
        None => return Ok(default_x100),
        Some(raw) => raw,
    };
    let invalid = |reason: String| StockdashError::ConfigInvalid {
        section: "indicators".to_string(),
        key: "bollinger_mult".to_string(),
        reason,
    };
    let mult: f64 = raw
        .trim()
        .parse()
        .map_err(|_| invalid(format!("'{}' is not a number", raw.trim())))?;
    if !mult.is_finite() || mult <= 0.0 {
        return Err(invalid("bollinger_mult must be positive".to_string()));
    }
    let x100 = (mult * 100.0).round();
    if x100 < 1.0 || x100 > u32::MAX as f64 {
        return Err(invalid("bollinger_mult is out of range".to_string()));
    }
    Ok(x100 as u32)
}

fn validate_screen_rows(config: &dyn ConfigPort) -> Result<(), StockdashError> {
    if let Some(raw) = config.get_string("screen", "rows") {
        match raw.trim().parse::<i64>() {
            Ok(value) if value >= 0 => {}
            _ => {
                return Err(StockdashError::ConfigInvalid {
                    section: "screen".to_string(),
                    key: "rows".to_string(),
                    reason: "rows must be a non-negative integer".to_string(),
                });
            }
        }
    }
    Ok(())
}
