//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod indicator_helpers;
pub mod settings;
pub mod frame;
pub mod rule;
pub mod rule_eval;
pub mod strategy_name;
pub mod strategy;
pub mod registry;
pub mod signal;
pub mod screen;
pub mod backtest;
pub mod config_validation;
pub mod error;
