//! Backtest adapter.
//!
//! [`SignalAdapter`] wraps an entry/exit rule pair as a per-bar decision
//! callable for a bar-by-bar simulator. Each call sees only the history up to
//! the simulated bar and recomputes the indicators on exactly that history, so
//! no value can depend on a later bar.

use crate::domain::error::StockdashError;
use crate::domain::frame::FeatureFrame;
use crate::domain::ohlcv::{OhlcvBar, sort_bars};
use crate::domain::registry::StrategyRegistry;
use crate::domain::rule_eval::evaluate;
use crate::domain::strategy::Strategy;
use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarDecision {
    pub date: NaiveDate,
    pub enter: bool,
    pub exit: bool,
}

#[derive(Debug, Clone)]
pub struct SignalAdapter {
    strategy: Strategy,
}

impl SignalAdapter {
    pub fn new(strategy: Strategy) -> Self {
        Self { strategy }
    }

    /// Adapter for a named pair; unknown names never fire.
    pub fn from_registry(registry: &StrategyRegistry, buy_name: &str, sell_name: &str) -> Self {
        Self::new(registry.strategy(buy_name, sell_name))
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Decide on the latest bar of `history`.
    ///
    /// Returns `None` for an empty history.
    pub fn on_new_bar(&self, history: &[OhlcvBar]) -> Result<Option<BarDecision>, StockdashError> {
        if history.is_empty() {
            return Ok(None);
        }
        let frame = FeatureFrame::new(history.to_vec())
            .with_indicators(&self.strategy.required_indicators());
        let last = frame.len() - 1;

        Ok(Some(BarDecision {
            date: frame.bars[last].date,
            enter: evaluate(&self.strategy.entry, &frame, last)?,
            exit: evaluate(&self.strategy.exit, &frame, last)?,
        }))
    }
}

/// Feed `bars` to `adapter` one bar at a time, oldest first.
///
/// Bars are sorted and de-duplicated first; call `n` sees the first `n` bars.
pub fn walk_forward(
    bars: Vec<OhlcvBar>,
    adapter: &SignalAdapter,
) -> Result<Vec<BarDecision>, StockdashError> {
    let bars = sort_bars(bars);
    let mut decisions = Vec::with_capacity(bars.len());

    for end in 1..=bars.len() {
        if let Some(decision) = adapter.on_new_bar(&bars[..end])? {
            decisions.push(decision);
        }
    }

    tracing::debug!(
        bars = bars.len(),
        entries = decisions.iter().filter(|d| d.enter).count(),
        exits = decisions.iter().filter(|d| d.exit).count(),
        strategy = %adapter.strategy(),
        "walk-forward complete"
    );
    Ok(decisions)
}
