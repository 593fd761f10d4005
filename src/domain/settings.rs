//! Indicator parameters shared by the screen, the registry and the backtest adapter.

use crate::domain::indicator::IndicatorType;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSettings {
    pub kdj_period: usize,
    pub bollinger_period: usize,
    pub bollinger_mult_x100: u32,
    pub rsi_period: usize,
    /// Look-back for the "highest close / highest volume" flags.
    pub high_window: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            kdj_period: 9,
            bollinger_period: 20,
            bollinger_mult_x100: 200,
            rsi_period: 14,
            high_window: 60,
        }
    }
}

impl IndicatorSettings {
    pub fn kdj(&self) -> IndicatorType {
        IndicatorType::Kdj(self.kdj_period)
    }

    pub fn bollinger(&self) -> IndicatorType {
        IndicatorType::Bollinger {
            period: self.bollinger_period,
            stddev_mult_x100: self.bollinger_mult_x100,
        }
    }

    pub fn rsi(&self) -> IndicatorType {
        IndicatorType::Rsi(self.rsi_period)
    }

    /// Indicators every screen shows regardless of the selected rules.
    pub fn standard_indicators(&self) -> Vec<IndicatorType> {
        vec![self.kdj(), self.bollinger(), self.rsi(), IndicatorType::Obv]
    }
}
