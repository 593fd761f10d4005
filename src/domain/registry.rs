//! Strategy registry.
//!
//! Built once at start-up by [`StrategyRegistry::new`] and passed by reference
//! afterwards. Lookups are total: an unknown or empty name yields
//! [`Rule::Never`], so a blank selection means "no signal" rather than an
//! error.

use crate::domain::error::StockdashError;
use crate::domain::rule::Rule;
use crate::domain::settings::IndicatorSettings;
use crate::domain::strategy::{self, BUY_CROSSOVERS, Family, Strategy};
use crate::domain::strategy_name::parse_crossover_name;
use std::collections::BTreeMap;

static NEVER: Rule = Rule::Never;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryConfig {
    pub indicators: IndicatorSettings,
    /// Extra crossover names registered in the buy family.
    pub buy_crossovers: Vec<String>,
    /// Crossover names registered in the sell family.
    pub sell_crossovers: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    settings: IndicatorSettings,
    buy: BTreeMap<String, Rule>,
    sell: BTreeMap<String, Rule>,
}

impl StrategyRegistry {
    /// Build both families. A malformed crossover name aborts construction.
    pub fn new(config: &RegistryConfig) -> Result<Self, StockdashError> {
        let settings = config.indicators.clone();
        let (mut buy, mut sell) = built_in(&settings);

        for (family, names, map) in [
            (Family::Buy, &config.buy_crossovers, &mut buy),
            (Family::Sell, &config.sell_crossovers, &mut sell),
        ] {
            for name in names {
                let parsed = parse_crossover_name(name)?;
                tracing::debug!(%family, name = %parsed, "registered crossover");
                map.insert(parsed.to_string(), parsed.to_rule());
            }
        }

        tracing::info!(buy = buy.len(), sell = sell.len(), "strategy registry built");
        Ok(Self {
            settings,
            buy,
            sell,
        })
    }

    /// Registry with default indicator settings and only the built-in names.
    pub fn standard() -> Self {
        let settings = IndicatorSettings::default();
        let (buy, sell) = built_in(&settings);
        Self {
            settings,
            buy,
            sell,
        }
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    pub fn buy(&self, name: &str) -> &Rule {
        self.get(Family::Buy, name)
    }

    pub fn sell(&self, name: &str) -> &Rule {
        self.get(Family::Sell, name)
    }

    pub fn get(&self, family: Family, name: &str) -> &Rule {
        if name.is_empty() {
            return &NEVER;
        }
        match self.map(family).get(name) {
            Some(rule) => rule,
            None => {
                tracing::debug!(%family, name, "unknown strategy name, using neutral rule");
                &NEVER
            }
        }
    }

    pub fn contains(&self, family: Family, name: &str) -> bool {
        self.map(family).contains_key(name)
    }

    /// Registered names of `family`, sorted.
    pub fn names(&self, family: Family) -> impl Iterator<Item = &str> + '_ {
        self.map(family).keys().map(String::as_str)
    }

    /// Strict lookup for user-typed names.
    ///
    /// Registered names and the empty name resolve like [`get`](Self::get);
    /// anything else must be a well-formed crossover name.
    pub fn resolve(&self, family: Family, name: &str) -> Result<Rule, StockdashError> {
        if let Some(rule) = self.map(family).get(name) {
            return Ok(rule.clone());
        }
        strategy::resolve(family, name, &self.settings)
    }

    /// Total lookup of a (buy, sell) pair.
    pub fn strategy(&self, buy_name: &str, sell_name: &str) -> Strategy {
        Strategy {
            buy_name: buy_name.to_string(),
            sell_name: sell_name.to_string(),
            entry: self.buy(buy_name).clone(),
            exit: self.sell(sell_name).clone(),
        }
    }

    fn map(&self, family: Family) -> &BTreeMap<String, Rule> {
        match family {
            Family::Buy => &self.buy,
            Family::Sell => &self.sell,
        }
    }
}

type RuleMap = BTreeMap<String, Rule>;

fn built_in(settings: &IndicatorSettings) -> (RuleMap, RuleMap) {
    let mut buy = RuleMap::new();
    let mut sell = RuleMap::new();
    for (family, map) in [(Family::Buy, &mut buy), (Family::Sell, &mut sell)] {
        for name in strategy::fixed_names(family) {
            if let Some(rule) = strategy::fixed_rule(family, name, settings) {
                map.insert(name.to_string(), rule);
            }
        }
    }
    for crossover in BUY_CROSSOVERS {
        buy.insert(crossover.to_string(), crossover.to_rule());
    }
    (buy, sell)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rule::MaKind;

    #[test]
    fn standard_names_sorted() {
        let registry = StrategyRegistry::standard();
        let buy: Vec<&str> = registry.names(Family::Buy).collect();
        assert_eq!(
            buy,
            vec![
                "BOLL_KD30",
                "BOLL_RSI30",
                "EMA_10_50",
                "EMA_20_60",
                "EMA_9_20",
                "EMA_VWAP",
                "KD20",
                "KD30",
                "SMA_20_60",
                "SMA_5_20",
                "VOL_KD30",
            ]
        );
        let sell: Vec<&str> = registry.names(Family::Sell).collect();
        assert_eq!(sell, vec!["BOLL_UP", "KD70", "KD75", "KD80", "KD85"]);
    }

    #[test]
    fn new_with_default_config_matches_standard() {
        let built = StrategyRegistry::new(&RegistryConfig::default()).unwrap();
        let standard = StrategyRegistry::standard();
        assert!(built.names(Family::Buy).eq(standard.names(Family::Buy)));
        assert!(built.names(Family::Sell).eq(standard.names(Family::Sell)));
        assert_eq!(built.buy("KD30"), standard.buy("KD30"));
    }

    #[test]
    fn lookup_is_total() {
        let registry = StrategyRegistry::standard();
        assert_eq!(registry.buy(""), &Rule::Never);
        assert_eq!(registry.buy("unknown_name_xyz"), &Rule::Never);
        assert_eq!(registry.sell("BOLL_KD30"), &Rule::Never);
        assert_eq!(registry.sell("EMA_10_50"), &Rule::Never);
    }

    #[test]
    fn config_crossovers_registered() {
        let config = RegistryConfig {
            buy_crossovers: vec!["SMA_10_30".into()],
            sell_crossovers: vec!["EMA_20_5".into()],
            ..RegistryConfig::default()
        };
        let registry = StrategyRegistry::new(&config).unwrap();
        assert!(registry.contains(Family::Buy, "SMA_10_30"));
        assert_eq!(
            registry.sell("EMA_20_5"),
            &Rule::Crossover {
                ma: MaKind::Ema,
                n1: 20,
                n2: 5
            }
        );
    }

    #[test]
    fn malformed_config_crossover_fails_construction() {
        let config = RegistryConfig {
            sell_crossovers: vec!["EMA_10".into()],
            ..RegistryConfig::default()
        };
        assert!(matches!(
            StrategyRegistry::new(&config),
            Err(StockdashError::NameFormat { .. })
        ));
    }

    #[test]
    fn settings_reach_fixed_rules() {
        let config = RegistryConfig {
            indicators: IndicatorSettings {
                kdj_period: 5,
                ..IndicatorSettings::default()
            },
            ..RegistryConfig::default()
        };
        let registry = StrategyRegistry::new(&config).unwrap();
        assert_eq!(
            registry.sell("KD80").to_string(),
            "AND(KDJ(5).k > 80, KDJ(5).d > 80)"
        );
    }

    #[test]
    fn resolve_is_strict() {
        let registry = StrategyRegistry::standard();
        assert_eq!(registry.resolve(Family::Buy, "").unwrap(), Rule::Never);
        assert!(registry.resolve(Family::Buy, "SMA_7_21").is_ok());
        assert!(matches!(
            registry.resolve(Family::Buy, "unknown_name_xyz"),
            Err(StockdashError::NameFormat { .. })
        ));
    }

    #[test]
    fn strategy_pair() {
        let registry = StrategyRegistry::standard();
        let s = registry.strategy("KD30", "");
        assert_eq!(s.entry, *registry.buy("KD30"));
        assert_eq!(s.exit, Rule::Never);
    }
}
