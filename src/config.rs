use anyhow::Result;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub feeds: FeedsConfig,
    pub storage: StorageConfig,
    pub validation: ValidationConfig,
    pub forecast: ForecastConfig,
    pub volatility: VolatilityConfig,
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedsConfig {
    pub base_url: String,
    pub http_timeout_seconds: u64,
    /// Retries after the first attempt for transient failures.
    pub retry_max_attempts: u32,
    pub retry_base_delay_ms: u64,
    /// How many trailing months of flow/consumption payloads to fetch.
    pub months_back: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Fraction of total capacity assumed in store at the start of the
    /// series. Unverified against real inventory, hence configurable rather
    /// than a hidden constant.
    pub baseline_fill_ratio: f64,
    /// Used when no storage facility in the capacity feed reports a
    /// capacity.
    pub default_total_capacity_tj: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// A production reading above `capacity * capacity_tolerance` is dropped
    /// as a probable unit/format error in the feed. Heuristic, not a hard
    /// physical constraint.
    pub capacity_tolerance: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastConfig {
    /// Trailing days of aligned demand averaged into the forecast.
    pub demand_window_days: usize,
    /// Maximum number of synthetic forecast days appended.
    pub horizon_days: usize,
    /// Settlement lag of the supply feed: never forecast past
    /// `today - supply_lag_days`.
    pub supply_lag_days: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VolatilityConfig {
    pub window_days: usize,
}

/// Immutable facility-name tables, passed explicitly into the registry at
/// construction instead of living as module-level state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Canonical names of known production facilities.
    pub production_facilities: Vec<String>,
    /// Raw feed name -> canonical display name.
    pub aliases: HashMap<String, String>,
    /// Canonical name -> nameplate capacity in TJ/day.
    pub capacities: HashMap<String, f64>,
    /// Year -> statement-of-opportunities yearly demand, TJ/day.
    pub historical_demand: HashMap<String, f64>,
}

impl RegistryConfig {
    /// Reference demand line: mean of the historical yearly demand figures.
    /// Named after the GSOO table it is sourced from.
    pub fn gsoo_median_demand(&self) -> f64 {
        if self.historical_demand.is_empty() {
            return 0.0;
        }
        self.historical_demand.values().sum::<f64>() / self.historical_demand.len() as f64
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("GBB__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gsoo_median_demand() {
        let mut cfg = RegistryConfig::default();
        assert_eq!(cfg.gsoo_median_demand(), 0.0);

        cfg.historical_demand.insert("2022".into(), 1045.0);
        cfg.historical_demand.insert("2023".into(), 1078.0);
        cfg.historical_demand.insert("2024".into(), 1119.0);
        let median = cfg.gsoo_median_demand();
        assert!((median - 1080.666).abs() < 0.01);
    }
}
