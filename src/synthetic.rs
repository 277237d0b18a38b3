//! Clearly-flagged synthetic fallback dataset.
//!
//! Substituted when a required feed exhausts its retries, so the consumer
//! never silently renders zeros as if they were real. Every snapshot built
//! here carries `is_synthetic = true`; consumers distinguish placeholder
//! from real data by that flag, not by inference.

use std::collections::BTreeMap;
use std::f64::consts::PI;

use chrono::{Datelike, Days, NaiveDate};
use rand::Rng;

use crate::config::Config;
use crate::domain::StorageSeriesPoint;
use crate::pipeline::MarketSnapshot;

const SYNTHETIC_DAYS: u64 = 365;
const SEASONAL_SWING_TJ: f64 = 2000.0;
const NOISE_SPAN_TJ: f64 = 500.0;

pub fn synthetic_snapshot(cfg: &Config, today: NaiveDate) -> MarketSnapshot {
    let capacity = cfg.storage.default_total_capacity_tj;
    MarketSnapshot {
        report_id: "synthetic".to_string(),
        as_at: None,
        ledger: Vec::new(),
        forecast_start: None,
        storage: synthetic_storage_series(SYNTHETIC_DAYS, capacity, today),
        total_storage_capacity_tj: capacity,
        volatility: Vec::new(),
        constraints: BTreeMap::new(),
        facilities: Vec::new(),
        gsoo_median_demand: cfg.registry.gsoo_median_demand(),
        is_synthetic: true,
    }
}

/// Seasonal storage series: winter withdrawal, summer injection, plus noise.
/// Volume stays within 5-95% of capacity, mimicking observed utilisation.
pub fn synthetic_storage_series(
    days: u64,
    total_capacity: f64,
    today: NaiveDate,
) -> Vec<StorageSeriesPoint> {
    let mut rng = rand::thread_rng();
    let mut volume = total_capacity * rng.gen_range(0.4..0.6);

    (0..days)
        .rev()
        .map(|i| {
            let date = today - Days::new(i);
            let seasonal = ((date.month0() as f64 / 12.0) * 2.0 * PI - PI / 2.0).sin();
            let noise = (rng.gen::<f64>() - 0.5) * NOISE_SPAN_TJ;
            let net_flow = -seasonal * SEASONAL_SWING_TJ + noise;

            volume = (volume + net_flow).clamp(total_capacity * 0.05, total_capacity * 0.95);
            StorageSeriesPoint {
                date,
                net_flow,
                total_volume_tj: volume,
            }
        })
        .collect()
}
