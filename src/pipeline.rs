//! Load-and-aggregate orchestration.
//!
//! One logical pipeline per trigger: all feed fetches are issued
//! concurrently and must complete (or fail) before aggregation begins;
//! aggregation never starts on a partial fetch set. There is no cancellation
//! primitive. A re-trigger recomputes the full ledger from raw inputs and
//! the latest result supersedes the previous one (last-write-wins).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::aggregate::{
    aggregate_constraints, align, integrate, rolling_volatility, simulate, AlignParams,
    LedgerBuild, SimulatedLedgerEntry, StorageParams,
};
use crate::config::Config;
use crate::domain::{
    ConstraintBucket, DailyLedgerEntry, FacilityIdentity, RawConsumptionRecord, RawFlowRecord,
    ScenarioConfig, StorageSeriesPoint, VolatilityPoint,
};
use crate::error::FeedError;
use crate::feed::{month_keys, parse_monthly_payload, FeedClient, FeedPayload};
use crate::registry::FacilityRegistry;
use crate::synthetic::synthetic_snapshot;
use crate::validate::RecordValidator;

/// Everything the presentation layer may read.
#[derive(Debug, Clone, Serialize)]
pub struct MarketSnapshot {
    pub report_id: String,
    pub as_at: Option<String>,
    /// Aligned actual entries followed by forecast entries, date order.
    pub ledger: Vec<DailyLedgerEntry>,
    pub forecast_start: Option<NaiveDate>,
    pub storage: Vec<StorageSeriesPoint>,
    pub total_storage_capacity_tj: f64,
    pub volatility: Vec<VolatilityPoint>,
    pub constraints: BTreeMap<String, ConstraintBucket>,
    pub facilities: Vec<FacilityIdentity>,
    /// Mean historical yearly demand, for the reference line.
    pub gsoo_median_demand: f64,
    /// True when this snapshot is the substituted fallback dataset rather
    /// than aggregated feed data.
    pub is_synthetic: bool,
}

impl MarketSnapshot {
    /// Consumer-triggered what-if pass over the whole ledger. Non-mutating;
    /// the snapshot itself is left untouched.
    pub fn simulate_series(
        &self,
        active_facilities: &BTreeSet<String>,
        scenario: &ScenarioConfig,
    ) -> Vec<SimulatedLedgerEntry> {
        self.ledger
            .iter()
            .map(|entry| simulate(entry, active_facilities, scenario))
            .collect()
    }
}

/// Result of one load cycle. On total load failure the snapshot is the
/// clearly-flagged synthetic substitute and `failure` carries the error
/// descriptor for the feed that exhausted its retries.
#[derive(Debug)]
pub struct LoadOutcome {
    pub snapshot: MarketSnapshot,
    pub failure: Option<FeedError>,
}

pub struct Engine {
    cfg: Config,
    client: FeedClient,
    latest: RwLock<Option<Arc<MarketSnapshot>>>,
}

impl Engine {
    pub fn new(cfg: Config) -> Result<Self> {
        let client = FeedClient::new(&cfg.feeds)?;
        Ok(Self {
            cfg,
            client,
            latest: RwLock::new(None),
        })
    }

    /// Run a full load-and-aggregate cycle and publish the result. Never
    /// fails: a total load failure degrades to the synthetic dataset.
    pub async fn refresh(&self) -> LoadOutcome {
        let today = Utc::now().date_naive();
        self.refresh_at(today).await
    }

    /// As [`Self::refresh`], with the reference day injected (forecast
    /// horizon and month walk-back both depend on it).
    pub async fn refresh_at(&self, today: NaiveDate) -> LoadOutcome {
        let outcome = match self.load_once(today).await {
            Ok(snapshot) => LoadOutcome {
                snapshot,
                failure: None,
            },
            Err(err) => {
                error!(error = %err, endpoint = err.endpoint(),
                    "market data load failed, substituting synthetic dataset");
                LoadOutcome {
                    snapshot: synthetic_snapshot(&self.cfg, today),
                    failure: Some(err),
                }
            }
        };
        // Last write wins; a concurrent trigger simply supersedes this one.
        *self.latest.write().await = Some(Arc::new(outcome.snapshot.clone()));
        outcome
    }

    pub async fn latest(&self) -> Option<Arc<MarketSnapshot>> {
        self.latest.read().await.clone()
    }

    async fn load_once(&self, today: NaiveDate) -> Result<MarketSnapshot, FeedError> {
        let (capacity_report, mtc_report) = tokio::try_join!(
            self.client.capacity_outlook(),
            self.client.medium_term_capacity()
        )?;

        let months = month_keys(today, self.cfg.feeds.months_back);
        let (flow_texts, consumption_texts) = tokio::try_join!(
            try_join_all(months.iter().map(|m| self.client.monthly_flow(m))),
            try_join_all(months.iter().map(|m| self.client.monthly_consumption(m)))
        )?;

        let (flows, consumption) = collect_records(flow_texts, consumption_texts);
        info!(
            flow_records = flows.len(),
            consumption_records = consumption.len(),
            capacity_rows = capacity_report.rows.len(),
            "feed fetch complete"
        );

        let mut registry = FacilityRegistry::new(&self.cfg.registry);
        for row in &capacity_report.rows {
            registry.observe(row);
        }

        let validator = RecordValidator::new(&registry, self.cfg.validation.capacity_tolerance);
        let build = crate::aggregate::build(&flows, &consumption, &registry, &validator);
        if build.rejected_flow_records > 0 {
            warn!(rejected = build.rejected_flow_records, "dropped out-of-range flow records");
        }

        Ok(self.assemble(today, capacity_report.report_id, capacity_report.as_at,
            &mtc_report.rows, registry, build))
    }

    fn assemble(
        &self,
        today: NaiveDate,
        report_id: String,
        as_at: Option<String>,
        mtc_rows: &[crate::domain::CapacityRow],
        registry: FacilityRegistry,
        build: LedgerBuild,
    ) -> MarketSnapshot {
        let aligned = align(
            &build.entries,
            &build.consumption_days,
            &AlignParams {
                demand_window: self.cfg.forecast.demand_window_days,
                horizon_days: self.cfg.forecast.horizon_days,
                supply_lag_days: self.cfg.forecast.supply_lag_days.max(0) as u64,
                today,
            },
        );

        // Volatility is computed over the aligned actuals; forecast days
        // carry derived demand and would flatten the signal.
        let actuals: Vec<DailyLedgerEntry> = aligned
            .entries
            .iter()
            .filter(|e| !e.is_forecast)
            .cloned()
            .collect();
        let volatility = rolling_volatility(&actuals, self.cfg.volatility.window_days);

        let mut total_storage_capacity = registry.total_storage_capacity();
        if total_storage_capacity <= 0.0 {
            total_storage_capacity = self.cfg.storage.default_total_capacity_tj;
        }
        let storage = integrate(
            &build.storage_net_flow,
            &StorageParams {
                total_capacity_tj: total_storage_capacity,
                baseline_fill_ratio: self.cfg.storage.baseline_fill_ratio,
            },
        );

        let constraints = aggregate_constraints(mtc_rows, &registry);

        MarketSnapshot {
            report_id,
            as_at,
            ledger: aligned.entries,
            forecast_start: aligned.forecast_start,
            storage,
            total_storage_capacity_tj: total_storage_capacity,
            volatility,
            constraints,
            facilities: registry.facilities().cloned().collect(),
            gsoo_median_demand: self.cfg.registry.gsoo_median_demand(),
            is_synthetic: false,
        }
    }
}

/// Parse the monthly payload bodies into typed records, tolerating missing
/// months and warning on payloads whose header set contradicts the endpoint
/// they came from.
fn collect_records(
    flow_texts: Vec<Option<String>>,
    consumption_texts: Vec<Option<String>>,
) -> (Vec<RawFlowRecord>, Vec<RawConsumptionRecord>) {
    let mut flows = Vec::new();
    for text in flow_texts.into_iter().flatten() {
        match parse_monthly_payload(&text) {
            FeedPayload::Flow(records) => flows.extend(records),
            FeedPayload::Consumption(_) => {
                warn!("flow endpoint served a consumption-shaped payload, skipping");
            }
            FeedPayload::Empty => {}
        }
    }

    let mut consumption = Vec::new();
    for text in consumption_texts.into_iter().flatten() {
        match parse_monthly_payload(&text) {
            FeedPayload::Consumption(records) => consumption.extend(records),
            FeedPayload::Flow(_) => {
                warn!("consumption endpoint served a flow-shaped payload, skipping");
            }
            FeedPayload::Empty => {}
        }
    }

    (flows, consumption)
}
