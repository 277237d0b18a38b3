use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Net storage flow (receipt minus delivery, summed over all storage
/// facilities) for one gas-day. Input to the inventory integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetFlowPoint {
    pub date: NaiveDate,
    pub net_flow: f64,
}

/// Running storage inventory for one gas-day, produced by integrating net
/// flows from a baseline volume. Owned by the storage integrator; consumed
/// read-only by charting/export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StorageSeriesPoint {
    pub date: NaiveDate,
    pub net_flow: f64,
    pub total_volume_tj: f64,
}

/// Rolling supply/demand-balance volatility for one gas-day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VolatilityPoint {
    pub date: NaiveDate,
    pub volatility: f64,
}

/// Consumer-supplied outage scenario. Transient; never persisted by the
/// engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    pub active: bool,
    pub facility_name: Option<String>,
    /// Percent of the facility's supply taken offline, in `[0, 100]`.
    pub outage_percent: f64,
}

/// Per-facility constraint totals derived from outage-schedule records.
/// The three TJ buckets are mutually exclusive: each source record lands in
/// exactly one, partitioned by its capacity-type tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintBucket {
    pub facility: String,
    pub total_capacity: f64,
    pub normal_tj: f64,
    pub maintenance_tj: f64,
    pub construction_tj: f64,
}

impl ConstraintBucket {
    pub fn new(facility: impl Into<String>) -> Self {
        Self {
            facility: facility.into(),
            total_capacity: 0.0,
            normal_tj: 0.0,
            maintenance_tj: 0.0,
            construction_tj: 0.0,
        }
    }
}
