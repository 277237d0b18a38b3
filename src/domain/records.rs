use chrono::NaiveDate;
use serde::Deserialize;

/// One raw actual-flow row from a monthly feed payload. Ephemeral: consumed
/// during ledger construction and not retained.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFlowRecord {
    pub gas_day: NaiveDate,
    pub facility_raw_name: String,
    pub receipt: f64,
    pub delivery: f64,
}

/// One raw large-user-consumption row. Same lifecycle as [`RawFlowRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawConsumptionRecord {
    pub gas_day: NaiveDate,
    pub facility_raw_name: String,
    pub quantity: f64,
}

/// A capacity outlook / medium-term capacity row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityRow {
    pub facility_name: String,
    #[serde(default)]
    pub capacity_type: String,
    #[serde(default)]
    pub capacity: f64,
}

/// Envelope around capacity listings as served by the bulletin board API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityReport {
    #[serde(default)]
    pub report_id: String,
    #[serde(default)]
    pub as_at: Option<String>,
    #[serde(default)]
    pub rows: Vec<CapacityRow>,
}
