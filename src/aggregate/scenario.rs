//! Outage scenario simulation.
//!
//! A pure what-if transform over a single ledger entry: recomputes supply
//! from the set of facilities the consumer has left active, then applies the
//! configured outage. The input entry is never mutated, so a scenario edit
//! never requires recomputation from raw data.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{DailyLedgerEntry, ScenarioConfig};

/// A ledger entry copy with scenario supply applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulatedLedgerEntry {
    pub date: NaiveDate,
    pub timestamp_millis: i64,
    /// Supply over the active facility set only; toggled-off facilities
    /// contribute 0.
    pub total_supply: f64,
    /// `total_supply` less the configured outage impact.
    pub simulated_supply: f64,
    pub total_demand: f64,
    pub per_facility_supply: BTreeMap<String, f64>,
    pub is_forecast: bool,
}

pub fn simulate(
    entry: &DailyLedgerEntry,
    active_facilities: &BTreeSet<String>,
    scenario: &ScenarioConfig,
) -> SimulatedLedgerEntry {
    let new_total_supply: f64 = entry
        .per_facility_supply
        .iter()
        .filter(|(name, _)| active_facilities.contains(*name))
        .map(|(_, supply)| supply)
        .sum();

    let mut simulated_supply = new_total_supply;
    if scenario.active {
        if let Some(facility) = &scenario.facility_name {
            if let Some(supply) = entry.per_facility_supply.get(facility) {
                let impact = supply * scenario.outage_percent / 100.0;
                simulated_supply = new_total_supply - impact;
            }
        }
    }

    SimulatedLedgerEntry {
        date: entry.date,
        timestamp_millis: entry.timestamp_millis,
        total_supply: new_total_supply,
        simulated_supply,
        total_demand: entry.total_demand,
        per_facility_supply: entry.per_facility_supply.clone(),
        is_forecast: entry.is_forecast,
    }
}
