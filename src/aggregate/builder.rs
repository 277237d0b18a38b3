//! Daily ledger construction.
//!
//! Folds validated raw records into one entry per gas-day:
//!
//! - Production supply per (day, facility) takes the **maximum** receipt seen
//!   within the day, not the sum. Upstream feeds emit multiple revisions of
//!   the same day's reading and the largest figure is treated as
//!   authoritative.
//! - Storage flows accumulate as `receipt - delivery`, summed across the
//!   day. Storage flows are cumulative transactions, not revisions.
//! - Consumption quantities sum by day regardless of facility.
//!
//! `total_supply` is recomputed from the per-facility production figures at
//! the end; the feed's own totals are never trusted.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{DailyLedgerEntry, FacilityKind, NetFlowPoint, RawConsumptionRecord, RawFlowRecord};
use crate::registry::FacilityRegistry;
use crate::validate::RecordValidator;

/// Output of one ledger build.
#[derive(Debug, Clone, Default)]
pub struct LedgerBuild {
    /// One entry per gas-day with at least one record, ascending by date.
    pub entries: Vec<DailyLedgerEntry>,
    /// Net storage flow per day, for the inventory integrator.
    pub storage_net_flow: Vec<NetFlowPoint>,
    /// Days that carried at least one consumption record. Anchors temporal
    /// alignment: demand on other days is derived, not observed.
    pub consumption_days: BTreeSet<NaiveDate>,
    /// Flow records excluded by the validator.
    pub rejected_flow_records: usize,
}

pub fn build(
    flows: &[RawFlowRecord],
    consumption: &[RawConsumptionRecord],
    registry: &FacilityRegistry,
    validator: &RecordValidator<'_>,
) -> LedgerBuild {
    let mut supply: BTreeMap<NaiveDate, BTreeMap<String, f64>> = BTreeMap::new();
    let mut net_flow: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut demand: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut consumption_days = BTreeSet::new();
    let mut rejected = 0usize;

    for record in flows {
        let canonical = registry.resolve(&record.facility_raw_name);
        match registry.kind_of(canonical) {
            FacilityKind::Production => {
                if let Err(reason) = validator.validate_flow(record) {
                    warn!(
                        facility = canonical,
                        gas_day = %record.gas_day,
                        %reason,
                        "dropping out-of-range production reading"
                    );
                    rejected += 1;
                    continue;
                }
                let per_facility = supply.entry(record.gas_day).or_default();
                let entry = per_facility.entry(canonical.to_string()).or_insert(f64::MIN);
                *entry = entry.max(record.receipt);
            }
            FacilityKind::Storage => {
                *net_flow.entry(record.gas_day).or_insert(0.0) += record.receipt - record.delivery;
            }
            FacilityKind::Pipeline | FacilityKind::Unknown => {}
        }
    }

    for record in consumption {
        *demand.entry(record.gas_day).or_insert(0.0) += record.quantity;
        consumption_days.insert(record.gas_day);
    }

    let mut days: BTreeSet<NaiveDate> = BTreeSet::new();
    days.extend(supply.keys());
    days.extend(net_flow.keys());
    days.extend(demand.keys());

    let entries = days
        .into_iter()
        .map(|date| {
            let mut entry = DailyLedgerEntry::new(date);
            if let Some(per_facility) = supply.get(&date) {
                entry.per_facility_supply = per_facility.clone();
            }
            entry.total_demand = demand.get(&date).copied().unwrap_or(0.0);
            recompute_total_supply(&mut entry, registry);
            entry
        })
        .collect();

    let storage_net_flow = net_flow
        .into_iter()
        .map(|(date, net_flow)| NetFlowPoint { date, net_flow })
        .collect();

    LedgerBuild {
        entries,
        storage_net_flow,
        consumption_days,
        rejected_flow_records: rejected,
    }
}

/// Derive `total_supply` from the Production-kind per-facility figures.
/// The only place outside forecast appension where the field is written.
pub fn recompute_total_supply(entry: &mut DailyLedgerEntry, registry: &FacilityRegistry) {
    entry.total_supply = entry
        .per_facility_supply
        .iter()
        .filter(|(name, _)| registry.kind_of(name) == FacilityKind::Production)
        .map(|(_, supply)| supply)
        .sum();
}
