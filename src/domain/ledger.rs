use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// The central aggregate: one entry per gas-day, ordered chronologically.
///
/// `total_supply` is a derived field. It always equals the sum of
/// `per_facility_supply` over Production-kind facilities and is recomputed
/// inside the ledger builder (and forecast-day appension) only; downstream
/// consumers treat entries as read-only. The scenario simulator returns a
/// copy with recomputed supply, never a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyLedgerEntry {
    pub date: NaiveDate,
    pub timestamp_millis: i64,
    pub total_supply: f64,
    pub total_demand: f64,
    pub per_facility_supply: BTreeMap<String, f64>,
    pub is_forecast: bool,
}

impl DailyLedgerEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            timestamp_millis: timestamp_millis(date),
            total_supply: 0.0,
            total_demand: 0.0,
            per_facility_supply: BTreeMap::new(),
            is_forecast: false,
        }
    }

    /// Supply/demand balance for this day.
    pub fn balance(&self) -> f64 {
        self.total_supply - self.total_demand
    }
}

/// Milliseconds since epoch at midnight UTC of the gas-day.
pub fn timestamp_millis(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_midnight_utc() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let entry = DailyLedgerEntry::new(date);
        assert_eq!(entry.timestamp_millis % 86_400_000, 0);
        assert_eq!(entry.timestamp_millis / 86_400_000, 19_875);
    }

    #[test]
    fn test_balance() {
        let mut entry = DailyLedgerEntry::new(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        entry.total_supply = 1200.0;
        entry.total_demand = 1000.0;
        assert_eq!(entry.balance(), 200.0);
    }
}
