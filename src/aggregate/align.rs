//! Temporal alignment and short-term demand forecasting.
//!
//! The supply feed and the consumption feed settle with different lags
//! (observed: 2 days vs 7 days), so a naive join by date shows a misleading
//! zero-demand tail. Alignment cuts the series at the last day with an
//! observed consumption contribution, then extrapolates demand over a short
//! horizon using a trailing mean.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};

use crate::domain::DailyLedgerEntry;

#[derive(Debug, Clone, Copy)]
pub struct AlignParams {
    /// Trailing aligned days averaged into the demand forecast.
    pub demand_window: usize,
    /// Maximum forecast days appended.
    pub horizon_days: usize,
    /// Supply-feed settlement lag: never forecast a date later than
    /// `today - supply_lag_days`, because data for it could plausibly
    /// already exist.
    pub supply_lag_days: u64,
    /// Injected for determinism.
    pub today: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct AlignedSeries {
    /// Aligned actual entries followed by forecast entries, in date order.
    pub entries: Vec<DailyLedgerEntry>,
    /// Date of the first forecast entry; `None` when none was generated.
    pub forecast_start: Option<NaiveDate>,
    /// Trailing-mean demand applied to forecast days.
    pub forecast_demand: f64,
}

pub fn align(
    ledger: &[DailyLedgerEntry],
    consumption_days: &BTreeSet<NaiveDate>,
    params: &AlignParams,
) -> AlignedSeries {
    let last_consumption_day = match consumption_days.iter().next_back() {
        Some(day) => *day,
        // Nothing to align against: the series is all supply, leave it be.
        None => {
            return AlignedSeries {
                entries: ledger.to_vec(),
                forecast_start: None,
                forecast_demand: 0.0,
            }
        }
    };

    let mut aligned: Vec<DailyLedgerEntry> = ledger
        .iter()
        .filter(|entry| entry.date <= last_consumption_day)
        .cloned()
        .collect();

    let forecast_demand = trailing_mean_demand(&aligned, params.demand_window);

    let horizon_end = params.today - Days::new(params.supply_lag_days);
    let mut forecast_start = None;

    if let Some(start) = last_consumption_day.succ_opt() {
        for offset in 0..params.horizon_days as u64 {
            let date = start + Days::new(offset);
            if date > horizon_end {
                break;
            }
            // Supply-only tail entries carry observed supply for the
            // forecast day where the feed already has it.
            let mut entry = match ledger.iter().find(|e| e.date == date) {
                Some(tail) => tail.clone(),
                None => DailyLedgerEntry::new(date),
            };
            entry.total_demand = forecast_demand;
            entry.is_forecast = true;
            forecast_start.get_or_insert(date);
            aligned.push(entry);
        }
    }

    AlignedSeries {
        entries: aligned,
        forecast_start,
        forecast_demand,
    }
}

/// Mean of `total_demand` over the trailing `window` aligned days, or over
/// however many exist; 0 when none do.
fn trailing_mean_demand(aligned: &[DailyLedgerEntry], window: usize) -> f64 {
    let tail_len = aligned.len().min(window);
    if tail_len == 0 {
        return 0.0;
    }
    let tail = &aligned[aligned.len() - tail_len..];
    tail.iter().map(|e| e.total_demand).sum::<f64>() / tail_len as f64
}
