//! Rolling volatility of the supply/demand balance.
//!
//! Population standard deviation (divide by the window size, not `n - 1`)
//! over a trailing window of daily balances. No smoothing and no
//! gap-filling: a missing day in the input simply shifts the window.

use crate::domain::{DailyLedgerEntry, VolatilityPoint};

/// One point per entry from index `window - 1` onward; fewer entries than
/// the window yields no points, which is not an error.
pub fn rolling_volatility(entries: &[DailyLedgerEntry], window: usize) -> Vec<VolatilityPoint> {
    if window == 0 || entries.len() < window {
        return Vec::new();
    }

    let balances: Vec<f64> = entries.iter().map(DailyLedgerEntry::balance).collect();

    (window - 1..entries.len())
        .map(|i| {
            let slice = &balances[i + 1 - window..=i];
            let mean = slice.iter().sum::<f64>() / window as f64;
            let variance = slice.iter().map(|b| (b - mean).powi(2)).sum::<f64>() / window as f64;
            VolatilityPoint {
                date: entries[i].date,
                volatility: variance.sqrt(),
            }
        })
        .collect()
}
