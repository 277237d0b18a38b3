//! Raw record sanity checks.
//!
//! Numeric coercion already happened in the payload parser; this layer only
//! decides whether a reading is plausible enough to aggregate. Rejected
//! records are excluded and logged, never fatal.

use thiserror::Error;

use crate::domain::{FacilityKind, RawFlowRecord};
use crate::registry::FacilityRegistry;

/// Production readings above `capacity * tolerance` are treated as probable
/// unit/format errors in the feed. This is a heuristic guard, not a hard
/// physical constraint; the 1.2 default is configurable.
pub const DEFAULT_CAPACITY_TOLERANCE: f64 = 1.2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("negative receipt {receipt}")]
    NegativeReceipt { receipt: f64 },

    #[error("receipt {receipt} exceeds {limit} ({tolerance}x nameplate capacity)")]
    AboveCapacity { receipt: f64, limit: f64, tolerance: f64 },
}

pub struct RecordValidator<'a> {
    registry: &'a FacilityRegistry,
    tolerance: f64,
}

impl<'a> RecordValidator<'a> {
    pub fn new(registry: &'a FacilityRegistry, tolerance: f64) -> Self {
        Self { registry, tolerance }
    }

    /// Validate one flow record. Only Production-kind facilities are subject
    /// to the capacity check; storage and other kinds always pass.
    pub fn validate_flow(&self, record: &RawFlowRecord) -> Result<(), Rejection> {
        let canonical = self.registry.resolve(&record.facility_raw_name);
        if self.registry.kind_of(canonical) != FacilityKind::Production {
            return Ok(());
        }

        if record.receipt < 0.0 {
            return Err(Rejection::NegativeReceipt { receipt: record.receipt });
        }
        if let Some(capacity) = self.registry.capacity_of(canonical) {
            let limit = capacity * self.tolerance;
            if record.receipt > limit {
                return Err(Rejection::AboveCapacity {
                    receipt: record.receipt,
                    limit,
                    tolerance: self.tolerance,
                });
            }
        }
        Ok(())
    }
}
