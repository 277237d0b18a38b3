use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Classification of a market facility, derived from the capacity-type tag
/// carried on capacity feed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacilityKind {
    Production,
    Storage,
    Pipeline,
    Unknown,
}

impl fmt::Display for FacilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Production => "Production",
            Self::Storage => "Storage",
            Self::Pipeline => "Pipeline",
            Self::Unknown => "Unknown",
        };
        write!(f, "{s}")
    }
}

/// Canonical identity of a facility, built once per data load and immutable
/// afterward.
///
/// Alias resolution is many-to-one: any number of raw feed names map to one
/// canonical name. The reverse direction (`raw_aliases`) is a derived lookup
/// for display purposes, never ownership.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FacilityIdentity {
    pub canonical_name: String,
    pub raw_aliases: BTreeSet<String>,
    pub kind: FacilityKind,
    /// Nameplate capacity in TJ/day, when known from configuration or a
    /// capacity feed. Unknown facilities carry `None` and skip the
    /// over-capacity validation check.
    pub capacity_tj_per_day: Option<f64>,
    pub display_color: String,
}

impl FacilityIdentity {
    pub fn new(canonical_name: impl Into<String>, kind: FacilityKind, color: &str) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            raw_aliases: BTreeSet::new(),
            kind,
            capacity_tj_per_day: None,
            display_color: color.to_string(),
        }
    }
}
