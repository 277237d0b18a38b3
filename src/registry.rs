//! Facility identity resolution.
//!
//! Maps the raw facility names appearing in feed payloads onto canonical
//! display identities, classifies facilities from capacity-type tags, and
//! assigns each facility a stable color from a fixed palette in first-seen
//! order. Unknown facilities are accepted with best-effort defaults and
//! never rejected: upstream feeds are not guaranteed complete.

use std::collections::{BTreeMap, HashMap};

use crate::config::RegistryConfig;
use crate::domain::{CapacityRow, FacilityIdentity, FacilityKind};

/// Fixed display palette, cycled once exhausted.
pub const FACILITY_PALETTE: [&str; 10] = [
    "#0d47a1", "#1565c0", "#1976d2", "#1e88e5", "#2196f3",
    "#42a5f5", "#64b5f6", "#90caf9", "#bbdefb", "#e3f2fd",
];

#[derive(Debug)]
pub struct FacilityRegistry {
    aliases: HashMap<String, String>,
    facilities: BTreeMap<String, FacilityIdentity>,
    /// First-seen color assignment order, `index % palette.len()`.
    palette_cursor: usize,
}

impl FacilityRegistry {
    /// Build a registry from the immutable configuration tables, seeding the
    /// known production facilities with their nameplate capacities.
    pub fn new(cfg: &RegistryConfig) -> Self {
        let mut registry = Self {
            aliases: cfg.aliases.clone(),
            facilities: BTreeMap::new(),
            palette_cursor: 0,
        };
        for name in &cfg.production_facilities {
            let entry = registry.entry(name.clone(), FacilityKind::Production);
            entry.capacity_tj_per_day = cfg.capacities.get(name).copied();
        }
        registry
    }

    /// Resolve a raw feed name to its canonical name. Identity function when
    /// no alias exists.
    pub fn resolve<'a>(&'a self, raw_name: &'a str) -> &'a str {
        self.aliases.get(raw_name).map(String::as_str).unwrap_or(raw_name)
    }

    /// Classify a capacity-type tag. Production is evaluated first so that a
    /// tag carrying both substrings resolves to Storage, which is evaluated
    /// last and wins.
    pub fn classify(capacity_type: &str) -> FacilityKind {
        let mut kind = FacilityKind::Pipeline;
        if capacity_type.contains("Production") {
            kind = FacilityKind::Production;
        }
        if capacity_type.contains("Storage") {
            kind = FacilityKind::Storage;
        }
        kind
    }

    /// Fold one capacity listing row into the registry: resolves the name,
    /// classifies the facility, and keeps the largest capacity figure seen,
    /// configured nameplate included.
    pub fn observe(&mut self, row: &CapacityRow) {
        let canonical = self.resolve(&row.facility_name).to_string();
        let kind = Self::classify(&row.capacity_type);
        let raw = row.facility_name.clone();
        let capacity = row.capacity;

        let entry = self.entry(canonical, kind);
        if raw != entry.canonical_name {
            entry.raw_aliases.insert(raw);
        }
        if entry.kind == FacilityKind::Unknown {
            entry.kind = kind;
        }
        if capacity > 0.0 {
            entry.capacity_tj_per_day =
                Some(entry.capacity_tj_per_day.map_or(capacity, |c| c.max(capacity)));
        }
    }

    fn entry(&mut self, canonical: String, kind: FacilityKind) -> &mut FacilityIdentity {
        let cursor = &mut self.palette_cursor;
        self.facilities.entry(canonical).or_insert_with_key(|name| {
            let color = FACILITY_PALETTE[*cursor % FACILITY_PALETTE.len()];
            *cursor += 1;
            FacilityIdentity::new(name.clone(), kind, color)
        })
    }

    pub fn get(&self, canonical: &str) -> Option<&FacilityIdentity> {
        self.facilities.get(canonical)
    }

    /// Kind of a facility by canonical name; `Unknown` for facilities never
    /// seen in any capacity feed.
    pub fn kind_of(&self, canonical: &str) -> FacilityKind {
        self.facilities.get(canonical).map(|f| f.kind).unwrap_or(FacilityKind::Unknown)
    }

    pub fn capacity_of(&self, canonical: &str) -> Option<f64> {
        self.facilities.get(canonical).and_then(|f| f.capacity_tj_per_day)
    }

    pub fn facilities(&self) -> impl Iterator<Item = &FacilityIdentity> {
        self.facilities.values()
    }

    /// Sum of known capacities over storage facilities, for the inventory
    /// integrator.
    pub fn total_storage_capacity(&self) -> f64 {
        self.facilities
            .values()
            .filter(|f| f.kind == FacilityKind::Storage)
            .filter_map(|f| f.capacity_tj_per_day)
            .sum()
    }
}
