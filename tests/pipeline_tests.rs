//! End-to-end pipeline tests against mocked feed endpoints.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use gbb_engine::config::{
    Config, FeedsConfig, ForecastConfig, RegistryConfig, StorageConfig, ValidationConfig,
    VolatilityConfig,
};
use gbb_engine::domain::{FacilityKind, ScenarioConfig};
use gbb_engine::Engine;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> Config {
    let mut registry = RegistryConfig::default();
    registry.production_facilities.extend([
        "North West Shelf".to_string(),
        "Gorgon".to_string(),
    ]);
    registry
        .aliases
        .insert("Karratha Gas Plant".to_string(), "North West Shelf".to_string());
    registry.capacities.insert("North West Shelf".to_string(), 630.0);
    registry.capacities.insert("Gorgon".to_string(), 300.0);

    Config {
        feeds: FeedsConfig {
            base_url: base_url.to_string(),
            http_timeout_seconds: 5,
            retry_max_attempts: 0,
            retry_base_delay_ms: 10,
            months_back: 1,
        },
        storage: StorageConfig {
            baseline_fill_ratio: 0.5,
            default_total_capacity_tj: 60_000.0,
        },
        validation: ValidationConfig { capacity_tolerance: 1.2 },
        forecast: ForecastConfig {
            demand_window_days: 7,
            horizon_days: 5,
            supply_lag_days: 2,
        },
        volatility: VolatilityConfig { window_days: 30 },
        registry,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 14).unwrap()
}

fn flow_csv() -> String {
    let mut csv = String::from("facilityCode,facilityName,gasDay,receipt,delivery\n");
    for d in 1..=12 {
        csv.push_str(&format!("530001,\"Karratha Gas Plant\",2024-06-{d:02},585,0\n"));
        csv.push_str(&format!("530002,Gorgon,2024-06-{d:02},280,0\n"));
        csv.push_str(&format!("540001,Mondarra,2024-06-{d:02},40,10\n"));
    }
    // A same-day revision: the larger figure is authoritative.
    csv.push_str("530002,Gorgon,2024-06-01,290,0\n");
    // A probable unit error: 1000 > 300 * 1.2, dropped.
    csv.push_str("530002,Gorgon,2024-06-02,1000,0\n");
    csv
}

fn consumption_csv() -> String {
    let mut csv = String::from("facilityCode,facilityName,gasDay,quantity\n");
    for d in 1..=10 {
        csv.push_str(&format!("610001,Alcoa Pinjarra,2024-06-{d:02},800\n"));
        csv.push_str(&format!("610002,Other User,2024-06-{d:02},{}\n", 100 + d));
    }
    csv
}

async fn mount_feeds(server: &MockServer) {
    let capacity = serde_json::json!({
        "reportId": "CAP-2024-06-14",
        "asAt": "2024-06-14T08:00:00+08:00",
        "rows": [
            { "facilityName": "Karratha Gas Plant", "capacityType": "Production", "capacity": 585.0 },
            { "facilityName": "Gorgon", "capacityType": "Production", "capacity": 300.0 },
            { "facilityName": "Mondarra", "capacityType": "Storage", "capacity": 150.0 },
        ],
    });
    let mtc = serde_json::json!({
        "reportId": "MTC-2024-06-14",
        "rows": [
            { "facilityName": "Karratha Gas Plant", "capacityType": "Planned Maintenance", "capacity": 80.0 },
            { "facilityName": "Gorgon", "capacityType": "Construction", "capacity": 40.0 },
            { "facilityName": "Gorgon", "capacityType": "Normal", "capacity": 300.0 },
        ],
    });

    Mock::given(method("GET"))
        .and(path("/capacityOutlook/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(capacity))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mediumTermCapacity/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(mtc))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/actualFlow/2024-06.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(flow_csv()))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/largeUserConsumption/2024-06.csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(consumption_csv()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_load_cycle_produces_aligned_snapshot() {
    let server = MockServer::start().await;
    mount_feeds(&server).await;

    let engine = Engine::new(test_config(&server.uri())).unwrap();
    let outcome = engine.refresh_at(today()).await;

    assert!(outcome.failure.is_none());
    let snapshot = &outcome.snapshot;
    assert!(!snapshot.is_synthetic);
    assert_eq!(snapshot.report_id, "CAP-2024-06-14");
    assert_eq!(snapshot.as_at.as_deref(), Some("2024-06-14T08:00:00+08:00"));

    // Consumption runs through day 10, supply through day 12: the actual
    // series is cut at day 10 and two forecast days fit before the
    // supply-feed settlement horizon (today - 2 = day 12).
    let actuals: Vec<_> = snapshot.ledger.iter().filter(|e| !e.is_forecast).collect();
    let forecasts: Vec<_> = snapshot.ledger.iter().filter(|e| e.is_forecast).collect();
    assert_eq!(actuals.last().unwrap().date, NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
    assert_eq!(snapshot.forecast_start, Some(NaiveDate::from_ymd_opt(2024, 6, 11).unwrap()));
    assert_eq!(forecasts.len(), 2);

    // Same-day revision took the max; the out-of-range reading was dropped.
    assert_eq!(actuals[0].per_facility_supply["Gorgon"], 290.0);
    assert_eq!(actuals[1].per_facility_supply["Gorgon"], 280.0);
    // The alias resolved to the canonical production facility.
    assert_eq!(actuals[0].per_facility_supply["North West Shelf"], 585.0);

    // The supply invariant holds on every entry.
    for entry in &snapshot.ledger {
        let production_sum: f64 = entry.per_facility_supply.values().sum();
        assert!((entry.total_supply - production_sum).abs() < 1e-9);
    }

    // Demand summed across consumers; forecast carries the trailing mean.
    assert_eq!(actuals[0].total_demand, 901.0);
    assert!((forecasts[0].total_demand - 907.0).abs() < 1e-9);
    assert_eq!(forecasts[0].total_supply, 865.0);

    // Storage integrates from 50% of the fed capacity (150) and clamps.
    assert_eq!(snapshot.total_storage_capacity_tj, 150.0);
    let volumes: Vec<_> = snapshot.storage.iter().map(|p| p.total_volume_tj).collect();
    assert_eq!(volumes[0], 105.0);
    assert_eq!(volumes[1], 135.0);
    assert_eq!(volumes[2], 150.0);
    assert!(volumes.iter().all(|v| *v <= 150.0));

    // 10 actual days < 30-day window: no volatility points, not an error.
    assert!(snapshot.volatility.is_empty());

    // Constraint buckets keyed by canonical name.
    let nws = &snapshot.constraints["North West Shelf"];
    assert_eq!(nws.maintenance_tj, 80.0);
    let gorgon = &snapshot.constraints["Gorgon"];
    assert_eq!(gorgon.construction_tj, 40.0);
    assert_eq!(gorgon.normal_tj, 300.0);
    assert_eq!(gorgon.total_capacity, 300.0);

    // Storage facility observed from the capacity feed.
    let mondarra = snapshot
        .facilities
        .iter()
        .find(|f| f.canonical_name == "Mondarra")
        .unwrap();
    assert_eq!(mondarra.kind, FacilityKind::Storage);
}

#[tokio::test]
async fn refresh_is_idempotent() {
    let server = MockServer::start().await;
    mount_feeds(&server).await;

    let engine = Engine::new(test_config(&server.uri())).unwrap();
    let first = engine.refresh_at(today()).await;
    let second = engine.refresh_at(today()).await;

    assert_eq!(first.snapshot.ledger, second.snapshot.ledger);
    assert_eq!(first.snapshot.storage, second.snapshot.storage);

    let latest = engine.latest().await.unwrap();
    assert_eq!(latest.ledger, second.snapshot.ledger);
}

#[tokio::test]
async fn scenario_simulation_leaves_snapshot_untouched() {
    let server = MockServer::start().await;
    mount_feeds(&server).await;

    let engine = Engine::new(test_config(&server.uri())).unwrap();
    let snapshot = engine.refresh_at(today()).await.snapshot;
    let ledger_before = snapshot.ledger.clone();

    let active: BTreeSet<String> = ["North West Shelf".to_string()].into();
    let scenario = ScenarioConfig {
        active: true,
        facility_name: Some("North West Shelf".to_string()),
        outage_percent: 50.0,
    };
    let simulated = snapshot.simulate_series(&active, &scenario);

    assert_eq!(simulated[0].total_supply, 585.0);
    assert_eq!(simulated[0].simulated_supply, 292.5);
    assert_eq!(snapshot.ledger, ledger_before);
}

#[tokio::test]
async fn total_load_failure_substitutes_flagged_synthetic_dataset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let engine = Engine::new(test_config(&server.uri())).unwrap();
    let outcome = engine.refresh_at(today()).await;

    let failure = outcome.failure.expect("load should report the exhausted feed");
    assert!(failure.to_string().contains("500"));

    let snapshot = &outcome.snapshot;
    assert!(snapshot.is_synthetic);
    assert!(snapshot.ledger.is_empty());
    assert_eq!(snapshot.storage.len(), 365);
    assert!(snapshot
        .storage
        .iter()
        .all(|p| p.total_volume_tj >= 3_000.0 && p.total_volume_tj <= 57_000.0));
}

#[tokio::test]
async fn missing_monthly_payloads_are_tolerated() {
    let server = MockServer::start().await;
    let report = serde_json::json!({ "reportId": "CAP-1", "rows": [] });
    Mock::given(method("GET"))
        .and(path("/capacityOutlook/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report.clone()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/mediumTermCapacity/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(report))
        .mount(&server)
        .await;
    // Monthly CSVs not mounted: wiremock answers 404, which is a missing
    // month, not a load failure.

    let engine = Engine::new(test_config(&server.uri())).unwrap();
    let outcome = engine.refresh_at(today()).await;

    assert!(outcome.failure.is_none());
    assert!(!outcome.snapshot.is_synthetic);
    assert!(outcome.snapshot.ledger.is_empty());
    assert!(outcome.snapshot.volatility.is_empty());
}
