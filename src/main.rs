use anyhow::Result;
use gbb_engine::{telemetry, Config, Engine};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();

    let cfg = Config::load()?;
    let engine = Engine::new(cfg)?;

    let outcome = engine.refresh().await;
    if let Some(err) = &outcome.failure {
        warn!(error = %err, "serving synthetic dataset after load failure");
    }

    let snapshot = &outcome.snapshot;
    let summary = serde_json::json!({
        "reportId": snapshot.report_id,
        "asAt": snapshot.as_at,
        "synthetic": snapshot.is_synthetic,
        "ledgerDays": snapshot.ledger.len(),
        "forecastStart": snapshot.forecast_start,
        "facilities": snapshot.facilities.len(),
        "storagePoints": snapshot.storage.len(),
        "totalStorageCapacityTj": snapshot.total_storage_capacity_tj,
        "volatilityPoints": snapshot.volatility.len(),
        "constrainedFacilities": snapshot.constraints.len(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!("load cycle complete");
    Ok(())
}
