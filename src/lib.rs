//! Gas Bulletin Board market data aggregation and analytics engine.
//!
//! Ingests raw, irregularly-shaped market-feed records (facility production,
//! consumption, storage flows and outage schedules) for a regional gas
//! market and turns them into a clean, aligned, derived time series:
//! facility identity resolution, record validation, daily aggregation,
//! temporal alignment across feeds with different settlement lags,
//! short-term demand forecasting, storage-inventory integration, rolling
//! volatility and outage-scenario simulation. Presentation is an external
//! consumer of the [`pipeline::MarketSnapshot`].

pub mod aggregate;
pub mod config;
pub mod domain;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod registry;
pub mod synthetic;
pub mod telemetry;
pub mod validate;

pub use config::Config;
pub use error::FeedError;
pub use pipeline::{Engine, LoadOutcome, MarketSnapshot};
