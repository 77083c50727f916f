/// okflood_service: Oklahoma flood statistics for the research dashboard.
///
/// # Module structure
///
/// ```text
/// okflood_service
/// ├── model       — shared data types (FloodEvent, County, Severity, …)
/// ├── counties    — county registry (full names, population, risk level)
/// ├── dataset     — embedded 2015–2025 flood table
/// ├── config      — dashboard.toml loader
/// ├── ingest
/// │   ├── records  — flood table parsing + per-record validation
/// │   └── fixtures (test only) — representative CSV tables
/// ├── analysis
/// │   ├── severity      — severity classification
/// │   ├── filter        — filtered, classified views
/// │   ├── groupings     — county / annual / monthly aggregates
/// │   ├── summary       — headline metrics
/// │   ├── trend         — Mann-Kendall trend test
/// │   └── return_period — Weibull return levels
/// ├── dashboard   — per-request recomputation of a filtered view
/// ├── export      — CSV / JSON snapshots
/// └── endpoint    — JSON HTTP API for the front end
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod counties;
pub mod dashboard;
pub mod dataset;
pub mod endpoint;
pub mod export;
pub mod ingest;
pub mod model;
