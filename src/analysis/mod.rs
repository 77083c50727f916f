/// Statistical analysis for the Oklahoma flood statistics service.
///
/// Submodules:
/// - `severity`      — High / Medium / Low tier per event
/// - `filter`        — county / severity / date-range views
/// - `groupings`     — per-county, per-year and per-month aggregates
/// - `summary`       — headline metrics for a view
/// - `trend`         — Mann-Kendall trend test and Sen's slope
/// - `return_period` — Weibull fit and return-level estimation

pub mod filter;
pub mod groupings;
pub mod return_period;
pub mod severity;
pub mod summary;
pub mod trend;
