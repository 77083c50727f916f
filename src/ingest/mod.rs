/// Data ingestion for the flood statistics service.
///
/// Submodules:
/// - `records`  — flood table parsing and per-record validation
/// - `fixtures` — (test only) representative CSV tables

pub mod records;

#[cfg(test)]
pub(crate) mod fixtures;
