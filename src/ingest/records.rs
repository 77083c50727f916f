/// Flood event table parser.
///
/// Parses the tabular flood dataset (embedded at build time, or supplied
/// as a CSV file with the same columns) into validated `FloodEvent`s.
///
/// Columns:
/// - date:           YYYY-MM-DD onset date
/// - county:         county short or full name ("Tulsa", "Tulsa County")
/// - type:           "Flash Flood" | "River Flood"
/// - fatalities:     non-negative integer
/// - injuries:       non-negative integer (the event's casualty count)
/// - damage_usd:     non-negative dollar estimate
/// - rain_inches:    non-negative rainfall total
/// - is_tribal_area: optional boolean; derived from the county registry
///                   when the column is absent or empty
///
/// A row with a missing or invalid field, including a cell that is not
/// valid UTF-8, is excluded from the result and reported in
/// `LoadOutcome::rejected`; it never aborts the load. Only a structurally
/// unreadable table (no header, I/O failure) is an error.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;

use crate::counties::find_county;
use crate::model::{County, FloodEvent, FloodType};

/// One row as read from the table, before validation.
///
/// Every field is optional so that a bad cell turns into a rejection
/// reason instead of a deserialization failure for the whole table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawFloodRecord {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default, rename = "type")]
    pub flood_type: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub fatalities: Option<i64>,
    #[serde(default, alias = "casualties", deserialize_with = "csv::invalid_option")]
    pub injuries: Option<i64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub damage_usd: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub rain_inches: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    pub is_tribal_area: Option<bool>,
}

/// Why a single record was excluded.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("missing or unreadable field '{0}'")]
    MissingField(&'static str),
    #[error("invalid date '{0}'")]
    InvalidDate(String),
    #[error("{0}")]
    UnknownCounty(String),
    #[error("{0}")]
    UnknownFloodType(String),
    #[error("field '{field}' must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("field '{0}' is not a finite number")]
    NotFinite(&'static str),
    #[error("field '{field}' out of range: {value}")]
    OutOfRange { field: &'static str, value: i64 },
    #[error("unreadable row: {0}")]
    Unreadable(String),
}

/// Table-level failures that prevent reading any rows at all.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No header line found in flood table")]
    MissingHeader,
}

/// A row that failed validation, with its 1-based data row number.
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedRecord {
    pub row: usize,
    pub reason: RecordError,
}

/// Result of loading a flood table: the valid events plus the rows that
/// were dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub events: Vec<FloodEvent>,
    pub rejected: Vec<RejectedRecord>,
}

impl TryFrom<RawFloodRecord> for FloodEvent {
    type Error = RecordError;

    fn try_from(raw: RawFloodRecord) -> Result<Self, Self::Error> {
        let date_str = non_empty(raw.date).ok_or(RecordError::MissingField("date"))?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
            .map_err(|_| RecordError::InvalidDate(date_str.clone()))?;

        let county: County = non_empty(raw.county)
            .ok_or(RecordError::MissingField("county"))?
            .parse()
            .map_err(RecordError::UnknownCounty)?;

        let flood_type: FloodType = non_empty(raw.flood_type)
            .ok_or(RecordError::MissingField("type"))?
            .parse()
            .map_err(RecordError::UnknownFloodType)?;

        let fatalities = count_field("fatalities", raw.fatalities)?;
        let casualties = count_field("injuries", raw.injuries)?;
        let damage_usd = amount_field("damage_usd", raw.damage_usd)?;
        let rain_inches = amount_field("rain_inches", raw.rain_inches)?;

        let is_tribal_area = raw.is_tribal_area.unwrap_or_else(|| {
            find_county(county)
                .map(|c| c.tribal_jurisdiction)
                .unwrap_or(false)
        });

        Ok(FloodEvent {
            county,
            date,
            flood_type,
            damage_usd,
            casualties,
            fatalities,
            rain_inches,
            is_tribal_area,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn count_field(name: &'static str, value: Option<i64>) -> Result<u32, RecordError> {
    let value = value.ok_or(RecordError::MissingField(name))?;
    if value < 0 {
        return Err(RecordError::Negative {
            field: name,
            value: value as f64,
        });
    }
    u32::try_from(value).map_err(|_| RecordError::OutOfRange { field: name, value })
}

fn amount_field(name: &'static str, value: Option<f64>) -> Result<f64, RecordError> {
    let value = value.ok_or(RecordError::MissingField(name))?;
    if !value.is_finite() {
        return Err(RecordError::NotFinite(name));
    }
    if value < 0.0 {
        return Err(RecordError::Negative { field: name, value });
    }
    Ok(value)
}

/// Validates raw records, keeping the good ones and logging the rest.
pub fn validate_records(raws: Vec<RawFloodRecord>) -> LoadOutcome {
    let mut outcome = LoadOutcome::default();

    for (idx, raw) in raws.into_iter().enumerate() {
        let row = idx + 1;
        match FloodEvent::try_from(raw) {
            Ok(event) => outcome.events.push(event),
            Err(reason) => {
                log::warn!("Excluding flood record at row {}: {}", row, reason);
                outcome.rejected.push(RejectedRecord { row, reason });
            }
        }
    }

    outcome
}

/// Parses a flood table in CSV form.
pub fn parse_csv(text: &str) -> Result<LoadOutcome, IngestError> {
    parse_csv_bytes(text.as_bytes())
}

/// Parses a flood table from raw bytes.
///
/// Records are read as bytes and decoded per row, so a row whose shape is
/// broken (wrong number of cells) or whose cells are not UTF-8 is rejected
/// like any other invalid record. The header line must be valid UTF-8.
pub fn parse_csv_bytes(bytes: &[u8]) -> Result<LoadOutcome, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(bytes);

    if reader.headers()?.iter().all(|h| h.is_empty()) {
        return Err(IngestError::MissingHeader);
    }
    let headers = reader.byte_headers()?.clone();

    let mut raws = Vec::new();
    let mut unreadable: Vec<RejectedRecord> = Vec::new();
    for (idx, result) in reader.byte_records().enumerate() {
        let record = result?;
        match record.deserialize::<RawFloodRecord>(Some(&headers)) {
            Ok(raw) => raws.push((idx + 1, raw)),
            Err(e) => {
                log::warn!("Unreadable flood record at row {}: {}", idx + 1, e);
                unreadable.push(RejectedRecord {
                    row: idx + 1,
                    reason: RecordError::Unreadable(e.to_string()),
                });
            }
        }
    }

    let rows: Vec<usize> = raws.iter().map(|(row, _)| *row).collect();
    let mut outcome = validate_records(raws.into_iter().map(|(_, raw)| raw).collect());

    // validate_records numbers rows by position; map back to table rows.
    for rejected in &mut outcome.rejected {
        rejected.row = rows[rejected.row - 1];
    }
    outcome.rejected.extend(unreadable);
    outcome.rejected.sort_by_key(|r| r.row);

    Ok(outcome)
}

/// Reads and parses a flood table from disk.
pub fn load_csv_file(path: &Path) -> Result<LoadOutcome, IngestError> {
    let bytes = fs::read(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_csv_bytes(&bytes)
}
