/// CSV / JSON snapshots of a filtered, classified view.
///
/// Both formats carry the same columns, one row (or JSON object) per
/// event, in view order:
///
/// date, county, county_full, type, severity_level, fatalities, injuries,
/// total_casualties, damage_usd, damage_millions, rain_inches,
/// is_tribal_area

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::filter::ClassifiedEvent;
use crate::counties::full_name;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV output was not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Json => "application/json",
        }
    }
}

/// One exported row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub date: String,
    pub county: String,
    pub county_full: String,
    #[serde(rename = "type")]
    pub flood_type: String,
    pub severity_level: String,
    pub fatalities: u32,
    pub injuries: u32,
    pub total_casualties: u64,
    pub damage_usd: f64,
    pub damage_millions: f64,
    pub rain_inches: f64,
    pub is_tribal_area: bool,
}

impl From<&ClassifiedEvent<'_>> for ExportRecord {
    fn from(ce: &ClassifiedEvent<'_>) -> Self {
        let e = ce.event;
        ExportRecord {
            date: e.date.format("%Y-%m-%d").to_string(),
            county: e.county.to_string(),
            county_full: full_name(e.county).to_string(),
            flood_type: e.flood_type.to_string(),
            severity_level: ce.severity.to_string(),
            fatalities: e.fatalities,
            injuries: e.casualties,
            total_casualties: e.total_casualties(),
            damage_usd: e.damage_usd,
            damage_millions: e.damage_millions(),
            rain_inches: e.rain_inches,
            is_tribal_area: e.is_tribal_area,
        }
    }
}

pub fn export_records(view: &[ClassifiedEvent<'_>]) -> Vec<ExportRecord> {
    view.iter().map(ExportRecord::from).collect()
}

/// CSV with a header row. An empty view still produces the header.
pub fn to_csv(view: &[ClassifiedEvent<'_>]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record([
        "date",
        "county",
        "county_full",
        "type",
        "severity_level",
        "fatalities",
        "injuries",
        "total_casualties",
        "damage_usd",
        "damage_millions",
        "rain_inches",
        "is_tribal_area",
    ])?;
    for record in export_records(view) {
        writer.serialize(record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Pretty-printed JSON array of records.
pub fn to_json(view: &[ClassifiedEvent<'_>]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&export_records(view))?)
}

pub fn render(view: &[ClassifiedEvent<'_>], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => to_csv(view),
        ExportFormat::Json => to_json(view),
    }
}

/// `oklahoma_floods_YYYYMMDD.<ext>` for the given snapshot date.
pub fn default_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!("oklahoma_floods_{}.{}", date.format("%Y%m%d"), format.extension())
}

/// Renders the view and writes it to `path`.
pub fn write_export(
    view: &[ClassifiedEvent<'_>],
    format: ExportFormat,
    path: &Path,
) -> Result<usize, ExportError> {
    let body = render(view, format)?;
    fs::write(path, &body).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    log::info!("Wrote {} events to {}", view.len(), path.display());
    Ok(view.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::filter::{apply_filter, EventFilter};
    use crate::analysis::severity::SeverityThresholds;
    use crate::dataset::load_embedded;
    use crate::model::{County, FloodEvent};

    fn events() -> Vec<FloodEvent> {
        load_embedded().unwrap().events
    }

    #[test]
    fn test_csv_has_header_and_one_row_per_event() {
        let events = events();
        let view = apply_filter(
            &events,
            &EventFilter::all().county(County::Cleveland),
            &SeverityThresholds::default(),
        );
        let csv_text = to_csv(&view).unwrap();
        let lines: Vec<&str> = csv_text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("date,county,county_full,type,severity_level"));
        assert!(lines[1].starts_with("2022-05-15,Cleveland,Cleveland County,Flash Flood,Medium,0,4,4,"));
    }

    #[test]
    fn test_csv_reads_back_as_records() {
        let events = events();
        let view = apply_filter(&events, &EventFilter::all(), &SeverityThresholds::default());
        let csv_text = to_csv(&view).unwrap();

        let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
        let records: Vec<ExportRecord> = reader.deserialize().collect::<Result<_, _>>().unwrap();
        assert_eq!(records, export_records(&view));
    }

    #[test]
    fn test_empty_view_csv_is_header_only() {
        let csv_text = to_csv(&[]).unwrap();
        assert_eq!(csv_text.lines().count(), 1);
    }

    #[test]
    fn test_json_records() {
        let events = events();
        let view = apply_filter(
            &events,
            &EventFilter::all().county(County::Muskogee),
            &SeverityThresholds::default(),
        );
        let json_text = to_json(&view).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json_text).unwrap();

        let rows = parsed.as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["county_full"], "Muskogee County");
        assert_eq!(rows[0]["type"], "River Flood");
        assert_eq!(rows[0]["severity_level"], "High");
        assert_eq!(rows[0]["damage_millions"], 45.0);
        assert_eq!(rows[0]["is_tribal_area"], true);
    }

    #[test]
    fn test_default_file_name() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        assert_eq!(
            default_file_name(ExportFormat::Csv, date),
            "oklahoma_floods_20250601.csv"
        );
        assert_eq!(
            default_file_name(ExportFormat::Json, date),
            "oklahoma_floods_20250601.json"
        );
    }

    #[test]
    fn test_write_export_to_disk() {
        let events = events();
        let view = apply_filter(&events, &EventFilter::all(), &SeverityThresholds::default());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floods.json");

        let written = write_export(&view, ExportFormat::Json, &path).unwrap();
        assert_eq!(written, 13);
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, to_json(&view).unwrap());
    }
}
