/// County registry for the Oklahoma flood statistics service.
///
/// Defines the canonical list of counties covered by the dataset, along
/// with the display metadata the dashboard needs (full name, population,
/// qualitative flood risk). All other modules should look counties up
/// here rather than hardcoding names or figures.

use serde::Serialize;

use crate::model::County;

// ---------------------------------------------------------------------------
// County metadata
// ---------------------------------------------------------------------------

/// Qualitative flood risk assigned to a county.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    High,
    Medium,
}

/// Metadata for a single county.
#[derive(Debug, Clone, Serialize)]
pub struct CountyInfo {
    pub county: County,
    /// Display name, e.g. "Tulsa County".
    pub full_name: &'static str,
    /// 2020 census population.
    pub population: u32,
    pub risk_level: RiskLevel,
    /// Whether the county lies within a tribal reservation boundary.
    pub tribal_jurisdiction: bool,
}

/// All counties represented in the flood dataset, ordered as the
/// dashboard's county selector lists them.
///
/// Sources:
///   - Population: U.S. Census Bureau
///   - Tribal jurisdiction: Muscogee (Creek) Nation reservation boundary
pub static COUNTY_REGISTRY: &[CountyInfo] = &[
    CountyInfo {
        county: County::Oklahoma,
        full_name: "Oklahoma County",
        population: 796_292,
        risk_level: RiskLevel::High,
        tribal_jurisdiction: false,
    },
    CountyInfo {
        county: County::Tulsa,
        full_name: "Tulsa County",
        population: 669_279,
        risk_level: RiskLevel::High,
        tribal_jurisdiction: true,
    },
    CountyInfo {
        county: County::Cleveland,
        full_name: "Cleveland County",
        population: 295_528,
        risk_level: RiskLevel::Medium,
        tribal_jurisdiction: false,
    },
    CountyInfo {
        county: County::Creek,
        full_name: "Creek County",
        population: 71_754,
        risk_level: RiskLevel::High,
        tribal_jurisdiction: true,
    },
    CountyInfo {
        county: County::Muskogee,
        full_name: "Muskogee County",
        population: 66_339,
        risk_level: RiskLevel::High,
        tribal_jurisdiction: true,
    },
    CountyInfo {
        county: County::Grady,
        full_name: "Grady County",
        population: 54_795,
        risk_level: RiskLevel::Medium,
        tribal_jurisdiction: false,
    },
];

/// Looks up a county's metadata. Every `County` variant has an entry.
pub fn find_county(county: County) -> Option<&'static CountyInfo> {
    COUNTY_REGISTRY.iter().find(|c| c.county == county)
}

/// Display name for a county, falling back to the short name.
pub fn full_name(county: County) -> &'static str {
    find_county(county)
        .map(|c| c.full_name)
        .unwrap_or_else(|| county.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
