/// Core data types for the Oklahoma flood statistics service.
///
/// This module defines the shared domain model imported by all other
/// modules: the county and flood-type enumerations, the validated
/// `FloodEvent` record, and the severity tiers derived from it.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Counties
// ---------------------------------------------------------------------------

/// Oklahoma counties covered by the curated flood dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum County {
    Oklahoma,
    Tulsa,
    Cleveland,
    Creek,
    Muskogee,
    Grady,
}

impl County {
    /// Every county in registry order.
    pub const ALL: [County; 6] = [
        County::Oklahoma,
        County::Tulsa,
        County::Cleveland,
        County::Creek,
        County::Muskogee,
        County::Grady,
    ];

    /// Short name as it appears in the dataset ("Tulsa").
    pub fn as_str(&self) -> &'static str {
        match self {
            County::Oklahoma => "Oklahoma",
            County::Tulsa => "Tulsa",
            County::Cleveland => "Cleveland",
            County::Creek => "Creek",
            County::Muskogee => "Muskogee",
            County::Grady => "Grady",
        }
    }
}

impl fmt::Display for County {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for County {
    type Err = String;

    /// Accepts the short name or the "X County" full name, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let short = trimmed
            .strip_suffix(" County")
            .or_else(|| trimmed.strip_suffix(" county"))
            .unwrap_or(trimmed);

        County::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(short))
            .ok_or_else(|| format!("unknown county '{}'", s))
    }
}

// ---------------------------------------------------------------------------
// Flood type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloodType {
    #[serde(rename = "Flash Flood")]
    FlashFlood,
    #[serde(rename = "River Flood")]
    RiverFlood,
}

impl FloodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FloodType::FlashFlood => "Flash Flood",
            FloodType::RiverFlood => "River Flood",
        }
    }
}

impl fmt::Display for FloodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FloodType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flash flood" | "flash" => Ok(FloodType::FlashFlood),
            "river flood" | "river" => Ok(FloodType::RiverFlood),
            other => Err(format!("unknown flood type '{}'", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Derived impact tier of a flood event.
///
/// Ordered so that `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Tiers in display order, most severe first.
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }

    /// Chart colour used by the dashboard front end for this tier.
    pub fn color(&self) -> &'static str {
        match self {
            Severity::High => "#e53e3e",
            Severity::Medium => "#ed8936",
            Severity::Low => "#38a169",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .iter()
            .copied()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown severity '{}'", s))
    }
}

// ---------------------------------------------------------------------------
// Flood event
// ---------------------------------------------------------------------------

/// One documented flood, validated on load.
///
/// `casualties` counts injuries only; deaths are tracked separately in
/// `fatalities` and feed the severity rule on their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodEvent {
    pub county: County,
    pub date: NaiveDate,
    pub flood_type: FloodType,
    pub damage_usd: f64,
    pub casualties: u32,
    pub fatalities: u32,
    pub rain_inches: f64,
    pub is_tribal_area: bool,
}

impl FloodEvent {
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Calendar month, 1 = January.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn damage_millions(&self) -> f64 {
        self.damage_usd / 1_000_000.0
    }

    /// Injuries plus deaths, as plotted on the casualty axis.
    ///
    /// Widened to `u64` so two validated `u32` counts cannot overflow.
    pub fn total_casualties(&self) -> u64 {
        u64::from(self.casualties) + u64::from(self.fatalities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_county_parses_short_and_full_names() {
        assert_eq!("Tulsa".parse::<County>(), Ok(County::Tulsa));
        assert_eq!("muskogee".parse::<County>(), Ok(County::Muskogee));
        assert_eq!("Cleveland County".parse::<County>(), Ok(County::Cleveland));
        assert!("Osage".parse::<County>().is_err());
    }

    #[test]
    fn test_severity_parse_and_order() {
        assert_eq!("high".parse::<Severity>(), Ok(Severity::High));
        assert!(Severity::High > Severity::Medium);
        assert!(Severity::Medium > Severity::Low);
        assert!("Extreme".parse::<Severity>().is_err());
    }

    #[test]
    fn test_flood_type_parse() {
        assert_eq!("Flash Flood".parse::<FloodType>(), Ok(FloodType::FlashFlood));
        assert_eq!("river flood".parse::<FloodType>(), Ok(FloodType::RiverFlood));
        assert!("Coastal".parse::<FloodType>().is_err());
    }

    #[test]
    fn test_event_derived_fields() {
        let event = FloodEvent {
            county: County::Oklahoma,
            date: NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            flood_type: FloodType::FlashFlood,
            damage_usd: 15_000_000.0,
            casualties: 5,
            fatalities: 2,
            rain_inches: 12.5,
            is_tribal_area: false,
        };

        assert_eq!(event.year(), 2025);
        assert_eq!(event.month(), 4);
        assert_eq!(event.damage_millions(), 15.0);
        assert_eq!(event.total_casualties(), 7);
    }

    #[test]
    fn test_total_casualties_does_not_wrap() {
        let event = FloodEvent {
            county: County::Tulsa,
            date: NaiveDate::from_ymd_opt(2020, 5, 25).unwrap(),
            flood_type: FloodType::RiverFlood,
            damage_usd: 100.0,
            casualties: u32::MAX,
            fatalities: u32::MAX,
            rain_inches: 1.0,
            is_tribal_area: true,
        };
        assert_eq!(event.total_casualties(), 2 * u64::from(u32::MAX));
    }
}
