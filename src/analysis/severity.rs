/// Severity classification for flood events.
///
/// Each event gets exactly one tier, evaluated in precedence order:
///
/// - **High**: damage above the high-damage limit, casualties above the
///   high-casualty limit, or fatalities at or above the high-fatality limit.
/// - **Medium**: any measurable impact not already High (damage at or
///   above the medium-damage floor, or at least one casualty or fatality).
/// - **Low**: everything else.
///
/// Damage between the two limits is Medium inclusively, so exactly
/// $10,000,000 is Medium and $10,000,001 is High.

use serde::{Deserialize, Serialize};

use crate::model::{FloodEvent, Severity};

/// Classification limits. Defaults reproduce the dataset's published rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    /// Damage strictly above this is High.
    pub high_damage_usd: f64,
    /// Casualties strictly above this are High.
    pub high_casualties: u32,
    /// Fatalities at or above this are High.
    pub high_fatalities: u32,
    /// Damage at or above this (and not High) is Medium.
    pub medium_damage_usd: f64,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            high_damage_usd: 10_000_000.0,
            high_casualties: 10,
            high_fatalities: 2,
            medium_damage_usd: 1_000_000.0,
        }
    }
}

impl SeverityThresholds {
    fn is_high(&self, event: &FloodEvent) -> bool {
        event.damage_usd > self.high_damage_usd
            || event.casualties > self.high_casualties
            || event.fatalities >= self.high_fatalities
    }

    fn is_medium(&self, event: &FloodEvent) -> bool {
        event.damage_usd >= self.medium_damage_usd
            || event.casualties >= 1
            || event.fatalities >= 1
    }
}

/// Classifies an event with the default thresholds.
pub fn classify(event: &FloodEvent) -> Severity {
    classify_with(event, &SeverityThresholds::default())
}

/// Classifies an event with explicit thresholds.
pub fn classify_with(event: &FloodEvent, thresholds: &SeverityThresholds) -> Severity {
    if thresholds.is_high(event) {
        Severity::High
    } else if thresholds.is_medium(event) {
        Severity::Medium
    } else {
        Severity::Low
    }
}
