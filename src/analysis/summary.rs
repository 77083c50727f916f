/// Headline metrics for a filtered view.

use serde::Serialize;

use crate::analysis::filter::ClassifiedEvent;
use crate::model::Severity;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub total_events: usize,
    pub total_damage_millions: f64,
    pub total_fatalities: u64,
    /// Injuries plus deaths across the view.
    pub total_casualties: u64,
    pub high_severity_events: usize,
    pub tribal_area_events: usize,
    /// `None` for an empty view.
    pub avg_damage_millions: Option<f64>,
}

pub fn summarize(view: &[ClassifiedEvent<'_>]) -> SummaryMetrics {
    let total_events = view.len();
    let total_damage_millions: f64 = view.iter().map(|ce| ce.event.damage_millions()).sum();

    SummaryMetrics {
        total_events,
        total_damage_millions,
        total_fatalities: view.iter().map(|ce| u64::from(ce.event.fatalities)).sum(),
        total_casualties: view.iter().map(|ce| ce.event.total_casualties()).sum(),
        high_severity_events: view.iter().filter(|ce| ce.severity == Severity::High).count(),
        tribal_area_events: view.iter().filter(|ce| ce.event.is_tribal_area).count(),
        avg_damage_millions: (total_events > 0)
            .then(|| total_damage_millions / total_events as f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::filter::{apply_filter, EventFilter};
    use crate::analysis::severity::SeverityThresholds;
    use crate::dataset::load_embedded;
    use crate::model::County;

    #[test]
    fn test_full_dataset_summary() {
        let events = load_embedded().unwrap().events;
        let view = apply_filter(&events, &EventFilter::all(), &SeverityThresholds::default());
        let summary = summarize(&view);

        assert_eq!(summary.total_events, 13);
        assert!((summary.total_damage_millions - 247.0).abs() < 1e-9);
        assert_eq!(summary.total_fatalities, 6);
        assert_eq!(summary.total_casualties, 71);
        assert_eq!(summary.high_severity_events, 8);
        assert_eq!(summary.tribal_area_events, 5);
        assert!((summary.avg_damage_millions.unwrap() - 19.0).abs() < 1e-9);
    }

    #[test]
    fn test_county_summary() {
        let events = load_embedded().unwrap().events;
        let view = apply_filter(
            &events,
            &EventFilter::all().county(County::Cleveland),
            &SeverityThresholds::default(),
        );
        let summary = summarize(&view);
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.high_severity_events, 0);
        assert!((summary.avg_damage_millions.unwrap() - 8.35).abs() < 1e-9);
    }

    #[test]
    fn test_empty_view_has_no_average() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_events, 0);
        assert_eq!(summary.total_damage_millions, 0.0);
        assert_eq!(summary.avg_damage_millions, None);
    }
}
