/// Filtered, classified views over the immutable event list.
///
/// A view never copies or edits events: each `ClassifiedEvent` borrows
/// its `FloodEvent` and carries the severity derived for it under the
/// active thresholds.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analysis::severity::{classify_with, SeverityThresholds};
use crate::model::{County, FloodEvent, Severity};

/// An event paired with its derived severity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassifiedEvent<'a> {
    #[serde(flatten)]
    pub event: &'a FloodEvent,
    pub severity: Severity,
    /// Return period of the event's damage under the view's Weibull fit.
    /// Only set by `Dashboard::view` when the fit succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_period_years: Option<f64>,
}

/// User-selected view restrictions. Every `None` means "all".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub county: Option<County>,
    pub severity: Option<Severity>,
    /// Inclusive lower bound on the event date.
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the event date.
    pub to: Option<NaiveDate>,
}

impl EventFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn county(mut self, county: County) -> Self {
        self.county = Some(county);
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Restricts to whole calendar years, inclusive on both ends.
    ///
    /// Years beyond the representable date range saturate to
    /// `NaiveDate::MIN` / `NaiveDate::MAX` rather than dropping the bound.
    pub fn years(mut self, first: i32, last: i32) -> Self {
        self.from = Some(year_bound(first, 1, 1));
        self.to = Some(year_bound(last, 12, 31));
        self
    }

    pub fn dates(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    fn admits(&self, event: &FloodEvent, severity: Severity) -> bool {
        self.county.is_none_or(|c| event.county == c)
            && self.severity.is_none_or(|s| severity == s)
            && self.from.is_none_or(|from| event.date >= from)
            && self.to.is_none_or(|to| event.date <= to)
    }
}

fn year_bound(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}

/// Classifies every event and keeps those the filter admits, preserving
/// input order.
pub fn apply_filter<'a>(
    events: &'a [FloodEvent],
    filter: &EventFilter,
    thresholds: &SeverityThresholds,
) -> Vec<ClassifiedEvent<'a>> {
    events
        .iter()
        .map(|event| ClassifiedEvent {
            event,
            severity: classify_with(event, thresholds),
            return_period_years: None,
        })
        .filter(|ce| filter.admits(ce.event, ce.severity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::load_embedded;

    fn events() -> Vec<FloodEvent> {
        load_embedded().unwrap().events
    }

    #[test]
    fn test_unfiltered_view_keeps_everything() {
        let events = events();
        let view = apply_filter(&events, &EventFilter::all(), &SeverityThresholds::default());
        assert_eq!(view.len(), events.len());
    }

    #[test]
    fn test_county_filter() {
        let events = events();
        let view = apply_filter(
            &events,
            &EventFilter::all().county(County::Oklahoma),
            &SeverityThresholds::default(),
        );
        assert_eq!(view.len(), 5);
        assert!(view.iter().all(|ce| ce.event.county == County::Oklahoma));
    }

    #[test]
    fn test_severity_filter_uses_derived_tier() {
        let events = events();
        let view = apply_filter(
            &events,
            &EventFilter::all().severity(Severity::Medium),
            &SeverityThresholds::default(),
        );
        assert_eq!(view.len(), 5);
        assert!(view.iter().all(|ce| ce.severity == Severity::Medium));
    }

    #[test]
    fn test_year_range_is_inclusive() {
        let events = events();
        let view = apply_filter(
            &events,
            &EventFilter::all().years(2019, 2020),
            &SeverityThresholds::default(),
        );
        // 2020 Tulsa, 2019 Tulsa, 2019 Muskogee
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn test_filters_compose() {
        let events = events();
        let filter = EventFilter::all()
            .county(County::Tulsa)
            .severity(Severity::High)
            .years(2015, 2025);
        let view = apply_filter(&events, &filter, &SeverityThresholds::default());
        assert_eq!(view.len(), 2, "Tulsa 2015 flood is Medium, the other two High");
    }

    #[test]
    fn test_unrepresentable_years_keep_their_bound() {
        let events = events();
        let thresholds = SeverityThresholds::default();

        let wide = EventFilter::all().years(i32::MIN, 999_999);
        assert_eq!(wide.from, Some(NaiveDate::MIN));
        assert_eq!(wide.to, Some(NaiveDate::MAX));
        assert_eq!(apply_filter(&events, &wide, &thresholds).len(), events.len());

        let future = EventFilter::all().years(999_999, i32::MAX);
        assert!(apply_filter(&events, &future, &thresholds).is_empty());
    }

    #[test]
    fn test_empty_view_when_range_excludes_all() {
        let events = events();
        let view = apply_filter(
            &events,
            &EventFilter::all().years(1990, 1999),
            &SeverityThresholds::default(),
        );
        assert!(view.is_empty());
    }
}
