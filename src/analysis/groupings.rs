/// Grouping and aggregation of classified flood events.
///
/// Takes the flat, filtered view produced by `analysis::filter` and
/// organizes it into the per-county, per-year and per-month structures the
/// dashboard charts are drawn from, so callers never have to re-scan the
/// event list for "how much damage did Tulsa County take?".

use std::collections::BTreeMap;

use serde::Serialize;

use crate::analysis::filter::ClassifiedEvent;
use crate::counties::full_name;
use crate::model::{County, Severity};

// ---------------------------------------------------------------------------
// Aggregate types
// ---------------------------------------------------------------------------

/// Number of events per severity tier, most severe first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCount {
    pub severity: Severity,
    pub count: usize,
    pub color: &'static str,
}

/// Total damage attributed to one county.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyDamage {
    pub county: County,
    pub full_name: &'static str,
    pub damage_millions: f64,
}

/// Event count and damage for one calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnualAggregate {
    pub year: i32,
    pub events: usize,
    pub damage_millions: f64,
    /// Largest single-event damage in the year.
    pub peak_damage_usd: f64,
}

/// Event count for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCount {
    pub month: u32,
    pub name: &'static str,
    pub events: usize,
}

/// County-level risk figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountyRisk {
    pub county: County,
    pub events: usize,
    pub damage_millions: f64,
    /// Injuries plus deaths.
    pub total_casualties: u64,
}

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Counts per severity tier. Tiers absent from the view are omitted.
pub fn severity_counts(view: &[ClassifiedEvent<'_>]) -> Vec<SeverityCount> {
    Severity::ALL
        .iter()
        .map(|&severity| SeverityCount {
            severity,
            count: view.iter().filter(|ce| ce.severity == severity).count(),
            color: severity.color(),
        })
        .filter(|sc| sc.count > 0)
        .collect()
}

/// Damage per county, largest first. Ties keep county order.
pub fn damage_by_county(view: &[ClassifiedEvent<'_>]) -> Vec<CountyDamage> {
    let mut totals: BTreeMap<County, f64> = BTreeMap::new();
    for ce in view {
        *totals.entry(ce.event.county).or_insert(0.0) += ce.event.damage_millions();
    }

    let mut grouped: Vec<CountyDamage> = totals
        .into_iter()
        .map(|(county, damage_millions)| CountyDamage {
            county,
            full_name: full_name(county),
            damage_millions,
        })
        .collect();
    grouped.sort_by(|a, b| b.damage_millions.total_cmp(&a.damage_millions));
    grouped
}

/// Per-year aggregates for years that have at least one event, ascending.
pub fn annual_aggregates(view: &[ClassifiedEvent<'_>]) -> Vec<AnnualAggregate> {
    let mut by_year: BTreeMap<i32, AnnualAggregate> = BTreeMap::new();

    for ce in view {
        let year = ce.event.year();
        let entry = by_year.entry(year).or_insert_with(|| AnnualAggregate {
            year,
            events: 0,
            damage_millions: 0.0,
            peak_damage_usd: 0.0,
        });
        entry.events += 1;
        entry.damage_millions += ce.event.damage_millions();
        entry.peak_damage_usd = entry.peak_damage_usd.max(ce.event.damage_usd);
    }

    by_year.into_values().collect()
}

/// Event counts per calendar month, for months that have events.
pub fn monthly_counts(view: &[ClassifiedEvent<'_>]) -> Vec<MonthlyCount> {
    let mut counts = [0usize; 12];
    for ce in view {
        counts[(ce.event.month() - 1) as usize] += 1;
    }

    counts
        .iter()
        .enumerate()
        .filter(|(_, n)| **n > 0)
        .map(|(idx, &events)| MonthlyCount {
            month: idx as u32 + 1,
            name: MONTH_NAMES[idx],
            events,
        })
        .collect()
}

/// Events, damage and casualties per county, in county order.
pub fn county_risk(view: &[ClassifiedEvent<'_>]) -> Vec<CountyRisk> {
    let mut grouped: BTreeMap<County, CountyRisk> = BTreeMap::new();

    for ce in view {
        let county = ce.event.county;
        let entry = grouped.entry(county).or_insert_with(|| CountyRisk {
            county,
            events: 0,
            damage_millions: 0.0,
            total_casualties: 0,
        });
        entry.events += 1;
        entry.damage_millions += ce.event.damage_millions();
        entry.total_casualties += ce.event.total_casualties();
    }

    grouped.into_values().collect()
}

/// Builds a yearly `(year, value)` series for trend testing over the
/// inclusive `span` of years.
///
/// Years in the span with no events are filled with `0.0`, since a
/// flood-free year is an observation. The span is widened if an aggregate
/// falls outside it.
pub fn annual_series<F>(annual: &[AnnualAggregate], span: (i32, i32), metric: F) -> Vec<(f64, f64)>
where
    F: Fn(&AnnualAggregate) -> f64,
{
    let (mut first, mut last) = span;
    if let (Some(a), Some(b)) = (annual.first(), annual.last()) {
        first = first.min(a.year);
        last = last.max(b.year);
    }

    let by_year: BTreeMap<i32, &AnnualAggregate> = annual.iter().map(|a| (a.year, a)).collect();
    (first..=last)
        .map(|year| {
            let value = by_year.get(&year).map(|a| metric(*a)).unwrap_or(0.0);
            (year as f64, value)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
