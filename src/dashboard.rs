/// The dashboard: an immutable event set plus the configuration used to
/// analyse it.
///
/// `Dashboard::view` is the single recomputation pass run for every user
/// interaction. It filters, classifies, aggregates and runs both
/// statistical tests over the selected subset, returning one serializable
/// value the charting front end renders from.

use chrono::Datelike;
use serde::Serialize;

use crate::analysis::filter::{apply_filter, ClassifiedEvent, EventFilter};
use crate::analysis::groupings::{
    annual_aggregates, annual_series, county_risk, damage_by_county, monthly_counts,
    severity_counts, AnnualAggregate, CountyDamage, CountyRisk, MonthlyCount, SeverityCount,
};
use crate::analysis::return_period::{fit_return_periods_for, ReturnPeriodOutcome};
use crate::analysis::summary::{summarize, SummaryMetrics};
use crate::analysis::trend::{mann_kendall_with, TrendOutcome};
use crate::config::DashboardConfig;
use crate::dataset::load_embedded;
use crate::ingest::records::{IngestError, LoadOutcome, RejectedRecord};
use crate::model::FloodEvent;

/// Trend tests over the view's annual series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendReport {
    /// Mann-Kendall on total damage per year ($M).
    pub annual_damage: TrendOutcome,
    /// Mann-Kendall on number of events per year.
    pub annual_events: TrendOutcome,
}

/// Everything the front end needs for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'a> {
    pub summary: SummaryMetrics,
    pub severity_distribution: Vec<SeverityCount>,
    pub damage_by_county: Vec<CountyDamage>,
    pub annual: Vec<AnnualAggregate>,
    pub monthly: Vec<MonthlyCount>,
    pub county_risk: Vec<CountyRisk>,
    pub trends: TrendReport,
    /// Weibull fit on the annual maximum single-event damage (USD).
    pub return_periods: ReturnPeriodOutcome,
    pub events: Vec<ClassifiedEvent<'a>>,
}

pub struct Dashboard {
    events: Vec<FloodEvent>,
    rejected: Vec<RejectedRecord>,
    config: DashboardConfig,
}

impl Dashboard {
    pub fn new(outcome: LoadOutcome, config: DashboardConfig) -> Self {
        Self {
            events: outcome.events,
            rejected: outcome.rejected,
            config,
        }
    }

    /// Builds a dashboard over the embedded Oklahoma dataset.
    pub fn embedded(config: DashboardConfig) -> Result<Self, IngestError> {
        Ok(Self::new(load_embedded()?, config))
    }

    pub fn events(&self) -> &[FloodEvent] {
        &self.events
    }

    /// Records excluded at load time.
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Inclusive span of event years, if any events are loaded.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let min = self.events.iter().map(FloodEvent::year).min()?;
        let max = self.events.iter().map(FloodEvent::year).max()?;
        Some((min, max))
    }

    /// Filtered, classified events only.
    pub fn select(&self, filter: &EventFilter) -> Vec<ClassifiedEvent<'_>> {
        apply_filter(&self.events, filter, &self.config.severity)
    }

    /// Inclusive year span a filter covers, clamped to the loaded data.
    ///
    /// `None` when nothing is loaded or the filter lies outside the data.
    pub fn view_span(&self, filter: &EventFilter) -> Option<(i32, i32)> {
        let (min, max) = self.year_span()?;
        let first = filter.from.map_or(min, |d| d.year().max(min));
        let last = filter.to.map_or(max, |d| d.year().min(max));
        (first <= last).then_some((first, last))
    }

    pub fn view(&self, filter: &EventFilter) -> DashboardView<'_> {
        let mut events = self.select(filter);
        let annual = annual_aggregates(&events);
        let trends = self.trends(&annual, self.view_span(filter));
        let return_periods = self.return_periods(&annual);

        if let Some(fit) = return_periods.fit() {
            for ce in &mut events {
                ce.return_period_years = Some(fit.return_period_of(ce.event.damage_usd));
            }
        }

        log::debug!(
            "Recomputed view over {} of {} events",
            events.len(),
            self.events.len()
        );

        DashboardView {
            summary: summarize(&events),
            severity_distribution: severity_counts(&events),
            damage_by_county: damage_by_county(&events),
            monthly: monthly_counts(&events),
            county_risk: county_risk(&events),
            annual,
            trends,
            return_periods,
            events,
        }
    }

    /// Trend tests over `span`, with event-free years counted as zero.
    /// A `None` span gives an empty series.
    pub fn trends(&self, annual: &[AnnualAggregate], span: Option<(i32, i32)>) -> TrendReport {
        let analysis = &self.config.analysis;
        let run = |metric: fn(&AnnualAggregate) -> f64| {
            let series = match span {
                Some(span) => annual_series(annual, span, metric),
                None => Vec::new(),
            };
            mann_kendall_with(&series, analysis.significance_level, analysis.min_trend_points)
        };

        TrendReport {
            annual_damage: run(|a| a.damage_millions),
            annual_events: run(|a| a.events as f64),
        }
    }

    pub fn return_periods(&self, annual: &[AnnualAggregate]) -> ReturnPeriodOutcome {
        let peaks: Vec<f64> = annual.iter().map(|a| a.peak_damage_usd).collect();
        fit_return_periods_for(&peaks, &self.config.analysis.return_periods)
    }
}
