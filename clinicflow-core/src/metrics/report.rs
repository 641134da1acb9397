//! Dashboard report assembly.
//!
//! Runs every metric in the engine over one snapshot and bundles the
//! results into a single serializable report.

use super::aggregate::{clinician_stats, overall_stats, ClinicianSort, ClinicianStats, OverallStats};
use super::bottleneck::{find_bottleneck, Bottleneck};
use super::durations::project_durations;
use super::flow::{flow_stats, FlowStats};
use super::mix::{
    category_distribution, duration_by_category, most_common_appointment, visit_type_mix,
    CategoryCount, CategoryMean, VisitTypeShare,
};
use super::trend::{compare_recent_periods, Granularity, TrendComparison, TrendInclusion};
use crate::types::VisitRecord;
use chrono::NaiveDate;
use serde::Serialize;

/// Report knobs. Defaults mirror the clinic's standing dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Trend bucketing period
    pub granularity: Granularity,
    /// Which categories appear in the trend table
    pub trend_inclusion: TrendInclusion,
    /// Sort key for the clinician table
    pub clinician_sort: ClinicianSort,
    /// Row cap for the top-categories table
    pub top_categories: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::default(),
            trend_inclusion: TrendInclusion::default(),
            clinician_sort: ClinicianSort::default(),
            top_categories: 5,
        }
    }
}

/// First and last visit date present in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub first: NaiveDate,
    pub last: NaiveDate,
}

/// Everything the operational dashboard shows, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    /// Number of records the report was computed over
    pub record_count: usize,
    /// Span of dated visits; `None` when no record has a usable date
    pub date_range: Option<DateRange>,
    pub overall: OverallStats,
    pub clinicians: Vec<ClinicianStats>,
    pub bottleneck: Bottleneck,
    pub flow: FlowStats,
    pub visit_mix: Vec<VisitTypeShare>,
    pub duration_by_category: Vec<CategoryMean>,
    pub category_distribution: Vec<CategoryCount>,
    pub top_categories: Vec<CategoryCount>,
    pub most_common_appointment: Option<String>,
    /// `None` when fewer than two periods have data
    pub trend: Option<TrendComparison>,
}

/// Compute the full dashboard report for one dataset snapshot.
pub fn generate_report(records: &[VisitRecord], options: &ReportOptions) -> DashboardReport {
    let durations = project_durations(records);
    let overall = overall_stats(&durations);

    let distribution = category_distribution(records);
    let top_categories = distribution
        .iter()
        .take(options.top_categories)
        .cloned()
        .collect();

    DashboardReport {
        record_count: records.len(),
        date_range: date_range(records),
        clinicians: clinician_stats(records, &durations, options.clinician_sort),
        bottleneck: find_bottleneck(&overall),
        flow: flow_stats(records, &durations),
        visit_mix: visit_type_mix(records),
        duration_by_category: duration_by_category(records, &durations),
        category_distribution: distribution,
        top_categories,
        most_common_appointment: most_common_appointment(records),
        trend: compare_recent_periods(records, options.granularity, options.trend_inclusion),
        overall,
    }
}

fn date_range(records: &[VisitRecord]) -> Option<DateRange> {
    let mut dates = records.iter().filter_map(|r| r.date);
    let first = dates.next()?;
    let (first, last) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange { first, last })
}
