//! Visit-metrics engine.
//!
//! A pipeline of pure, composable transforms over one snapshot of visit
//! records:
//!
//! ```text
//! raw rows → derived durations → aggregates → bottleneck ranking
//!                              → flow coverage
//!                              → case mix → period trend deltas
//! ```
//!
//! Nothing here performs I/O or holds shared state; each computation is a
//! function of the record slice it is given. Callers are responsible for
//! passing a consistent snapshot (see [`crate::store::Snapshot`]) and must
//! not mutate it mid-report.
//!
//! Missing data is pervasive in this dataset, so every statistic
//! distinguishes "undefined" from zero: a mean with no valid observations,
//! coverage of an empty dataset, and a percent change against an empty
//! previous period are all `None`, and renderers print them as such.

pub mod aggregate;
pub mod bottleneck;
pub mod durations;
pub mod flow;
pub mod mix;
pub mod report;
pub mod trend;

pub use aggregate::{
    clinician_stats, daily_snapshot, overall_stats, ClinicianSort, ClinicianStats, DaySnapshot,
    OverallStats,
};
pub use bottleneck::{find_bottleneck, Bottleneck, Stage};
pub use durations::{project_durations, VisitDurations};
pub use flow::{flow_stats, FlowStats};
pub use mix::{
    category_distribution, duration_by_category, most_common_appointment, visit_type_mix,
    CategoryCount, CategoryMean, VisitTypeShare,
};
pub use report::{generate_report, DashboardReport, DateRange, ReportOptions};
pub use trend::{
    compare_recent_periods, CategoryDelta, Granularity, TrendComparison, TrendInclusion,
};

use std::cmp::Ordering;

/// Descending order for optional statistics: larger values first, absent
/// values after every defined one. Used by the tables whose rows may carry
/// an undefined mean or delta.
pub(crate) fn order_desc_with_absent_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_desc_with_absent_last() {
        assert_eq!(
            order_desc_with_absent_last(Some(2.0), Some(1.0)),
            Ordering::Less
        );
        assert_eq!(
            order_desc_with_absent_last(Some(1.0), None),
            Ordering::Less
        );
        assert_eq!(
            order_desc_with_absent_last(None, Some(-5.0)),
            Ordering::Greater
        );
        assert_eq!(order_desc_with_absent_last(None, None), Ordering::Equal);
    }
}
