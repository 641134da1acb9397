//! Period-over-period visit mix comparison.
//!
//! Buckets visits into calendar weeks (Monday-aligned) or months and
//! compares the category mix of the two most recent populated buckets.

use super::order_desc_with_absent_last;
use crate::types::VisitRecord;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Period length for trend bucketing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Week,
    /// The dashboard's default comparison window
    #[default]
    Month,
}

impl Granularity {
    /// First day of the bucket containing `date`.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Week => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            Granularity::Month => date.with_day(1).unwrap(),
        }
    }

    /// Human-readable bucket label, e.g. "March 2025" or "Week of Mar 03, 2025".
    pub fn label(&self, bucket: NaiveDate) -> String {
        match self {
            Granularity::Week => format!("Week of {}", bucket.format("%b %d, %Y")),
            Granularity::Month => bucket.format("%B %Y").to_string(),
        }
    }
}

/// Which categories appear in the comparison table.
///
/// The two dashboard variants in the field disagree on this, so it is a
/// named option rather than a silently reconciled behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendInclusion {
    /// Categories active in either period
    #[default]
    Union,
    /// Categories active in both periods
    Both,
}

/// One category's change between the two compared periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDelta {
    pub category: String,
    pub previous: i64,
    pub current: i64,
    /// Fractional change `(current - previous) / previous`; undefined when
    /// the previous period had no visits in this category.
    pub delta: Option<f64>,
}

/// Visit mix change between the two most recent populated periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendComparison {
    pub granularity: Granularity,
    /// First day of the earlier period
    pub previous_start: NaiveDate,
    /// First day of the later period
    pub current_start: NaiveDate,
    /// Per-category deltas, biggest growth first, undefined deltas last
    pub rows: Vec<CategoryDelta>,
}

impl TrendComparison {
    pub fn previous_label(&self) -> String {
        self.granularity.label(self.previous_start)
    }

    pub fn current_label(&self) -> String {
        self.granularity.label(self.current_start)
    }
}

/// Compare the category mix of the two most recent populated periods.
///
/// Visits without a date and visits in the "other" bucket are ignored.
/// Returns `None` when fewer than two periods have any activity; there is
/// no partial computation against a single period.
pub fn compare_recent_periods(
    records: &[VisitRecord],
    granularity: Granularity,
    inclusion: TrendInclusion,
) -> Option<TrendComparison> {
    let mut buckets: BTreeMap<NaiveDate, BTreeMap<String, i64>> = BTreeMap::new();
    for record in records {
        let (Some(date), Some(category)) = (record.date, record.reportable_category()) else {
            continue;
        };
        let bucket = granularity.bucket_start(date);
        *buckets
            .entry(bucket)
            .or_default()
            .entry(category.to_string())
            .or_insert(0) += 1;
    }

    let mut recent = buckets.into_iter().rev();
    let (current_start, current) = recent.next()?;
    let (previous_start, previous) = recent.next()?;

    let categories: BTreeSet<&String> = previous.keys().chain(current.keys()).collect();

    let mut rows: Vec<CategoryDelta> = categories
        .into_iter()
        .filter_map(|category| {
            let prev_count = previous.get(category).copied().unwrap_or(0);
            let cur_count = current.get(category).copied().unwrap_or(0);
            let included = match inclusion {
                TrendInclusion::Union => prev_count > 0 || cur_count > 0,
                TrendInclusion::Both => prev_count > 0 && cur_count > 0,
            };
            if !included {
                return None;
            }
            let delta = if prev_count == 0 {
                None
            } else {
                Some((cur_count - prev_count) as f64 / prev_count as f64)
            };
            Some(CategoryDelta {
                category: category.clone(),
                previous: prev_count,
                current: cur_count,
                delta,
            })
        })
        .collect();

    rows.sort_by(|a, b| {
        order_desc_with_absent_last(a.delta, b.delta).then_with(|| a.category.cmp(&b.category))
    });

    Some(TrendComparison {
        granularity,
        previous_start,
        current_start,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visit(date: (i32, u32, u32), category: &str) -> VisitRecord {
        VisitRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2),
            visit_category: Some(category.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_week_buckets_are_monday_aligned() {
        let wednesday = NaiveDate::from_ymd_opt(2025, 4, 9).unwrap();
        let monday = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        assert_eq!(Granularity::Week.bucket_start(wednesday), monday);
        assert_eq!(Granularity::Week.bucket_start(monday), monday);
    }

    #[test]
    fn test_month_buckets_use_first_day() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 28).unwrap();
        assert_eq!(
            Granularity::Month.bucket_start(date),
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
    }

    #[test]
    fn test_single_period_is_not_enough_data() {
        let records = vec![
            visit((2025, 3, 3), "Follow-up"),
            visit((2025, 3, 4), "Lab Draw"),
        ];
        let result =
            compare_recent_periods(&records, Granularity::Month, TrendInclusion::Union);
        assert_eq!(result, None);
    }

    #[test]
    fn test_union_policy_keeps_categories_active_in_either_period() {
        // A: 5 visits in week 1, none in week 2 → -100%
        // B: none in week 1, 3 in week 2 → undefined (zero previous)
        let mut records: Vec<VisitRecord> = Vec::new();
        for day in 3..8 {
            records.push(visit((2025, 3, day), "A"));
        }
        for day in 10..13 {
            records.push(visit((2025, 3, day), "B"));
        }

        let trend =
            compare_recent_periods(&records, Granularity::Week, TrendInclusion::Union).unwrap();
        assert_eq!(
            trend.previous_start,
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
        assert_eq!(
            trend.current_start,
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
        );

        assert_eq!(trend.rows.len(), 2);
        // defined delta first, undefined last
        assert_eq!(trend.rows[0].category, "A");
        assert_eq!(trend.rows[0].delta, Some(-1.0));
        assert_eq!(trend.rows[1].category, "B");
        assert_eq!(trend.rows[1].delta, None);
    }

    #[test]
    fn test_both_policy_drops_one_sided_categories() {
        let records = vec![
            visit((2025, 3, 3), "A"),
            visit((2025, 3, 10), "B"),
            visit((2025, 3, 3), "C"),
            visit((2025, 3, 11), "C"),
            visit((2025, 3, 12), "C"),
        ];
        let trend =
            compare_recent_periods(&records, Granularity::Week, TrendInclusion::Both).unwrap();
        assert_eq!(trend.rows.len(), 1);
        assert_eq!(trend.rows[0].category, "C");
        assert_eq!(trend.rows[0].delta, Some(1.0));
    }

    #[test]
    fn test_delta_matches_formula() {
        let mut records = Vec::new();
        for _ in 0..4 {
            records.push(visit((2025, 2, 10), "A"));
        }
        for _ in 0..5 {
            records.push(visit((2025, 3, 10), "A"));
        }
        let trend =
            compare_recent_periods(&records, Granularity::Month, TrendInclusion::Union).unwrap();
        assert_eq!(trend.previous_label(), "February 2025");
        assert_eq!(trend.current_label(), "March 2025");
        let delta = trend.rows[0].delta.unwrap();
        assert!((delta - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_other_and_undated_visits_are_ignored() {
        let mut records = vec![
            visit((2025, 2, 10), "Other"),
            VisitRecord {
                date: None,
                visit_category: Some("A".to_string()),
                ..Default::default()
            },
            visit((2025, 3, 10), "A"),
        ];
        // only one populated bucket remains
        assert_eq!(
            compare_recent_periods(&records, Granularity::Month, TrendInclusion::Union),
            None
        );

        records.push(visit((2025, 2, 11), "A"));
        let trend =
            compare_recent_periods(&records, Granularity::Month, TrendInclusion::Union).unwrap();
        assert_eq!(trend.rows.len(), 1);
        assert_eq!(trend.rows[0].category, "A");
    }

    #[test]
    fn test_compares_most_recent_populated_buckets() {
        // gap months are skipped; January vs April are the two populated buckets
        let records = vec![
            visit((2025, 1, 15), "A"),
            visit((2025, 4, 2), "A"),
            visit((2025, 4, 3), "A"),
        ];
        let trend =
            compare_recent_periods(&records, Granularity::Month, TrendInclusion::Union).unwrap();
        assert_eq!(
            trend.previous_start,
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()
        );
        assert_eq!(
            trend.current_start,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap()
        );
        assert_eq!(trend.rows[0].delta, Some(1.0));
    }
}
