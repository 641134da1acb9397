//! Case-mix reporting: visit types, categories, and appointment types.

use super::aggregate::mean;
use super::durations::VisitDurations;
use super::order_desc_with_absent_last;
use crate::types::VisitRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Share of one visit type in the recorded mix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitTypeShare {
    pub visit_type: String,
    pub count: i64,
    /// Percent of visits with a recorded type (0.0–100.0)
    pub share_pct: f64,
}

/// Visit-type mix as percentages, busiest type first.
///
/// Visits with no recorded type are left out of both the counts and the
/// denominator.
pub fn visit_type_mix(records: &[VisitRecord]) -> Vec<VisitTypeShare> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for record in records {
        if let Some(visit_type) = record.visit_type_name() {
            *counts.entry(visit_type.to_string()).or_insert(0) += 1;
        }
    }

    let total: i64 = counts.values().sum();
    let mut rows: Vec<VisitTypeShare> = counts
        .into_iter()
        .map(|(visit_type, count)| VisitTypeShare {
            visit_type,
            count,
            share_pct: count as f64 / total as f64 * 100.0,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.visit_type.cmp(&b.visit_type)));
    rows
}

/// Mean total visit duration for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMean {
    pub category: String,
    /// `None` when no visit in the category has a valid total duration
    pub mean_total_minutes: Option<f64>,
}

/// Mean total visit duration by category, slowest first.
///
/// Unlike the distribution below, this table keeps the "other" bucket; a
/// long tail of unclassified visits is still time spent in clinic.
pub fn duration_by_category(
    records: &[VisitRecord],
    durations: &[VisitDurations],
) -> Vec<CategoryMean> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (record, duration) in records.iter().zip(durations) {
        let Some(category) = record.visit_category_name() else {
            continue;
        };
        let values = groups.entry(category.to_string()).or_default();
        if let Some(minutes) = duration.total_visit {
            values.push(minutes);
        }
    }

    let mut rows: Vec<CategoryMean> = groups
        .into_iter()
        .map(|(category, values)| CategoryMean {
            category,
            mean_total_minutes: mean(values.into_iter()),
        })
        .collect();
    rows.sort_by(|a, b| {
        order_desc_with_absent_last(a.mean_total_minutes, b.mean_total_minutes)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// Visit count for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

/// Category distribution, most common first, excluding the "other" bucket.
pub fn category_distribution(records: &[VisitRecord]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for record in records {
        if let Some(category) = record.reportable_category() {
            *counts.entry(category.to_string()).or_insert(0) += 1;
        }
    }

    let mut rows: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, count)| CategoryCount { category, count })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.category.cmp(&b.category)));
    rows
}

/// The most common appointment type, if any visit has one recorded.
/// Ties resolve to the alphabetically first type.
pub fn most_common_appointment(records: &[VisitRecord]) -> Option<String> {
    let mut counts: BTreeMap<String, i64> = BTreeMap::new();
    for record in records {
        if let Some(appointment) = record.appointment_type_name() {
            *counts.entry(appointment.to_string()).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(appointment, _)| appointment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::project_durations;
    use chrono::NaiveTime;

    fn with_category(category: &str) -> VisitRecord {
        VisitRecord {
            visit_category: Some(category.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_visit_type_mix_shares() {
        let records = vec![
            VisitRecord {
                visit_type: Some("FP".to_string()),
                ..Default::default()
            },
            VisitRecord {
                visit_type: Some("FP".to_string()),
                ..Default::default()
            },
            VisitRecord {
                visit_type: Some("NP".to_string()),
                ..Default::default()
            },
            VisitRecord::default(),
        ];
        let mix = visit_type_mix(&records);
        assert_eq!(mix.len(), 2);
        assert_eq!(mix[0].visit_type, "FP");
        assert!((mix[0].share_pct - 200.0 / 3.0).abs() < 1e-9);
        assert!((mix[1].share_pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_distribution_excludes_other_and_ranks() {
        let records = vec![
            with_category("Lab Draw"),
            with_category("Lab Draw"),
            with_category("Follow-up"),
            with_category("Other"),
            with_category("other"),
            VisitRecord::default(),
        ];
        let distribution = category_distribution(&records);
        assert_eq!(
            distribution,
            vec![
                CategoryCount {
                    category: "Lab Draw".to_string(),
                    count: 2
                },
                CategoryCount {
                    category: "Follow-up".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_duration_by_category_keeps_other_and_undefined_means() {
        let at = |h, m| NaiveTime::from_hms_opt(h, m, 0);
        let records = vec![
            VisitRecord {
                visit_category: Some("Follow-up".to_string()),
                registration_start: at(9, 0),
                time_out: at(10, 0),
                ..Default::default()
            },
            VisitRecord {
                visit_category: Some("Other".to_string()),
                registration_start: at(9, 0),
                time_out: at(9, 30),
                ..Default::default()
            },
            // category present, duration unusable
            VisitRecord {
                visit_category: Some("Rx Refill".to_string()),
                ..Default::default()
            },
        ];
        let rows = duration_by_category(&records, &project_durations(&records));
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category, "Follow-up");
        assert_eq!(rows[0].mean_total_minutes, Some(60.0));
        assert_eq!(rows[1].category, "Other");
        // undefined mean sorts last
        assert_eq!(rows[2].category, "Rx Refill");
        assert_eq!(rows[2].mean_total_minutes, None);
    }

    #[test]
    fn test_most_common_appointment() {
        assert_eq!(most_common_appointment(&[]), None);

        let appointment = |name: &str| VisitRecord {
            appointment_type: Some(name.to_string()),
            ..Default::default()
        };
        let records = vec![
            appointment("Follow-up"),
            appointment("Lab Draw"),
            appointment("Follow-up"),
        ];
        assert_eq!(
            most_common_appointment(&records),
            Some("Follow-up".to_string())
        );

        // tie → alphabetically first
        let records = vec![appointment("Lab Draw"), appointment("Follow-up")];
        assert_eq!(
            most_common_appointment(&records),
            Some("Follow-up".to_string())
        );
    }
}
