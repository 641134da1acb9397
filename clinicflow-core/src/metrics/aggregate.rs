//! Dataset-wide and per-clinician aggregate statistics.

use super::durations::VisitDurations;
use super::order_desc_with_absent_last;
use crate::types::VisitRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mean of each derived duration over the whole dataset, in minutes.
///
/// A field is `None` when no record contributed a valid observation;
/// absent and invalid intervals are excluded from the mean, never counted
/// as zero. Values keep full precision; rounding happens at display time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverallStats {
    pub total_visit: Option<f64>,
    pub doctor: Option<f64>,
    pub triage: Option<f64>,
    pub lab: Option<f64>,
    pub sw: Option<f64>,
    pub arrival_to_room: Option<f64>,
}

/// Compute the overall duration means.
pub fn overall_stats(durations: &[VisitDurations]) -> OverallStats {
    OverallStats {
        total_visit: mean(durations.iter().filter_map(|d| d.total_visit)),
        doctor: mean(durations.iter().filter_map(|d| d.doctor)),
        triage: mean(durations.iter().filter_map(|d| d.triage)),
        lab: mean(durations.iter().filter_map(|d| d.lab)),
        sw: mean(durations.iter().filter_map(|d| d.sw)),
        arrival_to_room: mean(durations.iter().filter_map(|d| d.arrival_to_room)),
    }
}

/// Mean of an observation stream, `None` when there are no observations.
pub(crate) fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0u64), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Sort key for the per-clinician table.
///
/// Both orders exist in the field: the dashboard ranks by patient load,
/// while utilization reviews rank by consultation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClinicianSort {
    /// Descending by number of assigned visits
    #[default]
    VisitCount,
    /// Descending by mean doctor time
    DoctorTime,
}

/// Per-clinician visit load and consultation time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClinicianStats {
    pub name: String,
    /// All visits assigned to this clinician
    pub visit_count: i64,
    /// Mean doctor in → doctor out, over visits where it is defined
    pub mean_doctor_minutes: Option<f64>,
}

/// Group visits by assigned clinician.
///
/// Records with no staff are excluded entirely rather than bucketed into an
/// "unknown" row. Ties under either sort key break by name ascending so the
/// table is deterministic.
pub fn clinician_stats(
    records: &[VisitRecord],
    durations: &[VisitDurations],
    sort: ClinicianSort,
) -> Vec<ClinicianStats> {
    struct Acc {
        visits: i64,
        doctor_sum: f64,
        doctor_count: u64,
    }

    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    for (record, duration) in records.iter().zip(durations) {
        let Some(name) = record.staff_name() else {
            continue;
        };
        let acc = groups.entry(name.to_string()).or_insert(Acc {
            visits: 0,
            doctor_sum: 0.0,
            doctor_count: 0,
        });
        acc.visits += 1;
        if let Some(minutes) = duration.doctor {
            acc.doctor_sum += minutes;
            acc.doctor_count += 1;
        }
    }

    let mut rows: Vec<ClinicianStats> = groups
        .into_iter()
        .map(|(name, acc)| ClinicianStats {
            name,
            visit_count: acc.visits,
            mean_doctor_minutes: if acc.doctor_count == 0 {
                None
            } else {
                Some(acc.doctor_sum / acc.doctor_count as f64)
            },
        })
        .collect();

    match sort {
        ClinicianSort::VisitCount => rows.sort_by(|a, b| {
            b.visit_count
                .cmp(&a.visit_count)
                .then_with(|| a.name.cmp(&b.name))
        }),
        ClinicianSort::DoctorTime => rows.sort_by(|a, b| {
            order_desc_with_absent_last(a.mean_doctor_minutes, b.mean_doctor_minutes)
                .then_with(|| a.name.cmp(&b.name))
        }),
    }

    rows
}

/// Activity on a single clinic day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySnapshot {
    pub date: NaiveDate,
    /// Visits recorded for this date
    pub visit_count: i64,
    /// Visits per clinician for this date, busiest first
    pub per_staff: Vec<(String, i64)>,
}

/// "Seen today" counts for the given clinic-local date.
pub fn daily_snapshot(records: &[VisitRecord], on: NaiveDate) -> DaySnapshot {
    let mut visit_count = 0;
    let mut per_staff: BTreeMap<String, i64> = BTreeMap::new();

    for record in records.iter().filter(|r| r.date == Some(on)) {
        visit_count += 1;
        if let Some(name) = record.staff_name() {
            *per_staff.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    let mut per_staff: Vec<(String, i64)> = per_staff.into_iter().collect();
    per_staff.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    DaySnapshot {
        date: on,
        visit_count,
        per_staff,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::project_durations;
    use chrono::NaiveTime;

    fn at(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn visit(staff: Option<&str>, doctor_in: Option<NaiveTime>, doctor_out: Option<NaiveTime>) -> VisitRecord {
        VisitRecord {
            staff: staff.map(str::to_string),
            doctor_in,
            doctor_out,
            ..Default::default()
        }
    }

    #[test]
    fn test_mean_excludes_absent_and_invalid() {
        // 30 min valid, end-before-start invalid, missing time out
        let records = vec![
            VisitRecord {
                registration_start: at(9, 0),
                time_out: at(9, 30),
                ..Default::default()
            },
            VisitRecord {
                registration_start: at(9, 0),
                time_out: at(8, 50),
                ..Default::default()
            },
            VisitRecord {
                registration_start: at(9, 0),
                ..Default::default()
            },
        ];
        let stats = overall_stats(&project_durations(&records));
        assert_eq!(stats.total_visit, Some(30.0));
    }

    #[test]
    fn test_no_observations_is_undefined_not_zero() {
        let records = vec![VisitRecord::default()];
        let stats = overall_stats(&project_durations(&records));
        assert_eq!(stats.total_visit, None);
        assert_eq!(stats.lab, None);
    }

    #[test]
    fn test_unassigned_visits_are_excluded() {
        let records = vec![
            visit(Some("Dr. Eric Cox"), at(9, 0), at(9, 20)),
            visit(None, at(9, 0), at(11, 0)),
            visit(Some("   "), at(9, 0), at(11, 0)),
        ];
        let rows = clinician_stats(
            &records,
            &project_durations(&records),
            ClinicianSort::VisitCount,
        );
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Dr. Eric Cox");
        assert_eq!(rows[0].visit_count, 1);
        assert_eq!(rows[0].mean_doctor_minutes, Some(20.0));
    }

    #[test]
    fn test_visit_count_includes_visits_without_doctor_time() {
        let records = vec![
            visit(Some("Dr. Sandra Vexler"), at(9, 0), at(9, 30)),
            visit(Some("Dr. Sandra Vexler"), None, None),
        ];
        let rows = clinician_stats(
            &records,
            &project_durations(&records),
            ClinicianSort::VisitCount,
        );
        assert_eq!(rows[0].visit_count, 2);
        assert_eq!(rows[0].mean_doctor_minutes, Some(30.0));
    }

    #[test]
    fn test_sort_by_count_breaks_ties_by_name() {
        let records = vec![
            visit(Some("Dr. Omer Usman"), None, None),
            visit(Some("Dr. Abhinav Vulisha"), None, None),
        ];
        let rows = clinician_stats(
            &records,
            &project_durations(&records),
            ClinicianSort::VisitCount,
        );
        assert_eq!(rows[0].name, "Dr. Abhinav Vulisha");
        assert_eq!(rows[1].name, "Dr. Omer Usman");
    }

    #[test]
    fn test_sort_by_doctor_time_puts_undefined_last() {
        let records = vec![
            visit(Some("Dr. John Borrego"), None, None),
            visit(Some("Dr. Muhammad Tahir"), at(9, 0), at(9, 10)),
            visit(Some("Dr. Richard McCallum"), at(9, 0), at(9, 40)),
        ];
        let rows = clinician_stats(
            &records,
            &project_durations(&records),
            ClinicianSort::DoctorTime,
        );
        assert_eq!(rows[0].name, "Dr. Richard McCallum");
        assert_eq!(rows[1].name, "Dr. Muhammad Tahir");
        assert_eq!(rows[2].name, "Dr. John Borrego");
        assert_eq!(rows[2].mean_doctor_minutes, None);
    }

    #[test]
    fn test_daily_snapshot_counts_one_date_only() {
        let day = NaiveDate::from_ymd_opt(2025, 4, 7).unwrap();
        let other = NaiveDate::from_ymd_opt(2025, 4, 8).unwrap();
        let records = vec![
            VisitRecord {
                date: Some(day),
                staff: Some("Dr. Eric Cox".to_string()),
                ..Default::default()
            },
            VisitRecord {
                date: Some(day),
                staff: Some("Dr. Eric Cox".to_string()),
                ..Default::default()
            },
            VisitRecord {
                date: Some(day),
                ..Default::default()
            },
            VisitRecord {
                date: Some(other),
                staff: Some("Dr. Eric Cox".to_string()),
                ..Default::default()
            },
            VisitRecord::default(),
        ];
        let snapshot = daily_snapshot(&records, day);
        assert_eq!(snapshot.visit_count, 3);
        assert_eq!(snapshot.per_staff, vec![("Dr. Eric Cox".to_string(), 2)]);
    }
}
