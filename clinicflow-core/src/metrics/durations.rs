//! Derived duration projection.
//!
//! Turns the raw timestamp pairs on a [`VisitRecord`] into fractional
//! minutes. A duration exists only when both endpoints are present and the
//! interval is non-negative; a data-entry error that puts the end before the
//! start yields an absent value, never a clamped zero or a flipped sign.

use crate::types::VisitRecord;
use chrono::NaiveTime;
use serde::Serialize;

/// Derived minutes for one visit. Computed, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct VisitDurations {
    /// registration start → time out
    pub total_visit: Option<f64>,
    /// doctor in → doctor out
    pub doctor: Option<f64>,
    /// triage start → triage end
    pub triage: Option<f64>,
    /// lab start → lab end
    pub lab: Option<f64>,
    /// social work start → end
    pub sw: Option<f64>,
    /// registration start → time roomed
    pub arrival_to_room: Option<f64>,
}

impl VisitDurations {
    /// Project the durations of a single record.
    pub fn of(record: &VisitRecord) -> Self {
        Self {
            total_visit: minutes_between(record.registration_start, record.time_out),
            doctor: minutes_between(record.doctor_in, record.doctor_out),
            triage: minutes_between(record.triage_start, record.triage_end),
            lab: minutes_between(record.lab_start, record.lab_end),
            sw: minutes_between(record.sw_start, record.sw_end),
            arrival_to_room: minutes_between(record.registration_start, record.time_roomed),
        }
    }
}

/// Project every record, preserving order. Exactly one output per input.
pub fn project_durations(records: &[VisitRecord]) -> Vec<VisitDurations> {
    records.iter().map(VisitDurations::of).collect()
}

/// Minutes from `start` to `end`, absent unless both exist and `end >= start`.
fn minutes_between(start: Option<NaiveTime>, end: Option<NaiveTime>) -> Option<f64> {
    let (start, end) = (start?, end?);
    let elapsed = end.signed_duration_since(start);
    if elapsed < chrono::Duration::zero() {
        return None;
    }
    Some(elapsed.num_seconds() as f64 / 60.0)
}
