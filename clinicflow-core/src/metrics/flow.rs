//! Patient-flow coverage metrics.

use super::aggregate::mean;
use super::durations::VisitDurations;
use crate::types::VisitRecord;
use serde::Serialize;

/// How patients move through the clinic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct FlowStats {
    /// Fraction of visits with both triage timestamps recorded (0.0–1.0).
    /// Undefined on an empty dataset, never reported as 0%.
    pub triage_coverage: Option<f64>,
    /// Mean minutes from registration to being roomed
    pub mean_arrival_to_room: Option<f64>,
}

/// Compute flow metrics over the dataset.
///
/// Coverage counts timestamp *presence*: a triage pair that is recorded but
/// inverted still shows the patient went through triage, even though its
/// duration is excluded from the means.
pub fn flow_stats(records: &[VisitRecord], durations: &[VisitDurations]) -> FlowStats {
    let triage_coverage = if records.is_empty() {
        None
    } else {
        let both = records
            .iter()
            .filter(|r| r.triage_start.is_some() && r.triage_end.is_some())
            .count();
        Some(both as f64 / records.len() as f64)
    };

    FlowStats {
        triage_coverage,
        mean_arrival_to_room: mean(durations.iter().filter_map(|d| d.arrival_to_room)),
    }
}
