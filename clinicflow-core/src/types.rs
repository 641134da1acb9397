//! Core domain types for clinicflow
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Visit** | One patient's single clinic encounter, tracked by an ID/date pair |
//! | **Clinician** | The staff member assigned to a visit (the `staff` column) |
//! | **Stage** | A clinical station a patient passes through (triage, lab, social work) |
//! | **Visit category / type** | Clinician-assigned classification used for case-mix reporting |
//!
//! A [`VisitRecord`] is the typed form of one row in the record store. Every
//! field except the ID is optional: the clinic floor gets busy and operators
//! cannot always capture every input, so missing and malformed values are
//! normal data, not errors.

use chrono::{NaiveDate, NaiveTime};

/// One patient encounter, as stored in the record store.
///
/// Clock times are clinic-local time-of-day paired with `date`. An absent
/// time means the stage was skipped or the value was never captured (or was
/// malformed in the store); downstream metrics treat all three the same way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitRecord {
    /// Operator-entered identifier. Not guaranteed unique across edits.
    pub id: i64,
    /// Visit date. Absent when the stored string was malformed.
    pub date: Option<NaiveDate>,
    /// Assigned clinician
    pub staff: Option<String>,
    /// Exam room
    pub room: Option<String>,
    /// Visit type (e.g. "FP" follow-up, "NP" new patient)
    pub visit_type: Option<String>,
    /// Visit category for case-mix reporting
    pub visit_category: Option<String>,
    /// Appointment type selected at intake
    pub appointment_type: Option<String>,
    /// Free-text description when the appointment type is "Other"
    pub appointment_note: Option<String>,

    pub registration_start: Option<NaiveTime>,
    pub registration_end: Option<NaiveTime>,
    pub triage_start: Option<NaiveTime>,
    pub triage_end: Option<NaiveTime>,
    pub time_roomed: Option<NaiveTime>,
    pub exam_end: Option<NaiveTime>,
    pub doctor_in: Option<NaiveTime>,
    pub doctor_out: Option<NaiveTime>,
    pub lab_start: Option<NaiveTime>,
    pub lab_end: Option<NaiveTime>,
    pub sw_start: Option<NaiveTime>,
    pub sw_end: Option<NaiveTime>,
    pub time_out: Option<NaiveTime>,
}

/// Trimmed, non-empty view of an optional text field.
fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl VisitRecord {
    /// The assigned clinician, if one was recorded.
    pub fn staff_name(&self) -> Option<&str> {
        trimmed(&self.staff)
    }

    /// The visit type, if one was recorded.
    pub fn visit_type_name(&self) -> Option<&str> {
        trimmed(&self.visit_type)
    }

    /// The visit category, if one was recorded.
    pub fn visit_category_name(&self) -> Option<&str> {
        trimmed(&self.visit_category)
    }

    /// The appointment type, if one was recorded.
    pub fn appointment_type_name(&self) -> Option<&str> {
        trimmed(&self.appointment_type)
    }

    /// The visit category, excluding the catch-all "other" bucket.
    ///
    /// The sentinel is matched case-insensitively; "Other", "other" and
    /// "OTHER" are all excluded from distribution and trend reporting.
    pub fn reportable_category(&self) -> Option<&str> {
        self.visit_category_name()
            .filter(|c| !c.eq_ignore_ascii_case("other"))
    }
}
