//! CSV-backed visit record store.
//!
//! The store is a single CSV file with a stable column set, read in bulk
//! into typed [`VisitRecord`]s and written back in bulk. Reports consume an
//! immutable [`Snapshot`]; editors write through [`CsvStore::replace`].
//!
//! ## Concurrent edits
//!
//! The file may be shared between operators. Every snapshot carries a
//! SHA-256 fingerprint of the bytes it was read from, and `replace` refuses
//! to write when the file on disk no longer matches that fingerprint. A
//! conflicting writer gets [`Error::StoreConflict`] and must re-read instead
//! of silently clobbering the other edit.
//!
//! ## Bad rows
//!
//! Individual malformed cells degrade to absent values (see
//! [`crate::timeparse`]). A row that cannot be mapped to a record at all
//! (wrong shape, unparseable ID) is skipped and reported in
//! [`Snapshot::warnings`]; it never aborts the load.

use crate::error::{Error, Result};
use crate::timeparse;
use crate::types::VisitRecord;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// The stable column set of the store, in file order.
const HEADER: [&str; 21] = [
    "Date",
    "Staff",
    "Room",
    "ID",
    "Visit Type",
    "Visit Category",
    "Appointment Type",
    "Describe Appointment Type If Applicable",
    "Registration Start",
    "Registration End",
    "Triage Start",
    "Triage End",
    "Time Roomed",
    "Exam End",
    "Doctor In",
    "Doctor Out",
    "Lab Start",
    "Lab End",
    "SW Start",
    "SW End",
    "Time Out",
];

/// One row as it appears on disk, before typed parsing.
#[derive(Debug, Default, Serialize, Deserialize)]
struct RawRow {
    #[serde(rename = "Date", default)]
    date: String,
    #[serde(rename = "Staff", default)]
    staff: String,
    #[serde(rename = "Room", default)]
    room: String,
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Visit Type", default)]
    visit_type: String,
    #[serde(rename = "Visit Category", default)]
    visit_category: String,
    #[serde(rename = "Appointment Type", default)]
    appointment_type: String,
    #[serde(rename = "Describe Appointment Type If Applicable", default)]
    appointment_note: String,
    #[serde(rename = "Registration Start", default)]
    registration_start: String,
    #[serde(rename = "Registration End", default)]
    registration_end: String,
    #[serde(rename = "Triage Start", default)]
    triage_start: String,
    #[serde(rename = "Triage End", default)]
    triage_end: String,
    #[serde(rename = "Time Roomed", default)]
    time_roomed: String,
    #[serde(rename = "Exam End", default)]
    exam_end: String,
    #[serde(rename = "Doctor In", default)]
    doctor_in: String,
    #[serde(rename = "Doctor Out", default)]
    doctor_out: String,
    #[serde(rename = "Lab Start", default)]
    lab_start: String,
    #[serde(rename = "Lab End", default)]
    lab_end: String,
    #[serde(rename = "SW Start", default)]
    sw_start: String,
    #[serde(rename = "SW End", default)]
    sw_end: String,
    #[serde(rename = "Time Out", default)]
    time_out: String,
}

impl RawRow {
    /// Typed view of the row. Fails only when the ID is unusable; every
    /// other field degrades to absent on malformed input.
    fn into_record(self) -> std::result::Result<VisitRecord, String> {
        let id: i64 = self
            .id
            .trim()
            .parse()
            .map_err(|_| format!("unparseable ID {:?}", self.id))?;

        let text = |raw: String| {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        };

        Ok(VisitRecord {
            id,
            date: timeparse::parse_date(&self.date),
            staff: text(self.staff),
            room: text(self.room),
            visit_type: text(self.visit_type),
            visit_category: text(self.visit_category),
            appointment_type: text(self.appointment_type),
            appointment_note: text(self.appointment_note),
            registration_start: timeparse::parse_clock(&self.registration_start),
            registration_end: timeparse::parse_clock(&self.registration_end),
            triage_start: timeparse::parse_clock(&self.triage_start),
            triage_end: timeparse::parse_clock(&self.triage_end),
            time_roomed: timeparse::parse_clock(&self.time_roomed),
            exam_end: timeparse::parse_clock(&self.exam_end),
            doctor_in: timeparse::parse_clock(&self.doctor_in),
            doctor_out: timeparse::parse_clock(&self.doctor_out),
            lab_start: timeparse::parse_clock(&self.lab_start),
            lab_end: timeparse::parse_clock(&self.lab_end),
            sw_start: timeparse::parse_clock(&self.sw_start),
            sw_end: timeparse::parse_clock(&self.sw_end),
            time_out: timeparse::parse_clock(&self.time_out),
        })
    }

    fn from_record(record: &VisitRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let clock = |value: &Option<chrono::NaiveTime>| {
            value.map(timeparse::format_clock).unwrap_or_default()
        };

        RawRow {
            date: record.date.map(timeparse::format_date).unwrap_or_default(),
            staff: text(&record.staff),
            room: text(&record.room),
            id: record.id.to_string(),
            visit_type: text(&record.visit_type),
            visit_category: text(&record.visit_category),
            appointment_type: text(&record.appointment_type),
            appointment_note: text(&record.appointment_note),
            registration_start: clock(&record.registration_start),
            registration_end: clock(&record.registration_end),
            triage_start: clock(&record.triage_start),
            triage_end: clock(&record.triage_end),
            time_roomed: clock(&record.time_roomed),
            exam_end: clock(&record.exam_end),
            doctor_in: clock(&record.doctor_in),
            doctor_out: clock(&record.doctor_out),
            lab_start: clock(&record.lab_start),
            lab_end: clock(&record.lab_end),
            sw_start: clock(&record.sw_start),
            sw_end: clock(&record.sw_end),
            time_out: clock(&record.time_out),
        }
    }
}

/// An immutable read of the whole store.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// All records, in file order
    pub records: Vec<VisitRecord>,
    /// SHA-256 of the file bytes this snapshot was read from
    pub fingerprint: String,
    /// Rows skipped during the load (non-fatal)
    pub warnings: Vec<String>,
}

/// A visit record store backed by one CSV file.
#[derive(Debug, Clone)]
pub struct CsvStore {
    path: PathBuf,
}

impl CsvStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bulk-read the store. A missing file loads as an empty snapshot.
    pub fn load(&self) -> Result<Snapshot> {
        let bytes = self.read_bytes()?;
        let fingerprint = fingerprint(&bytes);

        let mut records = Vec::new();
        let mut warnings = Vec::new();

        if !bytes.is_empty() {
            let mut reader = csv::Reader::from_reader(bytes.as_slice());
            for (idx, row) in reader.deserialize::<RawRow>().enumerate() {
                // header occupies line 1
                let line = idx + 2;
                match row {
                    Ok(raw) => match raw.into_record() {
                        Ok(record) => records.push(record),
                        Err(reason) => warnings.push(format!("line {line}: {reason}")),
                    },
                    Err(e) => warnings.push(format!("line {line}: {e}")),
                }
            }
        }

        tracing::debug!(
            path = %self.path.display(),
            records = records.len(),
            skipped = warnings.len(),
            "loaded record store"
        );

        Ok(Snapshot {
            records,
            fingerprint,
            warnings,
        })
    }

    /// Bulk-write the store, replacing its whole contents.
    ///
    /// `expected_fingerprint` must be the fingerprint of the snapshot the
    /// caller based its edit on; if the file changed in the meantime the
    /// write is refused with [`Error::StoreConflict`]. Returns the
    /// fingerprint of the newly written contents.
    pub fn replace(&self, records: &[VisitRecord], expected_fingerprint: &str) -> Result<String> {
        let current = self.read_bytes()?;
        if fingerprint(&current) != expected_fingerprint {
            return Err(Error::StoreConflict {
                path: self.path.display().to_string(),
            });
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        if records.is_empty() {
            // keep the header row even when the store is emptied
            writer.write_record(HEADER)?;
        }
        for record in records {
            writer.serialize(RawRow::from_record(record))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Store(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // write to a sibling temp file, then rename over the store
        let tmp = self.path.with_extension("csv.tmp");
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &self.path)?;

        tracing::info!(
            path = %self.path.display(),
            records = records.len(),
            "record store replaced"
        );

        Ok(fingerprint(&bytes))
    }

    fn read_bytes(&self) -> Result<Vec<u8>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

fn fingerprint(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
