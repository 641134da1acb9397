//! clinicflow-track - Clinic visit tracker CLI
//!
//! Adds and edits visit records in the shared CSV store. Writes go through
//! the store's fingerprint check, so two operators editing at once cannot
//! silently clobber each other; the loser is told to re-run.

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Parser, Subcommand};
use clinicflow_core::{timeparse, Config, CsvStore, Error, VisitRecord};
use std::path::PathBuf;

/// Clinicians who can be assigned to a visit.
const DOCTORS: [&str; 10] = [
    "Dr. Jon Pierson",
    "Dr. Javier De La Torre",
    "Dr. John Borrego",
    "Dr. Omer Usman",
    "Dr. Abhinav Vulisha",
    "Dr. Muhammad Tahir",
    "Dr. Richard McCallum",
    "Dr. Eric Cox",
    "Dr. Sandra Vexler",
    "Dr. Abdel Vexler",
];

/// Exam rooms.
const ROOMS: [&str; 4] = ["100", "101", "102", "103"];

/// Appointment types offered at intake.
const APPT_TYPES: [&str; 9] = [
    "New Patient",
    "New Encounter (existing pt.)",
    "Follow-up",
    "Lab Draw",
    "Lab Results",
    "Rx Refill",
    "Specialist",
    "Specialist Follow Up",
    "Other",
];

#[derive(Parser, Debug)]
#[command(name = "clinicflow-track")]
#[command(about = "Clinic visit tracker - add and edit visit records")]
#[command(version)]
struct Cli {
    /// Path to the visit CSV store (overrides config)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new visit record
    Add(AddArgs),
    /// Edit every record carrying the given ID
    Edit(EditArgs),
    /// Show the most recent records
    List {
        /// How many records to show
        #[arg(long, default_value_t = 20)]
        last: usize,
    },
}

#[derive(Args, Debug)]
struct AddArgs {
    /// Patient/visit ID
    #[arg(long)]
    id: i64,

    /// Visit date (MM/DD/YYYY, defaults to the clinic-local today)
    #[arg(long)]
    date: Option<String>,

    /// Assigned clinician
    #[arg(long)]
    staff: Option<String>,

    /// Exam room
    #[arg(long)]
    room: Option<String>,

    /// Visit type (e.g. FP, NP)
    #[arg(long)]
    visit_type: Option<String>,

    /// Visit category
    #[arg(long)]
    visit_category: Option<String>,

    /// Appointment type
    #[arg(long)]
    appointment_type: Option<String>,

    /// Free-text description when the appointment type is "Other"
    #[arg(long)]
    note: Option<String>,

    #[command(flatten)]
    times: TimeArgs,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// ID of the record(s) to edit
    #[arg(long)]
    id: i64,

    /// Visit date (MM/DD/YYYY); pass an empty string to clear
    #[arg(long)]
    date: Option<String>,

    /// Assigned clinician; pass an empty string to clear
    #[arg(long)]
    staff: Option<String>,

    /// Exam room; pass an empty string to clear
    #[arg(long)]
    room: Option<String>,

    /// Visit type; pass an empty string to clear
    #[arg(long)]
    visit_type: Option<String>,

    /// Visit category; pass an empty string to clear
    #[arg(long)]
    visit_category: Option<String>,

    /// Appointment type; pass an empty string to clear
    #[arg(long)]
    appointment_type: Option<String>,

    /// Appointment description; pass an empty string to clear
    #[arg(long)]
    note: Option<String>,

    #[command(flatten)]
    times: TimeArgs,
}

/// Stage timestamps (HH:MM). On edit, pass an empty string to clear one.
#[derive(Args, Debug)]
struct TimeArgs {
    #[arg(long)]
    registration_start: Option<String>,
    #[arg(long)]
    registration_end: Option<String>,
    #[arg(long)]
    triage_start: Option<String>,
    #[arg(long)]
    triage_end: Option<String>,
    #[arg(long)]
    time_roomed: Option<String>,
    #[arg(long)]
    exam_end: Option<String>,
    #[arg(long)]
    doctor_in: Option<String>,
    #[arg(long)]
    doctor_out: Option<String>,
    #[arg(long)]
    lab_start: Option<String>,
    #[arg(long)]
    lab_end: Option<String>,
    #[arg(long)]
    sw_start: Option<String>,
    #[arg(long)]
    sw_end: Option<String>,
    #[arg(long)]
    time_out: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = clinicflow_core::logging::init(&config.logging).ok();

    let store_path = cli
        .data
        .clone()
        .unwrap_or_else(|| config.store.resolved_path());
    let store = CsvStore::new(&store_path);

    match cli.command {
        Command::Add(args) => add(&store, &config, args),
        Command::Edit(args) => edit(&store, args),
        Command::List { last } => list(&store, last),
    }
}

fn add(store: &CsvStore, config: &Config, args: AddArgs) -> Result<()> {
    let date = match args.date.as_deref() {
        Some(raw) => Some(parse_date_arg(raw)?),
        None => Some(config.clinic.today()),
    };

    let staff = validated(args.staff, &DOCTORS, "staff")?;
    let room = validated(args.room, &ROOMS, "room")?;
    let appointment_type = validated(args.appointment_type, &APPT_TYPES, "appointment type")?;

    let record = VisitRecord {
        id: args.id,
        date,
        staff,
        room,
        visit_type: non_empty(args.visit_type),
        visit_category: non_empty(args.visit_category),
        appointment_type,
        appointment_note: non_empty(args.note),
        registration_start: parse_clock_arg("registration-start", &args.times.registration_start)?,
        registration_end: parse_clock_arg("registration-end", &args.times.registration_end)?,
        triage_start: parse_clock_arg("triage-start", &args.times.triage_start)?,
        triage_end: parse_clock_arg("triage-end", &args.times.triage_end)?,
        time_roomed: parse_clock_arg("time-roomed", &args.times.time_roomed)?,
        exam_end: parse_clock_arg("exam-end", &args.times.exam_end)?,
        doctor_in: parse_clock_arg("doctor-in", &args.times.doctor_in)?,
        doctor_out: parse_clock_arg("doctor-out", &args.times.doctor_out)?,
        lab_start: parse_clock_arg("lab-start", &args.times.lab_start)?,
        lab_end: parse_clock_arg("lab-end", &args.times.lab_end)?,
        sw_start: parse_clock_arg("sw-start", &args.times.sw_start)?,
        sw_end: parse_clock_arg("sw-end", &args.times.sw_end)?,
        time_out: parse_clock_arg("time-out", &args.times.time_out)?,
    };

    let snapshot = store.load().context("failed to read visit store")?;
    let mut records = snapshot.records;
    records.push(record);

    commit(store, &records, &snapshot.fingerprint)?;
    println!("Patient {} added successfully.", args.id);
    Ok(())
}

fn edit(store: &CsvStore, args: EditArgs) -> Result<()> {
    // parse and validate everything before touching any record
    let date = match args.date.as_deref() {
        None => None,
        Some("") => Some(None),
        Some(raw) => Some(Some(parse_date_arg(raw)?)),
    };
    let staff = edited_choice(args.staff, &DOCTORS, "staff")?;
    let room = edited_choice(args.room, &ROOMS, "room")?;
    let appointment_type = edited_choice(args.appointment_type, &APPT_TYPES, "appointment type")?;
    let visit_type = args.visit_type.map(non_empty_owned);
    let visit_category = args.visit_category.map(non_empty_owned);
    let note = args.note.map(non_empty_owned);

    let times = [
        ("registration-start", &args.times.registration_start),
        ("registration-end", &args.times.registration_end),
        ("triage-start", &args.times.triage_start),
        ("triage-end", &args.times.triage_end),
        ("time-roomed", &args.times.time_roomed),
        ("exam-end", &args.times.exam_end),
        ("doctor-in", &args.times.doctor_in),
        ("doctor-out", &args.times.doctor_out),
        ("lab-start", &args.times.lab_start),
        ("lab-end", &args.times.lab_end),
        ("sw-start", &args.times.sw_start),
        ("sw-end", &args.times.sw_end),
        ("time-out", &args.times.time_out),
    ];
    let mut parsed_times: Vec<Option<Option<NaiveTime>>> = Vec::with_capacity(times.len());
    for (name, value) in &times {
        parsed_times.push(edited_clock(name, value)?);
    }

    let snapshot = store.load().context("failed to read visit store")?;
    let mut records = snapshot.records;

    let mut matched = 0;
    for record in records.iter_mut().filter(|r| r.id == args.id) {
        matched += 1;
        if let Some(value) = &date {
            record.date = *value;
        }
        if let Some(value) = &staff {
            record.staff = value.clone();
        }
        if let Some(value) = &room {
            record.room = value.clone();
        }
        if let Some(value) = &appointment_type {
            record.appointment_type = value.clone();
        }
        if let Some(value) = &visit_type {
            record.visit_type = value.clone();
        }
        if let Some(value) = &visit_category {
            record.visit_category = value.clone();
        }
        if let Some(value) = &note {
            record.appointment_note = value.clone();
        }
        let fields = [
            &mut record.registration_start,
            &mut record.registration_end,
            &mut record.triage_start,
            &mut record.triage_end,
            &mut record.time_roomed,
            &mut record.exam_end,
            &mut record.doctor_in,
            &mut record.doctor_out,
            &mut record.lab_start,
            &mut record.lab_end,
            &mut record.sw_start,
            &mut record.sw_end,
            &mut record.time_out,
        ];
        for (field, parsed) in fields.into_iter().zip(&parsed_times) {
            if let Some(value) = parsed {
                *field = *value;
            }
        }
    }

    if matched == 0 {
        bail!("No matching patient ID {} found.", args.id);
    }

    commit(store, &records, &snapshot.fingerprint)?;
    println!("Updated {} record(s) with ID {}.", matched, args.id);
    Ok(())
}

fn list(store: &CsvStore, last: usize) -> Result<()> {
    let snapshot = store.load().context("failed to read visit store")?;

    if snapshot.records.is_empty() {
        println!("No data available yet.");
        return Ok(());
    }

    println!(
        "{:<12} {:>7} {:<24} {:<20} {:>7} {:>7}",
        "Date", "ID", "Staff", "Category", "Reg", "Out"
    );
    let start = snapshot.records.len().saturating_sub(last);
    for record in &snapshot.records[start..] {
        println!(
            "{:<12} {:>7} {:<24} {:<20} {:>7} {:>7}",
            record.date.map(timeparse::format_date).unwrap_or_default(),
            record.id,
            record.staff.as_deref().unwrap_or(""),
            record.visit_category.as_deref().unwrap_or(""),
            record
                .registration_start
                .map(timeparse::format_clock)
                .unwrap_or_default(),
            record.time_out.map(timeparse::format_clock).unwrap_or_default(),
        );
    }
    if !snapshot.warnings.is_empty() {
        println!("({} malformed row(s) skipped)", snapshot.warnings.len());
    }
    Ok(())
}

/// Write back, translating a fingerprint conflict into operator guidance.
fn commit(store: &CsvStore, records: &[VisitRecord], fingerprint: &str) -> Result<()> {
    match store.replace(records, fingerprint) {
        Ok(_) => Ok(()),
        Err(Error::StoreConflict { path }) => {
            bail!("Another operator updated {} while you were editing. Your change was not saved; please re-run it.", path)
        }
        Err(e) => Err(e).context("failed to write visit store"),
    }
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate> {
    timeparse::parse_date(raw)
        .ok_or_else(|| anyhow!("invalid date {:?}: expected MM/DD/YYYY", raw))
}

/// Parse an optional HH:MM argument; empty input means "not recorded".
fn parse_clock_arg(name: &str, value: &Option<String>) -> Result<Option<NaiveTime>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => timeparse::parse_clock(raw)
            .map(Some)
            .ok_or_else(|| anyhow!("invalid --{} {:?}: expected HH:MM", name, raw)),
    }
}

/// Edit semantics for a clock flag: absent = unchanged, empty = clear.
fn edited_clock(name: &str, value: &Option<String>) -> Result<Option<Option<NaiveTime>>> {
    match value.as_deref().map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(raw) => timeparse::parse_clock(raw)
            .map(|t| Some(Some(t)))
            .ok_or_else(|| anyhow!("invalid --{} {:?}: expected HH:MM", name, raw)),
    }
}

/// Validate an add-time choice against a roster.
fn validated(value: Option<String>, options: &[&str], what: &str) -> Result<Option<String>> {
    match non_empty(value) {
        None => Ok(None),
        Some(choice) => {
            if options.contains(&choice.as_str()) {
                Ok(Some(choice))
            } else {
                bail!("unknown {} {:?}; options are: {}", what, choice, options.join(", "))
            }
        }
    }
}

/// Edit semantics for a roster choice: absent = unchanged, empty = clear.
fn edited_choice(
    value: Option<String>,
    options: &[&str],
    what: &str,
) -> Result<Option<Option<String>>> {
    match value {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(Some(None)),
        Some(raw) => validated(Some(raw), options, what).map(Some),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|raw| {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn non_empty_owned(raw: String) -> Option<String> {
    non_empty(Some(raw))
}
