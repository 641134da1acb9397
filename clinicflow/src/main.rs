//! clinicflow - Clinic Operational Metrics Dashboard CLI
//!
//! Renders summary statistics over the visit record store: overall and
//! per-clinician durations, bottleneck analysis, flow coverage, case mix,
//! and the period-over-period visit mix change.

use anyhow::{Context, Result};
use clap::Parser;
use clinicflow_core::format::{format_coverage, format_delta, format_long_date, format_minutes};
use clinicflow_core::metrics::{
    daily_snapshot, generate_report, Bottleneck, ClinicianSort, DashboardReport, DaySnapshot,
    Granularity, ReportOptions,
};
use clinicflow_core::{Config, CsvStore};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clinicflow")]
#[command(about = "Clinic Operational Metrics Dashboard")]
#[command(version)]
struct Args {
    /// Path to the visit CSV store (overrides config)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Trend bucketing period: week or month
    #[arg(long)]
    granularity: Option<String>,

    /// Clinician table sort key: count or doctor-time
    #[arg(long)]
    sort: Option<String>,

    /// Row cap for the top-categories table
    #[arg(long)]
    top: Option<usize>,

    /// Export format (json)
    #[arg(long)]
    export: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = clinicflow_core::logging::init(&config.logging).ok();

    let mut options = config.report.options();
    if let Some(granularity) = args.granularity.as_deref() {
        options.granularity = match granularity {
            "week" => Granularity::Week,
            "month" => Granularity::Month,
            other => anyhow::bail!("Unknown granularity: {}. Use 'week' or 'month'", other),
        };
    }
    if let Some(sort) = args.sort.as_deref() {
        options.clinician_sort = match sort {
            "count" => ClinicianSort::VisitCount,
            "doctor-time" => ClinicianSort::DoctorTime,
            other => anyhow::bail!("Unknown sort key: {}. Use 'count' or 'doctor-time'", other),
        };
    }
    if let Some(top) = args.top {
        options.top_categories = top;
    }

    let store_path = args.data.unwrap_or_else(|| config.store.resolved_path());
    let store = CsvStore::new(&store_path);
    let snapshot = store
        .load()
        .with_context(|| format!("failed to read visit store {}", store_path.display()))?;

    for warning in &snapshot.warnings {
        tracing::warn!(%warning, "skipped row in visit store");
    }

    let report = generate_report(&snapshot.records, &options);
    let today = daily_snapshot(&snapshot.records, config.clinic.today());

    match args.export.as_deref() {
        Some("json") => print_json(&report)?,
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'json'", other),
        None => print_terminal(&report, &today, &options, snapshot.warnings.len()),
    }

    Ok(())
}

fn print_json(report: &DashboardReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

fn print_terminal(
    report: &DashboardReport,
    today: &DaySnapshot,
    options: &ReportOptions,
    skipped_rows: usize,
) {
    println!();
    println!("Clinic Operational Metrics Dashboard");
    println!("{}", "=".repeat(60));

    if let Some(range) = &report.date_range {
        println!(
            "Data covers visits from {} to {}.",
            format_long_date(range.first),
            format_long_date(range.last)
        );
    }
    print!("{} visit(s) on record.", report.record_count);
    if skipped_rows > 0 {
        print!(" {} malformed row(s) skipped.", skipped_rows);
    }
    println!();

    if report.record_count == 0 {
        println!();
        println!("No data available for metrics.");
        println!();
        return;
    }

    println!();
    println!("Overall Visit Metrics");
    println!(
        "  Avg Total Visit Duration (min): {}",
        format_minutes(report.overall.total_visit)
    );
    println!(
        "  Avg Doctor Time (min):          {}",
        format_minutes(report.overall.doctor)
    );

    println!();
    println!("Doctor-level Metrics");
    if report.clinicians.is_empty() {
        println!("  No visits with an assigned clinician.");
    } else {
        println!("  {:<28} {:>8} {:>20}", "Staff", "Patients", "Avg Doctor Time");
        for row in &report.clinicians {
            println!(
                "  {:<28} {:>8} {:>20}",
                row.name,
                row.visit_count,
                format_minutes(row.mean_doctor_minutes)
            );
        }
    }

    println!();
    println!("Bottleneck Analysis");
    match &report.bottleneck {
        Bottleneck::Stage {
            stage,
            mean_minutes,
        } => println!(
            "  Biggest Bottleneck: {} ({} min average)",
            stage.label(),
            format_minutes(Some(*mean_minutes))
        ),
        Bottleneck::NoData => println!("  No stage has enough data."),
    }

    println!();
    println!("Flow Metrics");
    println!(
        "  Triage Path Coverage: {}",
        format_coverage(report.flow.triage_coverage)
    );
    println!(
        "  Avg Time from Arrival to Room (min): {}",
        format_minutes(report.flow.mean_arrival_to_room)
    );

    println!();
    println!("Visit Mix");
    for row in &report.visit_mix {
        println!("  {:<24} {:>5.1}%", row.visit_type, row.share_pct);
    }

    println!();
    println!("Visit Duration by Category (min)");
    for row in &report.duration_by_category {
        println!(
            "  {:<24} {:>8}",
            row.category,
            format_minutes(row.mean_total_minutes)
        );
    }

    println!();
    println!("Top {} Visit Categories", options.top_categories);
    for row in &report.top_categories {
        println!("  {:<24} {:>5}", row.category, row.count);
    }
    if let Some(appointment) = &report.most_common_appointment {
        println!("  Most Common Appointment: {}", appointment);
    }

    println!();
    match options.granularity {
        Granularity::Week => println!("Weekly Visit Mix Change"),
        Granularity::Month => println!("Monthly Visit Mix Change"),
    }
    match &report.trend {
        Some(trend) => {
            println!(
                "  {:<24} {:>14} {:>14} {:>10}",
                "Category",
                trend.previous_label(),
                trend.current_label(),
                "% Change"
            );
            for row in &trend.rows {
                println!(
                    "  {:<24} {:>14} {:>14} {:>10}",
                    row.category,
                    row.previous,
                    row.current,
                    format_delta(row.delta)
                );
            }
        }
        None => println!("  Not enough data to compare trends."),
    }

    println!();
    println!("Today ({})", format_long_date(today.date));
    println!("  Patients Seen Today: {}", today.visit_count);
    for (staff, count) in &today.per_staff {
        println!("  {:<28} {:>5}", staff, count);
    }
    println!();
}
