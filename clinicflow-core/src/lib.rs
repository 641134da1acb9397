//! # clinicflow-core
//!
//! Core library for clinicflow - clinic visit tracking and operational
//! metrics.
//!
//! This library provides:
//! - Typed domain model for patient visit records
//! - A CSV-backed record store with optimistic-concurrency writes
//! - The visit-metrics engine (durations, aggregates, bottleneck ranking,
//!   flow coverage, case mix, period trend comparison)
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Store:** One shared CSV file, read in bulk into typed records
//! - **Snapshot:** An immutable read (records + content fingerprint)
//! - **Report:** Derived metrics computed by pure functions per request
//!
//! The engine never mutates the store; editors write back through
//! [`store::CsvStore::replace`], which refuses to clobber a file that
//! changed since it was read.
//!
//! ## Example
//!
//! ```rust,no_run
//! use clinicflow_core::metrics::generate_report;
//! use clinicflow_core::{Config, CsvStore};
//!
//! # fn main() -> clinicflow_core::Result<()> {
//! let config = Config::load()?;
//! let store = CsvStore::new(config.store.resolved_path());
//! let snapshot = store.load()?;
//! let report = generate_report(&snapshot.records, &config.report.options());
//! println!("{} visits on record", report.record_count);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use store::{CsvStore, Snapshot};
pub use types::VisitRecord;

// Public modules
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod metrics;
pub mod store;
pub mod timeparse;
pub mod types;
