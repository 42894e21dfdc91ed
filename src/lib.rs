//! # Brother Exporter
//!
//! A Prometheus metrics exporter for Brother network printers.
//!
//! ## Overview
//!
//! Brother printers publish their maintenance counters (page counts, toner
//! and drum levels, error counters) as a small CSV document at
//! `/etc/mnt_info.csv`. On every scrape this crate:
//!
//! - fetches that document from each printer
//! - normalizes the header names into metric-safe field names
//! - exposes every numeric value as a `brother_<field>{host="..."}` gauge
//! - reports `brother_success{host="..."}` as 1 or 0 per printer
//!
//! ## Quick Start
//!
//! ```no_run
//! use brother_exporter::{client::PrinterClient, config::Settings, server::{start_server, AppState}};
//! use brother_exporter::target::TargetMode;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let settings = Settings::load("/etc/printers.yml", TargetMode::Static)?;
//!
//!     // Create printer client
//!     let client = PrinterClient::new(settings.exporter.timeout_seconds)?;
//!     let state = AppState::new(client, settings.target_source(TargetMode::Static)?);
//!
//!     // Start HTTP server
//!     start_server(&settings.exporter.listen_address, state).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Target modes
//!
//! - `static`: every scrape polls the `printers` list from the configuration file
//! - `query`: every scrape polls the printer named by `/metrics?host=...`
//!
//! ## Modules
//!
//! - [`client`] - Printer client and status document parsing
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling
//! - [`metrics`] - Per-scrape registry and gauge publishing
//! - [`server`] - HTTP server for exposing metrics
//! - [`target`] - Printer targets and target resolution

pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod target;

pub use error::{ExporterError, Result};
