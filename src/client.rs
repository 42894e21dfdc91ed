//! Printer client for reading the Brother maintenance status document.
//!
//! Brother network printers publish their counters as a two-row CSV file at
//! `/etc/mnt_info.csv`: a header row naming each field and a single data row
//! with the current values. This module fetches that document and turns it
//! into a map from normalized field name to raw value.

use crate::error::{ExporterError, Result};
use crate::target::Target;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Path of the maintenance information document on the printer.
pub const STATUS_DOCUMENT_PATH: &str = "/etc/mnt_info.csv";

/// Normalized field name to raw string value.
pub type Information = BTreeMap<String, String>;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9A-Za-z_]+").unwrap());

/// Turn a CSV header into a metric-safe field name.
///
/// The name is lower-cased and the first `%` becomes the word `percent`.
/// Every run of characters outside `[0-9A-Za-z_]` then collapses to one `_`,
/// and underscores left dangling at either end are dropped.
///
/// ```
/// use brother_exporter::client::normalize_field_name;
///
/// assert_eq!(normalize_field_name("Toner (%)"), "toner_percent");
/// assert_eq!(normalize_field_name("A--B  C"), "a_b_c");
/// ```
pub fn normalize_field_name(header: &str) -> String {
    let name = header.to_lowercase().replacen('%', " percent ", 1);
    NON_WORD
        .replace_all(&name, "_")
        .trim_matches('_')
        .to_string()
}

/// Parse the status document into normalized field/value pairs.
///
/// The first record is the header row and the second the data row. Further
/// records are ignored but must still be well formed: every record has the
/// same width and quoted fields are terminated. Columns whose header
/// normalizes to an empty name are dropped.
pub fn parse_status_document(body: &str) -> Result<Information> {
    if body.matches('"').count() % 2 != 0 {
        return Err(ExporterError::MalformedDocument(
            "unterminated quoted field".to_string(),
        ));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(body.as_bytes());

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let (header, data) = match records.as_slice() {
        [] => {
            return Err(ExporterError::MalformedDocument(
                "document is empty".to_string(),
            ))
        }
        [_] => {
            return Err(ExporterError::MalformedDocument(
                "document has no data row".to_string(),
            ))
        }
        [header, data, ..] => (header, data),
    };

    if header.len() != data.len() {
        return Err(ExporterError::MalformedDocument(format!(
            "header has {} fields but data row has {}",
            header.len(),
            data.len()
        )));
    }

    Ok(header
        .iter()
        .zip(data.iter())
        .map(|(name, value)| (normalize_field_name(name), value.to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect())
}

/// HTTP client for Brother printers.
#[derive(Clone)]
pub struct PrinterClient {
    client: Client,
}

impl PrinterClient {
    /// Create a new printer client.
    ///
    /// # Arguments
    ///
    /// * `timeout_seconds` - Upper bound on one fetch round trip
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use brother_exporter::client::PrinterClient;
    ///
    /// let client = PrinterClient::new(10).unwrap();
    /// ```
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self { client })
    }

    /// Fetch and parse the status document of one printer.
    pub async fn fetch_information(&self, target: &Target) -> Result<Information> {
        let url = format!("http://{}{}", target.address(), STATUS_DOCUMENT_PATH);
        debug!("Fetching printer status from: {}", url);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            debug!("Failed to get status document from {}: {}", target, response.status());
            return Err(ExporterError::UnexpectedStatus {
                status: response.status(),
                url,
            });
        }

        let body = response.text().await?;
        debug!("Status document from {}: {} bytes", target, body.len());

        parse_status_document(&body)
    }
}
