//! Configuration management for the Brother exporter.
//!
//! Supports loading configuration from:
//! - A YAML file (`printers.yml`) holding the `printers` list
//! - Environment variables (with `BROTHER_EXPORTER_` prefix)
//! - Command-line arguments (applied by the binary)

use crate::error::{ExporterError, Result};
use crate::target::{Target, TargetMode, TargetSource};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::warn;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Exporter specific settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExporterConfig {
    /// Address to listen on for metrics endpoint (`:9055` binds all interfaces)
    pub listen_address: String,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format (text or json)
    pub log_format: LogFormat,
    /// Request timeout in seconds for printer fetches
    pub timeout_seconds: u64,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Main configuration structure for the Brother exporter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Printer addresses scraped in static mode
    #[serde(default)]
    pub printers: Option<Vec<String>>,

    /// Exporter server configuration
    #[serde(default)]
    pub exporter: ExporterConfig,
}

pub const DEFAULT_CONFIG_PATH: &str = "/etc/printers.yml";

fn default_timeout() -> u64 {
    10
}

fn default_listen_address() -> String {
    ":9055".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load configuration from a YAML file and environment variables.
    ///
    /// The file is mandatory in [`TargetMode::Static`], where it carries the
    /// printer list, and optional in [`TargetMode::Query`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use brother_exporter::config::Settings;
    /// use brother_exporter::target::TargetMode;
    ///
    /// let settings = Settings::load("/etc/printers.yml", TargetMode::Static).unwrap();
    /// ```
    pub fn load(config_path: &str, mode: TargetMode) -> Result<Self> {
        let builder = config::Config::builder()
            .add_source(
                config::File::new(config_path, config::FileFormat::Yaml)
                    .required(mode == TargetMode::Static),
            )
            .add_source(
                config::Environment::with_prefix("BROTHER_EXPORTER")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("printers")
                    .try_parsing(true),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;

        settings.validate(mode)?;
        Ok(settings)
    }

    /// Validate configuration settings.
    fn validate(&self, mode: TargetMode) -> Result<()> {
        if self.exporter.listen_address.trim().is_empty() {
            return Err(config_error("listen address cannot be empty"));
        }

        if mode == TargetMode::Static {
            self.printer_targets()?;
        }

        Ok(())
    }

    /// The configured printers as targets, trimmed and deduplicated.
    pub fn printer_targets(&self) -> Result<Vec<Target>> {
        let printers = self
            .printers
            .as_ref()
            .ok_or_else(|| config_error("printers section not found in the configuration"))?;

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(printers.len());
        for target in printers.iter().filter_map(|p| Target::parse(p)) {
            if seen.insert(target.clone()) {
                targets.push(target);
            } else {
                warn!("Ignoring duplicate printer address {}", target);
            }
        }

        if targets.is_empty() {
            return Err(config_error("no printer addresses found in the configuration"));
        }

        Ok(targets)
    }

    /// Build the target resolution strategy for the given mode.
    pub fn target_source(&self, mode: TargetMode) -> Result<TargetSource> {
        match mode {
            TargetMode::Static => Ok(TargetSource::fixed(self.printer_targets()?)),
            TargetMode::Query => Ok(TargetSource::Query),
        }
    }
}

fn config_error(message: &str) -> ExporterError {
    ExporterError::Config(config::ConfigError::Message(message.to_string()))
}
