//! Printer targets and the strategies that resolve them per scrape.
//!
//! An exporter instance runs in exactly one [`TargetMode`]: either every
//! scrape polls the printers listed in the configuration file, or each
//! scrape names its single printer through the `host` query parameter.

use crate::error::{ExporterError, Result};
use clap::ValueEnum;
use std::fmt;
use std::sync::Arc;

/// Address of one printer (`host` or `host:port`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target(String);

impl Target {
    /// Build a target from a raw address, trimming surrounding whitespace.
    ///
    /// Returns `None` for an empty address.
    pub fn parse(address: &str) -> Option<Self> {
        let address = address.trim();
        if address.is_empty() {
            None
        } else {
            Some(Self(address.to_string()))
        }
    }

    /// The address as used in URLs and in the `host` label.
    pub fn address(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Deployment mode selecting where scrape targets come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TargetMode {
    /// Scrape every printer from the configuration file
    #[default]
    Static,
    /// Scrape the single printer named by the `host` query parameter
    Query,
}

/// Resolves the targets of one scrape request.
#[derive(Debug, Clone)]
pub enum TargetSource {
    /// Fixed list loaded once at startup.
    Static(Arc<[Target]>),
    /// Target taken from the request.
    Query,
}

impl TargetSource {
    /// Static source over an already validated list.
    pub fn fixed(targets: Vec<Target>) -> Self {
        TargetSource::Static(targets.into())
    }

    pub fn mode(&self) -> TargetMode {
        match self {
            TargetSource::Static(_) => TargetMode::Static,
            TargetSource::Query => TargetMode::Query,
        }
    }

    /// Targets to scrape for a request carrying the given `host` parameter.
    ///
    /// The parameter is ignored in static mode. In query mode a missing or
    /// blank parameter yields [`ExporterError::MissingHost`].
    pub fn resolve(&self, host: Option<&str>) -> Result<Vec<Target>> {
        match self {
            TargetSource::Static(targets) => Ok(targets.to_vec()),
            TargetSource::Query => host
                .and_then(Target::parse)
                .map(|target| vec![target])
                .ok_or(ExporterError::MissingHost),
        }
    }
}
