//! Prometheus metrics definitions and publishing logic.
//!
//! Every scrape builds its own [`ScrapeRegistry`], publishes the fetch result
//! of each printer into it and encodes it once. Nothing is carried over from
//! one scrape to the next, so a printer that disappears or drops a field stops
//! being reported immediately.

use crate::client::Information;
use crate::error::{ExporterError, Result};
use crate::target::Target;
use prometheus::{Encoder, Gauge, Opts, Registry, TextEncoder};
use tracing::{debug, trace, warn};

/// Prefix shared by every exported metric.
pub const METRIC_PREFIX: &str = "brother";

/// Name of the per-printer fetch status gauge.
pub const SUCCESS_METRIC: &str = "brother_success";

/// Label carrying the printer address.
pub const HOST_LABEL: &str = "host";

/// Gauges published for one printer in one scrape.
#[derive(Clone)]
pub struct MetricSet {
    target: Target,
    success: Gauge,
    values: Vec<(String, Gauge)>,
}

impl MetricSet {
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// Whether the printer could be fetched (1.0) or not (0.0).
    pub fn success(&self) -> f64 {
        self.success.get()
    }

    /// Number of value gauges, not counting `brother_success`.
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// Value of the gauge with the given full metric name.
    pub fn value(&self, metric_name: &str) -> Option<f64> {
        self.values
            .iter()
            .find(|(name, _)| name == metric_name)
            .map(|(_, gauge)| gauge.get())
    }

    /// All value gauges as (metric name, value) pairs.
    pub fn values(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.values
            .iter()
            .map(|(name, gauge)| (name.as_str(), gauge.get()))
    }
}

/// Metric registry owned by a single scrape request.
pub struct ScrapeRegistry {
    registry: Registry,
}

impl Default for ScrapeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrapeRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Publish the fetch result of one printer.
    ///
    /// Fetch failures are recorded as `brother_success 0` and never returned.
    /// An error means a metric could not be registered, typically because the
    /// same printer was published twice into this registry.
    pub fn publish(&self, target: &Target, fetched: Result<Information>) -> Result<MetricSet> {
        let success = self.register_gauge(
            SUCCESS_METRIC,
            "Indicates if the last scrape was successful (1) or not (0).",
            target,
        )?;

        let information = match fetched {
            Ok(information) => information,
            Err(e) => {
                warn!("Error collecting data for {}: {}", target, e);
                success.set(0.0);
                return Ok(MetricSet {
                    target: target.clone(),
                    success,
                    values: Vec::new(),
                });
            }
        };

        success.set(1.0);

        let numeric: Vec<(&String, f64)> = information
            .iter()
            .filter_map(|(field, raw)| match raw.parse::<f64>() {
                Ok(value) => Some((field, value)),
                Err(_) => {
                    trace!("Skipping non-numeric field {} for {}", field, target);
                    None
                }
            })
            .collect();

        let mut values = Vec::with_capacity(numeric.len());
        for (field, value) in numeric {
            let name = format!("{}_{}", METRIC_PREFIX, field);
            if name == SUCCESS_METRIC {
                warn!(
                    "Skipping field {} for {}: clashes with {}",
                    field, target, SUCCESS_METRIC
                );
                continue;
            }
            let gauge = self.register_gauge(
                &name,
                &format!("Metric {} for Brother printer", field),
                target,
            )?;
            gauge.set(value);
            values.push((name, gauge));
        }

        debug!(
            "Published {} of {} fields for {}",
            values.len(),
            information.len(),
            target
        );

        Ok(MetricSet {
            target: target.clone(),
            success,
            values,
        })
    }

    fn register_gauge(&self, name: &str, help: &str, target: &Target) -> Result<Gauge> {
        let opts = Opts::new(name, help).const_label(HOST_LABEL, target.address());
        let gauge = Gauge::with_opts(opts)
            .map_err(|e| ExporterError::Metrics(format!("invalid metric {}: {}", name, e)))?;
        self.registry
            .register(Box::new(gauge.clone()))
            .map_err(|e| ExporterError::Metrics(format!("failed to register {}: {}", name, e)))?;
        Ok(gauge)
    }

    /// Encode the registry in Prometheus text format, consuming it.
    pub fn encode(self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();

        let mut buffer = Vec::with_capacity(4096);
        encoder.encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| ExporterError::Metrics(e.to_string()))
    }
}
