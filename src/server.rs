//! HTTP server for exposing Prometheus metrics.
//!
//! This module provides an Axum-based HTTP server that serves the `/metrics`
//! endpoint for Prometheus scraping and a `/health` endpoint for health checks.
//! Each `/metrics` request fetches its printers and publishes them into a
//! registry that lives only for that request.

use crate::client::PrinterClient;
use crate::error::{ExporterError, Result};
use crate::metrics::ScrapeRegistry;
use crate::target::{Target, TargetMode, TargetSource};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared application state.
///
/// Read-only after startup; every scrape works on its own registry.
pub struct AppState {
    client: PrinterClient,
    targets: TargetSource,
}

impl AppState {
    pub fn new(client: PrinterClient, targets: TargetSource) -> Self {
        Self { client, targets }
    }

    /// Fetch every target in order and render the resulting metrics.
    ///
    /// Printer failures end up as `brother_success 0`; only registry errors
    /// fail the scrape as a whole.
    pub async fn scrape(&self, targets: &[Target]) -> Result<String> {
        let registry = ScrapeRegistry::new();

        for target in targets {
            let fetched = self.client.fetch_information(target).await;
            let published = registry.publish(target, fetched)?;
            debug!(
                "Printer {} success={} values={}",
                published.target(),
                published.success(),
                published.value_count()
            );
        }

        registry.encode()
    }
}

/// Query parameters accepted by `/metrics`.
#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    /// Printer to scrape in query mode
    pub host: Option<String>,
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .route("/", get(root_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Turn a Go-style `:port` listen address into a bindable socket address.
pub fn bind_address(listen_address: &str) -> String {
    if listen_address.starts_with(':') {
        format!("0.0.0.0{}", listen_address)
    } else {
        listen_address.to_string()
    }
}

/// Start the HTTP server.
///
/// # Arguments
///
/// * `listen_address` - Address to bind to (e.g., ":9055" or "127.0.0.1:9055")
/// * `state` - Printer client and target source shared by all requests
///
/// # Examples
///
/// ```no_run
/// use brother_exporter::client::PrinterClient;
/// use brother_exporter::server::{start_server, AppState};
/// use brother_exporter::target::TargetSource;
///
/// #[tokio::main]
/// async fn main() {
///     let client = PrinterClient::new(10).unwrap();
///     let state = AppState::new(client, TargetSource::Query);
///     start_server(":9055", state).await.unwrap();
/// }
/// ```
pub async fn start_server(listen_address: &str, state: AppState) -> Result<()> {
    let app = create_router(state);
    let address = bind_address(listen_address);

    info!("Starting HTTP server on {}", address);

    let listener = TcpListener::bind(address.as_str()).await?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ExporterError::Server(e.to_string()))?;

    Ok(())
}

/// Handler for /metrics endpoint.
///
/// The query string is only read in query mode; static mode ignores it.
async fn metrics_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let host = match state.targets.mode() {
        TargetMode::Static => None,
        TargetMode::Query => match Query::<ScrapeParams>::try_from_uri(&uri) {
            Ok(Query(params)) => params.host,
            Err(e) => {
                warn!("Rejected metrics scrape request: {}", e);
                return (StatusCode::BAD_REQUEST, e.body_text()).into_response();
            }
        },
    };

    let targets = match state.targets.resolve(host.as_deref()) {
        Ok(targets) => targets,
        Err(e) => {
            warn!("Rejected metrics scrape request: {}", e);
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    info!("Received metrics scrape request for {} printer(s)", targets.len());

    match state.scrape(&targets).await {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)],
            body,
        )
            .into_response(),
        Err(e) => {
            error!("Failed to publish metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to publish metrics: {}", e),
            )
                .into_response()
        }
    }
}

/// Handler for /health endpoint.
async fn health_handler() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// Handler for root endpoint.
async fn root_handler(State(state): State<Arc<AppState>>) -> Response {
    let metrics_link = match state.targets.mode() {
        TargetMode::Static => "/metrics",
        TargetMode::Query => "/metrics?host=192.168.1.10",
    };

    let html = format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <title>Brother Exporter</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        h1 {{ color: #333; }}
        a {{ color: #0066cc; text-decoration: none; }}
        a:hover {{ text-decoration: underline; }}
        .info {{ background: #f0f0f0; padding: 15px; border-radius: 5px; margin: 20px 0; }}
    </style>
</head>
<body>
    <h1>Brother Exporter</h1>
    <div class="info">
        <p>Prometheus metrics exporter for Brother network printers</p>
        <p><strong>Endpoints:</strong></p>
        <ul>
            <li><a href="{metrics_link}">{metrics_link}</a> - Prometheus metrics</li>
            <li><a href="/health">/health</a> - Health check</li>
        </ul>
    </div>
</body>
</html>
"#
    );

    (StatusCode::OK, Html(html)).into_response()
}
