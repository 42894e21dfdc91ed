use anyhow::Result;
use brother_exporter::{
    client::PrinterClient,
    config::{LogFormat, Settings, DEFAULT_CONFIG_PATH},
    server::{start_server, AppState},
    target::TargetMode,
};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Brother Exporter - Prometheus metrics exporter for Brother network printers
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Host and port to listen on (overrides the configuration file)
    #[arg(short, long, env = "BROTHER_EXPORTER_LISTEN", value_name = "ADDR")]
    listen: Option<String>,

    /// Path to the printers.yml configuration file
    #[arg(
        short,
        long,
        env = "BROTHER_EXPORTER_CONFIG",
        value_name = "FILE",
        default_value = DEFAULT_CONFIG_PATH
    )]
    config: String,

    /// Where scrape targets come from
    #[arg(
        short,
        long,
        env = "BROTHER_EXPORTER_MODE",
        value_enum,
        default_value_t = TargetMode::Static
    )]
    mode: TargetMode,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    // Load configuration
    let mut settings = Settings::load(&args.config, args.mode)?;
    if let Some(listen) = args.listen {
        settings.exporter.listen_address = listen;
    }

    // Initialize logging
    init_logging(&settings.exporter.log_level, settings.exporter.log_format)?;

    let targets = settings.target_source(args.mode)?;

    info!("Starting Brother Exporter");
    info!("Target mode: {:?}", args.mode);
    info!(
        "Listen address: {} (config file {})",
        settings.exporter.listen_address, args.config
    );

    // Create printer client
    let client = PrinterClient::new(settings.exporter.timeout_seconds)?;
    info!("Printer client initialized");

    // Start HTTP server
    let state = AppState::new(client, targets);
    if let Err(e) = start_server(&settings.exporter.listen_address, state).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Initialize structured logging with tracing.
fn init_logging(log_level: &str, log_format: LogFormat) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match log_format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
    }

    Ok(())
}
