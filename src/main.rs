//! Device Ingest
//!
//! Receives object-store upload notifications and, for each uploaded capture:
//! - Parses the device / traffic type / attack from its key
//! - Loads the CSV and writes a zero-to-one quality artifact
//! - Starts the catalog crawler when the device is new
//! - Emails a summary, with a warning when any step failed

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use api::{router, AppState};
use catalog::{CatalogConfig, GlueCrawler};
use mailer::{MailerConfig, SesMailer};
use pipeline::{Pipeline, PipelineConfig};
use storage::{ObjectStore, S3Client, S3Config};
use telemetry::{health, init_tracing_from_env};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    pipeline: PipelineConfig,

    #[serde(default)]
    s3: S3Config,

    #[serde(default)]
    catalog: CatalogConfig,

    #[serde(default)]
    mailer: MailerConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            pipeline: PipelineConfig::default(),
            s3: S3Config::default(),
            catalog: CatalogConfig::default(),
            mailer: MailerConfig::default(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting Device Ingest v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        target = %config.pipeline.target_location,
        crawler = %config.pipeline.crawler_name,
        s3_endpoint = config.s3.endpoint_url.as_deref().unwrap_or("default"),
        "Loaded configuration"
    );

    let store = Arc::new(S3Client::new(config.s3.clone()).await);
    let crawler = Arc::new(GlueCrawler::new(config.catalog.clone()).await);
    let mailer = Arc::new(SesMailer::new(config.mailer.clone()).await);

    // Missing addresses or target abort here, before any event is accepted
    let pipeline = Pipeline::new(config.pipeline.clone(), store.clone(), crawler, mailer)
        .context("Invalid pipeline configuration")?;

    check_health(&config, store.as_ref()).await;

    let app = router(AppState::new(pipeline));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        .add_source(config::Config::try_from(&Config::default())?)
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("INGEST")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Deployment-level names used by the function environment
    if let Ok(target) = std::env::var("TARGET_BUCKET") {
        config.pipeline.target_location = target;
    }
    if let Ok(source) = std::env::var("EMAIL_SOURCE") {
        config.pipeline.email_source = source;
    }
    if let Ok(destination) = std::env::var("EMAIL_DESTINATION") {
        config.pipeline.email_destination = destination;
    }
    if let Ok(crawler) = std::env::var("CRAWLER_NAME") {
        config.pipeline.crawler_name = crawler;
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(config: &Config, store: &dyn ObjectStore) {
    let target = storage::TargetLocation::parse(&config.pipeline.target_location);
    let storage_healthy = match &target {
        Ok(target) => storage::health::check_connection(store, &target.bucket).await,
        Err(_) => false,
    };
    if storage_healthy {
        health().storage.set_healthy();
        info!("Target bucket: healthy");
    } else {
        health().storage.set_unhealthy("Target bucket unreachable");
        error!("Target bucket: unhealthy");
    }

    // SES and Glue have no cheap probe; a constructed client counts as up
    // until a call fails.
    health().mailer.set_healthy();
    health().catalog.set_healthy();
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
