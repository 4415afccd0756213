//! iris-web - Iris species classification web form
//!
//! Loads the feature schema, species catalog, and trained model once, then
//! serves the measurement form until interrupted.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use iris_common::config::{load_config, ConfigSource, Overrides, Settings};
use iris_common::{FeatureSchema, ModelProvider, Predictor, SpeciesCatalog};
use iris_web::{build_router, AppState};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for iris-web
#[derive(Parser, Debug)]
#[command(name = "iris-web")]
#[command(about = "Iris species classification web form")]
#[command(version)]
struct Args {
    /// TOML config file (falls back to IRIS_CONFIG, then the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Trained model artifact (JSON)
    #[arg(long, env = "IRIS_MODEL_PATH")]
    model_path: Option<PathBuf>,

    /// Feature schema asset (JSON with a `columns` list)
    #[arg(long, env = "IRIS_SCHEMA_PATH")]
    schema_path: Option<PathBuf>,

    /// Species catalog (TOML); built-in iris catalog when omitted
    #[arg(long, env = "IRIS_CATALOG_PATH")]
    catalog_path: Option<PathBuf>,

    /// Host to bind
    #[arg(long, env = "IRIS_HOST")]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "IRIS_PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is unset
    #[arg(long, env = "IRIS_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            model_path: self.model_path.clone(),
            schema_path: self.schema_path.clone(),
            catalog_path: self.catalog_path.clone(),
            host: self.host.clone(),
            port: self.port,
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config must be resolved before tracing init to know the log level
    let (toml_config, config_source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;
    let settings = Settings::resolve(args.overrides(), toml_config);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("iris_web={0},iris_common={0},tower_http=info", settings.log_level)
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting iris-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_source {
        ConfigSource::Defaults => warn!("No config file found; using compiled defaults"),
        source => info!("Configuration: {}", source),
    }

    let predictor = load_predictor(&settings)?;
    let state = AppState::new(predictor);
    let app = build_router(state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("iris-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Load schema, catalog, and model; these stay read-only for the process lifetime
fn load_predictor(settings: &Settings) -> Result<Predictor> {
    let schema = FeatureSchema::load(&settings.schema_path).with_context(|| {
        format!(
            "Failed to load feature schema {}",
            settings.schema_path.display()
        )
    })?;
    info!("Feature schema: {} columns", schema.len());

    let catalog = match &settings.catalog_path {
        Some(path) => SpeciesCatalog::load(path)
            .with_context(|| format!("Failed to load species catalog {}", path.display()))?,
        None => {
            info!("Using built-in iris species catalog");
            SpeciesCatalog::iris()
        }
    };

    let model = ModelProvider::load(&settings.model_path).with_context(|| {
        format!("Failed to load model {}", settings.model_path.display())
    })?;

    if model.n_features() != schema.len() {
        warn!(
            "Model expects {} features but the schema has {} columns; predictions will fail",
            model.n_features(),
            schema.len()
        );
    }
    for index in catalog.missing(model.classes()) {
        warn!(
            "Model class {} has no species catalog entry; it will be shown as UNKNOWN",
            index
        );
    }

    Ok(Predictor::new(schema, model, catalog))
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
