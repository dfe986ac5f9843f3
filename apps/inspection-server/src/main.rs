//! Inspection engine HTTP server

mod config;

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use config::{AppConfig, LoggingConfig};
use http::{header, HeaderValue, Method};
use inspection_engine::infra::FsPhotoStore;
use inspection_engine::InspectionEngineModule;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    set_header::SetResponseHeader,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Stored photos are content-addressed; clients may cache them for a day
const UPLOADS_CACHE_CONTROL: &str = "public, max-age=86400";

#[derive(Debug, Parser)]
#[command(name = "inspection-server", version, about = "Vehicle damage inspection server")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let app_config = AppConfig::load(cli.config.as_deref())?;

    if cli.print_config {
        println!("{}", serde_json::to_string_pretty(&app_config)?);
        return Ok(());
    }

    init_logging(&app_config.logging)?;

    let module_config = app_config.inspection()?;
    tracing::info!(
        bind = %app_config.server.bind,
        database = %redact(&app_config.database.url),
        uploads_dir = %app_config.server.uploads_dir.display(),
        "Starting inspection server"
    );

    tokio::fs::create_dir_all(&app_config.server.uploads_dir)
        .await
        .with_context(|| {
            format!(
                "creating uploads directory {}",
                app_config.server.uploads_dir.display()
            )
        })?;

    let db = sea_orm::Database::connect(&app_config.database.url)
        .await
        .context("connecting to database")?;

    let photo_store = Arc::new(FsPhotoStore::new(app_config.server.uploads_dir.clone()));
    let module = InspectionEngineModule::init(module_config, db, photo_store).await?;

    let router = build_router(&module, &app_config)?;

    let listener = tokio::net::TcpListener::bind(&app_config.server.bind)
        .await
        .with_context(|| format!("binding {}", app_config.server.bind))?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

fn build_router(module: &InspectionEngineModule, app_config: &AppConfig) -> Result<Router> {
    let uploads = SetResponseHeader::overriding(
        ServeDir::new(&app_config.server.uploads_dir),
        header::CACHE_CONTROL,
        HeaderValue::from_static(UPLOADS_CACHE_CONTROL),
    );

    let router = module
        .register_rest(Router::new())?
        .nest_service("/uploads", uploads)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http());
    Ok(router)
}

/// Browser clients are served from other origins
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .context("invalid log filter")?;

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()?;
    }
    Ok(())
}

/// Drop credentials from a connection URL before logging it
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
