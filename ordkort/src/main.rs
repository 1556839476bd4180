//! Ordkort - daily word content service

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};

use ordkort::{
    config::Args, create_router, logging, AppState, DailyContentPipeline, MemoryStore, RestBackend,
    RestConfig, StoreProvider,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(&args.log_level, &args.log_format);

    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    let stores = match args.backend_url.clone() {
        Some(base_url) => StoreProvider::Rest(RestBackend::new(RestConfig {
            base_url,
            anon_key: args.backend_anon_key.clone(),
            bucket: args.storage_bucket.clone(),
            timeout: args.request_timeout(),
        })?),
        None => {
            warn!("BACKEND_URL not set, keeping records in memory (dev mode)");
            StoreProvider::Memory(Arc::new(MemoryStore::new(args.storage_bucket.clone())))
        }
    };

    let providers = args.providers()?;
    let pipeline = DailyContentPipeline::new(args.pipeline_config(), providers);

    info!("======================================");
    info!("  Ordkort - daily word content");
    info!("======================================");
    info!("Listen: {}", args.listen);
    info!("Store: {}", stores.mode());
    info!("Providers: {:?}", pipeline.providers().configured());
    info!("Force demo: {}", args.force_demo);
    if args.task_seed.is_some() {
        info!("Task seed: fixed");
    }
    info!("======================================");

    let app = create_router(AppState::new(pipeline, stores));
    let listener = tokio::net::TcpListener::bind(args.listen).await?;
    info!("Listening on {}", args.listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
