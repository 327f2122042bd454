//! `atlas-server` - the HTTP server for the member map.

use std::process::ExitCode;
use std::sync::Arc;

use atlas_api::{build_router, AppContext};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine; environment variables win regardless.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("ATLAS_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(err) = run().await {
        tracing::error!(error = %err, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run() -> atlas_domain::Result<()> {
    let config = atlas_infra::config::load()?;
    let bind_addr = config.server.bind_addr.clone();

    let ctx = Arc::new(AppContext::new(config)?);
    let router = build_router(ctx);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| atlas_domain::AtlasError::Config(format!(
            "failed to bind {bind_addr}: {err}"
        )))?;

    tracing::info!(addr = %bind_addr, "atlas server listening");

    axum::serve(listener, router)
        .await
        .map_err(|err| atlas_domain::AtlasError::Internal(format!("server error: {err}")))
}
