//! API server entry point.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fieldscout_api::{build_router, AppState};
use fieldscout_common::Config;
use fieldscout_discovery::DiscoveryEngine;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("fieldscout_api=info".parse()?)
                .add_directive("fieldscout_discovery=info".parse()?)
                .add_directive("fieldscout_common=info".parse()?)
                .add_directive("webfetch=info".parse()?),
        )
        .init();

    let config = Config::from_env();
    config.log_redacted();

    let engine = DiscoveryEngine::new(&config);
    let state = Arc::new(AppState { engine });
    let app = build_router(state);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("Fieldscout API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
