//! courseinfo HTTP/JSON gateway binary.

use clap::Parser;
use courseinfo_core::Registry;
use courseinfo_gateway::{create_router, ApiKeyAuthenticator, AppState, Args, GatewayConfig};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "courseinfo_gateway={0},courseinfo_core={0},tower_http=info",
                    args.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from(&args);
    config.validate().map_err(anyhow::Error::msg)?;

    info!(
        listen = %config.listen_addr,
        data_dir = %config.data_dir.display(),
        temporary = config.temporary,
        "Starting courseinfo gateway"
    );

    let authenticator = match config.api_keys.as_deref() {
        Some(spec) => ApiKeyAuthenticator::parse(spec)?,
        None => ApiKeyAuthenticator::new(),
    };
    if authenticator.key_count() == 0 {
        warn!("no API keys configured; every request will be rejected");
    }

    let registry = Registry::open(config.storage_config())?.with_limits(config.page_limits);
    if registry.engine().was_recovered() {
        info!("Opened existing record store");
    }

    let state = AppState::new(registry, authenticator, config.clone());
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    info!("Gateway listening on {}", config.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.registry.flush()?;
    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
