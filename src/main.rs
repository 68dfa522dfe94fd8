use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use farmcredit::api::{ApiState, create_router};
use farmcredit::config::loader::AppConfig;
use farmcredit::gateway::paystack::PaystackGateway;
use farmcredit::interfaces::store::SettlementStore;
use farmcredit::observability::metrics::register_metrics;
use farmcredit::settlement::SettlementEngine;
use farmcredit::store::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let env = std::env::var("FARMCREDIT_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Falling back to default configuration: {}", e);
            AppConfig::default()
        }
    };

    register_metrics();

    let store: Arc<dyn SettlementStore> = Arc::new(MemoryStore::new());
    let gateway = Arc::new(PaystackGateway::new(config.gateway.clone())?);
    let engine = Arc::new(SettlementEngine::new(
        store.clone(),
        gateway,
        config.fees.clone(),
        config.loan.clone(),
    ));

    let state = Arc::new(ApiState {
        engine,
        store,
    });

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    tracing::info!("Settlement service listening on {}", config.server.bind);
    axum::serve(listener, create_router(state)).await?;

    Ok(())
}
