use std::sync::Arc;

use roofwatt::inference::{OpenRouterConfig, OpenRouterGateway};
use roofwatt::web::{self, AppState};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    init_tracing();

    let config = OpenRouterConfig::default();
    if config.api_key.is_empty() {
        warn!("OPENROUTER_API_KEY is not set; analysis requests will fail until it is");
    }

    let gateway = OpenRouterGateway::with_config(config);
    let model = gateway.model().to_string();
    let port = web::server_port_from_env();

    info!(model = %model, port, "Starting roofwatt");

    let state = AppState::new(Arc::new(gateway), model);
    let router = web::create_router(state);

    web::run_server(router, port).await
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("roofwatt=info,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
