use std::net::SocketAddr;
use std::sync::Arc;
use tradelens::datasource::HyperliquidDataSource;
use tradelens::{api, config::Config, AccountDataSource, TradeHistoryService};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let datasource: Arc<dyn AccountDataSource> = Arc::new(HyperliquidDataSource::new(
        config.hyperliquid_api_url.clone(),
        config.event_source,
    ));
    let service = Arc::new(TradeHistoryService::new(datasource, config.lookback_ms));

    let app = api::create_router(api::AppState { service });

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
