mod coinbase;
mod config;
mod routes;
mod services;
mod state;

use std::sync::Arc;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env().expect("invalid configuration");
    let prices = coinbase::CoinbaseClient::new(&config.coinbase).expect("coinbase client init failed");
    tracing::info!(
        base_uri = %config.coinbase.base_uri,
        api_version = prices.api_version(),
        "coinbase client initialized"
    );

    let state = state::AppState::new(Arc::new(prices), config.lobby_pair.clone(), config.site_dir.clone());

    let app = routes::app(state);
    let port = config.port;
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, site_dir = %config.site_dir.display(), "coinboard listening");
    axum::serve(listener, app).await.expect("server failed");
}
