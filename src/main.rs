mod config;
mod llm;
mod quota;
mod rate_limit;
mod routes;
mod services;
mod state;
mod window;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::services::profile::SeededProfiles;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = config::AppConfig::from_env();
    let port = config.port;

    let llm = llm::ollama::OllamaClient::new(&config).expect("LLM client init failed");
    tracing::info!(backend = %config.llm_backend_url, model = llm.model(), "LLM backend configured");

    let state = state::AppState::new(config, Arc::new(llm), Arc::new(SeededProfiles::platform_demo()));

    // Spawn the background window eviction sweep.
    let _eviction = services::evict::spawn_eviction_task(state.clone());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "chacha listening");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server failed");
}
