use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use file_selector::api;
use file_selector::config::Config;
use file_selector::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "LLM provider: {} ({}, model {})",
        config.llm.provider,
        config.llm.base_url,
        config.llm.chat_model
    );
    tracing::info!(
        "Rate limit: {} requests per {}s per client; max upload {} bytes; max candidates {}",
        config.rate_limit.max_requests,
        config.rate_limit.window_secs,
        config.max_upload_bytes,
        config.max_candidates
    );
    if config.llm.provider == "openai" && config.llm.api_key.is_none() {
        tracing::warn!("LLM_API_KEY is not set; completion calls will be rejected upstream");
    }

    let state = AppState::new(config.clone())?;
    state.spawn_limiter_sweep();

    let app = api::router(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {bind_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
