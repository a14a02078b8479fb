//! ChatLomhat Web Server
//!
//! Run with: cargo run -p chatlomhat-web

use chatlomhat_common::AppConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("chatlomhat_web=info,chatlomhat_client=info,chatlomhat_common=info,tower_http=info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting ChatLomhat Web Server...");

    let config = AppConfig::load()?;
    let addr = config.server.socket_addr()?;

    // Create app state
    let state = chatlomhat_web::state::AppState::new(config)?;

    // Build router
    let app = chatlomhat_web::router::build_router(state);

    info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
