//! MediCheck API server
//!
//! Run with: cargo run -p medicheck-web

use tracing::info;
use tracing_subscriber::EnvFilter;

use medicheck_web::config::Config;
use medicheck_web::router::build_router;
use medicheck_web::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("medicheck=debug,info")),
        )
        .init();

    info!("Starting MediCheck API server...");

    let config = Config::load()?;
    let state = AppState::from_config(&config)?;
    info!(
        drugs = state.reference.len(),
        toxicity_loaded = state.toxicity.is_some(),
        "Reference data loaded"
    );

    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
