//! Axum router: maps all URL paths to handlers.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{
    chat::chat_submit,
    medicaments::get_medicament,
    system::{generate_notice, ping},
    toxicity::check_toxicity,
};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/ping",              get(ping))
        .route("/chat",              post(chat_submit))
        .route("/chatbot",           post(chat_submit))
        .route("/medicaments/{name}", get(get_medicament))
        .route("/toxicite",          post(check_toxicity))
        .route("/notice",            post(generate_notice))

        // Static files (structure images)
        .nest_service("/static", static_files)

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
