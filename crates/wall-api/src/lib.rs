pub mod entries;
pub mod error;
pub mod fingerprint;
pub mod render;
pub mod state;
pub mod wall;

use axum::{
    Router,
    routing::{get, post},
};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

/// Application routes. Static assets and tracing are layered on by the
/// server binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(wall::wall_page))
        .route("/api/wall", get(wall::wall_json))
        .route("/api/entry", post(entries::create_entry))
        .route("/health", get(health))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
