use axum::{Json, body::Bytes, extract::State};
use tracing::info;

use wall_types::api::CreateEntryRequest;
use wall_types::models::Entry;

use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/entry: validate, truncate and store one guestbook entry.
///
/// The body is parsed as JSON whatever its Content-Type says.
pub async fn create_entry(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Entry>, ApiError> {
    let req: CreateEntryRequest = serde_json::from_slice(&body)?;
    let entry = req.validate()?;

    // Run blocking DB insert off the async runtime
    let created = tokio::task::spawn_blocking(move || state.db.create_entry(&entry)).await??;

    info!("Guestbook entry #{} created", created.id);
    Ok(Json(created))
}
