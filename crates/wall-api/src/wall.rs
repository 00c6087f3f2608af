use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State},
    response::Html,
};

use wall_types::api::WallPage;
use wall_types::models::Entry;

use crate::error::ApiError;
use crate::fingerprint::fingerprint;
use crate::render;
use crate::state::AppState;

/// Most tiles the mosaic shows.
pub const MAX_TILES: usize = 8;

/// GET /: the wall itself.
pub async fn wall_page(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Html<String>, ApiError> {
    let page = load_wall(state, &addr.to_string()).await?;
    Ok(Html(render::wall_page(&page)))
}

/// GET /api/wall: the same data the page is rendered from.
pub async fn wall_json(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> Result<Json<WallPage>, ApiError> {
    Ok(Json(load_wall(state, &addr.to_string()).await?))
}

/// Registers the caller as a visitor (if new) and gathers the wall state.
pub async fn load_wall(state: AppState, remote_addr: &str) -> Result<WallPage, ApiError> {
    let fingerprint = fingerprint(remote_addr);

    let page = tokio::task::spawn_blocking(move || {
        let visitor = state.db.get_or_create_visitor(&fingerprint)?;
        let total_visitors = state.db.count_visitors()?;
        let entries = state.db.list_entries()?;
        let tile_colors = tile_colors(&entries);

        Ok::<_, ApiError>(WallPage {
            visitor_number: visitor.id,
            visitor_color: visitor.assigned_color,
            total_visitors,
            entries,
            tile_colors,
        })
    })
    .await??;

    Ok(page)
}

/// First `MAX_TILES` distinct colors, in the order they appear in `entries`.
pub fn tile_colors(entries: &[Entry]) -> Vec<String> {
    let mut colors: Vec<String> = Vec::with_capacity(MAX_TILES);
    for entry in entries {
        if colors.len() >= MAX_TILES {
            break;
        }
        if !colors.contains(&entry.color) {
            colors.push(entry.color.clone());
        }
    }
    colors
}
