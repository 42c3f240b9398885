//! Item catalog handler.

use axum::{Json, extract::State};

use ecoleta_core::Item;

use crate::db::ItemRepository;
use crate::error::Result;
use crate::state::AppState;

/// List every item category with its image URL.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Item>>> {
    let rows = ItemRepository::new(state.pool()).list().await?;
    let config = state.config();

    let items = rows
        .into_iter()
        .map(|row| row.into_item(|image| config.item_image_url(image)))
        .collect();

    Ok(Json(items))
}
