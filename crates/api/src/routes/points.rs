//! Collection point handlers.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
};
use serde::Deserialize;

use ecoleta_core::{ItemIdList, NewPoint, Point, PointDetail, PointId, PointSearch};

use crate::db::PointRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query string of `GET /points`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub cidade: Option<String>,
    pub estado: Option<String>,
    pub items: Option<String>,
}

impl SearchParams {
    /// Parse into a search, or `None` when a filter is missing.
    ///
    /// # Errors
    ///
    /// Returns `AppError::BadRequest` if `items` holds a non-numeric entry.
    pub fn into_search(self) -> Result<Option<PointSearch>> {
        let (Some(city), Some(state), Some(items)) = (self.cidade, self.estado, self.items) else {
            return Ok(None);
        };

        let items = ItemIdList::parse(&items)?;
        if items.is_empty() {
            return Ok(None);
        }

        Ok(Some(PointSearch { city, state, items }))
    }
}

/// Register a collection point and the items it accepts.
///
/// # Errors
///
/// Returns 400 for malformed or invalid payloads and unknown item ids,
/// 500 if the store fails (nothing is persisted in either case).
pub async fn create(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewPoint>, JsonRejection>,
) -> Result<Json<Point>> {
    let Json(new_point) = payload?;
    new_point.validate()?;

    let items = new_point.item_ids();
    let point = PointRepository::new(state.pool())
        .create(&new_point, &items, &state.config().default_point_image)
        .await?;

    tracing::info!(
        point_id = %point.id,
        city = %point.city,
        state = %point.state,
        items = items.len(),
        "Collection point registered"
    );

    Ok(Json(point))
}

/// Show a point and the titles of the items it accepts.
///
/// # Errors
///
/// Returns 400 for a non-numeric id, 404 if the point does not exist
/// (including integer ids no point can have).
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<String>, PathRejection>,
) -> Result<Json<PointDetail>> {
    let Path(raw) = id?;
    let id = parse_point_id(&raw)?;
    let repo = PointRepository::new(state.pool());

    let point = repo
        .get_by_id(id)
        .await?
        .ok_or_else(point_not_found)?;

    let items = repo.item_titles(id).await?;

    Ok(Json(PointDetail { point, items }))
}

fn point_not_found() -> AppError {
    AppError::NotFound("Point not found.".to_string())
}

/// Parse a path id. Integers outside the id range cannot name a stored
/// point, so they are not found rather than malformed.
fn parse_point_id(raw: &str) -> Result<PointId> {
    if let Ok(id) = raw.parse::<PointId>() {
        return Ok(id);
    }

    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(point_not_found());
    }

    Err(AppError::BadRequest(format!("invalid point id: {raw:?}")))
}

/// Points in a city/state that accept any of the requested items.
///
/// Missing filters yield an empty list rather than an error.
///
/// # Errors
///
/// Returns 400 if `items` is not a comma-separated list of integers.
pub async fn search(
    State(state): State<AppState>,
    params: std::result::Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<Vec<Point>>> {
    let Query(params) = params?;

    let Some(search) = params.into_search()? else {
        return Ok(Json(Vec::new()));
    };

    let points = PointRepository::new(state.pool()).search(&search).await?;
    tracing::debug!(
        city = %search.city,
        state = %search.state,
        items = %search.items,
        matches = points.len(),
        "Point search"
    );

    Ok(Json(points))
}
