//! Movie API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cinema_core::{FieldChanges, FragmentType, Movie, MovieChanges, NewMovie, SortKey};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

/// Body of the search/list request.
///
/// `sort = true` lists the whole catalog ordered by `sortType`; otherwise
/// `fragments` is matched against the field named by `fragmentType`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    #[serde(default)]
    pub sort: bool,
    #[serde(default)]
    pub sort_type: String,
    #[serde(default)]
    pub fragment_type: String,
    #[serde(default)]
    pub fragments: String,
}

#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LinkActorsRequest {
    pub actor_ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/movies/search
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(params): Json<SearchParams>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    info!(?params, "Movie search");
    let catalog = state.catalog();

    let movies = if params.sort {
        catalog.movies_sorted(SortKey::from(params.sort_type.as_str()))?
    } else {
        let fragment_type: FragmentType = params.fragment_type.parse()?;
        catalog.movies_by_fragment(fragment_type, &params.fragments)?
    };

    Ok(Json(movies))
}

/// POST /api/v1/movies
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Json(movie): Json<NewMovie>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let id = state.catalog().create_movie(&movie)?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// PATCH /api/v1/movies/{id}
///
/// Body is an object of field changes, e.g. `{"rating": 9}`.
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(fields): Json<FieldChanges>,
) -> Result<Json<IdResponse>, ApiError> {
    let changes = MovieChanges::from_fields(&fields)?;
    let id = state.catalog().update_movie(id, &changes)?;
    Ok(Json(IdResponse { id }))
}

/// DELETE /api/v1/movies/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalog().delete_movie(id)?;
    Ok(Json(SuccessResponse {
        message: format!("Removed movie {}", id),
    }))
}

/// POST /api/v1/movies/{id}/actors
pub async fn link_actors(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(request): Json<LinkActorsRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalog().create_rule(id, &request.actor_ids)?;
    Ok(Json(SuccessResponse {
        message: format!("Linked {} actor(s) to movie {}", request.actor_ids.len(), id),
    }))
}
