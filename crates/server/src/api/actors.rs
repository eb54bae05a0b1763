//! Actor API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use cinema_core::{Actor, ActorChanges, FieldChanges, NewActor};

use super::error::ApiError;
use super::movies::{IdResponse, SuccessResponse};
use crate::state::AppState;

/// GET /api/v1/actors
///
/// Only actors linked to at least one movie are listed.
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Actor>>, ApiError> {
    Ok(Json(state.catalog().actors()?))
}

/// POST /api/v1/actors
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    Json(actor): Json<NewActor>,
) -> Result<(StatusCode, Json<IdResponse>), ApiError> {
    let id = state.catalog().create_actor(&actor)?;
    Ok((StatusCode::CREATED, Json(IdResponse { id })))
}

/// PATCH /api/v1/actors/{id}
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(fields): Json<FieldChanges>,
) -> Result<Json<IdResponse>, ApiError> {
    let changes = ActorChanges::from_fields(&fields)?;
    let id = state.catalog().update_actor(id, &changes)?;
    Ok(Json(IdResponse { id }))
}

/// DELETE /api/v1/actors/{id}
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ApiError> {
    state.catalog().delete_actor(id)?;
    Ok(Json(SuccessResponse {
        message: format!("Removed actor {}", id),
    }))
}
