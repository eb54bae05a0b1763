use axum::{
    http::StatusCode,
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use super::{actors, handlers, movies};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let timeout = Duration::from_secs(state.config().server.timeout_secs);

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Movies
        .route("/movies/search", post(movies::search))
        .route("/movies", post(movies::create_movie))
        .route("/movies/{id}", patch(movies::update_movie))
        .route("/movies/{id}", delete(movies::delete_movie))
        .route("/movies/{id}/actors", post(movies::link_actors))
        // Actors
        .route("/actors", get(actors::list_actors))
        .route("/actors", post(actors::create_actor))
        .route("/actors/{id}", patch(actors::update_actor))
        .route("/actors/{id}", delete(actors::delete_actor))
        .with_state(state);

    Router::new().nest("/api/v1", api_routes).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(request_timeout(timeout)),
    )
}

/// Requests running longer than `timeout` are answered with 408.
fn request_timeout(timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout)
}
