pub mod submit;

use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::SharedState;

/// Public form intake, open to any origin.
pub fn submit_routes() -> Router<SharedState> {
    Router::new()
        .route("/submit", post(submit::submit))
        .layer(CorsLayer::permissive())
}
