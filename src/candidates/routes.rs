// src/candidates/routes.rs

use crate::candidates::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn candidates_routes() -> Router {
    Router::new()
        .route("/api/candidates", get(handlers::list_candidates))
        .route(
            "/api/candidates/parse-resume",
            post(handlers::parse_resume),
        )
        .route("/api/candidates/import", post(handlers::import_candidates))
}
