// src/candidates/handlers/listing.rs

use crate::candidates::models::{Candidate, CandidateFilters};
use crate::common::{ApiError, AppState};
use axum::{
    extract::{Extension, Query},
    response::Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

/// GET /api/candidates - List candidates, newest first
pub async fn list_candidates(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(filters): Query<CandidateFilters>,
) -> Result<Json<Vec<Candidate>>, ApiError> {
    let state = state_lock.read().await;

    let mut query = String::from("SELECT * FROM candidates WHERE 1=1");
    let mut binds: Vec<String> = Vec::new();

    if let Some(status) = &filters.status {
        if !status.trim().is_empty() {
            query.push_str(" AND status = ?");
            binds.push(status.trim().to_string());
        }
    }

    if let Some(search) = &filters.search {
        if !search.trim().is_empty() {
            query.push_str(" AND (name LIKE ? OR email LIKE ? OR skills LIKE ?)");
            let pattern = format!("%{}%", search.trim());
            binds.push(pattern.clone());
            binds.push(pattern.clone());
            binds.push(pattern);
        }
    }

    query.push_str(" ORDER BY created_at DESC");

    let mut query_builder = sqlx::query_as::<_, Candidate>(&query);
    for bind in &binds {
        query_builder = query_builder.bind(bind);
    }

    let candidates = query_builder
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(candidates))
}
