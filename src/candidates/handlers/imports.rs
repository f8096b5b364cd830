// src/candidates/handlers/imports.rs

use crate::candidates::models::FileUpload;
use crate::candidates::validators::ImportUploadValidator;
use crate::common::{ApiError, AppState, Validator};
use crate::import::rows::SheetError;
use crate::import::store::SqliteCandidateStore;
use crate::import::{reconcile_rows, sheet_to_rows, CandidateRow, ImportSummary};
use axum::{
    extract::{Extension, Multipart},
    response::Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// POST /api/candidates/import - Bulk import candidates from a spreadsheet
pub async fn import_candidates(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    mut multipart: Multipart,
) -> Result<Json<ImportSummary>, ApiError> {
    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("import.xlsx").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;
            upload = Some((filename, data));
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| ApiError::BadRequest("No import file provided".to_string()))?;

    let validation = ImportUploadValidator.validate(&FileUpload {
        filename: filename.clone(),
        size: data.len(),
    });
    if !validation.is_valid {
        return Err(validation.into());
    }

    let (columns, raw_rows) = sheet_to_rows(&data).map_err(|e| match e {
        SheetError::Open(msg) => ApiError::ImportError(format!("Could not read workbook: {}", msg)),
        SheetError::NoWorksheet => ApiError::ImportError("Workbook has no worksheet".to_string()),
        SheetError::Empty => ApiError::ImportError("Worksheet has no data rows".to_string()),
    })?;

    if columns.is_empty() {
        return Err(ApiError::ImportError(
            "No recognizable columns found in the header row".to_string(),
        ));
    }

    let rows: Vec<CandidateRow> = raw_rows
        .iter()
        .filter_map(|(row_number, cells)| CandidateRow::from_cells(*row_number, cells, &columns))
        .collect();

    info!(
        filename = %filename,
        columns = columns.len(),
        rows = rows.len(),
        "Starting candidate import"
    );

    let state = state_lock.read().await;
    let store = SqliteCandidateStore::new(state.db.clone());

    let summary = reconcile_rows(&store, rows)
        .await
        .map_err(|e| ApiError::ImportError(e.to_string()))?;

    Ok(Json(summary))
}
