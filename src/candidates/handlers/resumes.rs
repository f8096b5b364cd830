// src/candidates/handlers/resumes.rs

use crate::candidates::models::FileUpload;
use crate::candidates::validators::ResumeUploadValidator;
use crate::common::{ApiError, Validator};
use crate::parsing::{extract_fields, extract_text};
use axum::{extract::Multipart, response::Json};
use serde_json::json;
use tracing::{info, warn};

/// POST /api/candidates/parse-resume - Extract candidate fields from a resume
///
/// Extraction failures (scanned PDFs, legacy .doc files) come back as a
/// success:false payload rather than an HTTP error, so the frontend can fall
/// back to manual entry.
pub async fn parse_resume(mut multipart: Multipart) -> Result<Json<serde_json::Value>, ApiError> {
    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() == Some("resume") || field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("resume.pdf").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;
            upload = Some((filename, data));
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| ApiError::BadRequest("No resume file provided".to_string()))?;

    let validation = ResumeUploadValidator.validate(&FileUpload {
        filename: filename.clone(),
        size: data.len(),
    });
    if !validation.is_valid {
        return Err(validation.into());
    }

    info!(filename = %filename, size = data.len(), "Parsing uploaded resume");

    let text = match extract_text(&filename, &data) {
        Ok(text) => text,
        Err(e) => {
            warn!(filename = %filename, error = %e, "Resume text extraction failed");
            return Ok(Json(json!({
                "success": false,
                "message": e.to_string(),
            })));
        }
    };

    let fields = extract_fields(&text);

    Ok(Json(json!({
        "success": true,
        "data": fields,
        "rawText": text,
    })))
}
