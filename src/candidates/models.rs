// src/candidates/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::{deserialize_skills, serialize_skills};

// ============================================================================
// Candidate Models
// ============================================================================

#[derive(Clone, FromRow, Serialize, Deserialize, Debug)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: String,
    pub contact: Option<String>,
    pub position: Option<String>,
    pub client: Option<String>,
    // Stored as a JSON string, exposed as an array
    #[serde(
        serialize_with = "serialize_skills",
        deserialize_with = "deserialize_skills",
        default
    )]
    pub skills: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub current_ctc: Option<String>,
    pub expected_ctc: Option<String>,
    pub notice_period: Option<String>,
    pub status: String,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[sqlx(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateFilters {
    pub status: Option<String>,
    pub search: Option<String>,
}

/// An uploaded file as pulled out of a multipart request.
#[derive(Debug)]
pub struct FileUpload {
    pub filename: String,
    pub size: usize,
}
