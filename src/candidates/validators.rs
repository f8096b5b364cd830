// src/candidates/validators.rs

use super::models::FileUpload;
use crate::common::{ValidationResult, Validator};

// ============================================================================
// Upload Validators
// ============================================================================

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct ResumeUploadValidator;

impl Validator<FileUpload> for ResumeUploadValidator {
    fn validate(&self, data: &FileUpload) -> ValidationResult {
        let mut result = ValidationResult::new();

        let filename = data.filename.to_lowercase();
        if !filename.ends_with(".pdf") && !filename.ends_with(".docx") && !filename.ends_with(".doc")
        {
            result.add_error("file", "Only PDF, DOCX and DOC files are allowed");
        }

        check_size(&mut result, data.size);
        result
    }
}

pub struct ImportUploadValidator;

impl Validator<FileUpload> for ImportUploadValidator {
    fn validate(&self, data: &FileUpload) -> ValidationResult {
        let mut result = ValidationResult::new();

        let filename = data.filename.to_lowercase();
        if !filename.ends_with(".xlsx") && !filename.ends_with(".xls") {
            result.add_error("file", "Only XLSX and XLS files are allowed");
        }

        check_size(&mut result, data.size);
        result
    }
}

fn check_size(result: &mut ValidationResult, size: usize) {
    if size == 0 {
        result.add_error("file", "File is empty");
    } else if size > MAX_UPLOAD_BYTES {
        result.add_error("file", "File must be smaller than 10 MB");
    }
}
