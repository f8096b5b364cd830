// src/candidates/tests/validators_tests.rs

#[cfg(test)]
mod tests {
    use crate::candidates::models::FileUpload;
    use crate::candidates::validators::*;
    use crate::common::Validator;

    #[test]
    fn test_resume_validator_accepts_pdf() {
        let result = ResumeUploadValidator.validate(&FileUpload {
            filename: "resume.pdf".to_string(),
            size: 1024,
        });
        assert!(result.is_valid);
    }

    #[test]
    fn test_resume_validator_accepts_docx_case_insensitive() {
        let result = ResumeUploadValidator.validate(&FileUpload {
            filename: "Resume.DOCX".to_string(),
            size: 1024,
        });
        assert!(result.is_valid);
    }

    #[test]
    fn test_resume_validator_rejects_unknown_extension() {
        let result = ResumeUploadValidator.validate(&FileUpload {
            filename: "resume.txt".to_string(),
            size: 1024,
        });
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_resume_validator_rejects_empty_file() {
        let result = ResumeUploadValidator.validate(&FileUpload {
            filename: "resume.pdf".to_string(),
            size: 0,
        });
        assert!(!result.is_valid);
    }

    #[test]
    fn test_import_validator_accepts_spreadsheets() {
        for filename in ["candidates.xlsx", "candidates.xls", "Candidates.XLSX"] {
            let result = ImportUploadValidator.validate(&FileUpload {
                filename: filename.to_string(),
                size: 1024,
            });
            assert!(result.is_valid, "{} should be accepted", filename);
        }
    }

    #[test]
    fn test_import_validator_rejects_csv() {
        let result = ImportUploadValidator.validate(&FileUpload {
            filename: "candidates.csv".to_string(),
            size: 1024,
        });
        assert!(!result.is_valid);
    }

    #[test]
    fn test_import_validator_rejects_oversized_file() {
        let result = ImportUploadValidator.validate(&FileUpload {
            filename: "candidates.xlsx".to_string(),
            size: 11 * 1024 * 1024,
        });
        assert!(!result.is_valid);
    }
}
