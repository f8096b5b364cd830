// src/parsing/document.rs
//! Uploaded document to plain text
//!
//! PDF text comes from pdf-extract; DOCX text is pulled out of the
//! word/document.xml entry of the zip container. Everything else is an
//! unsupported type, reported as a structured failure rather than a 500 so
//! the parse endpoint can answer {success: false, message}.

use once_cell::sync::Lazy;
use regex::Regex;
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::ZipArchive;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Unsupported file type '{0}'. Upload a .pdf or .docx resume")]
    UnsupportedType(String),

    #[error("Failed to read document: {0}")]
    Conversion(String),
}

static XML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Convert an uploaded resume into plain text based on its file extension.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let extension = filename
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_lowercase();

    let raw = match extension.as_str() {
        "pdf" => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Conversion(format!("PDF extraction error: {}", e)))?,
        "docx" => extract_docx_text(bytes)?,
        "doc" => {
            // Legacy binary Word has no reader here; ask for a modern container
            return Err(DocumentError::UnsupportedType(
                "doc (convert to .docx)".to_string(),
            ));
        }
        other => return Err(DocumentError::UnsupportedType(other.to_string())),
    };

    Ok(normalize_text(&raw))
}

/// Pull paragraph text out of a DOCX container.
///
/// The document body lives in word/document.xml; paragraph ends (`</w:p>`)
/// become newlines so line-oriented heuristics still see a line structure.
fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let cursor = Cursor::new(bytes);
    let mut archive = ZipArchive::new(cursor)
        .map_err(|e| DocumentError::Conversion(format!("Not a valid DOCX archive: {}", e)))?;

    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|_| DocumentError::Conversion("DOCX is missing word/document.xml".to_string()))?;

    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| DocumentError::Conversion(format!("Failed to read DOCX body: {}", e)))?;

    let with_breaks = xml.replace("</w:p>", "\n").replace("<w:br/>", "\n");
    let stripped = XML_TAG.replace_all(&with_breaks, "");

    Ok(decode_xml_entities(&stripped))
}

fn decode_xml_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
}

/// Normalize extracted text - fold ligatures, straighten quotes and dashes,
/// unify line endings. PDF extractors routinely emit these.
fn normalize_text(text: &str) -> String {
    text.replace('\u{FB00}', "ff")
        .replace('\u{FB01}', "fi")
        .replace('\u{FB02}', "fl")
        .replace('\u{FB03}', "ffi")
        .replace('\u{FB04}', "ffl")
        .replace('\u{2019}', "'")
        .replace('\u{2018}', "'")
        .replace('\u{201C}', "\"")
        .replace('\u{201D}', "\"")
        .replace('\u{2013}', "-")
        .replace('\u{2014}', "-")
        .replace('\u{00A0}', " ")
        .replace("\r\n", "\n")
        .replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension_is_structured_failure() {
        let err = extract_text("resume.png", b"not a resume").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedType(_)));
        assert!(err.to_string().contains("png"));
    }

    #[test]
    fn test_legacy_doc_is_unsupported() {
        let err = extract_text("cv.doc", b"\xd0\xcf\x11\xe0").unwrap_err();
        assert!(matches!(err, DocumentError::UnsupportedType(_)));
    }

    #[test]
    fn test_garbage_docx_is_conversion_failure() {
        let err = extract_text("cv.docx", b"definitely not a zip").unwrap_err();
        assert!(matches!(err, DocumentError::Conversion(_)));
    }

    #[test]
    fn test_normalize_folds_ligatures_and_dashes() {
        let normalized = normalize_text("quali\u{FB01}ed \u{2013} 2019\u{2013}2022\r\ndone");
        assert_eq!(normalized, "qualified - 2019-2022\ndone");
    }

    #[test]
    fn test_decode_xml_entities() {
        assert_eq!(
            decode_xml_entities("Smith &amp; Sons &lt;Pvt&gt;"),
            "Smith & Sons <Pvt>"
        );
    }
}
