// src/import/rows.rs
//! Worksheet rows into candidate rows
//!
//! The row policy is deliberately lenient - the opposite stance from the
//! resume extractor. A row only dies when every identifying field is empty;
//! a missing email is papered over with a synthetic placeholder so the row
//! can still persist. Placeholder emails never take part in duplicate
//! detection.

use calamine::{open_workbook_auto_from_rs, DataType, Reader};
use chrono::Utc;
use std::io::Cursor;
use thiserror::Error;

use super::columns::{resolve_columns, CanonicalField, ColumnMap};

/// Domain reserved for synthetic addresses; .invalid can never receive mail
const PLACEHOLDER_EMAIL_DOMAIN: &str = "noemail.invalid";

/// Statuses accepted as-is (canonical casing restored). Anything else,
/// including an empty cell, falls back to Screening.
pub const STATUS_VOCABULARY: &[&str] = &[
    "Applied",
    "Screening",
    "Shortlisted",
    "Interview Scheduled",
    "Interviewed",
    "Offered",
    "Hired",
    "Rejected",
    "On Hold",
];

pub const FALLBACK_STATUS: &str = "Screening";

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("Unable to open the spreadsheet: {0}")]
    Open(String),

    #[error("The workbook does not contain any worksheets")]
    NoWorksheet,

    #[error("The worksheet is empty")]
    Empty,
}

/// One spreadsheet row mapped onto canonical fields
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    /// 1-based row number in the sheet, for error reporting
    pub row_number: usize,
    pub name: String,
    pub email: String,
    pub placeholder_email: bool,
    pub contact: String,
    pub position: String,
    pub client: String,
    pub skills: Vec<String>,
    pub location: String,
    pub experience: String,
    pub current_ctc: String,
    pub expected_ctc: String,
    pub notice_period: String,
    pub status: String,
}

impl CandidateRow {
    /// Build a row from stringified cells using a resolved column map.
    /// Returns None when every identifying field is empty.
    pub fn from_cells(row_number: usize, cells: &[String], columns: &ColumnMap) -> Option<Self> {
        let cell = |field: CanonicalField| -> String {
            columns
                .column(field)
                .and_then(|idx| cells.get(idx))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let name = cell(CanonicalField::Name);
        let email_raw = cell(CanonicalField::Email).to_lowercase();
        let contact = cell(CanonicalField::Contact);
        let position = cell(CanonicalField::Position);
        let client = cell(CanonicalField::Client);
        let skills_raw = cell(CanonicalField::Skills);

        // Skip only when every identifying field is empty
        let identifying = [&name, &email_raw, &contact, &position, &client, &skills_raw];
        if identifying.iter().all(|v| v.is_empty()) {
            return None;
        }

        let (email, placeholder_email) = if email_raw.is_empty() {
            (placeholder_email(row_number), true)
        } else {
            (email_raw, false)
        };

        Some(CandidateRow {
            row_number,
            name,
            email,
            placeholder_email,
            contact,
            position,
            client,
            skills: split_skills(&skills_raw),
            location: cell(CanonicalField::Location),
            experience: cell(CanonicalField::Experience),
            current_ctc: cell(CanonicalField::CurrentCtc),
            expected_ctc: cell(CanonicalField::ExpectedCtc),
            notice_period: cell(CanonicalField::NoticePeriod),
            // An absent status stays empty here; the Screening fallback only
            // applies when a new record is created, so a blank cell can never
            // reset an existing candidate's status
            status: {
                let raw = cell(CanonicalField::Status);
                if raw.is_empty() {
                    String::new()
                } else {
                    normalize_status(&raw)
                }
            },
        })
    }
}

/// Synthetic address so an email-less row can still persist
fn placeholder_email(row_number: usize) -> String {
    format!(
        "import.{}.{}@{}",
        Utc::now().timestamp_millis(),
        row_number,
        PLACEHOLDER_EMAIL_DOMAIN
    )
}

/// Placeholder addresses are excluded from duplicate detection
pub fn is_placeholder_email(email: &str) -> bool {
    email.ends_with(&format!("@{}", PLACEHOLDER_EMAIL_DOMAIN))
}

fn split_skills(raw: &str) -> Vec<String> {
    raw.split(&[',', ';'][..])
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Lenient status acceptance: vocabulary hit keeps canonical casing,
/// everything else becomes the fallback.
pub fn normalize_status(raw: &str) -> String {
    let trimmed = raw.trim();
    STATUS_VOCABULARY
        .iter()
        .find(|status| status.eq_ignore_ascii_case(trimmed))
        .map(|status| status.to_string())
        .unwrap_or_else(|| FALLBACK_STATUS.to_string())
}

/// Read the first worksheet into headers plus stringified cell rows.
/// All-empty rows are dropped here; everything else survives to the
/// row policy above.
pub fn sheet_to_rows(bytes: &[u8]) -> Result<(ColumnMap, Vec<(usize, Vec<String>)>), SheetError> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| SheetError::Open(e.to_string()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoWorksheet)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .ok_or(SheetError::NoWorksheet)?
        .map_err(|e| SheetError::Open(e.to_string()))?;

    let mut rows_iter = range.rows();
    let header_row = rows_iter.next().ok_or(SheetError::Empty)?;
    let headers: Vec<String> = header_row.iter().map(cell_to_string).collect();
    let columns = resolve_columns(&headers);

    let mut rows = Vec::new();
    for (offset, row) in rows_iter.enumerate() {
        let values: Vec<String> = row.iter().map(cell_to_string).collect();
        if values.iter().all(|value| value.is_empty()) {
            continue;
        }
        // +2: 1-based numbering plus the header row
        rows.push((offset + 2, values));
    }

    Ok((columns, rows))
}

fn cell_to_string(cell: &DataType) -> String {
    match cell {
        DataType::Empty => String::new(),
        DataType::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        DataType::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| cell.to_string()),
        _ => cell.to_string().trim().to_string(),
    }
}
