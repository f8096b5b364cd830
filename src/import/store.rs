// src/import/store.rs
//! Candidate record store
//!
//! The reconciler only needs four operations, so they live behind a trait:
//! batch email lookup, atomic sequence acquisition, insert, and a
//! non-empty-fields-only update. The SQLite implementation backs production;
//! tests swap in an in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::rows::{CandidateRow, FALLBACK_STATUS};
use crate::candidates::models::Candidate;
use crate::common::id_generator::COUNTER_KEY_CANDIDATES;

/// Field-wise update carrying only values that should be written.
/// Blank imported cells never erase stored data, so blanks become None here.
#[derive(Debug, Default, Clone)]
pub struct CandidateUpdate {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub position: Option<String>,
    pub client: Option<String>,
    pub skills: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub current_ctc: Option<String>,
    pub expected_ctc: Option<String>,
    pub notice_period: Option<String>,
    pub status: Option<String>,
}

impl CandidateUpdate {
    /// Keep only the row's non-empty fields.
    pub fn from_row(row: &CandidateRow) -> Self {
        let keep = |value: &str| {
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        CandidateUpdate {
            name: keep(&row.name),
            contact: keep(&row.contact),
            position: keep(&row.position),
            client: keep(&row.client),
            skills: if row.skills.is_empty() {
                None
            } else {
                serde_json::to_string(&row.skills).ok()
            },
            location: keep(&row.location),
            experience: keep(&row.experience),
            current_ctc: keep(&row.current_ctc),
            expected_ctc: keep(&row.expected_ctc),
            notice_period: keep(&row.notice_period),
            status: keep(&row.status),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.contact.is_none()
            && self.position.is_none()
            && self.client.is_none()
            && self.skills.is_none()
            && self.location.is_none()
            && self.experience.is_none()
            && self.current_ctc.is_none()
            && self.expected_ctc.is_none()
            && self.notice_period.is_none()
            && self.status.is_none()
    }
}

/// Build a full candidate record from an import row and an assigned ID.
pub fn candidate_from_row(id: String, row: &CandidateRow) -> Candidate {
    let opt = |value: &str| {
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    };

    Candidate {
        id,
        name: row.name.clone(),
        email: row.email.clone(),
        contact: opt(&row.contact),
        position: opt(&row.position),
        client: opt(&row.client),
        skills: if row.skills.is_empty() {
            None
        } else {
            serde_json::to_string(&row.skills).ok()
        },
        location: opt(&row.location),
        experience: opt(&row.experience),
        current_ctc: opt(&row.current_ctc),
        expected_ctc: opt(&row.expected_ctc),
        notice_period: opt(&row.notice_period),
        status: if row.status.is_empty() {
            FALLBACK_STATUS.to_string()
        } else {
            row.status.clone()
        },
        created_at: Utc::now().to_rfc3339(),
        updated_at: None,
    }
}

/// The reconciler's view of the record store.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Batch lookup; the caller has already filtered out placeholder emails.
    async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<Candidate>>;

    /// Acquire the next candidate sequence number. Must be a single atomic
    /// read-modify-write so numbers never repeat or skip, even when two
    /// imports overlap. Called once per created row, never precomputed.
    async fn next_sequence(&self) -> Result<i64>;

    async fn insert(&self, candidate: &Candidate) -> Result<()>;

    async fn update_fields(&self, id: &str, update: &CandidateUpdate) -> Result<()>;
}

/// SQLite-backed store used by the HTTP handlers.
pub struct SqliteCandidateStore {
    pool: SqlitePool,
}

impl SqliteCandidateStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for SqliteCandidateStore {
    async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<Candidate>> {
        if emails.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = emails.iter().map(|_| "?").collect::<Vec<_>>().join(",");
        let query = format!(
            "SELECT * FROM candidates WHERE email IN ({})",
            placeholders
        );

        let mut query_builder = sqlx::query_as::<_, Candidate>(&query);
        for email in emails {
            query_builder = query_builder.bind(email);
        }

        let candidates = query_builder.fetch_all(&self.pool).await?;
        Ok(candidates)
    }

    async fn next_sequence(&self) -> Result<i64> {
        // One statement per acquisition; SQLite serializes writers so two
        // racing imports interleave without repeating or skipping a number
        let value: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO counters (key, value) VALUES (?, 1)
            ON CONFLICT(key) DO UPDATE SET value = value + 1
            RETURNING value
            "#,
        )
        .bind(COUNTER_KEY_CANDIDATES)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    async fn insert(&self, candidate: &Candidate) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO candidates (
                id, name, email, contact, position, client, skills, location,
                experience, current_ctc, expected_ctc, notice_period, status,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&candidate.id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(&candidate.contact)
        .bind(&candidate.position)
        .bind(&candidate.client)
        .bind(&candidate.skills)
        .bind(&candidate.location)
        .bind(&candidate.experience)
        .bind(&candidate.current_ctc)
        .bind(&candidate.expected_ctc)
        .bind(&candidate.notice_period)
        .bind(&candidate.status)
        .bind(&candidate.created_at)
        .bind(&candidate.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_fields(&self, id: &str, update: &CandidateUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<&String> = Vec::new();

        let columns: [(&str, &Option<String>); 11] = [
            ("name = ?", &update.name),
            ("contact = ?", &update.contact),
            ("position = ?", &update.position),
            ("client = ?", &update.client),
            ("skills = ?", &update.skills),
            ("location = ?", &update.location),
            ("experience = ?", &update.experience),
            ("current_ctc = ?", &update.current_ctc),
            ("expected_ctc = ?", &update.expected_ctc),
            ("notice_period = ?", &update.notice_period),
            ("status = ?", &update.status),
        ];

        for (column, value) in columns {
            if let Some(v) = value {
                sets.push(column);
                values.push(v);
            }
        }

        let query = format!(
            "UPDATE candidates SET {}, updated_at = ? WHERE id = ?",
            sets.join(", ")
        );

        let mut query_builder = sqlx::query(&query);
        for value in values {
            query_builder = query_builder.bind(value);
        }
        query_builder = query_builder.bind(Utc::now().to_rfc3339()).bind(id);

        query_builder.execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::columns::resolve_columns;

    fn sample_row() -> CandidateRow {
        let headers: Vec<String> = ["Name", "Email", "Phone", "Skills", "Location"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let columns = resolve_columns(&headers);
        let cells: Vec<String> = ["Jane Doe", "jane@example.com", "9876543210", "React, Node", ""]
            .iter()
            .map(|s| s.to_string())
            .collect();
        CandidateRow::from_cells(2, &cells, &columns).unwrap()
    }

    #[test]
    fn test_update_keeps_only_non_empty_fields() {
        let update = CandidateUpdate::from_row(&sample_row());
        assert_eq!(update.name.as_deref(), Some("Jane Doe"));
        assert_eq!(update.contact.as_deref(), Some("9876543210"));
        assert_eq!(update.location, None);
        assert_eq!(update.skills.as_deref(), Some(r#"["React","Node"]"#));
        // no status column in the sheet means no status write on update
        assert_eq!(update.status, None);
    }

    #[test]
    fn test_candidate_from_row_serializes_skills() {
        let candidate = candidate_from_row("CAN-0001".to_string(), &sample_row());
        assert_eq!(candidate.id, "CAN-0001");
        assert_eq!(candidate.email, "jane@example.com");
        assert_eq!(candidate.skills.as_deref(), Some(r#"["React","Node"]"#));
        assert_eq!(candidate.status, "Screening");
        assert_eq!(candidate.location, None);
    }
}
