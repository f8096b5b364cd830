// src/import/reconcile.rs
//! Row reconciliation
//!
//! Splits parsed rows into creates and updates by matching real emails
//! against stored candidates. Creates run sequentially so each row acquires
//! its sequence number one at a time; updates carry no ordering dependency
//! and run concurrently. One bad row never aborts the batch.

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::rows::CandidateRow;
use super::store::{candidate_from_row, CandidateStore, CandidateUpdate};
use crate::common::helpers::safe_email_log;
use crate::common::id_generator::candidate_id_from_sequence;

/// Error details are capped so a bulk failure does not balloon the response.
const MAX_ERROR_DETAILS: usize = 20;

#[derive(Debug, Serialize)]
pub struct ImportErrorDetail {
    pub row: usize,
    pub candidate: String,
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub success: bool,
    pub created: usize,
    pub updated: usize,
    pub duplicates: usize,
    pub total: usize,
    pub errors: Vec<ImportErrorDetail>,
}

/// Reconcile parsed rows against the store.
///
/// Returns Err only if the upfront email lookup fails; per-row failures are
/// collected into the summary instead.
pub async fn reconcile_rows(
    store: &dyn CandidateStore,
    rows: Vec<CandidateRow>,
) -> Result<ImportSummary> {
    let total = rows.len();

    // One batch query for every real email in the sheet
    let lookup_emails: Vec<String> = rows
        .iter()
        .filter(|row| !row.placeholder_email)
        .map(|row| row.email.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    let existing: HashMap<String, String> = store
        .find_by_emails(&lookup_emails)
        .await?
        .into_iter()
        .map(|candidate| (candidate.email.clone(), candidate.id))
        .collect();

    let mut created = 0usize;
    let mut duplicates = 0usize;
    let mut failed = 0usize;
    let mut errors: Vec<ImportErrorDetail> = Vec::new();

    // Emails created earlier in this same batch; repeats fold into updates
    let mut batch_emails: HashMap<String, String> = HashMap::new();
    let mut updates: Vec<(String, CandidateUpdate, usize, String)> = Vec::new();

    for row in &rows {
        let label = if row.name.is_empty() {
            row.email.clone()
        } else {
            row.name.clone()
        };

        if !row.placeholder_email {
            let matched = existing
                .get(&row.email)
                .or_else(|| batch_emails.get(&row.email));
            if let Some(id) = matched {
                duplicates += 1;
                updates.push((id.clone(), CandidateUpdate::from_row(row), row.row_number, label));
                continue;
            }
        }

        let sequence = match store.next_sequence().await {
            Ok(sequence) => sequence,
            Err(e) => {
                warn!("row {}: sequence acquisition failed: {}", row.row_number, e);
                failed += 1;
                if errors.len() < MAX_ERROR_DETAILS {
                    errors.push(ImportErrorDetail {
                        row: row.row_number,
                        candidate: label,
                        error: e.to_string(),
                    });
                }
                continue;
            }
        };

        let candidate = candidate_from_row(candidate_id_from_sequence(sequence), row);
        match store.insert(&candidate).await {
            Ok(()) => {
                created += 1;
                if !row.placeholder_email {
                    batch_emails.insert(row.email.clone(), candidate.id.clone());
                }
            }
            Err(e) => {
                warn!(
                    "row {}: insert failed for {}: {}",
                    row.row_number,
                    safe_email_log(&row.email),
                    e
                );
                failed += 1;
                if errors.len() < MAX_ERROR_DETAILS {
                    errors.push(ImportErrorDetail {
                        row: row.row_number,
                        candidate: label,
                        error: e.to_string(),
                    });
                }
            }
        }
    }

    // Updates touch distinct existing records, so they run concurrently
    let update_futures = updates.iter().map(|(id, update, row_number, label)| async move {
        store
            .update_fields(id, update)
            .await
            .map_err(|e| ImportErrorDetail {
                row: *row_number,
                candidate: label.clone(),
                error: e.to_string(),
            })
    });

    let mut updated = 0usize;
    for result in join_all(update_futures).await {
        match result {
            Ok(()) => updated += 1,
            Err(detail) => {
                warn!("row {}: update failed: {}", detail.row, detail.error);
                failed += 1;
                if errors.len() < MAX_ERROR_DETAILS {
                    errors.push(detail);
                }
            }
        }
    }

    info!(
        "import reconciled: {} created, {} updated, {} duplicates, {} failed of {} rows",
        created, updated, duplicates, failed, total
    );

    Ok(ImportSummary {
        success: failed == 0,
        created,
        updated,
        duplicates,
        total,
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::models::Candidate;
    use crate::import::rows::FALLBACK_STATUS;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    struct MemoryStore {
        candidates: Mutex<HashMap<String, Candidate>>,
        sequence: AtomicI64,
        fail_insert_for: Option<String>,
    }

    impl MemoryStore {
        fn new() -> Self {
            Self {
                candidates: Mutex::new(HashMap::new()),
                sequence: AtomicI64::new(0),
                fail_insert_for: None,
            }
        }

        fn failing_inserts_for(email: &str) -> Self {
            Self {
                fail_insert_for: Some(email.to_string()),
                ..Self::new()
            }
        }

        fn seed(&self, candidate: Candidate) {
            self.candidates
                .lock()
                .unwrap()
                .insert(candidate.id.clone(), candidate);
        }

        fn get(&self, id: &str) -> Option<Candidate> {
            self.candidates.lock().unwrap().get(id).cloned()
        }

        fn ids(&self) -> Vec<String> {
            let mut ids: Vec<String> =
                self.candidates.lock().unwrap().keys().cloned().collect();
            ids.sort();
            ids
        }
    }

    #[async_trait]
    impl CandidateStore for MemoryStore {
        async fn find_by_emails(&self, emails: &[String]) -> Result<Vec<Candidate>> {
            let candidates = self.candidates.lock().unwrap();
            Ok(candidates
                .values()
                .filter(|c| emails.contains(&c.email))
                .cloned()
                .collect())
        }

        async fn next_sequence(&self) -> Result<i64> {
            Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
        }

        async fn insert(&self, candidate: &Candidate) -> Result<()> {
            if self.fail_insert_for.as_deref() == Some(candidate.email.as_str()) {
                anyhow::bail!("simulated insert failure");
            }
            self.candidates
                .lock()
                .unwrap()
                .insert(candidate.id.clone(), candidate.clone());
            Ok(())
        }

        async fn update_fields(&self, id: &str, update: &CandidateUpdate) -> Result<()> {
            let mut candidates = self.candidates.lock().unwrap();
            let candidate = candidates
                .get_mut(id)
                .ok_or_else(|| anyhow::anyhow!("no candidate {}", id))?;
            if let Some(v) = &update.name {
                candidate.name = v.clone();
            }
            if let Some(v) = &update.contact {
                candidate.contact = Some(v.clone());
            }
            if let Some(v) = &update.skills {
                candidate.skills = Some(v.clone());
            }
            if let Some(v) = &update.location {
                candidate.location = Some(v.clone());
            }
            if let Some(v) = &update.status {
                candidate.status = v.clone();
            }
            Ok(())
        }
    }

    fn row(row_number: usize, name: &str, email: &str) -> CandidateRow {
        let placeholder = email.is_empty();
        let email = if placeholder {
            format!("import.0.{}@noemail.invalid", row_number)
        } else {
            email.to_string()
        };
        CandidateRow {
            row_number,
            name: name.to_string(),
            email,
            placeholder_email: placeholder,
            contact: String::new(),
            position: String::new(),
            client: String::new(),
            skills: Vec::new(),
            location: String::new(),
            experience: String::new(),
            current_ctc: String::new(),
            expected_ctc: String::new(),
            notice_period: String::new(),
            status: String::new(),
        }
    }

    #[tokio::test]
    async fn test_creates_assign_gap_free_ids() {
        let store = MemoryStore::new();
        let rows = vec![
            row(2, "A One", "a@example.com"),
            row(3, "B Two", "b@example.com"),
            row(4, "C Three", "c@example.com"),
        ];

        let summary = reconcile_rows(&store, rows).await.unwrap();

        assert!(summary.success);
        assert_eq!(summary.created, 3);
        assert_eq!(summary.total, 3);
        assert_eq!(store.ids(), vec!["CAN-0001", "CAN-0002", "CAN-0003"]);
    }

    #[tokio::test]
    async fn test_existing_email_becomes_update_not_duplicate_record() {
        let store = MemoryStore::new();
        let mut existing = candidate_from_row(
            "CAN-0001".to_string(),
            &row(2, "Jane Doe", "jane@example.com"),
        );
        existing.contact = Some("9876543210".to_string());
        store.seed(existing);

        let mut incoming = row(2, "Jane D.", "jane@example.com");
        incoming.location = "Pune".to_string();
        let summary = reconcile_rows(&store, vec![incoming]).await.unwrap();

        assert!(summary.success);
        assert_eq!(summary.created, 0);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.duplicates, 1);

        let stored = store.get("CAN-0001").unwrap();
        assert_eq!(stored.name, "Jane D.");
        assert_eq!(stored.location.as_deref(), Some("Pune"));
        // blank incoming contact must not erase the stored one
        assert_eq!(stored.contact.as_deref(), Some("9876543210"));
    }

    #[tokio::test]
    async fn test_statusless_row_keeps_stored_status_on_update() {
        let store = MemoryStore::new();
        let mut existing = candidate_from_row(
            "CAN-0001".to_string(),
            &row(2, "Jane Doe", "jane@example.com"),
        );
        existing.status = "Hired".to_string();
        store.seed(existing);

        // sheet has no status column, so the row carries an empty status
        let incoming = row(2, "Jane Doe", "jane@example.com");
        let summary = reconcile_rows(&store, vec![incoming]).await.unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(store.get("CAN-0001").unwrap().status, "Hired");
    }

    #[tokio::test]
    async fn test_created_row_without_status_gets_fallback() {
        let store = MemoryStore::new();
        let summary = reconcile_rows(&store, vec![row(2, "Sam Roy", "sam@example.com")])
            .await
            .unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(store.get("CAN-0001").unwrap().status, FALLBACK_STATUS);
    }

    #[tokio::test]
    async fn test_repeat_within_batch_folds_into_update() {
        let store = MemoryStore::new();
        let first = row(2, "Sam Roy", "sam@example.com");
        let mut second = row(3, "Sam Roy", "sam@example.com");
        second.location = "Chennai".to_string();

        let summary = reconcile_rows(&store, vec![first, second]).await.unwrap();

        assert_eq!(summary.created, 1);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.duplicates, 1);
        let stored = store.get("CAN-0001").unwrap();
        assert_eq!(stored.location.as_deref(), Some("Chennai"));
    }

    #[tokio::test]
    async fn test_placeholder_emails_never_collide() {
        let store = MemoryStore::new();
        let rows = vec![row(2, "No Mail One", ""), row(3, "No Mail Two", "")];

        let summary = reconcile_rows(&store, rows).await.unwrap();

        assert_eq!(summary.created, 2);
        assert_eq!(summary.duplicates, 0);
    }

    #[tokio::test]
    async fn test_failed_insert_is_reported_without_aborting() {
        let store = MemoryStore::failing_inserts_for("bad@example.com");
        let rows = vec![
            row(2, "Good Row", "good@example.com"),
            row(3, "Bad Row", "bad@example.com"),
            row(4, "Also Good", "also@example.com"),
        ];

        let summary = reconcile_rows(&store, rows).await.unwrap();

        assert!(!summary.success);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].row, 3);
        assert_eq!(summary.errors[0].candidate, "Bad Row");
    }

    #[tokio::test]
    async fn test_error_details_are_capped() {
        let store = MemoryStore::failing_inserts_for("bad@example.com");
        let rows: Vec<CandidateRow> = (0..25)
            .map(|i| {
                let mut r = row(i + 2, &format!("Bad {}", i), "bad@example.com");
                // distinct placeholder-free emails would dedupe, so mark each
                // row placeholder to force 25 independent inserts
                r.placeholder_email = true;
                r.email = "bad@example.com".to_string();
                r
            })
            .collect();

        let summary = reconcile_rows(&store, rows).await.unwrap();

        assert!(!summary.success);
        assert_eq!(summary.errors.len(), MAX_ERROR_DETAILS);
        assert_eq!(summary.total, 25);
    }

    #[tokio::test]
    async fn test_concurrent_imports_never_reuse_sequence_numbers() {
        let store = MemoryStore::new();
        let batch_a: Vec<CandidateRow> = (0..20)
            .map(|i| row(i + 2, &format!("A {}", i), &format!("a{}@example.com", i)))
            .collect();
        let batch_b: Vec<CandidateRow> = (0..20)
            .map(|i| row(i + 2, &format!("B {}", i), &format!("b{}@example.com", i)))
            .collect();

        let (summary_a, summary_b) =
            tokio::join!(reconcile_rows(&store, batch_a), reconcile_rows(&store, batch_b));

        assert_eq!(summary_a.unwrap().created, 20);
        assert_eq!(summary_b.unwrap().created, 20);

        let ids = store.ids();
        assert_eq!(ids.len(), 40);
        let expected: Vec<String> = (1i64..=40)
            .map(crate::common::id_generator::candidate_id_from_sequence)
            .collect();
        assert_eq!(ids, expected);
    }
}
