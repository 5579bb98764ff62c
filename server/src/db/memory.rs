//! Process-local player table.
//!
//! Stands in for Postgres when no `DATABASE_URL` is configured and in
//! tests. Follows the same upsert contract: keyed by `id`, `created_at`
//! kept on update, `updated_at` refreshed on every write.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Mutex;

use super::{ensure_unique_ids, models::PlayerRecord, PlayerStore, StorageError};

/// Failure the store reports on its next upsert.
#[derive(Debug, Clone)]
pub struct InjectedFailure {
    pub message: String,
    /// Rows written before the failure is raised.
    pub applied: usize,
}

#[derive(Default)]
pub struct InMemoryPlayerStore {
    rows: DashMap<String, PlayerRecord>,
    fail_next: Mutex<Option<InjectedFailure>>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `upsert_players` call fail after writing `applied` rows.
    pub fn fail_next_upsert(&self, message: impl Into<String>, applied: usize) {
        if let Ok(mut slot) = self.fail_next.lock() {
            *slot = Some(InjectedFailure {
                message: message.into(),
                applied,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<PlayerRecord> {
        self.rows.get(id).map(|e| e.value().clone())
    }

    fn write(&self, record: &PlayerRecord) -> PlayerRecord {
        let now = Utc::now();
        let created_at = self
            .rows
            .get(&record.id)
            .and_then(|e| e.value().created_at)
            .unwrap_or(now);

        let stored = PlayerRecord {
            created_at: Some(created_at),
            updated_at: Some(now),
            ..record.clone()
        };
        self.rows.insert(stored.id.clone(), stored.clone());
        stored
    }
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn upsert_players(
        &self,
        records: &[PlayerRecord],
    ) -> Result<Vec<PlayerRecord>, StorageError> {
        ensure_unique_ids(records)?;

        let failure = self.fail_next.lock().ok().and_then(|mut slot| slot.take());
        if let Some(InjectedFailure { message, applied }) = failure {
            let applied = applied.min(records.len());
            for r in &records[..applied] {
                self.write(r);
            }
            return Err(StorageError::Rejected { message, applied });
        }

        Ok(records.iter().map(|r| self.write(r)).collect())
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StorageError> {
        let mut out: Vec<PlayerRecord> = self.rows.iter().map(|e| e.value().clone()).collect();
        out.sort_by(|a, b| {
            a.last_name
                .cmp(&b.last_name)
                .then_with(|| a.first_name.cmp(&b.first_name))
        });
        Ok(out)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
