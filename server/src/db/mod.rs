//! Player storage.
//!
//! The ingestion pipeline only needs "upsert these rows by id"; everything
//! else about the table stays behind [`PlayerStore`].

pub mod memory;
pub mod models;
pub mod player_repo;

use async_trait::async_trait;
use std::collections::HashSet;

pub use memory::InMemoryPlayerStore;
pub use models::{ImageRecord, PlayerRecord};
pub use player_repo::PgPlayerStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("duplicate player id `{0}` in upsert batch")]
    DuplicateKey(String),

    /// The backend refused the write after applying `applied` rows.
    #[error("{message}")]
    Rejected { message: String, applied: usize },
}

impl StorageError {
    /// Rows the backend reports as written before failing.
    pub fn applied(&self) -> usize {
        match self {
            StorageError::Rejected { applied, .. } => *applied,
            _ => 0,
        }
    }
}

/// Upsert-capable `players` table.
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Insert or update every record, conflict-resolved on `id`.
    /// Returns the rows as written, in input order.
    /// Implementations must restore that order themselves.
    async fn upsert_players(&self, records: &[PlayerRecord])
        -> Result<Vec<PlayerRecord>, StorageError>;

    /// Whole roster ordered by last name, then first name.
    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StorageError>;

    /// Cheap connectivity check for the health probe.
    async fn ping(&self) -> Result<(), StorageError>;
}

/// Reject batches that name the same id twice; Postgres cannot apply
/// `ON CONFLICT DO UPDATE` to one row twice in a statement.
pub(crate) fn ensure_unique_ids(records: &[PlayerRecord]) -> Result<(), StorageError> {
    let mut seen = HashSet::with_capacity(records.len());
    for r in records {
        if !seen.insert(r.id.as_str()) {
            return Err(StorageError::DuplicateKey(r.id.clone()));
        }
    }
    Ok(())
}
