//! Squad ingestion: fetch → validate → transform → upsert.

pub mod schema;
pub mod source;
pub mod transform;
pub mod types;

use serde::Serialize;
use std::{fmt, sync::Arc};

use crate::{
    db::{PlayerStore, StorageError},
    metrics,
};
use schema::{SchemaVersion, ValidationError};
use source::{SquadSource, TransportError};

pub use types::{ExternalImage, ExternalPlayer, PlayerId, SquadPayload};

/// Where a run currently is (or where it stopped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestStage {
    Idle,
    Fetching,
    Validating,
    Transforming,
    Storing,
    Succeeded,
    Failed,
}

impl fmt::Display for IngestStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IngestStage::Idle => "idle",
            IngestStage::Fetching => "fetching",
            IngestStage::Validating => "validating",
            IngestStage::Transforming => "transforming",
            IngestStage::Storing => "storing",
            IngestStage::Succeeded => "succeeded",
            IngestStage::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Terminal failure of one run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Failed to fetch players from squad API: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to upsert players: {0}")]
    Storage(#[from] StorageError),
}

impl IngestError {
    pub fn stage(&self) -> IngestStage {
        match self {
            IngestError::Transport(_) => IngestStage::Fetching,
            IngestError::Validation(_) => IngestStage::Validating,
            IngestError::Storage(_) => IngestStage::Storing,
        }
    }

    /// Rows already written when the run failed.
    pub fn players_applied(&self) -> usize {
        match self {
            IngestError::Storage(e) => e.applied(),
            _ => 0,
        }
    }
}

/// Outcome of one ingestion run, returned to the trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestionResult {
    pub success: bool,
    pub players_processed: usize,
    pub errors: Vec<String>,
}

impl IngestionResult {
    fn succeeded(players_processed: usize) -> Self {
        Self {
            success: true,
            players_processed,
            errors: Vec::new(),
        }
    }

    fn failed(err: &IngestError) -> Self {
        Self {
            success: false,
            players_processed: err.players_applied(),
            errors: vec![err.to_string()],
        }
    }
}

/// Pulls the squad and mirrors it into the player store.
///
/// Holds no state between runs; overlapping runs rely on the store's
/// per-call upsert atomicity.
#[derive(Clone)]
pub struct PlayerIngestor {
    source: Arc<dyn SquadSource>,
    store: Arc<dyn PlayerStore>,
    schema: SchemaVersion,
}

impl PlayerIngestor {
    pub fn new(
        source: Arc<dyn SquadSource>,
        store: Arc<dyn PlayerStore>,
        schema: SchemaVersion,
    ) -> Self {
        Self {
            source,
            store,
            schema,
        }
    }

    pub fn schema(&self) -> SchemaVersion {
        self.schema
    }

    /// Execute one run. Never retries; the caller decides whether to try again.
    pub async fn run(&self) -> IngestionResult {
        log::debug!("ingest: {} → {}", IngestStage::Idle, IngestStage::Fetching);

        let result = match self.execute().await {
            Ok(processed) => {
                log::debug!("ingest: → {}", IngestStage::Succeeded);
                log::info!(
                    "ingest succeeded: {processed} players upserted from {}",
                    self.source.describe()
                );
                IngestionResult::succeeded(processed)
            }
            Err(e) => {
                log::debug!("ingest: {} → {}", e.stage(), IngestStage::Failed);
                log::warn!("ingest failed while {}: {e}", e.stage());
                IngestionResult::failed(&e)
            }
        };

        metrics::record_run(result.success, result.players_processed);
        result
    }

    async fn execute(&self) -> Result<usize, IngestError> {
        let body = self.source.fetch_squad().await?;

        self.advance(IngestStage::Fetching, IngestStage::Validating);
        let squad = schema::parse_squad(&body, self.schema)?;

        // An empty roster is not an error and needs no write.
        if squad.players.is_empty() {
            log::debug!("ingest: squad is empty, nothing to store");
            return Ok(0);
        }

        self.advance(IngestStage::Validating, IngestStage::Transforming);
        let records = transform::to_records(squad.players);

        self.advance(IngestStage::Transforming, IngestStage::Storing);
        let written = self.store.upsert_players(&records).await?;

        if written.len() != records.len() {
            log::warn!(
                "store reported {} rows written for {} submitted",
                written.len(),
                records.len()
            );
        }
        Ok(written.len())
    }

    fn advance(&self, from: IngestStage, to: IngestStage) {
        log::debug!("ingest: {from} → {to}");
    }
}
