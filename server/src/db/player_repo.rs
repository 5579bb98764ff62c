use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use std::collections::HashMap;

use super::{
    ensure_unique_ids,
    models::{PlayerRecord, PlayerRow},
    PlayerStore, StorageError,
};

/// Rows per INSERT statement; keeps bind parameters well under the
/// Postgres limit of 65535.
const UPSERT_CHUNK: usize = 1_000;

const COLUMNS: &str = "id, slug, first_name, last_name, is_deactivated, position, image, \
     jersey_number, matches, goals, flags, age, date_of_birth, nationality, created_at, updated_at";

/// Postgres-backed `players` table.
#[derive(Clone)]
pub struct PgPlayerStore {
    pool: PgPool,
}

impl PgPlayerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl PlayerStore for PgPlayerStore {
    async fn upsert_players(
        &self,
        records: &[PlayerRecord],
    ) -> Result<Vec<PlayerRecord>, StorageError> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        ensure_unique_ids(records)?;

        // One transaction for the whole batch: either every row lands or none.
        let mut tx = self.pool.begin().await?;
        let mut written = Vec::with_capacity(records.len());

        for chunk in records.chunks(UPSERT_CHUNK) {
            let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO players (id, slug, first_name, last_name, is_deactivated, position, \
                 image, jersey_number, matches, goals, flags, age, date_of_birth, nationality) ",
            );
            qb.push_values(chunk, |mut b, r| {
                b.push_bind(r.id.clone())
                    .push_bind(r.slug.clone())
                    .push_bind(r.first_name.clone())
                    .push_bind(r.last_name.clone())
                    .push_bind(r.is_deactivated)
                    .push_bind(r.position.clone())
                    .push_bind(r.image.clone().flatten().map(Json))
                    .push_bind(r.jersey_number)
                    .push_bind(r.matches)
                    .push_bind(r.goals)
                    .push_bind(r.flags.clone())
                    .push_bind(r.age)
                    .push_bind(r.date_of_birth.clone())
                    .push_bind(r.nationality.clone());
            });
            qb.push(
                r#"
                ON CONFLICT (id) DO UPDATE
                   SET slug           = EXCLUDED.slug,
                       first_name     = EXCLUDED.first_name,
                       last_name      = EXCLUDED.last_name,
                       is_deactivated = EXCLUDED.is_deactivated,
                       position       = EXCLUDED.position,
                       image          = EXCLUDED.image,
                       jersey_number  = EXCLUDED.jersey_number,
                       matches        = EXCLUDED.matches,
                       goals          = EXCLUDED.goals,
                       flags          = EXCLUDED.flags,
                       age            = EXCLUDED.age,
                       date_of_birth  = EXCLUDED.date_of_birth,
                       nationality    = EXCLUDED.nationality,
                       updated_at     = NOW()
                RETURNING "#,
            );
            qb.push(COLUMNS);

            let rows: Vec<PlayerRow> = qb.build_query_as().fetch_all(&mut *tx).await?;
            written.extend(rows.into_iter().map(PlayerRecord::from));
        }

        tx.commit().await?;

        // RETURNING order is unspecified; hand rows back in input order.
        let position: HashMap<&str, usize> = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.as_str(), i))
            .collect();
        written.sort_by_key(|r| position.get(r.id.as_str()).copied().unwrap_or(usize::MAX));
        Ok(written)
    }

    async fn list_players(&self) -> Result<Vec<PlayerRecord>, StorageError> {
        let sql = format!("SELECT {COLUMNS} FROM players ORDER BY last_name, first_name");
        let rows = sqlx::query_as::<_, PlayerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(PlayerRecord::from).collect())
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
