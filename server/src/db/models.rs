use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// Portrait as persisted in the `players.image` JSONB column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub path: String,
    pub alt_text: String,
    pub source: String,
    pub is_svg: bool,
}

/// One row of the `players` table, keyed by the squad API's player id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deactivated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub image: Option<Option<ImageRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jersey_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matches: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    /// Assigned by the store on first insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Refreshed by the store on every write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Raw `players` row as returned by Postgres.
#[derive(Debug, FromRow)]
pub struct PlayerRow {
    pub id: String,
    pub slug: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_deactivated: Option<bool>,
    pub position: Option<String>,
    pub image: Option<Json<ImageRecord>>,
    pub jersey_number: Option<f64>,
    pub matches: Option<i64>,
    pub goals: Option<i64>,
    pub flags: Option<Vec<String>>,
    pub age: Option<i64>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PlayerRow> for PlayerRecord {
    fn from(row: PlayerRow) -> Self {
        PlayerRecord {
            id: row.id,
            slug: row.slug,
            first_name: row.first_name,
            last_name: row.last_name,
            is_deactivated: row.is_deactivated,
            position: row.position,
            // NULL covers both "absent" and "null" once persisted
            image: row.image.map(|Json(img)| Some(img)),
            jersey_number: row.jersey_number,
            matches: row.matches,
            goals: row.goals,
            flags: row.flags,
            age: row.age,
            date_of_birth: row.date_of_birth,
            nationality: row.nationality,
            created_at: Some(row.created_at),
            updated_at: Some(row.updated_at),
        }
    }
}
