use std::fmt;

/// Player identifier as issued by the squad API.
///
/// The legacy feed used opaque strings, the current one uses integers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PlayerId {
    Text(String),
    Numeric(i64),
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::Text(s) => f.write_str(s),
            PlayerId::Numeric(n) => write!(f, "{n}"),
        }
    }
}

/// Portrait attached to a player in the squad feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalImage {
    pub path: String,
    pub description: String,
    pub source: String,
    pub svg: bool,
}

/// One validated squad member.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalPlayer {
    pub id: PlayerId,
    pub slug: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub is_deactivated: Option<bool>,
    pub position: Option<String>,
    /// `None` = key absent, `Some(None)` = explicit `null`.
    pub image: Option<Option<ExternalImage>>,
    /// Any JSON number in v1, integers only in v2.
    pub jersey_number: Option<f64>,
    pub matches: Option<i64>,
    pub goals: Option<i64>,
    pub flags: Option<Vec<String>>,
    pub age: Option<i64>,
    pub date_of_birth: Option<String>,
    pub nationality: Option<String>,
}

/// Validated top-level squad response.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SquadPayload {
    pub players: Vec<ExternalPlayer>,
}
