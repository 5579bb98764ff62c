//! Squad feed → `players` row mapping.

use super::types::{ExternalImage, ExternalPlayer};
use crate::db::models::{ImageRecord, PlayerRecord};

/// Map one validated player onto its storage row. Timestamps are left for
/// the store to assign.
pub fn to_record(player: ExternalPlayer) -> PlayerRecord {
    PlayerRecord {
        id: player.id.to_string(),
        slug: player.slug,
        first_name: player.first_name,
        last_name: player.last_name,
        is_deactivated: player.is_deactivated,
        position: player.position,
        image: player.image.map(|img| img.map(to_image_record)),
        jersey_number: player.jersey_number,
        matches: player.matches,
        goals: player.goals,
        flags: player.flags,
        age: player.age,
        date_of_birth: player.date_of_birth,
        nationality: player.nationality,
        created_at: None,
        updated_at: None,
    }
}

/// Order-preserving, one record per player.
pub fn to_records(players: Vec<ExternalPlayer>) -> Vec<PlayerRecord> {
    players.into_iter().map(to_record).collect()
}

fn to_image_record(img: ExternalImage) -> ImageRecord {
    ImageRecord {
        path: img.path,
        alt_text: img.description,
        source: img.source,
        is_svg: img.svg,
    }
}
