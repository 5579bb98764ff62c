//! POST /api/players/sync: pull the squad from the feed into `players`.

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use serde::Serialize;
use serde_json::json;
use std::panic::AssertUnwindSafe;

use super::auth::JwtAuth;
use crate::ingest::PlayerIngestor;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncSucceeded {
    pub message: &'static str,
    pub players_processed: usize,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncFailed {
    pub error: &'static str,
    pub message: String,
    pub players_processed: usize,
    pub timestamp: DateTime<Utc>,
}

pub async fn sync_players(auth: JwtAuth, ingestor: web::Data<PlayerIngestor>) -> HttpResponse {
    log::info!("squad sync requested by {}", auth.user_id);

    // Anything that escapes the run itself is reported without internals.
    let outcome = AssertUnwindSafe(ingestor.run()).catch_unwind().await;
    let result = match outcome {
        Ok(result) => result,
        Err(_) => {
            log::error!("squad sync panicked");
            return HttpResponse::InternalServerError().json(json!({
                "error": "Internal Server Error",
                "message": "Unknown error occurred",
                "timestamp": Utc::now(),
            }));
        }
    };

    if result.success {
        HttpResponse::Ok().json(SyncSucceeded {
            message: "Players fetched and stored successfully",
            players_processed: result.players_processed,
            timestamp: Utc::now(),
            warnings: result.errors,
        })
    } else {
        HttpResponse::InternalServerError().json(SyncFailed {
            error: "Failed to fetch and store players",
            message: result.errors.join("; "),
            players_processed: result.players_processed,
            timestamp: Utc::now(),
        })
    }
}

async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header(("Allow", "POST"))
        .json(json!({
            "error": "Method Not Allowed",
            "message": "This endpoint only accepts POST requests",
        }))
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/players/sync")
            .route(web::post().to(sync_players))
            .default_service(web::to(method_not_allowed)),
    );
}
