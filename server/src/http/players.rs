// src/http/players.rs
//! Stored roster, as last written by the squad sync.

use actix_web::{get, web, HttpResponse, Responder};

use super::auth::JwtAuth;
use crate::db::PlayerStore;

/// GET /api/players
#[get("/players")]
pub async fn list_players(_auth: JwtAuth, store: web::Data<dyn PlayerStore>) -> impl Responder {
    match store.list_players().await {
        Ok(players) => HttpResponse::Ok().json(players),
        Err(e) => {
            log::error!("listing players failed: {e}");
            HttpResponse::InternalServerError().body("DB error")
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_players);
}
