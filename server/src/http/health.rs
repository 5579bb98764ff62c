//! Simple liveness / readiness probe

use actix_web::{get, web, HttpResponse, Responder};

use crate::db::PlayerStore;

#[get("/healthz")]
pub async fn healthz(store: web::Data<dyn PlayerStore>) -> impl Responder {
    if let Err(e) = store.ping().await {
        log::warn!("health check: store unreachable: {e}");
        return HttpResponse::ServiceUnavailable().body("db");
    }

    HttpResponse::Ok().body("ok")
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(healthz);
}
