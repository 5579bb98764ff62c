use actix_web::{get, web, HttpResponse, Responder};

use crate::metrics;

/// GET /api/metrics (Prometheus text format)
#[get("/metrics")]
pub async fn scrape() -> impl Responder {
    match metrics::render() {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/plain; version=0.0.4")
            .body(body),
        Err(e) => {
            log::error!("metrics encoding failed: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(scrape);
}
