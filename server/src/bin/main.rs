use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use teamcore_server::{
    config::Settings,
    db::{InMemoryPlayerStore, PgPlayerStore, PlayerStore},
    http,
    ingest::{source::HttpSquadSource, PlayerIngestor},
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    // Configuration
    let settings = Settings::from_env().context("loading configuration")?;
    log::info!(
        "squad feed {} (schema {})",
        settings.squad.api_url,
        settings.squad.schema
    );

    // Player store: Postgres when configured, process memory otherwise
    let store: Arc<dyn PlayerStore> = match &settings.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(settings.db_max_connections)
                .connect(url)
                .await
                .context("connecting to Postgres")?;
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("creating players table")?;
            Arc::new(PgPlayerStore::new(pool))
        }
        None => {
            log::warn!("DATABASE_URL not set; players are kept in memory only");
            Arc::new(InMemoryPlayerStore::new())
        }
    };

    let source = HttpSquadSource::new(&settings.squad).context("building squad API client")?;
    let ingestor = web::Data::new(PlayerIngestor::new(
        Arc::new(source),
        store.clone(),
        settings.squad.schema,
    ));
    let auth = web::Data::new(settings.auth.clone());
    let store = web::Data::from(store);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(auth.clone())
            .app_data(store.clone())
            .app_data(ingestor.clone())
            .configure(http::routes::init_routes)
    })
    .bind(&settings.server_addr)
    .with_context(|| format!("binding {}", settings.server_addr))?
    .run()
    .await?;

    Ok(())
}
