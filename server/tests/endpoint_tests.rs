//! HTTP surface: auth gate, sync trigger responses, roster listing.

use actix_web::{http::StatusCode, test, web, App};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use teamcore_server::{
    config::AuthSettings,
    db::{InMemoryPlayerStore, PlayerStore},
    http,
    ingest::{
        schema::SchemaVersion,
        source::{SquadSource, TransportError},
        PlayerIngestor,
    },
};
use uuid::Uuid;

const SECRET: &str = "test-secret";

struct FixedSource(Result<&'static str, u16>);

#[async_trait]
impl SquadSource for FixedSource {
    async fn fetch_squad(&self) -> Result<Vec<u8>, TransportError> {
        match self.0 {
            Ok(body) => Ok(body.as_bytes().to_vec()),
            Err(status) => Err(TransportError::Status {
                status,
                reason: "Bad Gateway".into(),
            }),
        }
    }

    fn describe(&self) -> String {
        "fixed".into()
    }
}

struct PanickingSource;

#[async_trait]
impl SquadSource for PanickingSource {
    async fn fetch_squad(&self) -> Result<Vec<u8>, TransportError> {
        panic!("connection pool poisoned: secret-dsn");
    }

    fn describe(&self) -> String {
        "panicking".into()
    }
}

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    aud: Option<String>,
}

fn token_for(sub: &str, secret: &str, aud: Option<&str>) -> String {
    let claims = TestClaims {
        sub: sub.to_string(),
        exp: (Utc::now().timestamp() + 600) as usize,
        aud: aud.map(str::to_string),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn bearer() -> (&'static str, String) {
    (
        "Authorization",
        format!("Bearer {}", token_for(&Uuid::new_v4().to_string(), SECRET, None)),
    )
}

macro_rules! app {
    ($source:expr, $store:expr, $audience:expr) => {{
        let store: Arc<InMemoryPlayerStore> = $store;
        let ingestor = PlayerIngestor::new(Arc::new($source), store.clone(), SchemaVersion::V1);
        let dyn_store: Arc<dyn PlayerStore> = store;
        test::init_service(
            App::new()
                .app_data(web::Data::new(AuthSettings {
                    jwt_secret: SECRET.into(),
                    audience: $audience,
                }))
                .app_data(web::Data::from(dyn_store))
                .app_data(web::Data::new(ingestor))
                .configure(http::routes::init_routes),
        )
        .await
    }};
}

const SQUAD: &str = r#"{"players":[
    {"id":"p-1","firstName":"Lena","lastName":"Maier"},
    {"id":"p-2","firstName":"Tom","lastName":"Adler"}
]}"#;

#[actix_web::test]
async fn sync_requires_a_bearer_token() {
    let store = Arc::new(InMemoryPlayerStore::new());
    let app = app!(FixedSource(Ok(SQUAD)), store.clone(), None);

    let req = test::TestRequest::post().uri("/api/players/sync").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Unauthorized");
    assert!(store.is_empty(), "no run without auth");
}

#[actix_web::test]
async fn sync_rejects_tokens_signed_with_another_secret() {
    let app = app!(FixedSource(Ok(SQUAD)), Arc::new(InMemoryPlayerStore::new()), None);

    let forged = token_for(&Uuid::new_v4().to_string(), "not-the-secret", None);
    let req = test::TestRequest::post()
        .uri("/api/players/sync")
        .insert_header(("Authorization", format!("Bearer {forged}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn sync_checks_audience_when_configured() {
    let app = app!(
        FixedSource(Ok(SQUAD)),
        Arc::new(InMemoryPlayerStore::new()),
        Some("authenticated".to_string())
    );
    let sub = Uuid::new_v4().to_string();

    let wrong = token_for(&sub, SECRET, Some("anon"));
    let req = test::TestRequest::post()
        .uri("/api/players/sync")
        .insert_header(("Authorization", format!("Bearer {wrong}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);

    let right = token_for(&sub, SECRET, Some("authenticated"));
    let req = test::TestRequest::post()
        .uri("/api/players/sync")
        .insert_header(("Authorization", format!("Bearer {right}")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_web::test]
async fn sync_reports_processed_players() {
    let store = Arc::new(InMemoryPlayerStore::new());
    let app = app!(FixedSource(Ok(SQUAD)), store.clone(), None);

    let req = test::TestRequest::post()
        .uri("/api/players/sync")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Players fetched and stored successfully");
    assert_eq!(body["playersProcessed"], 2);
    assert!(body["timestamp"].is_string());
    assert!(body.get("warnings").is_none());
    assert_eq!(store.len(), 2);
}

#[actix_web::test]
async fn sync_failure_returns_500_with_message() {
    let app = app!(FixedSource(Err(502)), Arc::new(InMemoryPlayerStore::new()), None);

    let req = test::TestRequest::post()
        .uri("/api/players/sync")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Failed to fetch and store players");
    assert_eq!(body["playersProcessed"], 0);
    assert!(body["message"].as_str().unwrap().contains("502"));
}

#[actix_web::test]
async fn sync_panic_is_reported_generically() {
    let store = Arc::new(InMemoryPlayerStore::new());
    let app = app!(PanickingSource, store.clone(), None);

    let req = test::TestRequest::post()
        .uri("/api/players/sync")
        .insert_header(bearer())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["message"], "Unknown error occurred");
    assert!(body["timestamp"].is_string());
    assert!(!body.to_string().contains("secret-dsn"));
    assert!(store.is_empty());
}

#[actix_web::test]
async fn sync_only_accepts_post() {
    let app = app!(FixedSource(Ok(SQUAD)), Arc::new(InMemoryPlayerStore::new()), None);

    let req = test::TestRequest::get().uri("/api/players/sync").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Method Not Allowed");
}

#[actix_web::test]
async fn roster_lists_synced_players_by_last_name() {
    let store = Arc::new(InMemoryPlayerStore::new());
    let app = app!(FixedSource(Ok(SQUAD)), store, None);

    let sync = test::TestRequest::post()
        .uri("/api/players/sync")
        .insert_header(bearer())
        .to_request();
    assert!(test::call_service(&app, sync).await.status().is_success());

    let req = test::TestRequest::get()
        .uri("/api/players")
        .insert_header(bearer())
        .to_request();
    let players: Value = test::call_and_read_body_json(&app, req).await;
    let names: Vec<&str> = players
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["last_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Adler", "Maier"]);
}

#[actix_web::test]
async fn roster_requires_auth() {
    let app = app!(FixedSource(Ok(SQUAD)), Arc::new(InMemoryPlayerStore::new()), None);
    let req = test::TestRequest::get().uri("/api/players").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn health_and_metrics_are_public() {
    let app = app!(FixedSource(Ok(SQUAD)), Arc::new(InMemoryPlayerStore::new()), None);

    let req = test::TestRequest::get().uri("/api/healthz").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, "ok");

    let req = test::TestRequest::get().uri("/api/metrics").to_request();
    let body = test::call_and_read_body(&app, req).await;
    let text = String::from_utf8_lossy(&body);
    assert!(text.contains("teamcore_ingest_players_upserted_total"), "{text}");
}
