//! Environment → `Settings` parsing.

use std::{collections::HashMap, time::Duration};
use teamcore_server::{
    config::{Settings, DEFAULT_FUPA_API_URL},
    ingest::schema::SchemaVersion,
};

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn minimal_environment_uses_defaults() {
    let s = Settings::from_lookup(lookup(&[
        ("SQUAD_SCHEMA_VERSION", "v2"),
        ("JWT_SECRET", "shh"),
    ]))
    .expect("valid settings");

    assert_eq!(s.server_addr, "127.0.0.1:8080");
    assert!(s.database_url.is_none());
    assert_eq!(s.db_max_connections, 5);
    assert_eq!(s.squad.api_url.as_str(), DEFAULT_FUPA_API_URL);
    assert_eq!(s.squad.schema, SchemaVersion::V2);
    assert_eq!(s.squad.timeout, Duration::from_secs(30));
    assert!(s.auth.audience.is_none());
}

#[test]
fn schema_version_is_never_guessed() {
    let err = Settings::from_lookup(lookup(&[("JWT_SECRET", "shh")])).unwrap_err();
    assert!(err.to_string().contains("SQUAD_SCHEMA_VERSION"));

    let err = Settings::from_lookup(lookup(&[
        ("SQUAD_SCHEMA_VERSION", "v3"),
        ("JWT_SECRET", "shh"),
    ]))
    .unwrap_err();
    assert!(format!("{err:#}").contains("unknown squad schema version"));
}

#[test]
fn jwt_secret_is_required() {
    let err = Settings::from_lookup(lookup(&[("SQUAD_SCHEMA_VERSION", "v1")])).unwrap_err();
    assert!(err.to_string().contains("JWT_SECRET"));
}

#[test]
fn overrides_are_parsed_and_checked() {
    let s = Settings::from_lookup(lookup(&[
        ("SQUAD_SCHEMA_VERSION", "1"),
        ("JWT_SECRET", "shh"),
        ("JWT_AUDIENCE", "authenticated"),
        ("FUPA_API_URL", "https://example.test/squad"),
        ("FUPA_TIMEOUT_SECS", "3"),
        ("DATABASE_URL", "postgres://localhost/teamcore"),
        ("DB_MAX_CONNECTIONS", "12"),
    ]))
    .unwrap();
    assert_eq!(s.squad.schema, SchemaVersion::V1);
    assert_eq!(s.squad.timeout, Duration::from_secs(3));
    assert_eq!(s.squad.api_url.host_str(), Some("example.test"));
    assert_eq!(s.db_max_connections, 12);
    assert_eq!(s.auth.audience.as_deref(), Some("authenticated"));

    let err = Settings::from_lookup(lookup(&[
        ("SQUAD_SCHEMA_VERSION", "v1"),
        ("JWT_SECRET", "shh"),
        ("FUPA_API_URL", "not a url"),
    ]))
    .unwrap_err();
    assert!(err.to_string().contains("FUPA_API_URL"));
}

#[test]
fn debug_output_hides_the_secret() {
    let s = Settings::from_lookup(lookup(&[
        ("SQUAD_SCHEMA_VERSION", "v1"),
        ("JWT_SECRET", "super-secret-value"),
    ]))
    .unwrap();
    let dbg = format!("{s:?}");
    assert!(!dbg.contains("super-secret-value"));
    assert!(dbg.contains("<redacted>"));
}
