//! Prometheus counters for ingestion runs.

use once_cell::sync::Lazy;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

/// Registry exposed on `/api/metrics`.
pub static REGISTRY: Lazy<Registry> =
    Lazy::new(|| Registry::new_custom(Some("teamcore".into()), None).expect("metrics registry"));

/// Finished ingestion runs by `outcome` (`succeeded` / `failed`).
pub static INGEST_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    let counter = IntCounterVec::new(
        Opts::new("ingest_runs_total", "Finished squad ingestion runs"),
        &["outcome"],
    )
    .expect("ingest_runs_total");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("register ingest_runs_total");
    counter
});

/// Player rows written by successful runs.
pub static PLAYERS_UPSERTED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new(
        "ingest_players_upserted_total",
        "Player rows upserted by ingestion runs",
    )
    .expect("ingest_players_upserted_total");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("register ingest_players_upserted_total");
    counter
});

pub fn record_run(success: bool, players: usize) {
    let outcome = if success { "succeeded" } else { "failed" };
    INGEST_RUNS.with_label_values(&[outcome]).inc();
    if success {
        PLAYERS_UPSERTED.inc_by(players as u64);
    }
}

/// Text exposition of every registered metric.
pub fn render() -> Result<String, prometheus::Error> {
    // Touch the lazies so counters show up before the first run.
    Lazy::force(&INGEST_RUNS);
    Lazy::force(&PLAYERS_UPSERTED);

    let mut buf = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
