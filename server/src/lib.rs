//! TeamCore server: squad ingestion from the FUPA API into the `players`
//! table, behind an authenticated HTTP trigger.

pub mod config;
pub mod db;
pub mod http;
pub mod ingest;
pub mod metrics;
