//! Where squad payloads come from.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use url::Url;

use crate::config::SquadSettings;

const CLIENT_USER_AGENT: &str = "TeamCore/1.0";

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("squad API responded with {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("request to squad API failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Request(e) => e.status().map(|s| s.as_u16()),
        }
    }
}

/// Remote squad feed. Returns the raw response body; decoding is part of
/// validation.
#[async_trait]
pub trait SquadSource: Send + Sync {
    async fn fetch_squad(&self) -> Result<Vec<u8>, TransportError>;

    /// Human-readable origin for logging.
    fn describe(&self) -> String;
}

/// FUPA squad endpoint over HTTPS.
pub struct HttpSquadSource {
    client: reqwest::Client,
    url: Url,
}

impl HttpSquadSource {
    pub fn new(settings: &SquadSettings) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            client,
            url: settings.api_url.clone(),
        })
    }
}

#[async_trait]
impl SquadSource for HttpSquadSource {
    async fn fetch_squad(&self) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown Status").to_owned(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn describe(&self) -> String {
        self.url.to_string()
    }
}
