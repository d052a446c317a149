//! I/O boundary traits for testability
//!
//! Record lookup is the only I/O the tree builder performs. Services hold an
//! `Arc<dyn RecordLookup>` so tests can answer from memory.

use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::Settings;
use crate::domain::{RecordRequest, RecordValuesResponse};

/// Failure of a lookup call. Passed through to the caller unchanged.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} answered HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("cannot decode lookup response: {0}")]
    Decode(String),
}

/// Batched record lookup.
pub trait RecordLookup: Send + Sync {
    /// Resolve every request of one batch.
    ///
    /// Results are expected in request order; ids the caller may not see
    /// come back as `{"role": "none"}` records without a value.
    fn get_record_values(
        &self,
        requests: &[RecordRequest],
    ) -> Result<RecordValuesResponse, LookupError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

#[derive(Serialize)]
struct GetRecordValuesBody<'a> {
    requests: &'a [RecordRequest],
}

/// HTTP client for the `getRecordValues` endpoint.
#[derive(Debug)]
pub struct NotionClient {
    agent: ureq::Agent,
    base_url: String,
    token_v2: Option<String>,
}

impl NotionClient {
    pub fn new(base_url: impl Into<String>, token_v2: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token_v2,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.api_base_url.clone(),
            settings.token_v2.clone(),
            Duration::from_secs(settings.timeout_secs),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/getRecordValues", self.base_url)
    }
}

impl RecordLookup for NotionClient {
    #[instrument(level = "debug", skip_all, fields(batch = requests.len()))]
    fn get_record_values(
        &self,
        requests: &[RecordRequest],
    ) -> Result<RecordValuesResponse, LookupError> {
        let url = self.endpoint();
        let mut request = self.agent.post(&url);
        if let Some(token) = &self.token_v2 {
            request = request.set("Cookie", &format!("token_v2={}", token));
        }

        match request.send_json(GetRecordValuesBody { requests }) {
            Ok(response) => {
                debug!("{} answered {}", url, response.status());
                response
                    .into_json::<RecordValuesResponse>()
                    .map_err(|e| LookupError::Decode(e.to_string()))
            }
            Err(ureq::Error::Status(status, response)) => Err(LookupError::Status {
                url,
                status,
                body: response.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(transport)) => Err(LookupError::Transport {
                url,
                message: transport.to_string(),
            }),
        }
    }
}
