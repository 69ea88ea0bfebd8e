//! ApiAssistantClient - HTTP implementation of the assistant round trip.
//!
//! Talks to the remote assistant endpoint: request
//! `{ "message": ..., "history": [...] }`, response `{ "response": ... }`.
//! Any other response shape is a handled failure.

use async_trait::async_trait;
use folio_core::assistant::{AssistantClient, AssistantError};
use folio_core::transcript::Turn;
use folio_infrastructure::FolioPaths;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Assistant client backed by the remote HTTP endpoint.
#[derive(Clone)]
pub struct ApiAssistantClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl ApiAssistantClient {
    /// Creates a client for the given endpoint URL.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Creates a client with the endpoint resolved from configuration.
    ///
    /// Priority: `config.json` under the folio base directory, then the
    /// `FOLIO_ASSISTANT_URL` environment variable, then the local backend
    /// default.
    pub fn from_config(paths: &FolioPaths) -> Self {
        Self::new(crate::config::resolve_endpoint(paths))
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send_request(&self, body: &AskRequest<'_>) -> Result<String, AssistantError> {
        let response = self
            .client
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(body)
            .send()
            .await
            .map_err(|err| AssistantError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(AssistantError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: AskResponse = response
            .json()
            .await
            .map_err(|err| AssistantError::MalformedResponse(err.to_string()))?;

        extract_reply(parsed)
    }
}

#[async_trait]
impl AssistantClient for ApiAssistantClient {
    async fn ask(&self, message: &str, history: &[Turn]) -> Result<String, AssistantError> {
        let request = AskRequest { message, history };

        match self.send_request(&request).await {
            Ok(reply) => Ok(reply),
            Err(err) => {
                // Diagnostics only; the caller substitutes the fallback
                // reply and the conversation continues.
                tracing::error!(endpoint = %self.endpoint, error = %err, "Assistant round trip failed");
                Err(err)
            }
        }
    }
}

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
    history: &'a [Turn],
}

#[derive(Deserialize)]
struct AskResponse {
    response: Option<String>,
}

fn extract_reply(response: AskResponse) -> Result<String, AssistantError> {
    response.response.ok_or_else(|| {
        AssistantError::MalformedResponse("response body is missing the reply field".to_string())
    })
}
