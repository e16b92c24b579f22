use reqwest::header::CONTENT_TYPE;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::client::Filters;
use crate::events::LogEntry;
use crate::server::EVENTS_LOG_ROUTE;
use crate::types::ApiResponse;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A newer request, or the caller, cancelled this one.
    #[error("Request was cancelled")]
    Cancelled,

    #[error("HTTP {status} {reason} {body}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// The server answered 2xx but reported a failure.
    #[error("{0}")]
    Rejected(String),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// HTTP client for `GET /events/log`
#[derive(Debug, Clone)]
pub struct EventsClient {
    http: reqwest::Client,
    base_url: String,
}

impl EventsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn events_url(&self) -> String {
        format!("{}{}", self.base_url, EVENTS_LOG_ROUTE)
    }

    /// Fetch the entries matching `filters`. Cancelling `cancel` abandons
    /// the request with [`ClientError::Cancelled`]; the server is not told.
    pub async fn fetch_events(
        &self,
        filters: &Filters,
        cancel: &CancellationToken,
    ) -> Result<Vec<LogEntry>, ClientError> {
        let request = self
            .http
            .get(self.events_url())
            .query(&filters.query_pairs())
            .header(CONTENT_TYPE, "application/json");

        tracing::debug!("Fetching events from {} with {filters:?}", self.events_url());

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            result = Self::send(request) => result,
        }
    }

    async fn send(request: reqwest::RequestBuilder) -> Result<Vec<LogEntry>, ClientError> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                body,
            });
        }

        let data: ApiResponse = response.json().await?;
        if !data.is_success {
            let message = if data.message.is_empty() {
                "Request failed".to_string()
            } else {
                data.message
            };
            return Err(ClientError::Rejected(message));
        }

        Ok(data.result.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_url_strips_trailing_slash() {
        let client = EventsClient::new("http://localhost:3030/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3030");
        assert_eq!(client.events_url(), "http://localhost:3030/events/log");
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        // Nothing listens on port 9; the cancelled branch must win first.
        let client = EventsClient::new("http://127.0.0.1:9").unwrap();
        let token = CancellationToken::new();
        token.cancel();

        let result = client.fetch_events(&Filters::default(), &token).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }

    #[test]
    fn test_status_error_message() {
        let err = ClientError::Status {
            status: 404,
            reason: "Not Found".to_string(),
            body: "{}".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 Not Found {}");
    }
}
