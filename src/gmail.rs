use crate::auth::TokenManager;
use crate::config::{Config, GMAIL_API_BASE_URL};
use crate::errors::ProviderError;
use crate::provider::{MailProvider, MessageId, MessageMetadata};
use log::{debug, error, info};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

#[derive(Debug, Deserialize)]
struct MessageListResponse {
    #[serde(default)]
    messages: Option<Vec<MessageRef>>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
struct MessageResponse {
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    payload: MessagePayload,
}

#[derive(Debug, Default, Deserialize)]
struct MessagePayload {
    #[serde(default)]
    headers: Vec<Header>,
}

#[derive(Debug, Deserialize)]
struct Header {
    name: String,
    value: String,
}

/// Gmail REST implementation of [`MailProvider`].
///
/// Constructed once at startup and handed to the triage layer by ownership;
/// there is no process-wide lazily-initialized handle. The token cache is the
/// only interior state and sits behind a mutex.
pub struct GmailProvider {
    client: Client,
    token_manager: Mutex<TokenManager>,
    base_url: String,
}

impl GmailProvider {
    pub fn new(config: &Config) -> Self {
        debug!("Creating Gmail provider with OAuth credentials");
        GmailProvider {
            client: Client::new(),
            token_manager: Mutex::new(TokenManager::new(config)),
            base_url: GMAIL_API_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (tests only).
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Swap in a pre-configured token manager (tests point it at a mock
    /// token endpoint).
    pub fn with_token_manager(mut self, token_manager: TokenManager) -> Self {
        self.token_manager = Mutex::new(token_manager);
        self
    }

    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<Response, ProviderError> {
        let token = {
            let mut manager = self.token_manager.lock().await;
            manager.get_token(&self.client).await?
        };

        self.client
            .get(url)
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    ProviderError::Network(e.to_string())
                } else {
                    ProviderError::Api(e.to_string())
                }
            })
    }

    /// Fetch the account profile; used by the connection check.
    pub async fn get_profile(&self) -> Result<serde_json::Value, ProviderError> {
        let url = format!("{}/users/me/profile", self.base_url);
        let response = self.get(&url, &[]).await?;
        let response = check_status(response).await?;

        response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("Failed to parse profile response: {}", e)))
    }
}

impl MailProvider for GmailProvider {
    async fn list_unread(&self, max_results: u32) -> Result<Vec<MessageId>, ProviderError> {
        debug!("Listing unread messages, max_results={}", max_results);

        let url = format!("{}/users/me/messages", self.base_url);
        let max = max_results.to_string();
        let query = [
            ("q", "is:unread"),
            ("maxResults", max.as_str()),
            ("fields", "messages(id),nextPageToken"),
        ];

        let response = self.get(&url, &query).await?;
        let response = check_status(response).await?;

        let listing: MessageListResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("Failed to parse list response: {}", e)))?;

        let ids: Vec<MessageId> = listing
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.id)
            .collect();

        info!("Found {} unread message references", ids.len());
        Ok(ids)
    }

    async fn get_message(&self, id: &str) -> Result<MessageMetadata, ProviderError> {
        debug!("Fetching metadata for message {}", id);

        let url = format!("{}/users/me/messages/{}", self.base_url, id);
        let query = [
            ("format", "metadata"),
            ("metadataHeaders", "From"),
            ("metadataHeaders", "Subject"),
            ("metadataHeaders", "Date"),
        ];

        let response = self.get(&url, &query).await?;
        let response = check_status(response).await?;

        let message: MessageResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Api(format!("Failed to parse message response: {}", e)))?;

        let headers = message
            .payload
            .headers
            .into_iter()
            .map(|h| (h.name.to_lowercase(), h.value))
            .collect();

        Ok(MessageMetadata {
            headers,
            snippet: message.snippet,
        })
    }
}

/// Map an HTTP status to the provider error taxonomy. Only rate limits and
/// server-side failures are transient; auth and not-found surface as-is.
async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<no response body>".to_string());
    error!("Gmail API request failed. Status: {}, Body: {}", status, body);

    let detail = format!("Status: {}, Error: {}", status, body);
    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Auth(detail),
        StatusCode::NOT_FOUND => ProviderError::NotFound(detail),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimit(detail),
        s if s.is_server_error() => ProviderError::Unavailable(detail),
        _ => ProviderError::Api(detail),
    })
}
