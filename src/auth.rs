use crate::config::{get_token_expiry_seconds, Config, OAUTH_TOKEN_URL};
use crate::errors::ProviderError;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, SystemTime};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

/// Caches an OAuth access token and refreshes it through the refresh-token
/// grant when it is missing or about to expire. The interactive consent flow
/// is out of scope; credentials come from [`Config`].
#[derive(Debug, Clone)]
pub struct TokenManager {
    access_token: String,
    expiry: SystemTime,
    refresh_token: String,
    client_id: String,
    client_secret: String,
    token_url: String,
}

impl TokenManager {
    pub fn new(config: &Config) -> Self {
        let expiry = if config.access_token.is_some() {
            // Trust a pre-supplied token for the configured window
            SystemTime::now() + Duration::from_secs(get_token_expiry_seconds())
        } else {
            // Force a refresh on first use
            SystemTime::now()
        };

        Self {
            access_token: config.access_token.clone().unwrap_or_default(),
            expiry,
            refresh_token: config.refresh_token.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            token_url: OAUTH_TOKEN_URL.to_string(),
        }
    }

    /// Override the token endpoint (tests only).
    pub fn with_token_url(mut self, url: &str) -> Self {
        self.token_url = url.to_string();
        self
    }

    pub async fn get_token(&mut self, client: &Client) -> Result<String, ProviderError> {
        if !self.access_token.is_empty() && SystemTime::now() < self.expiry {
            debug!("Using cached access token");
            return Ok(self.access_token.clone());
        }

        debug!("Access token expired or not set, refreshing");

        let params = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", self.refresh_token.as_str()),
            ("grant_type", "refresh_token"),
        ];

        debug!("Requesting token from {}", self.token_url);

        let response = client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<no response body>".to_string());
            error!("Token refresh failed. Status: {}, Error: {}", status, body);
            return Err(ProviderError::Auth(format!(
                "Failed to refresh token. Status: {}, Error: {}",
                status, body
            )));
        }

        let token_data: TokenResponse = response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            ProviderError::Api(format!("Failed to parse token response: {}", e))
        })?;

        self.access_token = token_data.access_token;
        // Expire slightly early so we never send a token on its last second
        let expires_in = token_data.expires_in.saturating_sub(60);
        self.expiry = SystemTime::now() + Duration::from_secs(expires_in);

        debug!("Token refreshed, valid for {} seconds", expires_in);

        Ok(self.access_token.clone())
    }
}
