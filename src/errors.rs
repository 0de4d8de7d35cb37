use std::env;
use thiserror::Error;

/// Errors surfaced by a mail provider.
///
/// The retry layer only ever retries errors classified as transient; auth
/// failures and missing messages propagate immediately.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Message not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    #[error("Provider API error: {0}")]
    Api(String),
}

impl ProviderError {
    /// Whether a retry is likely to succeed (timeout, rate-limit, 5xx).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimit(_) | ProviderError::Network(_) | ProviderError::Unavailable(_)
        )
    }
}

/// Batch-fatal triage errors. Only the initial unread listing can fail the
/// whole batch; per-message failures are carried as [`FetchError`] items.
#[derive(Debug, Error)]
pub enum TriageError {
    #[error("Mail provider unavailable after {attempts} attempts: {source}")]
    ProviderUnavailable {
        attempts: u32,
        #[source]
        source: ProviderError,
    },

    /// Non-transient listing failure (auth, malformed request); surfaced
    /// without retry.
    #[error("Mail provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// A per-message failure inside a batch fetch. The aggregator logs these and
/// drops the message from the result set instead of aborting the batch.
#[derive(Debug, Error)]
#[error("Failed to fetch message {id}: {source}")]
pub struct FetchError {
    pub id: String,
    #[source]
    pub source: ProviderError,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Environment error: {0}")]
    EnvError(#[from] env::VarError),
}
