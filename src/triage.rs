//! Unread-email triage: bounded-retry fetching plus snippet date extraction.

use crate::config::RetrySettings;
use crate::dates::DateExtractor;
use crate::errors::{FetchError, TriageError};
use crate::provider::MailProvider;
use crate::retry::with_retry;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// One unread message, reshaped for the caller. Header values are carried
/// raw; only `potential_dates` is normalized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSummary {
    pub id: String,
    pub from: String,
    pub subject: String,
    pub date: String,
    pub snippet: String,
    #[serde(rename = "potentialDates")]
    pub potential_dates: Vec<String>,
}

/// Fetches unread-message summaries from a mail provider.
///
/// Owns the provider, the per-call-site retry policies, and the date
/// extractor. The listing and the per-message fetches run sequentially; a
/// failing message is logged and skipped, never batch-fatal.
pub struct UnreadTriage<P: MailProvider> {
    provider: P,
    retry: RetrySettings,
    extractor: DateExtractor,
}

impl<P: MailProvider> UnreadTriage<P> {
    pub fn new(provider: P, retry: RetrySettings) -> Self {
        UnreadTriage {
            provider,
            retry,
            extractor: DateExtractor::new(),
        }
    }

    pub fn with_extractor(mut self, extractor: DateExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Fetch unread summaries, keeping per-message failures as `Err` items.
    ///
    /// The listing itself is retried with the list policy; once it succeeds,
    /// every listed ID yields exactly one element, in provider order.
    pub async fn fetch_unread_results(
        &self,
        limit: u32,
    ) -> Result<Vec<Result<MessageSummary, FetchError>>, TriageError> {
        debug!("Fetching unread messages, limit={}", limit);

        let ids = with_retry(&self.retry.list, || self.provider.list_unread(limit))
            .await
            .map_err(|source| {
                if source.is_transient() {
                    TriageError::ProviderUnavailable {
                        attempts: self.retry.list.max_attempts,
                        source,
                    }
                } else {
                    TriageError::Provider(source)
                }
            })?;

        if ids.is_empty() {
            debug!("No unread messages");
            return Ok(Vec::new());
        }

        info!("Listed {} unread messages", ids.len());

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let fetched = with_retry(&self.retry.get, || self.provider.get_message(&id)).await;

            results.push(match fetched {
                Ok(metadata) => {
                    let snippet = metadata.snippet.clone();
                    Ok(MessageSummary {
                        from: header_or(&metadata, "from", "Unknown Sender"),
                        subject: header_or(&metadata, "subject", "No Subject"),
                        date: header_or(&metadata, "date", "Unknown Date"),
                        potential_dates: self.extractor.extract(&snippet),
                        snippet,
                        id,
                    })
                }
                Err(source) => Err(FetchError { id, source }),
            });
        }

        Ok(results)
    }

    /// Fetch unread summaries, dropping failed messages.
    ///
    /// Per-message failures are logged with the failing ID and excluded from
    /// the result; relative order of the survivors matches the listing. Only
    /// an exhausted listing fails the call.
    pub async fn fetch_unread_summaries(
        &self,
        limit: u32,
    ) -> Result<Vec<MessageSummary>, TriageError> {
        let results = self.fetch_unread_results(limit).await?;
        let total = results.len();

        let summaries: Vec<MessageSummary> = results
            .into_iter()
            .filter_map(|result| match result {
                Ok(summary) => Some(summary),
                Err(err) => {
                    warn!("Skipping message {} due to error: {}", err.id, err.source);
                    None
                }
            })
            .collect();

        info!("Fetched {}/{} unread summaries", summaries.len(), total);
        Ok(summaries)
    }
}

fn header_or(metadata: &crate::provider::MessageMetadata, name: &str, default: &str) -> String {
    metadata
        .header(name)
        .map(str::to_string)
        .unwrap_or_else(|| default.to_string())
}
