use crate::errors::ProviderError;
use std::collections::HashMap;
use std::future::Future;

/// Opaque provider message key.
pub type MessageId = String;

/// Headers plus snippet for a single message, as returned by the provider's
/// metadata fetch. Header names are lowercased so lookups are
/// case-insensitive.
#[derive(Debug, Clone)]
pub struct MessageMetadata {
    pub headers: HashMap<String, String>,
    pub snippet: String,
}

impl MessageMetadata {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// The mail-provider capability the triage layer depends on. Implemented by
/// [`crate::gmail::GmailProvider`] for the Gmail REST API and by in-memory
/// fakes in tests.
pub trait MailProvider {
    /// List the IDs of unread messages, newest first as reported by the
    /// provider. Zero unread messages is an empty vec, not an error.
    fn list_unread(
        &self,
        max_results: u32,
    ) -> impl Future<Output = Result<Vec<MessageId>, ProviderError>> + Send;

    /// Fetch headers and snippet for one message.
    fn get_message(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<MessageMetadata, ProviderError>> + Send;
}
