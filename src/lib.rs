//! Unread-email triage with calendar date extraction.
//!
//! This crate fetches unread-message summaries from a mail provider (Gmail)
//! with bounded retry on transient failures, and scans each message snippet
//! for calendar-relevant date/time mentions, normalizing them to ISO-8601
//! timestamps.
//!
//! # Features
//!
//! - List unread messages and fetch per-message metadata with retry
//! - Isolate per-message failures so one bad message never fails the batch
//! - Extract and normalize date/time mentions from snippets (future-biased)
//! - Check connection status
//!
//! # Testing
//!
//! Retry behavior and triage aggregation are tested against in-memory fake
//! providers; the Gmail HTTP layer is tested against a mock server.

pub mod auth;
pub mod config;
pub mod dates;
pub mod errors;
pub mod gmail;
pub mod logging;
pub mod provider;
pub mod retry;
pub mod triage;

pub use crate::config::{Config, RetrySettings};
pub use crate::dates::{DateExtractor, ExtractionStrategy};
pub use crate::errors::{FetchError, ProviderError, TriageError};
pub use crate::gmail::GmailProvider;
pub use crate::logging::setup_logging;
pub use crate::provider::{MailProvider, MessageId, MessageMetadata};
pub use crate::retry::{with_retry, RetryPolicy};
pub use crate::triage::{MessageSummary, UnreadTriage};
