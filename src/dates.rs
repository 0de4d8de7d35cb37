//! Calendar date extraction from email snippets.
//!
//! Scans free text for calendar-relevant date/time mentions and normalizes
//! them to ISO-8601 timestamps. The canonical strategy considers only the
//! first long-form date and the first clock time in the text; later mentions
//! are ignored (a known limitation of the single-pass design, kept on
//! purpose). A second strategy returns every raw match across a stricter
//! pattern list without normalizing.

use chrono::{Datelike, Local, NaiveDate, NaiveTime};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    // Long-form date: optional day with ordinal suffix, month name, optional
    // day with ordinal suffix, optional 4-digit year.
    // Matches "April 10th, 2025", "10 April 2025", "March 3".
    static ref LONG_FORM_DATE: Regex = Regex::new(
        r"(?i)\b(?:(\d{1,2})(?:st|nd|rd|th)?\s+)?(January|February|March|April|May|June|July|August|September|October|November|December)(?:\s+(\d{1,2})(?:st|nd|rd|th)?\b)?(?:,?\s*(\d{4})\b)?"
    )
    .unwrap();

    // Clock time: "3:00 PM", "3 PM".
    static ref CLOCK_TIME: Regex = Regex::new(r"(?i)\b(\d{1,2})(?::(\d{2}))?\s*(AM|PM)\b").unwrap();

    // Additional patterns used only by the raw strategy.
    static ref NUMERIC_DATE: Regex = Regex::new(r"\b\d{1,2}/\d{1,2}/\d{2,4}\b").unwrap();
    static ref ISO_DATE: Regex = Regex::new(r"\b\d{4}-\d{2}-\d{2}\b").unwrap();
}

/// Which of the two historical extraction behaviors to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionStrategy {
    /// Canonical: first date + first time, normalized to a single ISO-8601
    /// timestamp, future-biased when the year is omitted.
    #[default]
    FirstMatchNormalized,
    /// Every raw match across the full pattern list, un-normalized, in
    /// pattern-priority order.
    AllMatchesRaw,
}

/// Best-effort date/time scanner for message snippets.
///
/// Pure and stateless apart from the reference date used for future-bias
/// resolution, which defaults to today and is injectable for tests.
#[derive(Debug, Clone)]
pub struct DateExtractor {
    reference: NaiveDate,
    strategy: ExtractionStrategy,
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl DateExtractor {
    pub fn new() -> Self {
        DateExtractor {
            reference: Local::now().date_naive(),
            strategy: ExtractionStrategy::default(),
        }
    }

    /// Pin the date used for future-bias resolution.
    pub fn with_reference_date(mut self, reference: NaiveDate) -> Self {
        self.reference = reference;
        self
    }

    pub fn with_strategy(mut self, strategy: ExtractionStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Extract date mentions from `text`.
    ///
    /// Never errors: anything unparseable yields an empty vec. With the
    /// canonical strategy the result has at most one element; date-only
    /// matches are rendered at midnight, naive local time
    /// (`%Y-%m-%dT%H:%M:%S`).
    pub fn extract(&self, text: &str) -> Vec<String> {
        // Flatten to one line so phrases split across lines still match
        let combined = text.lines().collect::<Vec<_>>().join(" ");

        match self.strategy {
            ExtractionStrategy::FirstMatchNormalized => self.first_match_normalized(&combined),
            ExtractionStrategy::AllMatchesRaw => all_matches_raw(&combined),
        }
    }

    fn first_match_normalized(&self, text: &str) -> Vec<String> {
        let Some(caps) = LONG_FORM_DATE.captures(text) else {
            return Vec::new();
        };

        let Some(date) = self.resolve_date(&caps) else {
            debug!("Date phrase {:?} did not resolve, skipping", &caps[0]);
            return Vec::new();
        };

        let time = CLOCK_TIME
            .captures(text)
            .and_then(|c| resolve_time(&c))
            .unwrap_or_else(|| NaiveTime::from_hms_opt(0, 0, 0).unwrap());

        vec![date.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string()]
    }

    /// Resolve the captured date phrase to a calendar date. An explicit year
    /// wins even when it lies in the past; a yearless phrase resolves to the
    /// next occurrence on or after the reference date.
    fn resolve_date(&self, caps: &regex::Captures) -> Option<NaiveDate> {
        let day = caps
            .get(1)
            .or_else(|| caps.get(3))
            .and_then(|m| m.as_str().parse::<u32>().ok())?;
        let month = month_number(caps.get(2)?.as_str())?;

        if let Some(year) = caps.get(4).and_then(|m| m.as_str().parse::<i32>().ok()) {
            return NaiveDate::from_ymd_opt(year, month, day);
        }

        // Future bias: scan forward a few years so Feb 29 still lands on a
        // leap year
        for year in self.reference.year()..=self.reference.year() + 4 {
            if let Some(candidate) = NaiveDate::from_ymd_opt(year, month, day) {
                if candidate >= self.reference {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

/// Resolve a 12-hour clock capture to a time of day. Hours outside 1..=12
/// are unparseable; the caller falls back to date-only output.
fn resolve_time(caps: &regex::Captures) -> Option<NaiveTime> {
    let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let minute: u32 = match caps.get(2) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0,
    };

    let meridiem = caps.get(3)?.as_str().to_lowercase();
    let hour24 = match (hour, meridiem.as_str()) {
        (12, "am") => 0,
        (12, "pm") => 12,
        (h, "am") => h,
        (h, _) => h + 12,
    };

    NaiveTime::from_hms_opt(hour24, minute, 0)
}

fn all_matches_raw(text: &str) -> Vec<String> {
    let patterns: [&Regex; 3] = [&LONG_FORM_DATE, &NUMERIC_DATE, &ISO_DATE];

    patterns
        .iter()
        .flat_map(|pattern| pattern.find_iter(text))
        .map(|m| m.as_str().to_string())
        .collect()
}

fn month_number(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "january" => Some(1),
        "february" => Some(2),
        "march" => Some(3),
        "april" => Some(4),
        "may" => Some(5),
        "june" => Some(6),
        "july" => Some(7),
        "august" => Some(8),
        "september" => Some(9),
        "october" => Some(10),
        "november" => Some(11),
        "december" => Some(12),
        _ => None,
    }
}
