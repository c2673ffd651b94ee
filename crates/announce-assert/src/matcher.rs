//! Assertion matcher
//!
//! Answers "was this text announced, and with what politeness setting?"
//! against an engine's announcement log. Read-only: matching never
//! mutates the log.

use std::fmt;

use regex::Regex;
use thiserror::Error;

use announce_live::{AnnouncementEngine, Politeness};

/// What to look for in the announcement log
#[derive(Debug, Clone)]
pub enum AnnouncedQuery {
    /// Exact, already-normalized text
    Text(String),
    /// Pattern matched against every recorded text in insertion order
    Pattern(Regex),
}

impl AnnouncedQuery {
    fn is_empty_text(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Pattern(_) => false,
        }
    }

    fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Text(text) => text == candidate,
            Self::Pattern(pattern) => pattern.is_match(candidate),
        }
    }
}

impl fmt::Display for AnnouncedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Pattern(pattern) => write!(f, "/{}/", pattern.as_str()),
        }
    }
}

impl From<&str> for AnnouncedQuery {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for AnnouncedQuery {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Regex> for AnnouncedQuery {
    fn from(pattern: Regex) -> Self {
        Self::Pattern(pattern)
    }
}

/// Matcher outcome: pass/fail plus a human-readable failure message
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub pass: bool,
    pub message: String,
    /// Input was invalid; the assertion fails regardless of negation
    pub invalid_input: bool,
}

/// Failed assertion with its formatted message
#[derive(Debug, Error)]
#[error("{0}")]
pub struct AssertionError(pub String);

/// Deduplicated (text, politeness) entries in insertion order with
/// last-write-wins politeness
fn log_entries(engine: &AnnouncementEngine) -> Vec<(String, Politeness)> {
    let mut entries: Vec<(String, Politeness)> = Vec::new();
    for announcement in engine.announcements() {
        match entries.iter_mut().find(|(text, _)| *text == announcement.text) {
            Some((_, politeness)) => *politeness = announcement.politeness,
            None => entries.push((announcement.text, announcement.politeness)),
        }
    }
    entries
}

fn captured_list(entries: &[(String, Politeness)]) -> String {
    let texts: Vec<&str> = entries.iter().map(|(text, _)| text.as_str()).collect();
    format!("[{}]", texts.join(", "))
}

/// Match `query` against the engine's announcement log
///
/// With a politeness filter, a recorded entry whose politeness differs
/// from the requested one fails with a mismatch message.
pub fn to_be_announced(
    engine: &AnnouncementEngine,
    query: &AnnouncedQuery,
    politeness: Option<Politeness>,
) -> MatchResult {
    if query.is_empty_text() {
        return MatchResult {
            pass: false,
            message: format!("to_be_announced was given falsy or empty string: ({query})"),
            invalid_input: true,
        };
    }

    let entries = log_entries(engine);
    let captured = captured_list(&entries);

    let Some((_, recorded)) = entries.iter().find(|(text, _)| query.matches(text)) else {
        return MatchResult {
            pass: false,
            message: format!("{query} was not announced. Captured announcements: {captured}"),
            invalid_input: false,
        };
    };

    if let Some(expected) = politeness {
        if *recorded != expected {
            return MatchResult {
                pass: false,
                message: format!(
                    "{query} was announced with politeness setting \"{recorded}\" \
                     when \"{expected}\" was expected"
                ),
                invalid_input: false,
            };
        }
    }

    MatchResult {
        pass: true,
        message: format!("{query} was announced. Captured announcements: {captured}"),
        invalid_input: false,
    }
}

/// Assert that `query` was announced, optionally with a given politeness
pub fn expect_announced(
    engine: &AnnouncementEngine,
    query: impl Into<AnnouncedQuery>,
    politeness: Option<Politeness>,
) -> Result<(), AssertionError> {
    let result = to_be_announced(engine, &query.into(), politeness);
    if result.pass {
        Ok(())
    } else {
        Err(AssertionError(result.message))
    }
}

/// Assert that `query` was NOT announced
///
/// Invalid input (empty/blank text) fails even under negation.
pub fn expect_not_announced(
    engine: &AnnouncementEngine,
    query: impl Into<AnnouncedQuery>,
    politeness: Option<Politeness>,
) -> Result<(), AssertionError> {
    let result = to_be_announced(engine, &query.into(), politeness);
    if result.invalid_input || result.pass {
        Err(AssertionError(result.message))
    } else {
        Ok(())
    }
}
