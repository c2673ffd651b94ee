//! Test-harness wiring
//!
//! Lifecycle glue between a test suite and the capture engine: install
//! at suite start, reset between tests, restore at suite end. The
//! harness is deliberately thin; all detection logic stays in the
//! engine.

use serde::Deserialize;

use announce_dom::Document;
use announce_live::{AnnouncementEngine, CaptureHandle, CaptureOptions, InterceptError};

/// Registration options
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterOptions {
    /// Report polite regions that had content on mount after each test
    pub warn_incorrect_status_messages: bool,
    /// Traverse shadow-attached subtrees during discovery
    pub include_shadow_dom: bool,
}

impl From<RegisterOptions> for CaptureOptions {
    fn from(options: RegisterOptions) -> Self {
        Self {
            warn_incorrect_status_messages: options.warn_incorrect_status_messages,
            include_shadow_dom: options.include_shadow_dom,
        }
    }
}

/// Suite-scoped capture registration
///
/// Owns the engine and its installed instrumentation. Call `after_each`
/// between tests and `teardown` at suite end; dropping the harness
/// without teardown leaves hooks installed, so teardown is part of the
/// suite contract.
#[derive(Debug)]
pub struct Harness {
    engine: AnnouncementEngine,
    handle: Option<CaptureHandle>,
    options: RegisterOptions,
}

impl Harness {
    /// Install announcement capture on `doc`
    pub fn register(doc: &mut Document, options: RegisterOptions) -> Result<Self, InterceptError> {
        let engine = AnnouncementEngine::new(options.into());
        let handle = engine.install(doc)?;
        Ok(Self {
            engine,
            handle: Some(handle),
            options,
        })
    }

    /// The engine backing this registration
    pub fn engine(&self) -> &AnnouncementEngine {
        &self.engine
    }

    /// Between-tests reset
    ///
    /// Emits the incorrectly-used-status-message report when enabled,
    /// then wipes the log, the tracking table and the diagnostics so no
    /// state leaks across tests.
    pub fn after_each(&self) {
        if self.options.warn_incorrect_status_messages {
            let messages = self.engine.incorrect_status_messages();
            if !messages.is_empty() {
                tracing::warn!(
                    count = messages.len(),
                    messages = ?messages,
                    "incorrectly used status messages: polite live regions \
                     should mount empty and receive content via a later update"
                );
            }
        }
        self.engine.clear();
    }

    /// Suite-end teardown: restore instrumentation and forget all state
    pub fn teardown(mut self, doc: &mut Document) {
        if let Some(handle) = self.handle.take() {
            handle.restore(doc);
        }
        self.engine.clear();
    }
}
