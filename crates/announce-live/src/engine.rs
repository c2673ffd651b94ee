//! Announcement engine
//!
//! Consumes intercepted mutations, tracks the set of known live regions
//! and their last-seen text, and records qualifying text changes into an
//! append-ordered announcement log.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use announce_dom::{Document, Mutation, NodeId, NodeKind};

use crate::intercept::{InstrumentationSession, InterceptError};
use crate::politeness::{
    closest_element, is_live_region, is_live_region_attribute, parent_live_region,
    resolve_politeness, Politeness,
};

/// Capture configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureOptions {
    /// Warn about polite regions that already have content at mount
    pub warn_incorrect_status_messages: bool,
    /// Traverse shadow-attached subtrees during discovery and text reads
    pub include_shadow_dom: bool,
}

/// A captured announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Whitespace-normalized text
    pub text: String,
    /// Politeness setting at capture time, never `off`
    pub politeness: Politeness,
}

#[derive(Debug, Default)]
struct EngineState {
    options: CaptureOptions,
    /// Tracked live regions mapped to last-seen normalized text
    live_regions: HashMap<NodeId, Option<String>>,
    /// Append-ordered announcement log
    log: Vec<Announcement>,
    /// Polite regions that had content on mount instead of receiving it
    /// via a later update
    incorrect_status_messages: Vec<String>,
    installed: bool,
}

/// Live-region tracking and announcement capture
///
/// One engine owns one tracking table and one announcement log. State is
/// shared between the installed hooks and this handle; `Rc` rather than
/// `Arc` since all capture runs synchronously inside the mutation call.
#[derive(Debug, Clone, Default)]
pub struct AnnouncementEngine {
    state: Rc<RefCell<EngineState>>,
}

/// Installed capture instrumentation, reversible as a unit
#[derive(Debug)]
pub struct CaptureHandle {
    session: InstrumentationSession,
    state: Rc<RefCell<EngineState>>,
}

impl CaptureHandle {
    /// Remove the capture hooks from the document
    pub fn restore(mut self, doc: &mut Document) {
        self.session.restore(doc);
        self.state.borrow_mut().installed = false;
    }
}

/// Mutation methods that mount nodes
const MOUNT_METHODS: [&str; 8] = [
    "append_child",
    "insert_before",
    "replace_child",
    "before",
    "append",
    "prepend",
    "insert_adjacent_element",
    "insert_adjacent_text",
];

/// Content property setters
const CONTENT_SETTERS: [&str; 2] = ["text_content", "node_value"];

impl AnnouncementEngine {
    pub fn new(options: CaptureOptions) -> Self {
        Self {
            state: Rc::new(RefCell::new(EngineState {
                options,
                ..EngineState::default()
            })),
        }
    }

    /// Install capture hooks on every mutation entry point
    ///
    /// The engine must not be installed twice; the returned handle
    /// reverses the whole instrumentation session.
    pub fn install(&self, doc: &mut Document) -> Result<CaptureHandle, InterceptError> {
        {
            let mut state = self.state.borrow_mut();
            if state.installed {
                return Err(InterceptError::AlreadyInstalled);
            }
            state.installed = true;
        }

        let mut session = InstrumentationSession::new();
        if let Err(err) = self.install_hooks(doc, &mut session) {
            // Partial installs are rolled back as a unit
            session.restore(doc);
            self.state.borrow_mut().installed = false;
            return Err(err);
        }

        tracing::debug!(hooks = session.len(), "announcement capture installed");
        Ok(CaptureHandle {
            session,
            state: Rc::clone(&self.state),
        })
    }

    fn install_hooks(
        &self,
        doc: &mut Document,
        session: &mut InstrumentationSession,
    ) -> Result<(), InterceptError> {
        for member in MOUNT_METHODS {
            let state = Rc::clone(&self.state);
            session.method(
                doc,
                member,
                Box::new(move |doc, mutation| {
                    if let Mutation::ChildInserted { node, .. } = mutation {
                        on_node_mount(doc, &mut state.borrow_mut(), *node);
                    }
                }),
            )?;
        }

        let state = Rc::clone(&self.state);
        session.method(
            doc,
            "set_attribute",
            Box::new(move |doc, mutation| {
                if let Mutation::AttributeSet { target, name, value } = mutation {
                    on_set_attribute(doc, &mut state.borrow_mut(), *target, name, value);
                }
            }),
        )?;

        let state = Rc::clone(&self.state);
        session.method(
            doc,
            "remove_attribute",
            Box::new(move |_, mutation| {
                if let Mutation::AttributeRemoved { target, name } = mutation {
                    on_remove_attribute(&mut state.borrow_mut(), *target, name);
                }
            }),
        )?;

        for property in CONTENT_SETTERS {
            let state = Rc::clone(&self.state);
            session.setter(
                doc,
                property,
                Box::new(move |doc, mutation| {
                    if let Mutation::TextChanged { target, .. } = mutation {
                        update_announcements(doc, &mut state.borrow_mut(), *target);
                    }
                }),
            )?;
        }

        Ok(())
    }

    /// Full announcement log in capture order
    ///
    /// Re-announcing the same text after an intermediate value yields a
    /// separate entry.
    pub fn announcements(&self) -> Vec<Announcement> {
        self.state.borrow().log.clone()
    }

    /// Log as a mapping from text to politeness, last write wins
    pub fn announcement_map(&self) -> HashMap<String, Politeness> {
        self.state
            .borrow()
            .log
            .iter()
            .map(|a| (a.text.clone(), a.politeness))
            .collect()
    }

    /// Politeness of the most recent announcement of `text`, if any
    pub fn was_announced(&self, text: &str) -> Option<Politeness> {
        self.state
            .borrow()
            .log
            .iter()
            .rev()
            .find(|a| a.text == text)
            .map(|a| a.politeness)
    }

    /// Polite-region content detected at mount time, in order
    pub fn incorrect_status_messages(&self) -> Vec<String> {
        self.state.borrow().incorrect_status_messages.clone()
    }

    /// Number of tracked live regions
    pub fn tracked_region_count(&self) -> usize {
        self.state.borrow().live_regions.len()
    }

    /// Clear the announcement log only, keeping tracked regions
    pub fn clear_announcements(&self) {
        self.state.borrow_mut().log.clear();
    }

    /// Forget everything: log, tracked regions and diagnostics
    ///
    /// The between-tests reset.
    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.log.clear();
        state.live_regions.clear();
        state.incorrect_status_messages.clear();
    }
}

/// Collapse whitespace runs to single spaces and trim
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn record(state: &mut EngineState, text: String, politeness: Politeness) {
    tracing::debug!(%politeness, %text, "captured announcement");
    state.log.push(Announcement { text, politeness });
}

/// Region text, normalized, honoring the shadow option
fn region_text(doc: &Document, state: &EngineState, region: NodeId) -> String {
    normalize_text(&doc.text_content(region, state.options.include_shadow_dom))
}

/// Begin tracking a newly discovered live region
///
/// The current text becomes the un-announced baseline, except that
/// assertive regions announce content already present at mount. Polite
/// regions with mount-time content are flagged as incorrectly used
/// status messages instead.
fn add_live_region(doc: &Document, state: &mut EngineState, region: NodeId) {
    if state.live_regions.contains_key(&region) {
        return;
    }

    let politeness = resolve_politeness(doc, region, state.options.include_shadow_dom);
    if politeness == Politeness::Off {
        return;
    }

    let text = region_text(doc, state, region);
    let baseline = (!text.is_empty()).then(|| text.clone());
    state.live_regions.insert(region, baseline);

    if text.is_empty() {
        return;
    }
    match politeness {
        Politeness::Assertive => record(state, text, politeness),
        Politeness::Polite => {
            if state.options.warn_incorrect_status_messages {
                tracing::warn!(
                    %text,
                    "polite live region had content on mount; content should be \
                     updated into an empty region"
                );
            }
            state.incorrect_status_messages.push(text);
        }
        Politeness::Off => unreachable!("off regions are never tracked"),
    }
}

/// Discovery scan: classify every qualifying element in the document
fn update_live_regions(doc: &Document, state: &mut EngineState) {
    for id in doc.descendants(state.options.include_shadow_dom) {
        if doc.kind(id) == NodeKind::Element && is_live_region(doc, id) {
            add_live_region(doc, state, id);
        }
    }
}

/// Check whether a mutated node should trigger an announcement
///
/// The node must sit inside a connected live region with a non-off
/// politeness setting, and the region's full text must differ from its
/// cached value. A transition to empty text is never announced but
/// destroys the cached previous state.
fn update_announcements(doc: &Document, state: &mut EngineState, node: NodeId) {
    let include_shadow = state.options.include_shadow_dom;
    let Some(element) = closest_element(doc, node, include_shadow) else {
        return;
    };
    let Some(region) = parent_live_region(doc, element, include_shadow) else {
        return;
    };

    let politeness = resolve_politeness(doc, region, include_shadow);
    if politeness == Politeness::Off || !doc.is_connected(region) {
        return;
    }

    let new_text = region_text(doc, state, region);
    let new_cache = (!new_text.is_empty()).then(|| new_text.clone());
    let previous = state.live_regions.get(&region).cloned().flatten();

    if previous != new_cache {
        if !new_text.is_empty() {
            record(state, new_text, politeness);
        }
        state.live_regions.insert(region, new_cache);
    }
}

/// Structural mount: rescan for new regions, then evaluate the mounted
/// node for a text change
fn on_node_mount(doc: &Document, state: &mut EngineState, node: NodeId) {
    update_live_regions(doc, state);
    update_announcements(doc, state, node);
}

/// Attribute transitions on `role` / `aria-live`
fn on_set_attribute(
    doc: &Document,
    state: &mut EngineState,
    target: NodeId,
    name: &str,
    value: &str,
) {
    if name != "role" && name != "aria-live" {
        return;
    }
    if !doc.is_connected(target) {
        return;
    }

    let tracked = state.live_regions.contains_key(&target);
    let live_attribute = is_live_region_attribute(value);

    // Qualifying attribute changed to something else: stop tracking
    if tracked && !live_attribute {
        state.live_regions.remove(&target);
        return;
    }

    // Newly qualifying: classify as if freshly mounted
    if !tracked && live_attribute {
        add_live_region(doc, state, target);
        return;
    }

    // Still qualifying; an assertive setting re-evaluates current text
    if tracked
        && live_attribute
        && resolve_politeness(doc, target, state.options.include_shadow_dom)
            == Politeness::Assertive
    {
        update_announcements(doc, state, target);
    }
}

fn on_remove_attribute(state: &mut EngineState, target: NodeId, name: &str) {
    if name != "role" && name != "aria-live" {
        return;
    }
    state.live_regions.remove(&target);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  Hello \n\t world  "), "Hello world");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text("   "), "");
    }

    #[test]
    fn test_double_install_rejected() {
        let mut doc = Document::new();
        let engine = AnnouncementEngine::default();
        let handle = engine.install(&mut doc).unwrap();
        assert!(matches!(
            engine.install(&mut doc),
            Err(InterceptError::AlreadyInstalled)
        ));

        handle.restore(&mut doc);
        assert_eq!(doc.hook_count(), 0);
        // Restoring frees the engine for reinstallation
        engine.install(&mut doc).unwrap();
    }

    #[test]
    fn test_basic_capture_and_clear() {
        let mut doc = Document::new();
        let engine = AnnouncementEngine::default();
        let _handle = engine.install(&mut doc).unwrap();

        let region = doc.create_element("div");
        doc.set_attribute(region, "role", "status").unwrap();
        doc.append_child(doc.root(), region).unwrap();
        doc.set_text_content(region, "Hello world").unwrap();

        assert_eq!(engine.was_announced("Hello world"), Some(Politeness::Polite));
        assert_eq!(engine.tracked_region_count(), 1);

        engine.clear_announcements();
        assert_eq!(engine.was_announced("Hello world"), None);
        assert_eq!(engine.tracked_region_count(), 1);

        engine.clear();
        assert_eq!(engine.tracked_region_count(), 0);
    }
}
