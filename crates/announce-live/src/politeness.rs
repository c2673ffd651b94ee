//! Politeness resolution and live-region predicates
//!
//! Pure functions over current DOM state. Nothing here caches: role and
//! aria-live are mutable attributes, so every answer is re-derived per
//! call.

use std::fmt;

use announce_dom::{Document, NodeId, NodeKind};

/// ARIA roles that make an element a live-region candidate
pub const LIVE_REGION_ROLES: [&str; 3] = ["status", "log", "alert"];

/// Live-region politeness setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Politeness {
    Polite,
    Assertive,
    Off,
}

impl Politeness {
    /// Parse an `aria-live` attribute value
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "polite" => Some(Self::Polite),
            "assertive" => Some(Self::Assertive),
            "off" => Some(Self::Off),
            _ => None,
        }
    }

    /// Attribute-value representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Polite => "polite",
            Self::Assertive => "assertive",
            Self::Off => "off",
        }
    }
}

impl fmt::Display for Politeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an attribute value makes or keeps an element live-region
/// relevant when written to `role` or `aria-live`
///
/// Covers the live-region roles and every politeness value, `off`
/// included: an explicit `aria-live="off"` keeps the element tracked,
/// it just never announces.
pub fn is_live_region_attribute(value: &str) -> bool {
    LIVE_REGION_ROLES.contains(&value) || Politeness::parse(value).is_some()
}

/// Membership predicate: does this element qualify as a live region?
///
/// role ∈ {status, log, alert}, aria-live ∈ {polite, assertive}, or the
/// `output` tag. Roles with implicit `aria-live="off"` (marquee, timer)
/// are not candidates.
pub fn is_live_region(doc: &Document, id: NodeId) -> bool {
    if doc.kind(id) != NodeKind::Element {
        return false;
    }
    if let Some(role) = doc.attribute(id, "role") {
        if LIVE_REGION_ROLES.contains(&role) {
            return true;
        }
    }
    if let Some(live) = doc.attribute(id, "aria-live") {
        if matches!(Politeness::parse(live), Some(Politeness::Polite | Politeness::Assertive)) {
            return true;
        }
    }
    doc.tag_name(id) == Some("output")
}

/// Nearest element for a node: the node itself, or its closest element
/// ancestor for text and other node kinds
pub fn closest_element(doc: &Document, id: NodeId, include_shadow: bool) -> Option<NodeId> {
    let mut current = Some(id);
    while let Some(node) = current {
        if doc.kind(node) == NodeKind::Element {
            return Some(node);
        }
        current = parent_crossing_shadow(doc, node, include_shadow);
    }
    None
}

/// Nearest live region enclosing `id`, the element itself included
pub fn parent_live_region(doc: &Document, id: NodeId, include_shadow: bool) -> Option<NodeId> {
    let mut current = Some(id);
    while let Some(node) = current {
        if is_live_region(doc, node) {
            return Some(node);
        }
        current = parent_crossing_shadow(doc, node, include_shadow);
    }
    None
}

/// Resolve the effective politeness setting governing a node
///
/// Bounded ancestor walk (element → parent → document root):
/// 1. An explicit `aria-live` value is authoritative, `off` included.
/// 2. role=status and role=log map to polite, role=alert to assertive.
/// 3. The `output` tag maps to polite.
/// 4. Otherwise the walk continues at the nearest live-region ancestor;
///    with none left the setting is `off`.
pub fn resolve_politeness(doc: &Document, id: NodeId, include_shadow: bool) -> Politeness {
    let mut current = match doc.kind(id) {
        NodeKind::Element => Some(id),
        _ => None,
    };

    while let Some(element) = current {
        if let Some(setting) = doc.attribute(element, "aria-live").and_then(Politeness::parse) {
            return setting;
        }

        match doc.attribute(element, "role") {
            Some("status") | Some("log") => return Politeness::Polite,
            Some("alert") => return Politeness::Assertive,
            _ => {}
        }

        if doc.tag_name(element) == Some("output") {
            return Politeness::Polite;
        }

        current = parent_crossing_shadow(doc, element, include_shadow)
            .and_then(|parent| parent_live_region(doc, parent, include_shadow));
    }

    Politeness::Off
}

/// Parent link, optionally hopping from a shadow root to its host
fn parent_crossing_shadow(doc: &Document, id: NodeId, include_shadow: bool) -> Option<NodeId> {
    if let Some(parent) = doc.parent(id) {
        return Some(parent);
    }
    if include_shadow {
        return doc.shadow_host(id);
    }
    None
}
