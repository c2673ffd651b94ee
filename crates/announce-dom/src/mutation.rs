//! Mutation records and hook table
//!
//! Every observable mutation entry point on `Document` dispatches a
//! `Mutation` record to the hooks registered for it, synchronously and
//! after the tree edit has been applied.

use crate::{Document, NodeId};

/// Named mutation entry points
///
/// Methods mount nodes or touch attributes; setters assign content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    // Structural methods
    AppendChild,
    InsertBefore,
    ReplaceChild,
    Before,
    Append,
    Prepend,
    InsertAdjacentElement,
    InsertAdjacentText,

    // Attribute methods
    SetAttribute,
    RemoveAttribute,

    // Content setters
    TextContent,
    NodeValue,
}

impl EntryPoint {
    /// All interceptable entry points
    pub const ALL: [EntryPoint; 12] = [
        EntryPoint::AppendChild,
        EntryPoint::InsertBefore,
        EntryPoint::ReplaceChild,
        EntryPoint::Before,
        EntryPoint::Append,
        EntryPoint::Prepend,
        EntryPoint::InsertAdjacentElement,
        EntryPoint::InsertAdjacentText,
        EntryPoint::SetAttribute,
        EntryPoint::RemoveAttribute,
        EntryPoint::TextContent,
        EntryPoint::NodeValue,
    ];

    /// Parse a member name into an entry point
    pub fn parse(name: &str) -> Option<Self> {
        Some(match name {
            "append_child" => Self::AppendChild,
            "insert_before" => Self::InsertBefore,
            "replace_child" => Self::ReplaceChild,
            "before" => Self::Before,
            "append" => Self::Append,
            "prepend" => Self::Prepend,
            "insert_adjacent_element" => Self::InsertAdjacentElement,
            "insert_adjacent_text" => Self::InsertAdjacentText,
            "set_attribute" => Self::SetAttribute,
            "remove_attribute" => Self::RemoveAttribute,
            "text_content" => Self::TextContent,
            "node_value" => Self::NodeValue,
            _ => return None,
        })
    }

    /// Member name of this entry point
    pub fn name(&self) -> &'static str {
        match self {
            Self::AppendChild => "append_child",
            Self::InsertBefore => "insert_before",
            Self::ReplaceChild => "replace_child",
            Self::Before => "before",
            Self::Append => "append",
            Self::Prepend => "prepend",
            Self::InsertAdjacentElement => "insert_adjacent_element",
            Self::InsertAdjacentText => "insert_adjacent_text",
            Self::SetAttribute => "set_attribute",
            Self::RemoveAttribute => "remove_attribute",
            Self::TextContent => "text_content",
            Self::NodeValue => "node_value",
        }
    }

    /// Whether this entry point is a property setter rather than a method
    pub fn is_setter(&self) -> bool {
        matches!(self, Self::TextContent | Self::NodeValue)
    }
}

/// A completed mutation, dispatched to hooks after the tree edit
#[derive(Debug, Clone)]
pub enum Mutation {
    /// A node was mounted under `parent` by a structural method
    ChildInserted {
        entry: EntryPoint,
        parent: NodeId,
        node: NodeId,
    },
    /// A content setter replaced the text of `target`
    TextChanged { entry: EntryPoint, target: NodeId },
    /// `set_attribute` wrote `name` on `target`
    AttributeSet {
        target: NodeId,
        name: String,
        value: String,
    },
    /// `remove_attribute` removed `name` from `target`
    AttributeRemoved { target: NodeId, name: String },
}

impl Mutation {
    /// Entry point that produced this mutation
    pub fn entry_point(&self) -> EntryPoint {
        match self {
            Mutation::ChildInserted { entry, .. } => *entry,
            Mutation::TextChanged { entry, .. } => *entry,
            Mutation::AttributeSet { .. } => EntryPoint::SetAttribute,
            Mutation::AttributeRemoved { .. } => EntryPoint::RemoveAttribute,
        }
    }
}

/// Observer invoked after a mutation entry point has run
pub type Hook = Box<dyn FnMut(&Document, &Mutation)>;

/// Identifier of an installed hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(pub(crate) u64);

pub(crate) struct HookEntry {
    pub id: HookId,
    pub point: EntryPoint,
    pub observer: Hook,
}

/// Registry of installed hooks, keyed by entry point
#[derive(Default)]
pub(crate) struct HookTable {
    pub entries: Vec<HookEntry>,
    next_id: u64,
}

impl HookTable {
    pub fn add(&mut self, point: EntryPoint, observer: Hook) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.entries.push(HookEntry {
            id,
            point,
            observer,
        });
        id
    }

    /// Remove a hook by id, returns true if it was installed
    pub fn remove(&mut self, id: HookId) -> bool {
        let len = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != len
    }
}

impl std::fmt::Debug for HookTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookTable")
            .field("installed", &self.entries.len())
            .finish()
    }
}
