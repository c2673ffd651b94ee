//! announce-dom - Document Object Model
//!
//! Minimal DOM tree with observable mutation entry points. The tree is
//! deliberately small: just enough structure, attribute and content APIs
//! for live-region capture, with a hook table that lets instrumentation
//! observe every mutation synchronously.

mod document;
mod mutation;
mod node;
mod tree;

pub use document::{AdjacentPosition, Document, DomError};
pub use mutation::{EntryPoint, Hook, HookId, Mutation};
pub use node::{Attribute, ElementData, Node, NodeData, NodeKind, TextData};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Whether this id refers to a node
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::NONE
    }
}
