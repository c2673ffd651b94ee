//! Document - observable DOM facade
//!
//! Wraps `DomTree` and exposes the mutation entry points. Every entry
//! point applies the tree edit first, then dispatches a `Mutation`
//! record to the hooks installed for it. Hooks observe the document
//! read-only, after the edit.

use thiserror::Error;

use crate::mutation::{EntryPoint, Hook, HookId, HookTable, Mutation};
use crate::node::{Node, NodeData, NodeKind};
use crate::{DomTree, NodeId};

/// DOM operation errors
#[derive(Debug, Error)]
pub enum DomError {
    /// Adjacent insertion on a node with no parent
    #[error("unable to find parent node for {content}")]
    OrphanInsert { content: String },

    /// Element-only operation applied to a non-element
    #[error("node is not an element")]
    NotAnElement,

    /// `replace_child` with an old child that is not a child of parent
    #[error("node to replace is not a child of the given parent")]
    NotAChild,

    /// Operation not supported for this node kind
    #[error("operation not supported for this node kind")]
    InvalidNodeKind,

    /// `attach_shadow` on an element that already hosts one
    #[error("element already hosts a shadow root")]
    ShadowAlreadyAttached,
}

/// Position argument for adjacent insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjacentPosition {
    BeforeBegin,
    AfterBegin,
    BeforeEnd,
    AfterEnd,
}

/// HTML Document with observable mutations
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    hooks: HookTable,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            hooks: HookTable::default(),
        }
    }

    /// Document root id
    #[inline]
    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    /// The underlying tree, read-only
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    // ========================================================================
    // NODE CREATION & QUERIES
    // ========================================================================

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.tree.create_text(content)
    }

    /// Node kind discriminant
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.tree.kind(id)
    }

    /// Lowercase tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree
            .get(id)
            .and_then(Node::as_element)
            .map(|e| e.tag.as_str())
    }

    /// Attribute value of an element
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.tree
            .get(id)
            .and_then(Node::as_element)
            .and_then(|e| e.attribute(name))
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent(id)
    }

    /// Host element when `id` is a shadow root
    pub fn shadow_host(&self, id: NodeId) -> Option<NodeId> {
        match self.tree.get(id)?.data {
            NodeData::ShadowRoot { host } => Some(host),
            _ => None,
        }
    }

    /// Shadow root attached to an element, if any
    pub fn shadow_root(&self, id: NodeId) -> Option<NodeId> {
        let root = self.tree.get(id)?.as_element()?.shadow_root;
        root.is_valid().then_some(root)
    }

    /// Child ids of a node, in order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.tree.children(id)
    }

    /// Preorder descendants of the document root
    pub fn descendants(&self, include_shadow: bool) -> Vec<NodeId> {
        self.tree.descendants(self.tree.root(), include_shadow)
    }

    /// Concatenated text of a node's subtree
    pub fn text_content(&self, id: NodeId, include_shadow: bool) -> String {
        self.tree.text_content(id, include_shadow)
    }

    /// Whether the node's ancestor chain reaches the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.tree.is_connected(id)
    }

    // ========================================================================
    // HOOKS
    // ========================================================================

    /// Install a hook for one entry point
    pub fn add_hook(&mut self, point: EntryPoint, observer: Hook) -> HookId {
        self.hooks.add(point, observer)
    }

    /// Remove an installed hook; returns true if it was installed
    pub fn remove_hook(&mut self, id: HookId) -> bool {
        self.hooks.remove(id)
    }

    /// Number of installed hooks
    pub fn hook_count(&self) -> usize {
        self.hooks.entries.len()
    }

    fn dispatch(&mut self, mutation: Mutation) {
        let point = mutation.entry_point();
        tracing::trace!(entry = point.name(), "mutation");
        // Hooks are taken out for the duration of dispatch so they can
        // observe `&Document` while the table slot is empty.
        let mut entries = std::mem::take(&mut self.hooks.entries);
        for entry in entries.iter_mut().filter(|e| e.point == point) {
            (entry.observer)(&*self, &mutation);
        }
        debug_assert!(self.hooks.entries.is_empty());
        self.hooks.entries = entries;
    }

    // ========================================================================
    // STRUCTURAL ENTRY POINTS
    // ========================================================================

    fn check_container(&self, parent: NodeId) -> Result<(), DomError> {
        match self.tree.get(parent).ok_or(DomError::InvalidNodeKind)?.data {
            NodeData::Document | NodeData::ShadowRoot { .. } | NodeData::Element(_) => Ok(()),
            _ => Err(DomError::InvalidNodeKind),
        }
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.check_container(parent)?;
        self.tree.append(parent, child);
        self.dispatch(Mutation::ChildInserted {
            entry: EntryPoint::AppendChild,
            parent,
            node: child,
        });
        Ok(())
    }

    /// Insert `new` before `reference` under `parent`; appends when
    /// `reference` is `None`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        new: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_container(parent)?;
        match reference {
            Some(reference) => {
                if self.tree.parent(reference) != Some(parent) {
                    return Err(DomError::NotAChild);
                }
                self.tree.insert_before(parent, new, reference);
            }
            None => self.tree.append(parent, new),
        }
        self.dispatch(Mutation::ChildInserted {
            entry: EntryPoint::InsertBefore,
            parent,
            node: new,
        });
        Ok(())
    }

    /// Replace `old` with `new` under `parent`
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new: NodeId,
        old: NodeId,
    ) -> Result<(), DomError> {
        self.check_container(parent)?;
        if self.tree.parent(old) != Some(parent) {
            return Err(DomError::NotAChild);
        }
        self.tree.insert_before(parent, new, old);
        self.tree.detach(old);
        self.dispatch(Mutation::ChildInserted {
            entry: EntryPoint::ReplaceChild,
            parent,
            node: new,
        });
        Ok(())
    }

    /// Insert `new` as the previous sibling of `target`
    ///
    /// No-op when `target` has no parent, matching `ChildNode.before()`.
    pub fn before(&mut self, target: NodeId, new: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.tree.parent(target) else {
            return Ok(());
        };
        self.tree.insert_before(parent, new, target);
        self.dispatch(Mutation::ChildInserted {
            entry: EntryPoint::Before,
            parent,
            node: new,
        });
        Ok(())
    }

    /// Append `new` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, new: NodeId) -> Result<(), DomError> {
        self.check_container(parent)?;
        self.tree.append(parent, new);
        self.dispatch(Mutation::ChildInserted {
            entry: EntryPoint::Append,
            parent,
            node: new,
        });
        Ok(())
    }

    /// Insert `new` as the first child of `parent`
    pub fn prepend(&mut self, parent: NodeId, new: NodeId) -> Result<(), DomError> {
        self.check_container(parent)?;
        match self.tree.get(parent).map(|n| n.first_child) {
            Some(first) if first.is_valid() => self.tree.insert_before(parent, new, first),
            _ => self.tree.append(parent, new),
        }
        self.dispatch(Mutation::ChildInserted {
            entry: EntryPoint::Prepend,
            parent,
            node: new,
        });
        Ok(())
    }

    /// Insert `element` relative to `target`
    ///
    /// Errors with the orphaned content when `target` has no parent.
    pub fn insert_adjacent_element(
        &mut self,
        target: NodeId,
        position: AdjacentPosition,
        element: NodeId,
    ) -> Result<(), DomError> {
        self.insert_adjacent(target, position, element, EntryPoint::InsertAdjacentElement)
    }

    /// Insert a new text node relative to `target`
    pub fn insert_adjacent_text(
        &mut self,
        target: NodeId,
        position: AdjacentPosition,
        text: &str,
    ) -> Result<(), DomError> {
        let node = self.tree.create_text(text);
        self.insert_adjacent(target, position, node, EntryPoint::InsertAdjacentText)
    }

    fn insert_adjacent(
        &mut self,
        target: NodeId,
        position: AdjacentPosition,
        node: NodeId,
        entry: EntryPoint,
    ) -> Result<(), DomError> {
        let Some(target_parent) = self.tree.parent(target) else {
            return Err(DomError::OrphanInsert {
                content: self.describe(node),
            });
        };

        let parent = match position {
            AdjacentPosition::BeforeBegin => {
                self.tree.insert_before(target_parent, node, target);
                target_parent
            }
            AdjacentPosition::AfterEnd => {
                let next = self
                    .tree
                    .get(target)
                    .map(|n| n.next_sibling)
                    .unwrap_or(NodeId::NONE);
                if next.is_valid() {
                    self.tree.insert_before(target_parent, node, next);
                } else {
                    self.tree.append(target_parent, node);
                }
                target_parent
            }
            AdjacentPosition::AfterBegin => {
                let first = self
                    .tree
                    .get(target)
                    .map(|n| n.first_child)
                    .unwrap_or(NodeId::NONE);
                if first.is_valid() {
                    self.tree.insert_before(target, node, first);
                } else {
                    self.tree.append(target, node);
                }
                target
            }
            AdjacentPosition::BeforeEnd => {
                self.tree.append(target, node);
                target
            }
        };

        self.dispatch(Mutation::ChildInserted {
            entry,
            parent,
            node,
        });
        Ok(())
    }

    fn describe(&self, node: NodeId) -> String {
        match self.tree.get(node).map(|n| &n.data) {
            Some(NodeData::Element(e)) => format!("<{}>", e.tag),
            Some(NodeData::Text(t)) => t.content.clone(),
            _ => format!("{node:?}"),
        }
    }

    // ========================================================================
    // CONTENT SETTERS
    // ========================================================================

    /// Replace the full text content of a node
    ///
    /// For elements all children are replaced by a single text node
    /// (or none for an empty string); for text nodes the content is
    /// assigned directly.
    pub fn set_text_content(&mut self, target: NodeId, text: &str) -> Result<(), DomError> {
        match self.tree.get_mut(target).map(|n| &mut n.data) {
            Some(NodeData::Text(data)) => {
                data.content = text.to_string();
            }
            Some(NodeData::Element(_) | NodeData::Document | NodeData::ShadowRoot { .. }) => {
                let children = self.tree.children(target);
                for child in children {
                    self.tree.detach(child);
                }
                if !text.is_empty() {
                    let node = self.tree.create_text(text);
                    self.tree.append(target, node);
                }
            }
            _ => return Err(DomError::InvalidNodeKind),
        }
        self.dispatch(Mutation::TextChanged {
            entry: EntryPoint::TextContent,
            target,
        });
        Ok(())
    }

    /// Assign the node value of a text node
    ///
    /// No-op for node kinds whose `nodeValue` is null.
    pub fn set_node_value(&mut self, target: NodeId, value: &str) -> Result<(), DomError> {
        match self.tree.get_mut(target).map(|n| &mut n.data) {
            Some(NodeData::Text(data)) => {
                data.content = value.to_string();
            }
            Some(NodeData::Comment(content)) => {
                *content = value.to_string();
            }
            Some(_) => return Ok(()),
            None => return Err(DomError::InvalidNodeKind),
        }
        self.dispatch(Mutation::TextChanged {
            entry: EntryPoint::NodeValue,
            target,
        });
        Ok(())
    }

    // ========================================================================
    // ATTRIBUTE ENTRY POINTS
    // ========================================================================

    /// Set an attribute on an element
    pub fn set_attribute(&mut self, target: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self
            .tree
            .get_mut(target)
            .and_then(Node::as_element_mut)
            .ok_or(DomError::NotAnElement)?;
        element.set_attribute(name, value);
        self.dispatch(Mutation::AttributeSet {
            target,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    /// Remove an attribute from an element
    pub fn remove_attribute(&mut self, target: NodeId, name: &str) -> Result<(), DomError> {
        let element = self
            .tree
            .get_mut(target)
            .and_then(Node::as_element_mut)
            .ok_or(DomError::NotAnElement)?;
        element.remove_attribute(name);
        self.dispatch(Mutation::AttributeRemoved {
            target,
            name: name.to_string(),
        });
        Ok(())
    }

    // ========================================================================
    // SHADOW DOM
    // ========================================================================

    /// Attach a shadow root to an element
    pub fn attach_shadow(&mut self, host: NodeId) -> Result<NodeId, DomError> {
        if self
            .tree
            .get(host)
            .and_then(Node::as_element)
            .ok_or(DomError::NotAnElement)?
            .shadow_root
            .is_valid()
        {
            return Err(DomError::ShadowAlreadyAttached);
        }
        let root = self.tree.create_shadow_root(host);
        if let Some(element) = self.tree.get_mut(host).and_then(Node::as_element_mut) {
            element.shadow_root = root;
        }
        Ok(root)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_set_text_content_replaces_children() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let span = doc.create_element("span");
        doc.append_child(div, span).unwrap();

        doc.set_text_content(div, "Hello").unwrap();
        assert_eq!(doc.text_content(div, false), "Hello");
        assert_eq!(doc.children(div).len(), 1);

        doc.set_text_content(div, "").unwrap();
        assert!(doc.children(div).is_empty());
    }

    #[test]
    fn test_hooks_fire_after_edit() {
        let mut doc = Document::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        doc.add_hook(
            EntryPoint::AppendChild,
            Box::new(move |doc, mutation| {
                if let Mutation::ChildInserted { node, .. } = mutation {
                    // Hook observes post-mutation state
                    sink.borrow_mut().push(doc.text_content(*node, false));
                }
            }),
        );

        let div = doc.create_element("div");
        let text = doc.create_text("Hello");
        doc.append_child(div, text).unwrap();
        doc.append_child(doc.root(), div).unwrap();

        assert_eq!(*seen.borrow(), vec!["Hello".to_string(), "Hello".to_string()]);
    }

    #[test]
    fn test_hook_removal_is_idempotent() {
        let mut doc = Document::new();
        let id = doc.add_hook(EntryPoint::SetAttribute, Box::new(|_, _| {}));
        assert_eq!(doc.hook_count(), 1);
        assert!(doc.remove_hook(id));
        assert!(!doc.remove_hook(id));
        assert_eq!(doc.hook_count(), 0);
    }

    #[test]
    fn test_orphan_adjacent_insert_names_content() {
        let mut doc = Document::new();
        let orphan = doc.create_element("div");

        let err = doc
            .insert_adjacent_text(orphan, AdjacentPosition::BeforeBegin, "Hello world")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unable to find parent node for Hello world"
        );

        let element = doc.create_element("span");
        let err = doc
            .insert_adjacent_element(orphan, AdjacentPosition::AfterEnd, element)
            .unwrap_err();
        assert_eq!(err.to_string(), "unable to find parent node for <span>");
    }

    #[test]
    fn test_replace_child_requires_child() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let stranger = doc.create_element("span");
        let new = doc.create_element("b");

        assert!(matches!(
            doc.replace_child(parent, new, stranger),
            Err(DomError::NotAChild)
        ));
    }

    #[test]
    fn test_adjacent_positions() {
        let mut doc = Document::new();
        let parent = doc.create_element("div");
        let target = doc.create_element("span");
        doc.append_child(doc.root(), parent).unwrap();
        doc.append_child(parent, target).unwrap();

        let before = doc.create_element("a");
        doc.insert_adjacent_element(target, AdjacentPosition::BeforeBegin, before)
            .unwrap();
        let after = doc.create_element("b");
        doc.insert_adjacent_element(target, AdjacentPosition::AfterEnd, after)
            .unwrap();

        assert_eq!(doc.children(parent), vec![before, target, after]);

        doc.insert_adjacent_text(target, AdjacentPosition::AfterBegin, "first")
            .unwrap();
        doc.insert_adjacent_text(target, AdjacentPosition::BeforeEnd, "last")
            .unwrap();
        assert_eq!(doc.text_content(target, false), "firstlast");
    }

    #[test]
    fn test_attach_shadow_once() {
        let mut doc = Document::new();
        let host = doc.create_element("div");
        let root = doc.attach_shadow(host).unwrap();

        assert_eq!(doc.shadow_root(host), Some(root));
        assert_eq!(doc.shadow_host(root), Some(host));
        assert!(matches!(
            doc.attach_shadow(host),
            Err(DomError::ShadowAlreadyAttached)
        ));
    }

    #[test]
    fn test_shadow_content_connectivity_and_text() {
        let mut doc = Document::new();
        let host = doc.create_element("div");
        doc.append_child(doc.root(), host).unwrap();
        let root = doc.attach_shadow(host).unwrap();
        let inner = doc.create_element("span");
        doc.append_child(root, inner).unwrap();
        doc.set_text_content(inner, "shadowed").unwrap();

        assert!(doc.is_connected(inner));
        assert_eq!(doc.text_content(host, false), "");
        assert_eq!(doc.text_content(host, true), "shadowed");
    }
}
