//! DOM Tree - Arena storage
//!
//! Nodes live in a flat Vec and reference each other by NodeId.
//! Structural edits here are raw tree surgery; the observable mutation
//! entry points live on `Document`.

use crate::node::{Node, NodeData, NodeKind};
use crate::NodeId;

/// Arena-backed DOM tree
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree containing only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document root id
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena (including detached ones)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get node by id
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_valid() {
            self.nodes.get(id.0 as usize)
        } else {
            None
        }
    }

    /// Get mutable node by id
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_valid() {
            self.nodes.get_mut(id.0 as usize)
        } else {
            None
        }
    }

    /// Node kind discriminant, `Other` for invalid ids
    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.get(id).map(Node::kind).unwrap_or(NodeKind::Other)
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    /// Create a detached comment node
    pub fn create_comment(&mut self, content: &str) -> NodeId {
        self.push(Node::comment(content.to_string()))
    }

    /// Create a shadow root node for `host`
    pub(crate) fn create_shadow_root(&mut self, host: NodeId) -> NodeId {
        self.push(Node::shadow_root(host))
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent;
        parent.is_valid().then_some(parent)
    }

    /// Detach a node from its parent and siblings
    pub fn detach(&mut self, id: NodeId) {
        let (parent, prev, next) = match self.get(id) {
            Some(node) => (node.parent, node.prev_sibling, node.next_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(prev) {
            node.next_sibling = next;
        }
        if let Some(node) = self.get_mut(next) {
            node.prev_sibling = prev;
        }
        if let Some(node) = self.get_mut(parent) {
            if node.first_child == id {
                node.first_child = next;
            }
            if node.last_child == id {
                node.last_child = prev;
            }
        }
        if let Some(node) = self.get_mut(id) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    /// Append `child` as the last child of `parent`
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let last = self.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last;
        }
        if let Some(node) = self.get_mut(last) {
            node.next_sibling = child;
        }
        if let Some(node) = self.get_mut(parent) {
            if !node.first_child.is_valid() {
                node.first_child = child;
            }
            node.last_child = child;
        }
    }

    /// Insert `new` immediately before `reference` under `parent`
    pub fn insert_before(&mut self, parent: NodeId, new: NodeId, reference: NodeId) {
        self.detach(new);

        let prev = self
            .get(reference)
            .map(|n| n.prev_sibling)
            .unwrap_or(NodeId::NONE);
        if let Some(node) = self.get_mut(new) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if let Some(node) = self.get_mut(prev) {
            node.next_sibling = new;
        }
        if let Some(node) = self.get_mut(reference) {
            node.prev_sibling = new;
        }
        if let Some(node) = self.get_mut(parent) {
            if node.first_child == reference {
                node.first_child = new;
            }
        }
    }

    /// Child ids of a node, in order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut child = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        while let Some(node) = self.get(child) {
            out.push(child);
            child = node.next_sibling;
        }
        out
    }

    /// Preorder descendants of `root` (excluding `root` itself)
    ///
    /// With `include_shadow`, shadow subtrees are visited after their
    /// host's light subtree, the root's own shadow included.
    pub fn descendants(&self, root: NodeId, include_shadow: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = Vec::new();

        self.push_frame(&mut stack, root, include_shadow);
        while let Some(id) = stack.pop() {
            out.push(id);
            self.push_frame(&mut stack, id, include_shadow);
        }
        out
    }

    /// Push a node's shadow root and reversed children onto the
    /// traversal stack, children on top
    fn push_frame(&self, stack: &mut Vec<NodeId>, id: NodeId, include_shadow: bool) {
        if include_shadow {
            if let Some(elem) = self.get(id).and_then(Node::as_element) {
                if elem.shadow_root.is_valid() {
                    stack.push(elem.shadow_root);
                }
            }
        }
        let mut children = self.children(id);
        children.reverse();
        stack.extend(children);
    }

    /// Concatenated text of a node's subtree
    pub fn text_content(&self, id: NodeId, include_shadow: bool) -> String {
        let mut out = String::new();
        if let Some(text) = self.get(id).and_then(Node::as_text) {
            out.push_str(text);
        }
        for child in self.descendants(id, include_shadow) {
            if let Some(text) = self.get(child).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    /// Whether the node's ancestor chain reaches the document root
    ///
    /// Crosses shadow boundaries through the host element: a shadow
    /// subtree attached to a connected host is connected.
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root() {
                return true;
            }
            let Some(node) = self.get(current) else {
                return false;
            };
            if node.parent.is_valid() {
                current = node.parent;
                continue;
            }
            match node.data {
                NodeData::ShadowRoot { host } => current = host,
                _ => return false,
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}
