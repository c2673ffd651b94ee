//! DOM Node - Compact representation
//!
//! Arena-friendly layout:
//! - Sibling/child links are NodeId (4 bytes) instead of pointers
//! - NodeData uses enum discriminant for node-specific payloads

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if detached or root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data: NodeData::Element(ElementData::new(tag)),
        }
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data: NodeData::Text(TextData { content }),
        }
    }

    /// Create a document node
    pub fn document() -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data: NodeData::Document,
        }
    }

    /// Create a shadow root node hosted by `host`
    pub fn shadow_root(host: NodeId) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data: NodeData::ShadowRoot { host },
        }
    }

    /// Create a comment node
    pub fn comment(content: String) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data: NodeData::Comment(content),
        }
    }

    /// Node kind discriminant
    #[inline]
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Element(_) => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node kind discriminant (element / text / other)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Other,
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Shadow subtree root, kept out of the light tree
    ShadowRoot { host: NodeId },
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in document order
    pub attrs: Vec<Attribute>,
    /// Attached shadow root (NONE if no shadow)
    pub shadow_root: NodeId,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            shadow_root: NodeId::NONE,
        }
    }

    /// Get attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute value, replacing any previous value
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attrs.push(Attribute {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
    }

    /// Remove attribute by name, returns true if it existed
    pub fn remove_attribute(&mut self, name: &str) -> bool {
        let len = self.attrs.len();
        self.attrs.retain(|a| a.name != name);
        self.attrs.len() != len
    }
}

/// Element attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Text node data
#[derive(Debug)]
pub struct TextData {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kinds() {
        assert_eq!(Node::element("div").kind(), NodeKind::Element);
        assert_eq!(Node::text("hi".into()).kind(), NodeKind::Text);
        assert_eq!(Node::document().kind(), NodeKind::Other);
        assert_eq!(Node::comment("c".into()).kind(), NodeKind::Other);
    }

    #[test]
    fn test_tag_lowercased() {
        let node = Node::element("OUTPUT");
        assert_eq!(node.as_element().unwrap().tag, "output");
    }

    #[test]
    fn test_attribute_roundtrip() {
        let mut data = ElementData::new("div");
        assert_eq!(data.attribute("role"), None);

        data.set_attribute("role", "status");
        assert_eq!(data.attribute("role"), Some("status"));

        data.set_attribute("role", "alert");
        assert_eq!(data.attribute("role"), Some("alert"));
        assert_eq!(data.attrs.len(), 1);

        assert!(data.remove_attribute("role"));
        assert!(!data.remove_attribute("role"));
        assert_eq!(data.attribute("role"), None);
    }
}
