//! Block-level node model

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use unicode_segmentation::UnicodeSegmentation;

/// The kind of block-level node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Regular paragraph
    Paragraph,
    /// Heading (level carried in attrs, 1-6)
    Heading,
    /// List item
    ListItem,
    /// Bulleted list wrapper
    BulletList,
    /// Numbered list wrapper
    OrderedList,
    /// Preformatted code block
    CodeBlock,
    /// Quote wrapper
    Blockquote,
    /// Horizontal rule
    HorizontalRule,
    /// Anything the host produces that we do not recognize
    Unknown,
}

impl NodeKind {
    /// Container kinds wrap other blocks and are never measured directly
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::BulletList | NodeKind::OrderedList | NodeKind::Blockquote
        )
    }
}

/// Host-supplied node attributes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct NodeAttrs {
    /// Heading level, 1-6
    pub level: Option<u8>,
}

/// A block-level node in a document snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The kind of block
    pub kind: NodeKind,
    /// Host-supplied attributes
    pub attrs: NodeAttrs,
    /// Inline content flattened into this node
    pub text: String,
    /// Ordered block children
    pub children: Vec<Node>,
    /// Token span in host position units
    size: usize,
}

impl Node {
    /// Create a new paragraph
    pub fn paragraph(text: &str) -> Self {
        Self::text_block(NodeKind::Paragraph, NodeAttrs::default(), text)
    }

    /// Create a new heading
    pub fn heading(level: u8, text: &str) -> Self {
        let attrs = NodeAttrs {
            level: Some(level.min(6).max(1)),
        };
        Self::text_block(NodeKind::Heading, attrs, text)
    }

    /// Create a new list item
    pub fn list_item(text: &str) -> Self {
        Self::text_block(NodeKind::ListItem, NodeAttrs::default(), text)
    }

    /// Create a new code block
    pub fn code_block(text: &str) -> Self {
        Self::text_block(NodeKind::CodeBlock, NodeAttrs::default(), text)
    }

    /// Create a bulleted list wrapper
    pub fn bullet_list(items: Vec<Node>) -> Self {
        Self::wrapper(NodeKind::BulletList, items)
    }

    /// Create a numbered list wrapper
    pub fn ordered_list(items: Vec<Node>) -> Self {
        Self::wrapper(NodeKind::OrderedList, items)
    }

    /// Create a quote wrapper
    pub fn blockquote(children: Vec<Node>) -> Self {
        Self::wrapper(NodeKind::Blockquote, children)
    }

    /// Create a horizontal rule
    pub fn horizontal_rule() -> Self {
        Self {
            kind: NodeKind::HorizontalRule,
            attrs: NodeAttrs::default(),
            text: String::new(),
            children: Vec::new(),
            size: 1,
        }
    }

    /// Create an unrecognized leaf
    pub fn unknown(text: &str) -> Self {
        Self::text_block(NodeKind::Unknown, NodeAttrs::default(), text)
    }

    fn text_block(kind: NodeKind, attrs: NodeAttrs, text: &str) -> Self {
        Self {
            kind,
            attrs,
            text: text.to_string(),
            children: Vec::new(),
            size: 2 + text.chars().count(),
        }
    }

    fn wrapper(kind: NodeKind, children: Vec<Node>) -> Self {
        let size = 2 + children.iter().map(Node::size).sum::<usize>();
        Self {
            kind,
            attrs: NodeAttrs::default(),
            text: String::new(),
            children,
            size,
        }
    }

    /// Assemble a node with an externally computed token span
    pub(crate) fn assemble(
        kind: NodeKind,
        attrs: NodeAttrs,
        text: String,
        children: Vec<Node>,
        size: usize,
    ) -> Self {
        Self {
            kind,
            attrs,
            text,
            children,
            size,
        }
    }

    /// Token span of this node in host position units
    pub fn size(&self) -> usize {
        self.size
    }

    /// Heading level, clamped to 1-6
    pub fn heading_level(&self) -> u8 {
        self.attrs.level.unwrap_or(1).min(6).max(1)
    }

    /// Visual text length in grapheme clusters
    pub fn text_len(&self) -> usize {
        self.text.graphemes(true).count()
    }

    /// Whether this node wraps other blocks instead of carrying flowed text
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
            || (self.kind == NodeKind::Unknown && self.text.is_empty() && !self.children.is_empty())
    }

    /// Hash of everything a heuristic height depends on
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.kind.hash(&mut hasher);
        self.attrs.hash(&mut hasher);
        self.text.hash(&mut hasher);
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind_classes() {
        assert!(NodeKind::BulletList.is_container());
        assert!(NodeKind::Blockquote.is_container());
        assert!(!NodeKind::Paragraph.is_container());
        assert!(!NodeKind::HorizontalRule.is_container());
    }

    #[test]
    fn test_heading_level_clamped() {
        assert_eq!(Node::heading(0, "t").heading_level(), 1);
        assert_eq!(Node::heading(3, "t").heading_level(), 3);
        assert_eq!(Node::heading(9, "t").heading_level(), 6);
    }

    #[test]
    fn test_token_sizes() {
        assert_eq!(Node::paragraph("hello").size(), 7);
        assert_eq!(Node::paragraph("").size(), 2);
        assert_eq!(Node::horizontal_rule().size(), 1);

        let list = Node::bullet_list(vec![Node::list_item("ab"), Node::list_item("cd")]);
        assert_eq!(list.size(), 2 + 4 + 4);

        let numbered = Node::ordered_list(vec![Node::list_item("ab")]);
        assert_eq!(numbered.size(), 2 + 4);
    }

    #[test]
    fn test_text_len_counts_graphemes() {
        let node = Node::paragraph("e\u{301}x");
        assert_eq!(node.text_len(), 2);
        assert_eq!(node.size(), 2 + 3);
    }

    #[test]
    fn test_content_hash_tracks_content() {
        let a = Node::paragraph("same");
        let b = Node::paragraph("same");
        assert_eq!(a.content_hash(), b.content_hash());

        let c = Node::paragraph("other");
        assert_ne!(a.content_hash(), c.content_hash());

        let h = Node::heading(2, "same");
        assert_ne!(a.content_hash(), h.content_hash());
    }

    #[test]
    fn test_unknown_with_children_is_container() {
        let wrapper = Node::assemble(
            NodeKind::Unknown,
            NodeAttrs::default(),
            String::new(),
            vec![Node::paragraph("inner")],
            9,
        );
        assert!(wrapper.is_container());
        assert!(!Node::unknown("text").is_container());
    }
}
