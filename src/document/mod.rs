//! Document snapshot model

mod json;
mod node;

pub use node::{Node, NodeAttrs, NodeKind};

/// One consistent snapshot of the host document's block tree
///
/// The host editing framework owns the real document; this mirror is replaced
/// wholesale on structural transactions and is never mutated in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    /// Top-level blocks in document order
    blocks: Vec<Node>,
    /// Monotonic version counter assigned by the session
    version: u64,
}

impl Document {
    /// Create a snapshot from top-level blocks
    pub fn new(blocks: Vec<Node>) -> Self {
        Self { blocks, version: 0 }
    }

    /// Parse a host JSON snapshot; None when the JSON does not parse
    pub fn from_json(json: &str) -> Option<Self> {
        json::parse_blocks(json).map(Self::new)
    }

    /// Top-level blocks in document order
    pub fn blocks(&self) -> &[Node] {
        &self.blocks
    }

    /// Snapshot version
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Total token span of the content; positions of blocks lie below this
    pub fn content_size(&self) -> usize {
        self.blocks.iter().map(Node::size).sum()
    }

    /// Check if the snapshot has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
