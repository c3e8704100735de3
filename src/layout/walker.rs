//! Block walker: flattens the tree into measurable units

use smallvec::SmallVec;

use crate::document::{Document, Node, NodeKind};

/// One block awaiting a height
#[derive(Debug, Clone)]
pub struct MeasurableUnit<'a> {
    /// Start position of the node in host position units
    pub position: usize,
    /// The node to measure
    pub node: &'a Node,
    /// Container kinds opened since the previous unit; each charges its
    /// fixed allowance once
    pub leading: SmallVec<[NodeKind; 2]>,
}

/// Flattens a document's block tree in traversal order
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockWalker;

impl BlockWalker {
    pub fn new() -> Self {
        Self
    }

    /// Flatten the document into measurable units
    ///
    /// Depth-first and in order. Containers are never emitted; their children
    /// are walked with the container's allowance carried to the next unit. A
    /// trailing container followed by no unit cannot move any break and its
    /// allowance is dropped.
    pub fn flatten<'a>(&self, document: &'a Document) -> Vec<MeasurableUnit<'a>> {
        let mut units = Vec::new();
        let mut pending: SmallVec<[NodeKind; 2]> = SmallVec::new();
        let mut position = 0;
        for block in document.blocks() {
            self.walk(block, position, &mut pending, &mut units);
            position += block.size();
        }
        units
    }

    fn walk<'a>(
        &self,
        node: &'a Node,
        position: usize,
        pending: &mut SmallVec<[NodeKind; 2]>,
        units: &mut Vec<MeasurableUnit<'a>>,
    ) {
        if node.is_container() {
            pending.push(node.kind);
            let mut child_pos = position + 1;
            for child in &node.children {
                self.walk(child, child_pos, pending, units);
                child_pos += child.size();
            }
            return;
        }

        units.push(MeasurableUnit {
            position,
            node,
            leading: std::mem::take(pending),
        });

        // Text of non-container children is already flattened into this
        // node; only nested containers still hold units of their own.
        let mut child_pos = position + 1;
        for child in &node.children {
            if child.is_container() {
                self.walk(child, child_pos, pending, units);
            }
            child_pos += child.size();
        }
    }
}
