//! Height estimation: live geometry first, per-kind heuristics as fallback

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

use crate::document::{Node, NodeKind};
use crate::layout::{FlowMetrics, HeightModel};

/// A measured box for one rendered node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeGeometry {
    /// Rendered box height
    pub height: f32,
    /// Resolved top margin
    pub margin_top: f32,
    /// Resolved bottom margin
    pub margin_bottom: f32,
}

impl NodeGeometry {
    pub fn new(height: f32, margin_top: f32, margin_bottom: f32) -> Self {
        Self {
            height,
            margin_top,
            margin_bottom,
        }
    }

    /// Rounded total extent including margins; zero when not laid out yet
    pub fn total(&self) -> u32 {
        let total = self.height + self.margin_top + self.margin_bottom;
        if total <= 0.0 {
            0
        } else {
            total.ceil() as u32
        }
    }
}

/// Geometry queries against the rendering surface
///
/// None means the element cannot be measured right now; a degenerate zero box
/// is treated the same way by the estimator.
pub trait GeometryProvider {
    /// Measure the rendered element at a document position
    fn measure(&self, position: usize) -> Option<NodeGeometry>;
}

/// Estimates the vertical extent of one block
#[derive(Debug, Clone, Default)]
pub struct HeightEstimator {
    model: HeightModel,
}

impl HeightEstimator {
    pub fn new(model: HeightModel) -> Self {
        Self { model }
    }

    /// The calibration constants in use
    pub fn model(&self) -> &HeightModel {
        &self.model
    }

    pub fn set_model(&mut self, model: HeightModel) {
        self.model = model;
    }

    /// Estimate a node's height, preferring live geometry
    ///
    /// A zero measurement means the element is not laid out yet and falls
    /// back to the heuristic. Heights round up so a misestimate wastes page
    /// space instead of overflowing the printed page.
    pub fn estimate(&self, node: &Node, live: Option<NodeGeometry>) -> u32 {
        if let Some(geometry) = live {
            let measured = geometry.total();
            if measured > 0 {
                return measured;
            }
        }
        self.heuristic(node)
    }

    /// Heuristic height keyed by node kind
    pub fn heuristic(&self, node: &Node) -> u32 {
        match node.kind {
            NodeKind::Heading => {
                let level = node.heading_level();
                let lines = wrapped_lines(&node.text, self.model.heading.wrap_chars(level));
                self.model.heading.base(level) + (lines - 1) * self.model.heading.wrap_line_height
            }
            NodeKind::Paragraph => flow_height(&node.text, &self.model.paragraph),
            NodeKind::ListItem => flow_height(&node.text, &self.model.list_item),
            NodeKind::CodeBlock => {
                let lines = node.text.split('\n').count() as u32;
                lines * self.model.code_block.line_height + self.model.code_block.padding
            }
            NodeKind::HorizontalRule => self.model.rule_height,
            NodeKind::BulletList | NodeKind::OrderedList | NodeKind::Blockquote => {
                self.model.container_allowance(node.kind)
            }
            NodeKind::Unknown => self.model.default_height,
        }
    }
}

fn flow_height(text: &str, metrics: &FlowMetrics) -> u32 {
    if text.is_empty() {
        return metrics.empty_height;
    }
    wrapped_lines(text, metrics.chars_per_line) * metrics.line_height + metrics.margin
}

/// Estimated wrapped line count: mandatory break opportunities split the text
/// into segments, each wrapping at `chars_per_line` graphemes
fn wrapped_lines(text: &str, chars_per_line: u32) -> u32 {
    if text.is_empty() {
        return 1;
    }
    let per_line = chars_per_line.max(1) as usize;
    let mut lines = 0u32;
    let mut segment_start = 0;
    for (end, opportunity) in linebreaks(text) {
        if opportunity == BreakOpportunity::Mandatory {
            lines += segment_lines(&text[segment_start..end], per_line);
            segment_start = end;
        }
    }
    if segment_start < text.len() {
        lines += segment_lines(&text[segment_start..], per_line);
    }
    lines.max(1)
}

fn segment_lines(segment: &str, per_line: usize) -> u32 {
    let len = segment.trim_end().graphemes(true).count();
    if len == 0 {
        return 1;
    }
    ((len + per_line - 1) / per_line) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimator() -> HeightEstimator {
        HeightEstimator::default()
    }

    #[test]
    fn test_live_geometry_wins_over_heuristic() {
        let node = Node::paragraph("short");
        let live = NodeGeometry::new(100.3, 4.0, 8.0);
        assert_eq!(estimator().estimate(&node, Some(live)), 113);
    }

    #[test]
    fn test_zero_box_falls_back_to_heuristic() {
        let node = Node::paragraph("short");
        let zero = NodeGeometry::new(0.0, 0.0, 0.0);
        assert_eq!(estimator().estimate(&node, Some(zero)), 36);
        assert_eq!(estimator().estimate(&node, None), 36);
    }

    #[test]
    fn test_paragraph_wraps_by_length() {
        let one_line = Node::paragraph(&"a".repeat(85));
        assert_eq!(estimator().heuristic(&one_line), 24 + 12);

        let two_lines = Node::paragraph(&"a".repeat(86));
        assert_eq!(estimator().heuristic(&two_lines), 48 + 12);
    }

    #[test]
    fn test_empty_paragraph_still_occupies_space() {
        assert_eq!(estimator().heuristic(&Node::paragraph("")), 24);
    }

    #[test]
    fn test_hard_break_adds_a_line() {
        let node = Node::paragraph("a\nb");
        assert_eq!(estimator().heuristic(&node), 2 * 24 + 12);
    }

    #[test]
    fn test_heading_base_by_level() {
        assert_eq!(estimator().heuristic(&Node::heading(1, "Title")), 48);
        assert_eq!(estimator().heuristic(&Node::heading(2, "Title")), 40);
        assert_eq!(estimator().heuristic(&Node::heading(3, "Title")), 32);
    }

    #[test]
    fn test_long_heading_grows_per_line() {
        let node = Node::heading(1, &"t".repeat(120));
        assert_eq!(estimator().heuristic(&node), 48 + 24);
    }

    #[test]
    fn test_list_item_narrower_than_paragraph() {
        let text = "x".repeat(81);
        let item = estimator().heuristic(&Node::list_item(&text));
        let para = estimator().heuristic(&Node::paragraph(&text));
        assert_eq!(item, 2 * 24 + 4);
        assert_eq!(para, 24 + 12);
        assert_eq!(estimator().heuristic(&Node::list_item("")), 28);
    }

    #[test]
    fn test_code_counts_newline_delimited_lines() {
        let node = Node::code_block("fn main() {\n    body\n}");
        assert_eq!(estimator().heuristic(&node), 3 * 20 + 24);

        let long_line = Node::code_block(&"x".repeat(500));
        assert_eq!(estimator().heuristic(&long_line), 20 + 24);
    }

    #[test]
    fn test_fixed_kinds() {
        assert_eq!(estimator().heuristic(&Node::horizontal_rule()), 32);
        assert_eq!(estimator().heuristic(&Node::unknown("whatever")), 24);
        assert_eq!(estimator().heuristic(&Node::bullet_list(vec![])), 8);
        assert_eq!(estimator().heuristic(&Node::blockquote(vec![])), 16);
    }

    #[test]
    fn test_grapheme_length_drives_wrapping() {
        // 85 decomposed graphemes span 170 chars but still fit one line
        let text = "e\u{301}".repeat(85);
        assert_eq!(estimator().heuristic(&Node::paragraph(&text)), 24 + 12);
    }

    #[test]
    fn test_measured_height_ceils() {
        assert_eq!(NodeGeometry::new(0.2, 0.0, 0.0).total(), 1);
        assert_eq!(NodeGeometry::new(10.0, 0.5, 0.4).total(), 11);
        assert_eq!(NodeGeometry::new(0.0, 0.0, 0.0).total(), 0);
    }
}
