//! Height model: per-kind calibration constants

use serde::{Deserialize, Serialize};

use crate::document::NodeKind;

/// Metrics for headings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadingMetrics {
    /// Base height per level, index 0 = level 1
    pub base_heights: [u32; 6],
    /// Estimated characters per wrapped line, per level
    pub chars_per_line: [u32; 6],
    /// Height added per wrapped line beyond the first
    pub wrap_line_height: u32,
}

impl Default for HeadingMetrics {
    fn default() -> Self {
        Self {
            base_heights: [48, 40, 32, 32, 32, 32],
            chars_per_line: [60; 6],
            wrap_line_height: 24,
        }
    }
}

impl HeadingMetrics {
    /// Base height for a level (1-6)
    pub fn base(&self, level: u8) -> u32 {
        self.base_heights[usize::from(level.min(6).max(1)) - 1]
    }

    /// Wrap width in characters for a level (1-6)
    pub fn wrap_chars(&self, level: u8) -> u32 {
        self.chars_per_line[usize::from(level.min(6).max(1)) - 1]
    }
}

/// Metrics for character-wrapped text blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowMetrics {
    /// Estimated characters per wrapped line
    pub chars_per_line: u32,
    /// Height of one wrapped line
    pub line_height: u32,
    /// Vertical margin added to the block
    pub margin: u32,
    /// Height of the block when it has no text
    pub empty_height: u32,
}

impl FlowMetrics {
    /// Paragraph defaults for 16px body text on a 624px content line
    pub fn paragraph() -> Self {
        Self {
            chars_per_line: 85,
            line_height: 24,
            margin: 12,
            empty_height: 24,
        }
    }

    /// List item defaults; the marker indent narrows the line
    pub fn list_item() -> Self {
        Self {
            chars_per_line: 80,
            line_height: 24,
            margin: 4,
            empty_height: 28,
        }
    }
}

impl Default for FlowMetrics {
    fn default() -> Self {
        Self::paragraph()
    }
}

/// Metrics for code blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CodeMetrics {
    /// Height of one code line; code is never rewrapped
    pub line_height: u32,
    /// Fixed padding around the block
    pub padding: u32,
}

impl Default for CodeMetrics {
    fn default() -> Self {
        Self {
            line_height: 20,
            padding: 24,
        }
    }
}

/// Calibration constants for every node kind
///
/// These are a contract with the host stylesheet: mismatched constants drift
/// pagination toward early or late breaks but never break the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeightModel {
    pub heading: HeadingMetrics,
    pub paragraph: FlowMetrics,
    pub list_item: FlowMetrics,
    pub code_block: CodeMetrics,
    /// Fixed allowance charged when a list wrapper opens
    pub list_allowance: u32,
    /// Fixed allowance charged when a quote wrapper opens
    pub blockquote_allowance: u32,
    /// Height of a horizontal rule
    pub rule_height: u32,
    /// Fallback height for unrecognized leaves
    pub default_height: u32,
}

impl Default for HeightModel {
    fn default() -> Self {
        Self {
            heading: HeadingMetrics::default(),
            paragraph: FlowMetrics::paragraph(),
            list_item: FlowMetrics::list_item(),
            code_block: CodeMetrics::default(),
            list_allowance: 8,
            blockquote_allowance: 16,
            rule_height: 32,
            default_height: 24,
        }
    }
}

impl HeightModel {
    /// Fixed allowance a container kind charges when entered
    pub fn container_allowance(&self, kind: NodeKind) -> u32 {
        match kind {
            NodeKind::BulletList | NodeKind::OrderedList => self.list_allowance,
            NodeKind::Blockquote => self.blockquote_allowance,
            _ => 0,
        }
    }
}
