//! Break decorations handed to the host overlay

use serde::Serialize;

use crate::layout::BreakMark;

/// One separator widget, rendered immediately before `position`
///
/// The widget is non-editable host chrome; it never enters the document and
/// is excluded from measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakDecoration {
    /// Document position the widget anchors to
    pub position: usize,
    /// Page the content after the widget starts
    pub page_number: u32,
    /// Stable identity for the host's widget reconciliation
    pub key: String,
}

impl BreakDecoration {
    pub fn from_mark(mark: &BreakMark) -> Self {
        Self {
            position: mark.position,
            page_number: mark.page_number,
            key: format!("page-break-{}-{}", mark.page_number, mark.position),
        }
    }

    /// Label shown on the separator
    pub fn label(&self) -> String {
        format!("Page {}", self.page_number)
    }
}

/// Descriptors for a whole mark set, in document order
pub fn decorations_for(marks: &[BreakMark]) -> Vec<BreakDecoration> {
    marks.iter().map(BreakDecoration::from_mark).collect()
}
