//! Overlay diffing for incremental separator repaints

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::layout::BreakMark;
use crate::overlay::{decorations_for, BreakDecoration};

/// A single patch operation for the overlay layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum OverlayPatch {
    /// Paint a separator for a page that had none
    #[serde(rename_all = "camelCase")]
    Insert { decoration: BreakDecoration },
    /// Move a page's separator to a new position
    #[serde(rename_all = "camelCase")]
    Update {
        page_number: u32,
        decoration: BreakDecoration,
    },
    /// Drop the separator of a page that no longer exists
    #[serde(rename_all = "camelCase")]
    Remove { page_number: u32 },
}

/// Patches from one publication to the next
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayDiff {
    pub patches: Vec<OverlayPatch>,
}

impl OverlayDiff {
    /// Check if there is anything to repaint
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}

/// Tracks the decorations last handed to the host
///
/// Separators persist on the rendering surface between publications, so each
/// publication diffs against what is actually painted and an unchanged mark
/// produces no patch at all.
#[derive(Debug, Default)]
pub struct OverlayTracker {
    /// Previously published decorations by page number
    previous: FxHashMap<u32, BreakDecoration>,
}

impl OverlayTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a mark set, yielding patches against the previous publication
    pub fn publish(&mut self, marks: &[BreakMark]) -> OverlayDiff {
        let decorations = decorations_for(marks);
        let next: FxHashMap<u32, BreakDecoration> = decorations
            .iter()
            .map(|decoration| (decoration.page_number, decoration.clone()))
            .collect();

        let mut diff = OverlayDiff::default();

        // Pages that lost their separator
        let mut removed: Vec<u32> = self
            .previous
            .keys()
            .filter(|page_number| !next.contains_key(page_number))
            .copied()
            .collect();
        removed.sort_unstable();
        for page_number in removed {
            diff.patches.push(OverlayPatch::Remove { page_number });
        }

        for decoration in decorations {
            match self.previous.get(&decoration.page_number) {
                None => diff.patches.push(OverlayPatch::Insert { decoration }),
                Some(previous) if *previous != decoration => {
                    diff.patches.push(OverlayPatch::Update {
                        page_number: decoration.page_number,
                        decoration,
                    });
                }
                Some(_) => {}
            }
        }

        self.previous = next;
        diff
    }
}
