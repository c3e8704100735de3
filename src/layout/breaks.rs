//! Page break computation

use serde::{Deserialize, Serialize};

/// The page geometry the calculator packs against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageBudget {
    /// Maximum cumulative unit height on one page
    pub content_height: u32,
    /// Minimum distance in position units between consecutive breaks
    pub min_break_separation: usize,
}

impl Default for PageBudget {
    fn default() -> Self {
        Self::us_letter()
    }
}

impl PageBudget {
    /// US Letter at 96 dpi: 1056px page height minus two 96px margins
    pub fn us_letter() -> Self {
        Self {
            content_height: 864,
            min_break_separation: 10,
        }
    }
}

/// One page boundary: a new page starts at `position`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakMark {
    /// Document position immediately before the unit that starts the page
    pub position: usize,
    /// The page that unit starts, numbered from 2
    pub page_number: u32,
}

/// Greedy single-pass packing of unit heights into the page budget
///
/// Units are `(position, height)` in document order. A unit that overflows
/// the running page starts a new one, except before the very first unit and
/// within the hysteresis distance of the previous break. A unit taller than
/// the whole budget is never split; it overflows its page instead. The output
/// is fully determined by the input.
pub fn compute_breaks(units: &[(usize, u32)], budget: &PageBudget) -> Vec<BreakMark> {
    let mut marks = Vec::new();
    let mut current_height = 0u32;
    let mut page_number = 1u32;
    let mut last_break: Option<usize> = None;

    for &(position, height) in units {
        let overflows = current_height.saturating_add(height) > budget.content_height;
        let separated =
            last_break.map_or(true, |last| position - last > budget.min_break_separation);

        if overflows && current_height > 0 && separated {
            page_number += 1;
            marks.push(BreakMark {
                position,
                page_number,
            });
            current_height = height;
            last_break = Some(position);
        } else {
            current_height = current_height.saturating_add(height);
        }
    }

    marks
}

/// Pages the document occupies under the given breaks
pub fn page_count(breaks: &[BreakMark]) -> usize {
    breaks.len() + 1
}
