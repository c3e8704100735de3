//! Decoration publication for the rendering surface

mod decoration;
mod diff;

pub use decoration::{decorations_for, BreakDecoration};
pub use diff::{OverlayDiff, OverlayPatch, OverlayTracker};
