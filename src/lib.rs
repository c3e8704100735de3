//! Pagemark: live pagination for WYSIWYG rich-text editors
//!
//! This crate computes page break positions for an editing surface:
//! - Per-kind height heuristics, with live geometry taking precedence
//! - Greedy single-pass break packing against a configurable page budget
//! - Deferred, coalesced recomputation driven by host transactions
//! - Diffed break decorations (only changed separators repaint)

pub mod document;
pub mod layout;
pub mod overlay;
pub mod sync;
pub mod transaction;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use document::{Document, Node, NodeAttrs, NodeKind};
pub use layout::{
    BreakMark, GeometryProvider, HeightEstimator, HeightModel, NodeGeometry, PageBudget,
};
pub use overlay::{BreakDecoration, OverlayDiff, OverlayPatch};
pub use sync::BreakSynchronizer;
pub use transaction::{MapEntry, PositionMap, Transaction};

use overlay::OverlayTracker;

/// One pagination session bound to one editing surface
///
/// Owns the document mirror, the break synchronizer and the overlay tracker.
/// Constructed when the host attaches the engine to an editor and dropped on
/// detach; there is no shared or global state.
pub struct Paginator {
    document: Document,
    synchronizer: BreakSynchronizer,
    overlay: OverlayTracker,
    revision: u64,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(PageBudget::default(), HeightModel::default())
    }
}

impl Paginator {
    /// Create a session with the given page budget and height calibration
    pub fn new(budget: PageBudget, model: HeightModel) -> Self {
        Self {
            document: Document::default(),
            synchronizer: BreakSynchronizer::new(budget, model),
            overlay: OverlayTracker::new(),
            revision: 0,
        }
    }

    /// Create a session over an initial document
    pub fn with_document(document: Document, budget: PageBudget, model: HeightModel) -> Self {
        let mut paginator = Self::new(budget, model);
        paginator.replace_document(document);
        paginator
    }

    /// The current document mirror
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Install a fresh snapshot after a content-changing transaction
    ///
    /// The mirror is replaced wholesale, never patched, so a deferred pass
    /// always reads one consistent snapshot.
    pub fn replace_document(&mut self, mut document: Document) {
        self.revision += 1;
        document.set_version(self.revision);
        self.document = document;
        self.synchronizer
            .apply(&Transaction::Structural, &self.document);
    }

    /// Absorb one classified transaction
    ///
    /// Remaps publish their shifted decorations immediately; content changes
    /// return None and defer to the next `flush`.
    pub fn apply(&mut self, transaction: &Transaction) -> Option<OverlayDiff> {
        self.synchronizer.apply(transaction, &self.document);
        match transaction {
            Transaction::Remap(_) => Some(self.overlay.publish(self.synchronizer.marks())),
            _ => None,
        }
    }

    /// Check if a deferred pass is owed
    pub fn needs_flush(&self) -> bool {
        self.synchronizer.needs_recompute()
    }

    /// Run the deferred pass if one is owed
    ///
    /// Call from the host's post-render callback so live geometry reflects
    /// the content being paginated. Returns the patches to paint, or None
    /// when nothing was owed.
    pub fn flush(&mut self, live: Option<&dyn GeometryProvider>) -> Option<OverlayDiff> {
        if !self.synchronizer.needs_recompute() {
            return None;
        }
        self.synchronizer.recompute(&self.document, live);
        Some(self.overlay.publish(self.synchronizer.marks()))
    }

    /// Request a full pass even when nothing is marked dirty
    pub fn force_recompute(&mut self) {
        self.synchronizer
            .apply(&Transaction::ForcedRefresh, &self.document);
    }

    /// Current break marks, always a complete consistent set
    pub fn breaks(&self) -> &[BreakMark] {
        self.synchronizer.marks()
    }

    /// Decoration descriptors for the current marks
    pub fn decorations(&self) -> Vec<BreakDecoration> {
        overlay::decorations_for(self.synchronizer.marks())
    }

    /// Total page count implied by the current marks
    pub fn page_count(&self) -> usize {
        self.synchronizer.page_count()
    }

    pub fn budget(&self) -> &PageBudget {
        self.synchronizer.budget()
    }

    /// Swap the page budget; takes effect at the next flush
    pub fn set_budget(&mut self, budget: PageBudget) {
        self.synchronizer.set_budget(budget);
    }

    pub fn model(&self) -> &HeightModel {
        self.synchronizer.model()
    }

    /// Swap the height calibration; takes effect at the next flush
    pub fn set_model(&mut self, model: HeightModel) {
        self.synchronizer.set_model(model);
    }
}
