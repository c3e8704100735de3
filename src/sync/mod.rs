//! Break marker synchronization
//!
//! Owns the published break set and keeps it consistent with the document as
//! transactions arrive. Content changes only raise a dirty flag, so a burst
//! of keystrokes coalesces into a single recompute over the latest snapshot.
//! Pure position shifts skip the pass entirely and re-project the existing
//! marks in place.

use rustc_hash::FxHashMap;

use crate::document::Document;
use crate::layout::{
    compute_breaks, page_count, BlockWalker, BreakMark, GeometryProvider, HeightEstimator,
    HeightModel, PageBudget,
};
use crate::transaction::{PositionMap, Transaction};

/// Keeps the break marks in step with the evolving document
#[derive(Debug)]
pub struct BreakSynchronizer {
    estimator: HeightEstimator,
    walker: BlockWalker,
    budget: PageBudget,
    /// Marks from the last completed pass; remaps keep positions current
    marks: Vec<BreakMark>,
    /// Set when a recompute pass is owed
    dirty: bool,
    /// Document version the marks were computed against
    synced_version: u64,
    /// Heuristic heights from the previous pass, keyed by content hash
    heuristic_cache: FxHashMap<u64, u32>,
}

impl BreakSynchronizer {
    pub fn new(budget: PageBudget, model: HeightModel) -> Self {
        Self {
            estimator: HeightEstimator::new(model),
            walker: BlockWalker::new(),
            budget,
            marks: Vec::new(),
            dirty: true,
            synced_version: 0,
            heuristic_cache: FxHashMap::default(),
        }
    }

    /// Current break marks in document order
    pub fn marks(&self) -> &[BreakMark] {
        &self.marks
    }

    /// Pages implied by the current marks
    pub fn page_count(&self) -> usize {
        page_count(&self.marks)
    }

    pub fn budget(&self) -> &PageBudget {
        &self.budget
    }

    /// Swap the page budget; takes effect at the next pass
    pub fn set_budget(&mut self, budget: PageBudget) {
        self.budget = budget;
        self.dirty = true;
    }

    pub fn model(&self) -> &HeightModel {
        self.estimator.model()
    }

    /// Swap the height calibration; cached heuristics no longer apply
    pub fn set_model(&mut self, model: HeightModel) {
        self.estimator.set_model(model);
        self.heuristic_cache.clear();
        self.dirty = true;
    }

    /// Check if a recompute pass is owed
    pub fn needs_recompute(&self) -> bool {
        self.dirty
    }

    /// Document version of the last completed pass
    pub fn synced_version(&self) -> u64 {
        self.synced_version
    }

    /// Absorb one classified transaction
    ///
    /// Content changes defer; consecutive ones collapse into a single pending
    /// pass over whichever snapshot is current when it runs. Remaps re-project
    /// the published marks immediately so they stay position-correct even
    /// while a pass is owed.
    pub fn apply(&mut self, transaction: &Transaction, document: &Document) {
        if transaction.needs_recompute() {
            self.dirty = true;
        } else if let Transaction::Remap(map) = transaction {
            self.remap(map, document);
        }
    }

    /// Re-project marks through a position map
    ///
    /// A mark whose position was deleted is dropped, never clamped; a clamped
    /// mark would pin a page boundary to content it does not belong to. Drops
    /// compact the page numbering.
    fn remap(&mut self, map: &PositionMap, document: &Document) {
        if map.is_identity() {
            return;
        }
        let end = document.content_size();
        let mut remapped: Vec<BreakMark> = Vec::with_capacity(self.marks.len());
        for mark in &self.marks {
            let position = match map.map(mark.position) {
                Some(position) => position,
                None => continue,
            };
            if position == 0 || position >= end {
                continue;
            }
            if remapped.last().map_or(false, |prev| position <= prev.position) {
                continue;
            }
            remapped.push(BreakMark {
                position,
                page_number: remapped.len() as u32 + 2,
            });
        }
        self.marks = remapped;
        self.synced_version = document.version();
    }

    /// Run the full pass: walk, estimate, pack, publish
    ///
    /// The mark set is replaced wholesale so readers never observe a half
    /// updated state. Heuristic heights carry over between passes by content
    /// hash and entries no node matched age out. Live measurements win over
    /// the cache and are never stored in it; they belong to a position, not
    /// to content.
    pub fn recompute(&mut self, document: &Document, live: Option<&dyn GeometryProvider>) {
        let units = self.walker.flatten(document);

        let previous = std::mem::take(&mut self.heuristic_cache);
        let mut cache = FxHashMap::default();
        let mut heights = Vec::with_capacity(units.len());

        for unit in &units {
            let allowances: u32 = unit
                .leading
                .iter()
                .map(|kind| self.estimator.model().container_allowance(*kind))
                .sum();
            let measured = live
                .and_then(|provider| provider.measure(unit.position))
                .map(|geometry| geometry.total())
                .unwrap_or(0);
            let height = if measured > 0 {
                measured
            } else {
                let hash = unit.node.content_hash();
                let estimate = match previous.get(&hash) {
                    Some(&cached) => cached,
                    None => self.estimator.heuristic(unit.node),
                };
                cache.insert(hash, estimate);
                estimate
            };
            heights.push((unit.position, allowances + height));
        }

        self.heuristic_cache = cache;
        self.marks = compute_breaks(&heights, &self.budget);
        self.synced_version = document.version();
        self.dirty = false;
    }
}
