//! Position mapping across host transactions

use smallvec::SmallVec;

/// One contiguous replacement within a transaction
///
/// `start` and `deleted` address pre-edit positions; `inserted` tokens take
/// the range's place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapEntry {
    /// Start of the replaced range
    pub start: usize,
    /// Tokens removed from the range
    pub deleted: usize,
    /// Tokens inserted in their place
    pub inserted: usize,
}

/// The position transform of one transaction
///
/// Entries are ordered by start and non-overlapping, all expressed in
/// pre-edit coordinates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionMap {
    edits: SmallVec<[MapEntry; 4]>,
}

impl PositionMap {
    /// A transform that moves nothing
    pub fn identity() -> Self {
        Self::default()
    }

    /// A pure insertion of `len` tokens at `at`
    pub fn insertion(at: usize, len: usize) -> Self {
        Self::replacement(at, 0, len)
    }

    /// A pure deletion of `len` tokens starting at `start`
    pub fn deletion(start: usize, len: usize) -> Self {
        Self::replacement(start, len, 0)
    }

    /// A replacement of `deleted` tokens at `start` with `inserted` tokens
    pub fn replacement(start: usize, deleted: usize, inserted: usize) -> Self {
        let mut map = Self::default();
        map.push(MapEntry {
            start,
            deleted,
            inserted,
        });
        map
    }

    /// Append an entry; entries must stay ordered and non-overlapping
    pub fn push(&mut self, entry: MapEntry) {
        debug_assert!(self
            .edits
            .last()
            .map_or(true, |last| last.start + last.deleted <= entry.start));
        self.edits.push(entry);
    }

    /// Check if this transform moves nothing
    pub fn is_identity(&self) -> bool {
        self.edits
            .iter()
            .all(|edit| edit.deleted == 0 && edit.inserted == 0)
    }

    /// Map a pre-edit position to its post-edit position
    ///
    /// Returns None when the position fell inside a deleted range. An
    /// insertion exactly at the position shifts it right.
    pub fn map(&self, pos: usize) -> Option<usize> {
        let mut delta: isize = 0;
        for edit in &self.edits {
            if pos < edit.start {
                break;
            }
            if edit.deleted > 0 && pos < edit.start + edit.deleted {
                return None;
            }
            delta += edit.inserted as isize - edit.deleted as isize;
        }
        Some((pos as isize + delta) as usize)
    }
}
