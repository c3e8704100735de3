//! Transaction classification

use crate::transaction::PositionMap;

/// How one host transaction affects pagination
///
/// The host adapter classifies each transaction it delivers; the synchronizer
/// consumes the classification, never the host's raw transaction object.
#[derive(Debug, Clone, PartialEq)]
pub enum Transaction {
    /// Node identities, text, or tree shape changed
    Structural,
    /// No content delta; existing positions were re-projected
    Remap(PositionMap),
    /// Explicit refresh request, e.g. after a paste or a settled layout pass
    ForcedRefresh,
}

impl Transaction {
    /// Check if this transaction requires a recomputation pass
    pub fn needs_recompute(&self) -> bool {
        matches!(self, Transaction::Structural | Transaction::ForcedRefresh)
    }
}
