//! Host transaction classification and position mapping

mod change;
mod mapping;

pub use change::Transaction;
pub use mapping::{MapEntry, PositionMap};
