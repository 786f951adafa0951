//! Bags and claim sessions.
//!
//! The bag module provides:
//! - The `Bag` container: owner plus a bounded set of pending item IDs
//! - The single-use `ClaimToken` that binds a claim session to one bag
//! - Item-by-item claiming out of a detached bag
//! - Finalization, the only way to destroy a bag

pub mod bag;
pub mod claim;
pub mod token;

pub use bag::{Bag, BagSummary, MAX_BAG_ITEMS};
pub use claim::Unfinalized;
pub use token::ClaimToken;
