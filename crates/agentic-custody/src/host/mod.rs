//! Host primitives — the ledger seam the custody protocol runs on.
//!
//! The protocol never stores, moves, or authenticates anything itself.
//! It consumes:
//! - fresh globally unique object identities
//! - all-or-nothing custody transfers ("send to an identity")
//! - receive completion ("take what was sent to an identity"), gated by
//!   a [`Custody`] handle only a claim session can produce
//! - the authenticated sender of each call
//!
//! [`MemoryLedger`] is a thread-safe in-process host used by tests,
//! benches and embedders that do not bring their own ledger.

pub mod ledger;
pub mod memory;

pub use ledger::{Custody, Item, Ledger, Receiving, TxContext};
pub use memory::MemoryLedger;
