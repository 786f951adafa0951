//! Registry — the one-bag-per-recipient index of pending bags.
//!
//! The registry module provides:
//! - Bag creation keyed by recipient
//! - Owner-only deposits and redirection
//! - Recipient claims and owner reclaims, which detach a bag with a fresh token
//! - Read-only queries over pending bags
//!
//! Every operation takes the registry lock once and runs its checks
//! before any effect, so concurrent callers racing on one recipient see
//! exactly one winner.

pub mod engine;
pub mod query;

pub use engine::Registry;
