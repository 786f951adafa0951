//! AgenticCustody — custody-and-claim protocol for agents.
//!
//! A depositor stages opaque items in a bag for one designated
//! recipient. The recipient (or, to recover, the depositor) detaches the
//! bag from the registry together with a single-use claim token, claims
//! the items one at a time, and finalizes the emptied bag.
//!
//! Storage, transfers and caller authentication come from the host
//! ledger behind the [`host::Ledger`] trait.

pub mod bag;
pub mod error;
pub mod host;
pub mod id;
pub mod registry;

// Re-export primary types
pub use bag::{Bag, BagSummary, ClaimToken, Unfinalized, MAX_BAG_ITEMS};
pub use error::{CustodyError, CustodyErrorKind, Rejected, Result};
pub use host::{Custody, Item, Ledger, MemoryLedger, Receiving, TxContext};
pub use id::{Address, ObjectId};
pub use registry::Registry;
