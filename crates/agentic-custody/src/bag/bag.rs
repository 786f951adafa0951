//! Bag — a custody container for items staged for one recipient.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CustodyError, Result};
use crate::id::{Address, ObjectId};

/// Maximum number of pending items a bag may hold.
pub const MAX_BAG_ITEMS: usize = 500;

/// Microseconds since Unix epoch; a clock set before the epoch reads as zero.
fn now_micros() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

/// A custody container holding the IDs of items staged by its owner.
///
/// The items themselves sit on the ledger under the bag's identity.
/// A bag is held either by the registry (pending) or by a claim session
/// (detached); it is destroyed only by [`Bag::finalize`] once empty.
#[derive(Debug)]
#[must_use = "a detached bag must be drained and finalized"]
pub struct Bag {
    id: ObjectId,
    owner: Address,
    pending: HashSet<ObjectId>,
    created_at: u64,
    detached: bool,
}

impl Bag {
    pub(crate) fn new(id: ObjectId, owner: Address) -> Self {
        Self {
            id,
            owner,
            pending: HashSet::new(),
            created_at: now_micros(),
            detached: false,
        }
    }

    /// Identity of this bag.
    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    /// The depositor who created this bag.
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    /// Number of items still pending.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether every staged item has been claimed.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether `item_id` is pending in this bag.
    pub fn contains_item(&self, item_id: &ObjectId) -> bool {
        self.pending.contains(item_id)
    }

    /// Iterate the pending item IDs in no particular order.
    pub fn pending_items(&self) -> impl Iterator<Item = &ObjectId> {
        self.pending.iter()
    }

    /// Creation timestamp (microseconds since Unix epoch).
    pub fn created_at(&self) -> u64 {
        self.created_at
    }

    /// Snapshot the bag's public state.
    pub fn summary(&self) -> BagSummary {
        let mut pending_items: Vec<ObjectId> = self.pending.iter().cloned().collect();
        pending_items.sort();
        BagSummary {
            id: self.id.clone(),
            owner: self.owner.clone(),
            pending_count: pending_items.len(),
            pending_items,
            created_at: self.created_at,
        }
    }

    /// Check that one more item with `item_id` may be staged.
    pub(crate) fn check_room_for(&self, item_id: &ObjectId) -> Result<()> {
        if self.pending.len() >= MAX_BAG_ITEMS {
            return Err(CustodyError::CapacityExceeded {
                limit: MAX_BAG_ITEMS,
            });
        }
        if self.pending.contains(item_id) {
            return Err(CustodyError::DuplicateItem(item_id.clone()));
        }
        Ok(())
    }

    /// Record a staged item. Callers run [`Bag::check_room_for`] first.
    pub(crate) fn record_pending(&mut self, item_id: ObjectId) {
        debug_assert!(self.pending.len() < MAX_BAG_ITEMS);
        self.pending.insert(item_id);
    }

    pub(crate) fn release_pending(&mut self, item_id: &ObjectId) -> bool {
        self.pending.remove(item_id)
    }

    pub(crate) fn detach(&mut self) {
        self.detached = true;
    }
}

impl Drop for Bag {
    fn drop(&mut self) {
        if self.detached && !self.pending.is_empty() {
            log::warn!(
                "bag {} dropped with {} unclaimed items; they remain in ledger custody",
                self.id,
                self.pending.len()
            );
        }
    }
}

/// Serializable snapshot of a bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagSummary {
    pub id: ObjectId,
    pub owner: Address,
    pub pending_count: usize,
    /// Pending item IDs, sorted.
    pub pending_items: Vec<ObjectId>,
    pub created_at: u64,
}

impl BagSummary {
    /// Creation time as an RFC 3339 string.
    pub fn created_at_rfc3339(&self) -> String {
        let secs = (self.created_at / 1_000_000) as i64;
        let nsecs = ((self.created_at % 1_000_000) * 1000) as u32;
        chrono::DateTime::from_timestamp(secs, nsecs)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
            .to_rfc3339()
    }

    /// Render as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CustodyError::Serialization(e.to_string()))
    }
}
