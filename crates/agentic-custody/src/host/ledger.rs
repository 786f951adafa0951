//! Ledger traits and per-call context.

use std::marker::PhantomData;

use crate::error::{Rejected, Result};
use crate::id::{Address, ObjectId};

/// An opaque, transferable payload with its own identity.
///
/// The protocol only ever looks at [`Item::id`], the item's fingerprint.
pub trait Item: Send + 'static {
    /// Return the globally unique identity of this item.
    fn id(&self) -> ObjectId;
}

/// Per-call context supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxContext {
    sender: Address,
}

impl TxContext {
    /// Build a context for a call authenticated as `sender`.
    pub fn new(sender: Address) -> Self {
        Self { sender }
    }

    /// The authenticated identity of the caller.
    pub fn sender(&self) -> &Address {
        &self.sender
    }
}

/// Ticket for an item that was sent to some identity and can now be received.
///
/// Holding a ticket proves nothing by itself; the ledger checks that the
/// item really sits in the custody named at completion time.
pub struct Receiving<T> {
    id: ObjectId,
    _item: PhantomData<fn() -> T>,
}

impl<T> Receiving<T> {
    /// Create a ticket for the item with identity `id`.
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            _item: PhantomData,
        }
    }

    /// Identity of the item this ticket refers to.
    pub fn id(&self) -> &ObjectId {
        &self.id
    }
}

impl<T> std::fmt::Debug for Receiving<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Receiving").field("id", &self.id).finish()
    }
}

/// Authority to receive out of one object's custody.
///
/// Only a claim session can produce one, by borrowing its bag, so a bare
/// object ID never grants access to what a bag holds.
///
/// ```compile_fail
/// use agentic_custody::host::Custody;
/// use agentic_custody::id::ObjectId;
///
/// let id = ObjectId::from_bytes([0u8; 32]);
/// let _forged = Custody::new(&id);
/// ```
pub struct Custody<'a> {
    id: &'a ObjectId,
}

impl<'a> Custody<'a> {
    pub(crate) fn new(id: &'a ObjectId) -> Self {
        Self { id }
    }

    /// Identity whose custody this handle opens.
    pub fn id(&self) -> &ObjectId {
        self.id
    }
}

impl std::fmt::Debug for Custody<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Custody").field("id", self.id).finish()
    }
}

/// Ledger primitives consumed by the registry and by claim sessions.
///
/// Implementations must make each transfer atomic: either the item moves
/// completely or the call fails and nothing changes.
pub trait Ledger {
    /// Allocate a globally unique identity.
    fn new_identity(&self) -> Result<ObjectId>;

    /// Move exclusive custody of `item` under `custody`.
    ///
    /// On failure the item is handed back inside the rejection.
    fn transfer_into_custody<T: Item>(
        &self,
        custody: &ObjectId,
        item: T,
    ) -> std::result::Result<(), Rejected<T>>;

    /// Complete a transfer previously addressed to `custody`, yielding the item.
    ///
    /// The returned item's [`Item::id`] must equal `receiving.id()`.
    fn complete_receive<T: Item>(
        &self,
        custody: Custody<'_>,
        receiving: Receiving<T>,
    ) -> Result<T>;
}
