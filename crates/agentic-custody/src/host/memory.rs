//! In-process ledger — custody map guarded by a mutex.
//!
//! Objects live in a single table keyed by their identity. Each entry
//! records who holds it: a plain account (an address) or another object
//! such as a bag. Account holdings are released to the authenticated
//! account holder; object holdings only through a [`Custody`] handle.

use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use rand::RngCore;

use crate::error::{CustodyError, Rejected, Result};
use crate::id::{Address, ObjectId};

use super::ledger::{Custody, Item, Ledger, Receiving, TxContext};

const IDENTITY_DOMAIN: &str = "agentic-custody:object";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Holder {
    Account(Address),
    Object(ObjectId),
}

struct Custodied {
    holder: Holder,
    value: Box<dyn Any + Send>,
}

/// Thread-safe in-memory implementation of [`Ledger`].
pub struct MemoryLedger {
    nonce: [u8; 32],
    next: AtomicU64,
    objects: Mutex<HashMap<ObjectId, Custodied>>,
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryLedger {
    /// Create an empty ledger with a random identity namespace.
    pub fn new() -> Self {
        let mut nonce = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut nonce);
        Self {
            nonce,
            next: AtomicU64::new(0),
            objects: Mutex::new(HashMap::new()),
        }
    }

    fn objects(&self) -> Result<MutexGuard<'_, HashMap<ObjectId, Custodied>>> {
        self.objects.lock().map_err(|_| CustodyError::Poisoned)
    }

    fn deposit<T: Item>(&self, holder: Holder, item: T) -> std::result::Result<(), Rejected<T>> {
        let mut objects = match self.objects() {
            Ok(guard) => guard,
            Err(e) => return Err(Rejected::new(e, item)),
        };
        let id = item.id();
        if objects.contains_key(&id) {
            return Err(Rejected::new(
                CustodyError::Ledger(format!("object {id} is already held")),
                item,
            ));
        }
        objects.insert(
            id,
            Custodied {
                holder,
                value: Box::new(item),
            },
        );
        Ok(())
    }

    /// Remove `item_id` if `holder` has it and it is a `T`; otherwise leave it.
    fn withdraw<T: Item>(&self, holder: &Holder, item_id: &ObjectId) -> Result<T> {
        let mut objects = self.objects()?;
        match objects.get(item_id) {
            None => return Err(CustodyError::Ledger(format!("unknown object {item_id}"))),
            Some(entry) if &entry.holder != holder => {
                return Err(CustodyError::Ledger(format!(
                    "object {item_id} is not held by this custody"
                )))
            }
            Some(entry) if !entry.value.is::<T>() => {
                return Err(CustodyError::Ledger(format!(
                    "object {item_id} has a different type"
                )))
            }
            Some(_) => {}
        }
        let entry = objects
            .remove(item_id)
            .ok_or_else(|| CustodyError::Ledger(format!("unknown object {item_id}")))?;
        entry
            .value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| CustodyError::Ledger(format!("object {item_id} has a different type")))
    }

    /// Allocate a fresh identity for a new item.
    ///
    /// Convenience for hosts minting items on this ledger.
    pub fn mint_id(&self) -> ObjectId {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        ObjectId::derive(IDENTITY_DOMAIN, &[&self.nonce[..], &seq.to_le_bytes()[..]])
    }

    /// Build a receive ticket for an item of type `T` held by object `custody`.
    ///
    /// Fails if the item is unknown, held elsewhere, or not a `T`. The
    /// ticket alone cannot release the item.
    pub fn receiving<T: Item>(
        &self,
        custody: &ObjectId,
        item_id: &ObjectId,
    ) -> Result<Receiving<T>> {
        let objects = self.objects()?;
        let entry = objects
            .get(item_id)
            .ok_or_else(|| CustodyError::Ledger(format!("unknown object {item_id}")))?;
        if entry.holder != Holder::Object(custody.clone()) {
            return Err(CustodyError::Ledger(format!(
                "object {item_id} is not held by {custody}"
            )));
        }
        if !entry.value.is::<T>() {
            return Err(CustodyError::Ledger(format!(
                "object {item_id} has a different type"
            )));
        }
        Ok(Receiving::new(item_id.clone()))
    }

    /// Send an item to an address (a plain account, not a bag).
    pub fn transfer_to_address<T: Item>(
        &self,
        recipient: &Address,
        item: T,
    ) -> std::result::Result<(), Rejected<T>> {
        self.deposit(Holder::Account(recipient.clone()), item)
    }

    /// Take an item held by the caller's own account.
    ///
    /// Objects held by a bag are never released here, whatever the
    /// caller's address.
    pub fn take_from_address<T: Item>(&self, ctx: &TxContext, item_id: &ObjectId) -> Result<T> {
        self.withdraw(&Holder::Account(ctx.sender().clone()), item_id)
    }

    /// Identity currently holding `item_id`, if the ledger knows the object.
    ///
    /// Account holders are reported under the object ID with the same bytes.
    pub fn custody_of(&self, item_id: &ObjectId) -> Result<Option<ObjectId>> {
        Ok(self.objects()?.get(item_id).map(|e| match &e.holder {
            Holder::Account(addr) => ObjectId::from(addr),
            Holder::Object(id) => id.clone(),
        }))
    }

    /// Number of objects held by object `custody` (e.g. a bag).
    pub fn custody_count(&self, custody: &ObjectId) -> Result<usize> {
        let holder = Holder::Object(custody.clone());
        Ok(self
            .objects()?
            .values()
            .filter(|e| e.holder == holder)
            .count())
    }

    /// Number of objects held by the account `owner`.
    pub fn account_count(&self, owner: &Address) -> Result<usize> {
        let holder = Holder::Account(owner.clone());
        Ok(self
            .objects()?
            .values()
            .filter(|e| e.holder == holder)
            .count())
    }

    /// Total number of objects held on this ledger.
    pub fn len(&self) -> Result<usize> {
        Ok(self.objects()?.len())
    }

    /// Whether the ledger holds no objects.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.objects()?.is_empty())
    }
}

impl Ledger for MemoryLedger {
    fn new_identity(&self) -> Result<ObjectId> {
        Ok(self.mint_id())
    }

    fn transfer_into_custody<T: Item>(
        &self,
        custody: &ObjectId,
        item: T,
    ) -> std::result::Result<(), Rejected<T>> {
        self.deposit(Holder::Object(custody.clone()), item)
    }

    fn complete_receive<T: Item>(
        &self,
        custody: Custody<'_>,
        receiving: Receiving<T>,
    ) -> Result<T> {
        self.withdraw(&Holder::Object(custody.id().clone()), receiving.id())
    }
}
