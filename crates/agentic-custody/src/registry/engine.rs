//! Registry engine — create, deposit, redirect, claim, reclaim.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::bag::{Bag, ClaimToken};
use crate::error::{CustodyError, Rejected, Result};
use crate::host::{Item, Ledger, TxContext};
use crate::id::{Address, ObjectId};

/// Durable mapping from recipient to the bag pending for them.
pub struct Registry<L> {
    ledger: L,
    bags: Mutex<HashMap<Address, Bag>>,
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// Reject `caller` unless it created `bag`.
fn authorize(bag: &Bag, caller: &Address) -> Result<()> {
    if bag.owner() != caller {
        log::warn!(
            "caller {caller} is not the owner of bag {} ({})",
            bag.id(),
            bag.owner()
        );
        return Err(CustodyError::Unauthorized {
            caller: caller.clone(),
            owner: bag.owner().clone(),
        });
    }
    Ok(())
}

/// Resolve and validate the bag a deposit of `item_id` targets.
fn deposit_target<'a>(
    bag: Option<&'a mut Bag>,
    caller: &Address,
    recipient: &Address,
    item_id: &ObjectId,
) -> Result<&'a mut Bag> {
    let bag = bag.ok_or_else(|| CustodyError::NotFound(recipient.clone()))?;
    authorize(bag, caller)?;
    bag.check_room_for(item_id)?;
    Ok(bag)
}

impl<L: Ledger> Registry<L> {
    /// Create an empty registry on top of `ledger`.
    pub fn new(ledger: L) -> Self {
        Self {
            ledger,
            bags: Mutex::new(HashMap::new()),
        }
    }

    /// The ledger this registry moves items on.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub(super) fn bags(&self) -> Result<MutexGuard<'_, HashMap<Address, Bag>>> {
        self.bags.lock().map_err(|_| CustodyError::Poisoned)
    }

    // -----------------------------------------------------------------------
    // Depositor operations
    // -----------------------------------------------------------------------

    /// Register a new empty bag for `recipient`, owned by the caller.
    ///
    /// Returns the new bag's identity. Fails with `AlreadyExists` if a bag
    /// is already pending for `recipient`.
    pub fn create(&self, ctx: &TxContext, recipient: Address) -> Result<ObjectId> {
        let mut bags = self.bags()?;
        if bags.contains_key(&recipient) {
            return Err(CustodyError::AlreadyExists(recipient));
        }

        let id = self.ledger.new_identity()?;
        log::debug!("created bag {id} for {recipient} by {}", ctx.sender());
        bags.insert(recipient, Bag::new(id.clone(), ctx.sender().clone()));
        Ok(id)
    }

    /// Stage `item` in the bag pending for `recipient`.
    ///
    /// Only the bag's owner may deposit. The item moves into ledger
    /// custody under the bag's identity; on any failure it is handed back
    /// inside the [`Rejected`] value and the bag is unchanged.
    pub fn add_item<T: Item>(
        &self,
        ctx: &TxContext,
        recipient: &Address,
        item: T,
    ) -> std::result::Result<(), Rejected<T>> {
        let mut bags = match self.bags() {
            Ok(bags) => bags,
            Err(e) => return Err(Rejected::new(e, item)),
        };

        let item_id = item.id();
        let bag = match deposit_target(bags.get_mut(recipient), ctx.sender(), recipient, &item_id)
        {
            Ok(bag) => bag,
            Err(e) => return Err(Rejected::new(e, item)),
        };

        self.ledger.transfer_into_custody(bag.id(), item)?;
        bag.record_pending(item_id.clone());

        log::debug!(
            "added item {item_id} to bag {} ({} pending)",
            bag.id(),
            bag.len()
        );
        Ok(())
    }

    /// Move the bag pending for `recipient` so it is keyed by `new_recipient`.
    ///
    /// Owner and pending items are unchanged. Checks, in order:
    /// - `NotFound` when nothing is pending for `recipient`
    /// - `Unauthorized` when the caller is not the owner
    /// - `AlreadyExists` when the bag's pending set holds an item whose
    ///   identity equals either address
    /// - `AlreadyExists` when another bag is already keyed by `new_recipient`
    ///
    /// Redirecting a bag to its current recipient is a no-op.
    pub fn redirect(
        &self,
        ctx: &TxContext,
        recipient: &Address,
        new_recipient: Address,
    ) -> Result<()> {
        let mut bags = self.bags()?;
        let bag = bags
            .get(recipient)
            .ok_or_else(|| CustodyError::NotFound(recipient.clone()))?;
        authorize(bag, ctx.sender())?;

        // Membership guard against the item set, kept as observed.
        if bag.contains_item(&ObjectId::from(recipient))
            || bag.contains_item(&ObjectId::from(&new_recipient))
        {
            return Err(CustodyError::AlreadyExists(new_recipient));
        }

        if &new_recipient == recipient {
            return Ok(());
        }
        if bags.contains_key(&new_recipient) {
            return Err(CustodyError::AlreadyExists(new_recipient));
        }

        if let Some(bag) = bags.remove(recipient) {
            log::debug!("redirected bag {} from {recipient} to {new_recipient}", bag.id());
            bags.insert(new_recipient, bag);
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Claim entry points
    // -----------------------------------------------------------------------

    /// Detach the bag pending for the caller and mint its claim token.
    pub fn begin_claim(&self, ctx: &TxContext) -> Result<(Bag, ClaimToken)> {
        let mut bags = self.bags()?;
        let mut bag = bags
            .remove(ctx.sender())
            .ok_or_else(|| CustodyError::NotFound(ctx.sender().clone()))?;

        bag.detach();
        let token = ClaimToken::for_bag(&bag);
        log::debug!(
            "claim begun on bag {} by recipient {} ({} pending)",
            bag.id(),
            ctx.sender(),
            bag.len()
        );
        Ok((bag, token))
    }

    /// Detach the bag pending for `recipient` back to its owner.
    ///
    /// Same effect as [`Registry::begin_claim`], but only the depositor
    /// may call it. Used to recover items from an unresponsive recipient.
    pub fn reclaim(&self, ctx: &TxContext, recipient: &Address) -> Result<(Bag, ClaimToken)> {
        let mut bags = self.bags()?;
        let bag = bags
            .get(recipient)
            .ok_or_else(|| CustodyError::NotFound(recipient.clone()))?;
        authorize(bag, ctx.sender())?;

        let mut bag = bags
            .remove(recipient)
            .ok_or_else(|| CustodyError::NotFound(recipient.clone()))?;
        bag.detach();
        let token = ClaimToken::for_bag(&bag);
        log::debug!(
            "bag {} for {recipient} reclaimed by owner {}",
            bag.id(),
            ctx.sender()
        );
        Ok((bag, token))
    }
}
