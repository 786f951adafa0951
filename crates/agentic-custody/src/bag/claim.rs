//! Claim session — draining a detached bag and destroying it.
//!
//! A session is just the `(Bag, ClaimToken)` pair returned by the
//! registry. Whoever holds the pair may claim items, in any order, and
//! must finalize once the bag is empty.

use crate::error::{CustodyError, CustodyErrorKind, Result};
use crate::host::{Custody, Item, Ledger, Receiving};

use super::bag::Bag;
use super::token::ClaimToken;

/// A refused finalize, handing the bag and token back to the caller.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct Unfinalized {
    pub error: CustodyError,
    pub bag: Bag,
    pub token: ClaimToken,
}

impl Unfinalized {
    /// Return the kind of the underlying error.
    pub fn kind(&self) -> CustodyErrorKind {
        self.error.kind()
    }

    /// Split into the error and the untouched session.
    pub fn into_parts(self) -> (CustodyError, Bag, ClaimToken) {
        (self.error, self.bag, self.token)
    }
}

impl Bag {
    /// Take one pending item out of the bag's custody.
    ///
    /// `receiving` names an item the ledger holds under this bag. The
    /// token must have been minted for this bag and the item must still
    /// be pending; both are checked before the ledger is touched.
    pub fn claim_item<T: Item, L: Ledger>(
        &mut self,
        token: &ClaimToken,
        ledger: &L,
        receiving: Receiving<T>,
    ) -> Result<T> {
        if !token.matches(self) {
            log::warn!("claim on bag {} with a foreign token", self.id());
            return Err(CustodyError::InvalidClaim);
        }

        let item_id = receiving.id().clone();
        if !self.contains_item(&item_id) {
            return Err(CustodyError::NotAllowedToClaim(item_id));
        }

        let item = ledger.complete_receive(Custody::new(self.id()), receiving)?;
        debug_assert_eq!(item.id(), item_id);
        self.release_pending(&item_id);

        log::debug!(
            "claimed item {item_id} from bag {} ({} left)",
            self.id(),
            self.len()
        );
        Ok(item)
    }

    /// Destroy an emptied bag together with its claim token.
    ///
    /// Fails with `InvalidClaim` for a foreign token and with
    /// `ItemsRemaining` while anything is pending; in both cases the bag
    /// and token come back inside [`Unfinalized`].
    pub fn finalize(self, token: ClaimToken) -> std::result::Result<(), Unfinalized> {
        if !token.matches(&self) {
            return Err(Unfinalized {
                error: CustodyError::InvalidClaim,
                bag: self,
                token,
            });
        }
        if !self.is_empty() {
            return Err(Unfinalized {
                error: CustodyError::ItemsRemaining(self.len()),
                bag: self,
                token,
            });
        }

        log::debug!("finalized bag {}", self.id());
        Ok(())
    }
}
