//! Read-only queries over pending bags.

use crate::bag::BagSummary;
use crate::error::{CustodyError, Result};
use crate::host::Ledger;
use crate::id::Address;

use super::engine::Registry;

impl<L: Ledger> Registry<L> {
    /// Whether a bag is pending for `recipient`.
    pub fn contains(&self, recipient: &Address) -> Result<bool> {
        Ok(self.bags()?.contains_key(recipient))
    }

    /// Number of pending bags.
    pub fn len(&self) -> Result<usize> {
        Ok(self.bags()?.len())
    }

    /// Whether no bag is pending.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.bags()?.is_empty())
    }

    /// Snapshot of the bag pending for `recipient`.
    pub fn summary(&self, recipient: &Address) -> Result<BagSummary> {
        self.bags()?
            .get(recipient)
            .map(|bag| bag.summary())
            .ok_or_else(|| CustodyError::NotFound(recipient.clone()))
    }

    /// All recipients with a pending bag, sorted.
    pub fn recipients(&self) -> Result<Vec<Address>> {
        let mut recipients: Vec<Address> = self.bags()?.keys().cloned().collect();
        recipients.sort();
        Ok(recipients)
    }

    /// Recipients of every pending bag created by `owner`, sorted.
    pub fn recipients_owned_by(&self, owner: &Address) -> Result<Vec<Address>> {
        let mut recipients: Vec<Address> = self
            .bags()?
            .iter()
            .filter(|(_, bag)| bag.owner() == owner)
            .map(|(recipient, _)| recipient.clone())
            .collect();
        recipients.sort();
        Ok(recipients)
    }
}
