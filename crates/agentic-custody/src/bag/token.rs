//! Claim token — the capability that authorizes draining one bag.

use crate::id::ObjectId;

use super::bag::Bag;

/// Single-use capability binding a claim session to exactly one bag.
///
/// Tokens are minted only when a bag leaves the registry and are
/// consumed by [`Bag::finalize`]. They cannot be cloned and the bound
/// bag identity is not exposed; the only operation is [`ClaimToken::matches`].
#[must_use = "a claim token must be presented to finalize its bag"]
pub struct ClaimToken {
    bag_id: ObjectId,
}

impl ClaimToken {
    pub(crate) fn for_bag(bag: &Bag) -> Self {
        Self {
            bag_id: bag.id().clone(),
        }
    }

    /// Whether this token was minted for `bag`.
    pub fn matches(&self, bag: &Bag) -> bool {
        &self.bag_id == bag.id()
    }
}

impl std::fmt::Debug for ClaimToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimToken").finish_non_exhaustive()
    }
}
