//! Error types for AgenticCustody.
//!
//! Every failure is a rejected individual operation. Checks run before
//! effects, so a returned error means nothing was changed.

use crate::id::{Address, ObjectId};

/// Custody error types covering all protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum CustodyError {
    #[error("A bag is already registered for {0}")]
    AlreadyExists(Address),

    #[error("No bag registered for {0}")]
    NotFound(Address),

    #[error("Caller {caller} is not the bag owner {owner}")]
    Unauthorized { caller: Address, owner: Address },

    #[error("Bag is full: at most {limit} pending items")]
    CapacityExceeded { limit: usize },

    #[error("Claim token does not belong to this bag")]
    InvalidClaim,

    #[error("Item {0} is not pending in this bag")]
    NotAllowedToClaim(ObjectId),

    #[error("Bag still holds {0} pending items")]
    ItemsRemaining(usize),

    #[error("Item {0} is already pending in this bag")]
    DuplicateItem(ObjectId),

    #[error("Ledger error: {0}")]
    Ledger(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Registry lock poisoned")]
    Poisoned,
}

/// Fieldless view of [`CustodyError`] for branching on the failure kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustodyErrorKind {
    AlreadyExists,
    NotFound,
    Unauthorized,
    CapacityExceeded,
    InvalidClaim,
    NotAllowedToClaim,
    ItemsRemaining,
    DuplicateItem,
    Ledger,
    Serialization,
    Poisoned,
}

impl CustodyError {
    /// Return the kind of this error, dropping its payload.
    pub fn kind(&self) -> CustodyErrorKind {
        match self {
            Self::AlreadyExists(_) => CustodyErrorKind::AlreadyExists,
            Self::NotFound(_) => CustodyErrorKind::NotFound,
            Self::Unauthorized { .. } => CustodyErrorKind::Unauthorized,
            Self::CapacityExceeded { .. } => CustodyErrorKind::CapacityExceeded,
            Self::InvalidClaim => CustodyErrorKind::InvalidClaim,
            Self::NotAllowedToClaim(_) => CustodyErrorKind::NotAllowedToClaim,
            Self::ItemsRemaining(_) => CustodyErrorKind::ItemsRemaining,
            Self::DuplicateItem(_) => CustodyErrorKind::DuplicateItem,
            Self::Ledger(_) => CustodyErrorKind::Ledger,
            Self::Serialization(_) => CustodyErrorKind::Serialization,
            Self::Poisoned => CustodyErrorKind::Poisoned,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, CustodyError>;

/// A rejected operation that was handed an item by value.
///
/// The item is returned untouched so a failed deposit never loses it.
pub struct Rejected<T> {
    /// Why the operation was rejected.
    pub error: CustodyError,
    /// The item, still owned by the caller.
    pub item: T,
}

impl<T> Rejected<T> {
    /// Pair an error with the item it refused.
    pub fn new(error: CustodyError, item: T) -> Self {
        Self { error, item }
    }

    /// Return the kind of the underlying error.
    pub fn kind(&self) -> CustodyErrorKind {
        self.error.kind()
    }

    /// Split into the error and the returned item.
    pub fn into_parts(self) -> (CustodyError, T) {
        (self.error, self.item)
    }
}

impl<T> std::fmt::Debug for Rejected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rejected")
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl<T> std::fmt::Display for Rejected<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.error)
    }
}

impl<T> std::error::Error for Rejected<T> {}

impl<T> From<Rejected<T>> for CustodyError {
    fn from(rejected: Rejected<T>) -> Self {
        rejected.error
    }
}
