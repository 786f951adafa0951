//! Identities — caller/recipient addresses and object IDs.
//!
//! Both are 32-byte values rendered as `0x` + lowercase hex. An address
//! maps onto the object ID with the same bytes, mirroring a ledger where
//! accounts and objects share one identity space.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Length of every identity in bytes.
pub const ID_LENGTH: usize = 32;

fn parse_hex_id(s: &str) -> std::result::Result<[u8; ID_LENGTH], String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let bytes = hex::decode(digits).map_err(|e| format!("invalid hex identity: {e}"))?;
    bytes
        .try_into()
        .map_err(|_| format!("identity must be {ID_LENGTH} bytes"))
}

/// Authenticated identity of a caller, depositor or recipient.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address([u8; ID_LENGTH]);

impl Address {
    /// Wrap raw address bytes.
    pub fn from_bytes(bytes: [u8; ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh random address.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_LENGTH];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for Address {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_hex_id(s).map(Self)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

/// Globally unique identity of a bag or an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ObjectId([u8; ID_LENGTH]);

impl ObjectId {
    /// Wrap raw object ID bytes.
    pub fn from_bytes(bytes: [u8; ID_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Derive an object ID as SHA-256 over a domain tag and a sequence of parts.
    pub fn derive(domain: &str, parts: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain.as_bytes());
        for part in parts {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Self(hasher.finalize().into())
    }

    /// Return the raw bytes.
    pub fn as_bytes(&self) -> &[u8; ID_LENGTH] {
        &self.0
    }
}

impl From<&Address> for ObjectId {
    fn from(addr: &Address) -> Self {
        Self(addr.0)
    }
}

impl From<Address> for ObjectId {
    fn from(addr: Address) -> Self {
        Self(addr.0)
    }
}

impl From<&ObjectId> for Address {
    fn from(id: &ObjectId) -> Self {
        Self(id.0)
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::str::FromStr for ObjectId {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        parse_hex_id(s).map(Self)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for ObjectId {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}
