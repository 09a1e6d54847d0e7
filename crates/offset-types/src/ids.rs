//! Identifiers used throughout the offset helper.
//!
//! Accounts and assets are both addressed by a 20-byte [`Address`].
//! Settlement records use UUIDv7 so the audit log sorts by time.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{OffsetError, Result};

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 20-byte account identifier (caller, helper custody, collaborator, owner).
///
/// Serialized as a `0x`-prefixed hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The all-zero address. Never a valid owner or destination.
    pub const ZERO: Self = Self([0u8; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Deterministic address from a human label.
    ///
    /// `SHA-256("offset:address:v1:" || label)[..20]`. Every caller deriving
    /// the same label gets the same address.
    #[must_use]
    pub fn derive(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"offset:address:v1:");
        hasher.update(label.as_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[..20]);
        Self(bytes)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// First four bytes as hex, for compact log fields.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for Address {
    type Err = OffsetError;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let raw = hex::decode(digits)
            .map_err(|e| OffsetError::Serialization(format!("address {s:?}: {e}")))?;
        let bytes: [u8; 20] = raw.try_into().map_err(|raw: Vec<u8>| {
            OffsetError::Serialization(format!(
                "address {s:?}: expected 20 bytes, got {}",
                raw.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// AssetHandle
// ---------------------------------------------------------------------------

/// Opaque handle of a fungible asset. Compared by identity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetHandle(pub Address);

impl AssetHandle {
    /// Sentinel standing in for the chain's native asset.
    pub const NATIVE: Self = Self(Address([0xee; 20]));

    #[must_use]
    pub fn new(address: Address) -> Self {
        Self(address)
    }

    /// Deterministic handle from a ticker-like label (e.g. `"BCT"`).
    #[must_use]
    pub fn derive(label: &str) -> Self {
        Self(Address::derive(label))
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.0
    }

    #[must_use]
    pub fn is_native(&self) -> bool {
        *self == Self::NATIVE
    }
}

impl From<Address> for AssetHandle {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_native() {
            write!(f, "native")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// OffsetId
// ---------------------------------------------------------------------------

/// Unique identifier of a completed settlement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OffsetId(pub Uuid);

impl OffsetId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for OffsetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OffsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offset:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
