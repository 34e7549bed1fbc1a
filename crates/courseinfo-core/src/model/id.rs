//! Record identifiers.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::EntityKind;

/// Identifier of a stored record, unique across all kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Big-endian bytes, so byte order matches numeric order in sled.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Decode from big-endian bytes.
    pub fn from_be_slice(bytes: &[u8]) -> Option<Self> {
        let buf: [u8; 8] = bytes.try_into().ok()?;
        Some(Self(u64::from_be_bytes(buf)))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Resolvable path of a record, used when presenting it.
pub fn record_path(kind: EntityKind, id: EntityId) -> String {
    format!("/api/{kind}/{id}")
}
