//! Record key encoding.

use std::fmt;

use crate::catalog::EntityKind;
use crate::model::EntityId;

/// Size of the encoded id suffix.
pub const ID_SIZE: usize = 8;

/// Key of a record in the records tree.
///
/// Key format: `[kind name][0x00][id (8 bytes, big-endian)]`
///
/// Records of one kind share a prefix, and big-endian ids keep a prefix
/// scan in creation order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub kind: EntityKind,
    pub id: EntityId,
}

impl RecordKey {
    /// Create a new record key.
    pub fn new(kind: EntityKind, id: EntityId) -> Self {
        Self { kind, id }
    }

    /// Prefix shared by every record of `kind`.
    pub fn kind_prefix(kind: EntityKind) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(kind.name().len() + 1);
        prefix.extend_from_slice(kind.name().as_bytes());
        prefix.push(0);
        prefix
    }

    /// Encode the key to bytes.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Self::kind_prefix(self.kind);
        buf.extend_from_slice(&self.id.to_be_bytes());
        buf
    }

    /// Decode a key from bytes.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < ID_SIZE + 2 {
            return None;
        }
        let (head, id) = bytes.split_at(bytes.len() - ID_SIZE);
        let (name, sep) = head.split_at(head.len() - 1);
        if sep != [0] {
            return None;
        }
        let kind = std::str::from_utf8(name).ok()?.parse().ok()?;
        Some(Self {
            kind,
            id: EntityId::from_be_slice(id)?,
        })
    }
}

impl fmt::Debug for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordKey({}/{})", self.kind, self.id)
    }
}

/// Get current timestamp in microseconds since Unix epoch.
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}
