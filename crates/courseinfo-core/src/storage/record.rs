//! Record envelope for stored values.

use crate::error::Error;
use rkyv::{Archive, Deserialize, Serialize};

/// A stored record with metadata.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct Record {
    /// Serialized entity fields (JSON).
    pub data: Vec<u8>,

    /// Creation timestamp in microseconds since Unix epoch.
    pub created_at: u64,

    /// Last write timestamp in microseconds since Unix epoch.
    pub updated_at: u64,
}

impl Record {
    /// Create a new record with the current timestamp.
    pub fn new(data: Vec<u8>) -> Self {
        let now = super::key::current_timestamp();
        Self {
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the payload, keeping the creation time.
    pub fn revise(&self, data: Vec<u8>) -> Self {
        Self {
            data,
            created_at: self.created_at,
            updated_at: super::key::current_timestamp().max(self.created_at),
        }
    }

    /// Serialize the record to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a record from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_bytes() {
        let record = Record::new(br#"{"year":2024}"#.to_vec());
        let decoded = Record::from_bytes(&record.to_bytes().unwrap()).unwrap();
        assert_eq!(record, decoded);
    }

    #[test]
    fn test_revise_keeps_creation_time() {
        let record = Record::new(vec![1]);
        let revised = record.revise(vec![2]);
        assert_eq!(revised.created_at, record.created_at);
        assert!(revised.updated_at >= record.created_at);
        assert_eq!(revised.data, vec![2]);
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            Record::from_bytes(&[0xff, 0x00]),
            Err(Error::Deserialization(_))
        ));
    }
}
