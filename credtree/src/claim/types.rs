use std::fmt;

use super::EntryError;
use crate::def::{ID_LEN, SCHEMA_HASH_LEN};

/// 16-byte identifier of the claim schema, stored in the low bytes of slot 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub struct SchemaHash([u8; SCHEMA_HASH_LEN]);

impl SchemaHash {
    pub fn new(bytes: [u8; SCHEMA_HASH_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bz: &[u8]) -> Result<Self, EntryError> {
        let bytes: [u8; SCHEMA_HASH_LEN] = bz
            .try_into()
            .map_err(|_| EntryError::InvalidSchemaHash(bz.len()))?;
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, EntryError> {
        Self::from_slice(&hex::decode(s)?)
    }

    pub fn as_bytes(&self) -> &[u8; SCHEMA_HASH_LEN] {
        &self.0
    }
}

impl fmt::Display for SchemaHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// 31-byte identity of another party, referenced from the index or value part.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Id([u8; ID_LEN]);

impl Id {
    /// # Errors
    /// - `InvalidIdLength` unless exactly 31 bytes are given
    /// - `EmptyId` if every byte is zero
    pub fn from_bytes(bz: &[u8]) -> Result<Self, EntryError> {
        let bytes: [u8; ID_LEN] = bz
            .try_into()
            .map_err(|_| EntryError::InvalidIdLength(bz.len()))?;
        if bytes.iter().all(|b| *b == 0) {
            return Err(EntryError::EmptyId);
        }
        Ok(Self(bytes))
    }

    pub fn from_hex(s: &str) -> Result<Self, EntryError> {
        Self::from_bytes(&hex::decode(s)?)
    }

    pub fn as_bytes(&self) -> &[u8; ID_LEN] {
        &self.0
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Who the claim is about, encoded in the low three bits of the flag byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
#[repr(u8)]
pub enum SubjectKind {
    /// The issuer itself; no identity slot is used.
    #[default]
    SelfSubject = 0b000,
    /// Another identity, stored in the index part (slot 1).
    OtherIdenIndex = 0b010,
    /// Another identity, stored in the value part (slot 5).
    OtherIdenValue = 0b011,
}

impl TryFrom<u8> for SubjectKind {
    type Error = EntryError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            0b000 => Ok(SubjectKind::SelfSubject),
            0b010 => Ok(SubjectKind::OtherIdenIndex),
            0b011 => Ok(SubjectKind::OtherIdenValue),
            other => Err(EntryError::InvalidSubject(other)),
        }
    }
}
