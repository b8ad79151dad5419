use ark_bn254::Fr;
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use super::{EntryError, EntryOption, Id, SchemaHash, SubjectKind};
use crate::def::{
    ENTRY_BYTES, ENTRY_SLOTS, EXPIRABLE_FLAG, EXPIRATION_OFFSET, FLAGS_OFFSET, ID_LEN,
    REV_NONCE_OFFSET, SCHEMA_HASH_LEN, SEED_OFFSET, SLOT_BYTES, SLOT_HEADER, SLOT_INDEX_A,
    SLOT_INDEX_B, SLOT_INDEX_ID, SLOT_VALUE_A, SLOT_VALUE_B, SLOT_VALUE_HEADER, SLOT_VALUE_ID,
    SUBJECT_MASK, UPDATABLE_FLAG, VERSION_OFFSET,
};
use crate::utils::field::{fr_from_le_bytes, fr_to_le_bytes};
use crate::utils::hasher::Hasher;

pub type Slot = [u8; SLOT_BYTES];

/// A claim: eight 32-byte slots, each a little-endian field element.
///
/// Every mutator validates the slots it touches and leaves the entry unchanged
/// when it fails, so an `Entry` always holds eight valid field elements.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Entry {
    slots: [Slot; ENTRY_SLOTS],
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entry({})", self.to_hex())
    }
}

impl Entry {
    /// Builds an entry by applying `options` in order, then stamping the schema.
    ///
    /// The schema hash is written last, so no option can override it.
    pub fn new<I>(schema: SchemaHash, options: I) -> Result<Self, EntryError>
    where
        I: IntoIterator<Item = EntryOption>,
    {
        let mut entry = Entry::default();
        for opt in options {
            opt.apply(&mut entry)?;
        }
        entry.set_schema_hash(&schema)?;
        Ok(entry)
    }

    pub fn from_slots(slots: [Slot; ENTRY_SLOTS]) -> Result<Self, EntryError> {
        for (i, slot) in slots.iter().enumerate() {
            if fr_from_le_bytes(slot).is_none() {
                return Err(EntryError::DataOverflow { slot: i });
            }
        }
        Ok(Self { slots })
    }

    pub fn slots(&self) -> &[Slot; ENTRY_SLOTS] {
        &self.slots
    }

    pub fn element(&self, i: usize) -> Result<Fr, EntryError> {
        fr_from_le_bytes(&self.slots[i]).ok_or(EntryError::DataOverflow { slot: i })
    }

    pub fn elements(&self) -> Result<[Fr; ENTRY_SLOTS], EntryError> {
        let mut res = [Fr::default(); ENTRY_SLOTS];
        for (i, e) in res.iter_mut().enumerate() {
            *e = self.element(i)?;
        }
        Ok(res)
    }

    // Applies `f` to a copy of slot `i` and keeps it only if it still fits the field.
    fn update_slot<F>(&mut self, i: usize, f: F) -> Result<(), EntryError>
    where
        F: FnOnce(&mut Slot),
    {
        let mut slot = self.slots[i];
        f(&mut slot);
        if fr_from_le_bytes(&slot).is_none() {
            return Err(EntryError::DataOverflow { slot: i });
        }
        self.slots[i] = slot;
        Ok(())
    }

    fn flags(&self) -> u8 {
        self.slots[SLOT_HEADER][FLAGS_OFFSET]
    }

    fn set_flag(&mut self, mask: u8, on: bool) -> Result<(), EntryError> {
        self.update_slot(SLOT_HEADER, |s| {
            if on {
                s[FLAGS_OFFSET] |= mask;
            } else {
                s[FLAGS_OFFSET] &= !mask;
            }
        })
    }

    pub fn schema_hash(&self) -> SchemaHash {
        let mut bytes = [0u8; SCHEMA_HASH_LEN];
        bytes.copy_from_slice(&self.slots[SLOT_HEADER][..SCHEMA_HASH_LEN]);
        SchemaHash::new(bytes)
    }

    pub fn set_schema_hash(&mut self, schema: &SchemaHash) -> Result<(), EntryError> {
        self.update_slot(SLOT_HEADER, |s| {
            s[..SCHEMA_HASH_LEN].copy_from_slice(schema.as_bytes())
        })
    }

    pub fn subject_kind(&self) -> Result<SubjectKind, EntryError> {
        SubjectKind::try_from(self.flags() & SUBJECT_MASK)
    }

    fn set_subject_kind(&mut self, kind: SubjectKind) -> Result<(), EntryError> {
        self.update_slot(SLOT_HEADER, |s| {
            s[FLAGS_OFFSET] = (s[FLAGS_OFFSET] & !SUBJECT_MASK) | kind as u8
        })
    }

    // Writes `id` into `slot`, clears `other` and records `kind`, all or nothing.
    fn set_id_slot(
        &mut self,
        id: Option<&Id>,
        slot: usize,
        other: usize,
        kind: SubjectKind,
    ) -> Result<(), EntryError> {
        let mut next = *self;
        next.update_slot(slot, |s| {
            *s = [0u8; SLOT_BYTES];
            if let Some(id) = id {
                s[..ID_LEN].copy_from_slice(id.as_bytes());
            }
        })?;
        next.update_slot(other, |s| *s = [0u8; SLOT_BYTES])?;
        next.set_subject_kind(kind)?;
        *self = next;
        Ok(())
    }

    /// Makes the claim about another identity referenced from the index part.
    ///
    /// Clears the value identity slot.
    pub fn set_index_id(&mut self, id: &Id) -> Result<(), EntryError> {
        self.set_id_slot(
            Some(id),
            SLOT_INDEX_ID,
            SLOT_VALUE_ID,
            SubjectKind::OtherIdenIndex,
        )
    }

    /// Makes the claim about another identity referenced from the value part.
    ///
    /// Clears the index identity slot.
    pub fn set_value_id(&mut self, id: &Id) -> Result<(), EntryError> {
        self.set_id_slot(
            Some(id),
            SLOT_VALUE_ID,
            SLOT_INDEX_ID,
            SubjectKind::OtherIdenValue,
        )
    }

    /// Clears both identity slots and marks the claim as self-referencing.
    pub fn reset_id(&mut self) -> Result<(), EntryError> {
        self.set_id_slot(None, SLOT_INDEX_ID, SLOT_VALUE_ID, SubjectKind::SelfSubject)
    }

    /// The referenced identity, or `None` for a self claim.
    pub fn id(&self) -> Result<Option<Id>, EntryError> {
        let slot = match self.subject_kind()? {
            SubjectKind::SelfSubject => return Ok(None),
            SubjectKind::OtherIdenIndex => SLOT_INDEX_ID,
            SubjectKind::OtherIdenValue => SLOT_VALUE_ID,
        };
        Id::from_bytes(&self.slots[slot][..ID_LEN]).map(Some)
    }

    pub fn revocation_nonce(&self) -> u64 {
        LittleEndian::read_u64(
            &self.slots[SLOT_VALUE_HEADER][REV_NONCE_OFFSET..REV_NONCE_OFFSET + 8],
        )
    }

    pub fn set_revocation_nonce(&mut self, nonce: u64) -> Result<(), EntryError> {
        self.update_slot(SLOT_VALUE_HEADER, |s| {
            LittleEndian::write_u64(&mut s[REV_NONCE_OFFSET..REV_NONCE_OFFSET + 8], nonce)
        })
    }

    pub fn is_expirable(&self) -> bool {
        self.flags() & EXPIRABLE_FLAG != 0
    }

    /// Expiration date in unix seconds, `None` unless the expirable flag is set.
    pub fn expiration_date(&self) -> Option<u64> {
        if !self.is_expirable() {
            return None;
        }
        Some(LittleEndian::read_u64(
            &self.slots[SLOT_VALUE_HEADER][EXPIRATION_OFFSET..EXPIRATION_OFFSET + 8],
        ))
    }

    /// Sets the expiration date and the expirable flag.
    pub fn set_expiration_date(&mut self, unix_secs: u64) -> Result<(), EntryError> {
        let mut next = *self;
        next.update_slot(SLOT_VALUE_HEADER, |s| {
            LittleEndian::write_u64(&mut s[EXPIRATION_OFFSET..EXPIRATION_OFFSET + 8], unix_secs)
        })?;
        next.set_flag(EXPIRABLE_FLAG, true)?;
        *self = next;
        Ok(())
    }

    /// Clears the expiration date and the expirable flag.
    pub fn reset_expiration_date(&mut self) -> Result<(), EntryError> {
        let mut next = *self;
        next.update_slot(SLOT_VALUE_HEADER, |s| {
            s[EXPIRATION_OFFSET..EXPIRATION_OFFSET + 8].fill(0)
        })?;
        next.set_flag(EXPIRABLE_FLAG, false)?;
        *self = next;
        Ok(())
    }

    pub fn is_updatable(&self) -> bool {
        self.flags() & UPDATABLE_FLAG != 0
    }

    pub fn set_updatable(&mut self, updatable: bool) -> Result<(), EntryError> {
        self.set_flag(UPDATABLE_FLAG, updatable)
    }

    pub fn version(&self) -> u32 {
        LittleEndian::read_u32(&self.slots[SLOT_HEADER][VERSION_OFFSET..VERSION_OFFSET + 4])
    }

    pub fn set_version(&mut self, version: u32) -> Result<(), EntryError> {
        self.update_slot(SLOT_HEADER, |s| {
            LittleEndian::write_u32(&mut s[VERSION_OFFSET..VERSION_OFFSET + 4], version)
        })
    }

    pub fn seed(&self) -> u32 {
        LittleEndian::read_u32(&self.slots[SLOT_HEADER][SEED_OFFSET..SEED_OFFSET + 4])
    }

    pub fn set_seed(&mut self, seed: u32) -> Result<(), EntryError> {
        self.update_slot(SLOT_HEADER, |s| {
            LittleEndian::write_u32(&mut s[SEED_OFFSET..SEED_OFFSET + 4], seed)
        })
    }

    fn set_pair(&mut self, i: usize, j: usize, a: &Slot, b: &Slot) -> Result<(), EntryError> {
        let mut next = *self;
        next.update_slot(i, |s| *s = *a)?;
        next.update_slot(j, |s| *s = *b)?;
        *self = next;
        Ok(())
    }

    /// Writes two field elements into the free index slots.
    pub fn set_index_data(&mut self, a: &Fr, b: &Fr) -> Result<(), EntryError> {
        self.set_index_data_bytes(&fr_to_le_bytes(a), &fr_to_le_bytes(b))
    }

    /// Writes two raw little-endian slots into the free index slots.
    ///
    /// # Errors
    /// `DataOverflow` if either slot is not below the field modulus
    pub fn set_index_data_bytes(&mut self, a: &Slot, b: &Slot) -> Result<(), EntryError> {
        self.set_pair(SLOT_INDEX_A, SLOT_INDEX_B, a, b)
    }

    pub fn index_data(&self) -> Result<(Fr, Fr), EntryError> {
        Ok((self.element(SLOT_INDEX_A)?, self.element(SLOT_INDEX_B)?))
    }

    /// Writes two field elements into the free value slots.
    pub fn set_value_data(&mut self, a: &Fr, b: &Fr) -> Result<(), EntryError> {
        self.set_value_data_bytes(&fr_to_le_bytes(a), &fr_to_le_bytes(b))
    }

    /// Writes two raw little-endian slots into the free value slots.
    pub fn set_value_data_bytes(&mut self, a: &Slot, b: &Slot) -> Result<(), EntryError> {
        self.set_pair(SLOT_VALUE_A, SLOT_VALUE_B, a, b)
    }

    pub fn value_data(&self) -> Result<(Fr, Fr), EntryError> {
        Ok((self.element(SLOT_VALUE_A)?, self.element(SLOT_VALUE_B)?))
    }

    /// Index hash: `H(slot0, slot1, slot2, slot3)`, the tree key of the claim.
    pub fn hi(&self, hasher: &Hasher) -> Result<Fr, EntryError> {
        let elems = self.elements()?;
        Ok(hasher.hash(&elems[..4])?)
    }

    /// Value hash: `H(slot4, slot5, slot6, slot7)`, the tree value of the claim.
    pub fn hv(&self, hasher: &Hasher) -> Result<Fr, EntryError> {
        let elems = self.elements()?;
        Ok(hasher.hash(&elems[4..])?)
    }

    pub fn hi_hv(&self, hasher: &Hasher) -> Result<(Fr, Fr), EntryError> {
        let elems = self.elements()?;
        Ok((hasher.hash(&elems[..4])?, hasher.hash(&elems[4..])?))
    }

    /// Claim hash: `H(hi, hv)`.
    pub fn hash(&self, hasher: &Hasher) -> Result<Fr, EntryError> {
        let (hi, hv) = self.hi_hv(hasher)?;
        Ok(hasher.hash(&[hi, hv])?)
    }

    pub fn to_bytes(&self) -> [u8; ENTRY_BYTES] {
        let mut res = [0u8; ENTRY_BYTES];
        for (chunk, slot) in res.chunks_exact_mut(SLOT_BYTES).zip(self.slots.iter()) {
            chunk.copy_from_slice(slot);
        }
        res
    }

    pub fn from_bytes(bz: &[u8]) -> Result<Self, EntryError> {
        if bz.len() != ENTRY_BYTES {
            return Err(EntryError::InvalidEntryLength(bz.len()));
        }
        let mut slots = [[0u8; SLOT_BYTES]; ENTRY_SLOTS];
        for (slot, chunk) in slots.iter_mut().zip(bz.chunks_exact(SLOT_BYTES)) {
            slot.copy_from_slice(chunk);
        }
        Self::from_slots(slots)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, EntryError> {
        Self::from_bytes(&hex::decode(s)?)
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Entry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Entry::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
