//! Core definitions and constants.
//!
//! This module gathers the fixed parameters shared across the crate:
//! - Node record tags and the root slot name used by node stores
//! - Default tree depths per radix
//! - The byte layout of claim entries
//!
//! ## Entry layout
//! An entry is eight 32-byte slots. Each slot is read as a little-endian
//! integer, so the fields below live in the low bytes and the top byte of
//! every slot stays zero unless raw data is written into it.
//!
//! ```text
//! slot 0  [0..16) schema hash  [16] flags  [20..24) version  [24..28) seed
//!         [17..20) reserved: flags keep a 4-byte field, only its low byte is used
//! slot 1  index identity (31 bytes)
//! slot 2  index data
//! slot 3  index data
//! slot 4  [0..8) revocation nonce  [8..16) expiration date
//! slot 5  value identity (31 bytes)
//! slot 6  value data
//! slot 7  value data
//! ```

/// Name of the store slot holding the current root hash.
pub const ROOT_KEY: &str = "root";

/// Leading tag of a serialized leaf record `[1, key, value]`.
pub const LEAF_TAG: u64 = 1;

/// Leading tag of a serialized internal record `[2, child_0, .., child_{N-1}]`.
pub const INTERNAL_TAG: u64 = 2;

/// Default depth of a binary tree.
pub const DEFAULT_BINARY_MAX_LEVELS: usize = 64;

/// Default depth of a quinary tree (5^28 is slightly above 2^64).
pub const DEFAULT_QUINARY_MAX_LEVELS: usize = 28;

/// Inline capacity of a sibling group, enough for radix 5 without allocating.
pub const INLINE_SIBLINGS: usize = 4;

pub const ENTRY_SLOTS: usize = 8;
pub const SLOT_BYTES: usize = 32;
pub const ENTRY_BYTES: usize = ENTRY_SLOTS * SLOT_BYTES;

pub const SLOT_HEADER: usize = 0;
pub const SLOT_INDEX_ID: usize = 1;
pub const SLOT_INDEX_A: usize = 2;
pub const SLOT_INDEX_B: usize = 3;
pub const SLOT_VALUE_HEADER: usize = 4;
pub const SLOT_VALUE_ID: usize = 5;
pub const SLOT_VALUE_A: usize = 6;
pub const SLOT_VALUE_B: usize = 7;

pub const SCHEMA_HASH_LEN: usize = 16;
pub const ID_LEN: usize = 31;

pub const FLAGS_OFFSET: usize = 16;
pub const VERSION_OFFSET: usize = 20;
pub const SEED_OFFSET: usize = 24;
pub const REV_NONCE_OFFSET: usize = 0;
pub const EXPIRATION_OFFSET: usize = 8;

/// Low three bits of the flag byte: the subject kind.
pub const SUBJECT_MASK: u8 = 0b0000_0111;
pub const EXPIRABLE_FLAG: u8 = 0b0000_1000;
pub const UPDATABLE_FLAG: u8 = 0b0001_0000;
