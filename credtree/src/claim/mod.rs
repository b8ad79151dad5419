//! Fixed-width claim entries.
//!
//! A claim is an [`Entry`] of eight 32-byte slots. The first four slots form
//! the index part, hashed into `hi`, and the last four the value part, hashed
//! into `hv`. `(hi, hv)` is the key/value pair stored in a sparse Merkle tree.
//!
//! - [`Entry`]: slot storage with bit-level accessors and mutators
//! - [`EntryOption`]: builder options applied in order by [`Entry::new`]
//! - [`SchemaHash`], [`Id`], [`SubjectKind`]: typed fixed-width inputs

pub mod entry;
pub mod options;
pub mod types;

pub use entry::Entry;
pub use options::EntryOption;
pub use types::{Id, SchemaHash, SubjectKind};

use thiserror::Error;

use crate::utils::hasher::HashError;

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("Slot {slot} does not fit in the field")]
    DataOverflow { slot: usize },

    #[error("Invalid schema hash length: {0}, expected 16 bytes")]
    InvalidSchemaHash(usize),

    #[error("Invalid identity length: {0}, expected 31 bytes")]
    InvalidIdLength(usize),

    #[error("Identity is empty")]
    EmptyId,

    #[error("Invalid subject kind bits: {0:#05b}")]
    InvalidSubject(u8),

    #[error("Invalid entry length: {0}, expected 256 bytes")]
    InvalidEntryLength(usize),

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Hash error: {0}")]
    Hash(#[from] HashError),
}
