//! Sparse Merkle trees over the BN254 field.
//!
//! One engine, [`Smt`], is parameterized by its radix `N`:
//! - [`BinarySmt`]: two children per internal node, keys split into bits
//! - [`QuinarySmt`]: five children per internal node, keys split into base-5 digits
//!
//! Nodes are content addressed: every record is stored under its own hash, and
//! the only mutable state of a tree is its root. Mutations write new nodes,
//! then move the root pointer, then drop superseded nodes.
//!
//! - [`node`]: typed node records and sibling groups
//! - [`tree`]: find / insert / update / delete
//! - [`proof`]: operation results and native proof checking
//! - [`check`]: whole-tree consistency validation

pub mod check;
pub mod node;
pub mod proof;
pub mod tree;

pub use node::{NodeRecord, SiblingGroup};
pub use proof::{DeletingResult, FindOutcome, FindResult, InsertingResult, UpdatingResult};
pub use tree::Smt;

use thiserror::Error;

use crate::claim::EntryError;
use crate::store::StoreError;
use crate::utils::hasher::HashError;

pub type BinarySmt<S> = Smt<S, 2>;
pub type QuinarySmt<S> = Smt<S, 5>;

#[derive(Error, Debug)]
pub enum SmtError {
    #[error("Reached the maximum tree depth of {max_levels} levels")]
    ReachedMaxLevel { max_levels: usize },

    #[error("Key {0} already exists")]
    KeyExists(String),

    #[error("Key {0} not found")]
    KeyNotFound(String),

    #[error("Node record {0} not found in the store")]
    RecordNotFound(String),

    #[error("Node record {hash} has an invalid shape: {reason}")]
    InvalidNodeShape { hash: String, reason: String },

    #[error("Invalid tree configuration: {0}")]
    InvalidConfig(String),

    #[error("Inconsistent tree at level {level}: {reason}")]
    Inconsistent { level: usize, reason: String },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Hash error: {0}")]
    Hash(#[from] HashError),

    #[error("Entry error: {0}")]
    Entry(#[from] EntryError),
}
