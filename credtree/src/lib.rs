//! credtree keeps identity claims in sparse Merkle trees over the BN254 field,
//! with Poseidon hashing compatible with circom circuits.
//!
//! # Overview
//! credtree provides:
//! - Binary and quinary sparse Merkle trees with membership and non-membership proofs
//! - A fixed-width claim format whose index and value hashes key the trees
//! - Pluggable node storage with an in-memory and a RocksDB backend
//!
//! # Architecture
//! - [`Smt`]: the tree engine, generic over its store and radix
//!   - Keys are split into radix digits, least significant first
//!   - Leaves sit at the shallowest level where their prefix is unique
//!   - Mutations follow write-nodes / move-root / drop-stale ordering
//!
//! - [`Entry`]: eight 32-byte slots holding a schema hash, header flags, an
//!   optional identity and four data slots
//!
//! - [`NodeStore`]: the storage trait; [`MemStore`] and, with the `rocksdb`
//!   feature, [`store::RocksStore`] implement it
//!
//! # Example Usage
//! ```no_run
//! use std::sync::Arc;
//! use ark_bn254::Fr;
//! use credtree::{BinarySmt, Config, Hasher, MemStore};
//!
//! let hasher = Arc::new(Hasher::new());
//! let mut tree = BinarySmt::new(MemStore::new(), hasher, &Config::for_radix(2)).unwrap();
//! tree.insert(&Fr::from(7u64), &Fr::from(77u64)).unwrap();
//! let proof = tree.find(&Fr::from(7u64)).unwrap();
//! assert!(proof.found());
//! ```

pub mod claim;
pub mod config;
pub mod def;
pub mod smt;
pub mod store;
pub mod utils;

pub use claim::{Entry, EntryError, EntryOption, Id, SchemaHash, SubjectKind};
pub use config::Config;
pub use smt::check::{check_tree, collect_leaves, TreeStats};
pub use smt::proof::verify_find;
pub use smt::{
    BinarySmt, DeletingResult, FindOutcome, FindResult, InsertingResult, QuinarySmt,
    SiblingGroup, Smt, SmtError, UpdatingResult,
};
pub use store::{MemStore, NodeStore, StoreError};
pub use utils::hasher::{HashError, Hasher};
