//! Persistent node storage behind the sparse Merkle trees.
//!
//! A node store maps a field element (a node hash) to an ordered list of field
//! elements (the node record) and keeps one extra slot, the root pointer.
//! Implementations serialize keys and records with [`crate::utils::codec`].
//!
//! - [`MemStore`]: in-memory map, shareable between trees through namespaces
//! - [`RocksStore`]: RocksDB-backed store (feature `rocksdb`)

pub mod memstore;
#[cfg(feature = "rocksdb")]
pub mod rocksstore;

pub use memstore::MemStore;
#[cfg(feature = "rocksdb")]
pub use rocksstore::RocksStore;

use ark_bn254::Fr;
use auto_impl::auto_impl;
use thiserror::Error;

use crate::utils::codec::CodecError;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Backend error: {0}")]
    Backend(#[from] anyhow::Error),
}

/// Storage contract required by the tree engine.
///
/// Reads never return default values: a missing record is `Ok(None)` and the
/// caller decides whether that means corruption or an empty subtree. Writes take
/// `&self`, implementations use interior mutability.
#[auto_impl(&, Arc)]
pub trait NodeStore: Send + Sync {
    /// Current root pointer, or zero if none was ever written.
    fn get_root(&self) -> Result<Fr, StoreError>;

    /// Look up one record.
    ///
    /// # Arguments
    ///
    /// * `key` - The hash of the node
    fn get(&self, key: &Fr) -> Result<Option<Vec<Fr>>, StoreError>;

    /// Look up several records, results in key order.
    fn multi_get(&self, keys: &[Fr]) -> Result<Vec<Option<Vec<Fr>>>, StoreError> {
        keys.iter().map(|k| self.get(k)).collect()
    }

    /// Overwrite the root pointer.
    fn set_root(&self, root: &Fr) -> Result<(), StoreError>;

    /// Insert or overwrite a batch of records.
    fn multi_ins(&self, records: &[(Fr, Vec<Fr>)]) -> Result<(), StoreError>;

    /// Delete a batch of records; missing keys are ignored.
    fn multi_del(&self, keys: &[Fr]) -> Result<(), StoreError>;
}

/// Joins a parent namespace and a child namespace into a key prefix.
pub(crate) fn namespace_prefix(parent: &str, namespace: &str) -> String {
    if namespace.is_empty() {
        parent.to_string()
    } else {
        format!("{}{}/", parent, namespace)
    }
}
