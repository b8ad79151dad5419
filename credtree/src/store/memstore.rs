//! In-memory node store.
//!
//! [`MemStore`] keeps serialized records in a `HashMap<String, String>` behind a
//! [`RwLock`]. Cloning a `MemStore` yields another handle to the same map, and
//! [`MemStore::namespaced`] yields a handle whose keys (including the root slot)
//! are prefixed, so independent trees can share one map without sharing a root.
//!
//! Intended for tests, tooling and short-lived trees; use a persistent store
//! for anything that must survive the process.

use ark_bn254::Fr;
use ark_ff::Zero;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use super::{namespace_prefix, NodeStore, StoreError};
use crate::def::ROOT_KEY;
use crate::utils::codec::{decode_key, decode_record, encode_key, encode_record};

#[derive(Debug, Default, Clone)]
pub struct MemStore {
    kvs: Arc<RwLock<HashMap<String, String>>>,
    prefix: String,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle over the same map restricted to a nested namespace.
    pub fn namespaced(&self, namespace: &str) -> Self {
        Self {
            kvs: self.kvs.clone(),
            prefix: namespace_prefix(&self.prefix, namespace),
        }
    }

    /// Number of node records directly in this namespace (the root slot excluded).
    pub fn node_count(&self) -> usize {
        self.kvs
            .read()
            .keys()
            .filter_map(|k| k.strip_prefix(self.prefix.as_str()))
            .filter(|rest| *rest != ROOT_KEY && !rest.contains('/'))
            .count()
    }

    fn node_key(&self, key: &Fr) -> String {
        format!("{}{}", self.prefix, encode_key(key))
    }

    fn root_key(&self) -> String {
        format!("{}{}", self.prefix, ROOT_KEY)
    }
}

impl NodeStore for MemStore {
    fn get_root(&self) -> Result<Fr, StoreError> {
        match self.kvs.read().get(&self.root_key()) {
            Some(s) => Ok(decode_key(s)?),
            None => Ok(Fr::zero()),
        }
    }

    fn get(&self, key: &Fr) -> Result<Option<Vec<Fr>>, StoreError> {
        match self.kvs.read().get(&self.node_key(key)) {
            Some(s) => Ok(Some(decode_record(s)?)),
            None => Ok(None),
        }
    }

    fn multi_get(&self, keys: &[Fr]) -> Result<Vec<Option<Vec<Fr>>>, StoreError> {
        let kvs = self.kvs.read();
        let mut res = Vec::with_capacity(keys.len());
        for key in keys {
            let record = match kvs.get(&self.node_key(key)) {
                Some(s) => Some(decode_record(s)?),
                None => None,
            };
            res.push(record);
        }
        Ok(res)
    }

    fn set_root(&self, root: &Fr) -> Result<(), StoreError> {
        self.kvs.write().insert(self.root_key(), encode_key(root));
        Ok(())
    }

    fn multi_ins(&self, records: &[(Fr, Vec<Fr>)]) -> Result<(), StoreError> {
        // encode everything first so a codec failure leaves the map untouched
        let mut encoded = Vec::with_capacity(records.len());
        for (key, record) in records {
            encoded.push((self.node_key(key), encode_record(record)?));
        }
        let mut kvs = self.kvs.write();
        for (k, v) in encoded {
            kvs.insert(k, v);
        }
        Ok(())
    }

    fn multi_del(&self, keys: &[Fr]) -> Result<(), StoreError> {
        let mut kvs = self.kvs.write();
        for key in keys {
            kvs.remove(&self.node_key(key));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fr(n: u64) -> Fr {
        Fr::from(n)
    }

    #[test]
    fn test_get_and_delete() {
        let store = MemStore::new();
        assert_eq!(store.get_root().unwrap(), Fr::zero());
        assert_eq!(store.get(&fr(1)).unwrap(), None);

        store
            .multi_ins(&[(fr(1), vec![fr(1), fr(7), fr(77)]), (fr(2), vec![fr(0), fr(1)])])
            .unwrap();
        assert_eq!(store.get(&fr(1)).unwrap(), Some(vec![fr(1), fr(7), fr(77)]));
        assert_eq!(
            store.multi_get(&[fr(2), fr(3)]).unwrap(),
            vec![Some(vec![fr(0), fr(1)]), None]
        );
        assert_eq!(store.node_count(), 2);

        store.multi_del(&[fr(1), fr(3)]).unwrap();
        assert_eq!(store.get(&fr(1)).unwrap(), None);
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_root_slot() {
        let store = MemStore::new();
        store.set_root(&fr(42)).unwrap();
        assert_eq!(store.get_root().unwrap(), fr(42));
        assert_eq!(store.node_count(), 0);
        // a clone is another handle to the same map
        assert_eq!(store.clone().get_root().unwrap(), fr(42));
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = MemStore::new();
        let auth = store.namespaced("auth");
        let claims = store.namespaced("claims");

        auth.set_root(&fr(1)).unwrap();
        claims.set_root(&fr(2)).unwrap();
        auth.multi_ins(&[(fr(10), vec![fr(1), fr(10), fr(11)])]).unwrap();

        assert_eq!(store.get_root().unwrap(), Fr::zero());
        assert_eq!(auth.get_root().unwrap(), fr(1));
        assert_eq!(claims.get_root().unwrap(), fr(2));
        assert!(auth.get(&fr(10)).unwrap().is_some());
        assert!(claims.get(&fr(10)).unwrap().is_none());
        assert!(store.get(&fr(10)).unwrap().is_none());

        assert_eq!(auth.node_count(), 1);
        assert_eq!(claims.node_count(), 0);
        assert_eq!(store.node_count(), 0);
        assert_eq!(auth.namespaced("inner").node_count(), 0);
    }
}
