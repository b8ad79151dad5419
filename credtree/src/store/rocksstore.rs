//! RocksDB-backed node store.
//!
//! Records are stored with the same string encoding as [`super::MemStore`],
//! under `namespace/decimal-hash` keys. Batched inserts and deletes are written
//! through a single `WriteBatch`, so each batch lands atomically.

use ark_bn254::Fr;
use ark_ff::Zero;
use rocksdb::{WriteBatch, DB};
use std::fmt;
use std::sync::Arc;

use super::{namespace_prefix, NodeStore, StoreError};
use crate::config::Config;
use crate::def::ROOT_KEY;
use crate::utils::codec::{decode_key, decode_record, encode_key, encode_record};

fn backend_err(e: rocksdb::Error) -> StoreError {
    StoreError::Backend(anyhow::Error::from(e))
}

fn utf8(bz: Vec<u8>) -> Result<String, StoreError> {
    String::from_utf8(bz).map_err(|e| StoreError::Backend(anyhow::Error::from(e)))
}

#[derive(Clone)]
pub struct RocksStore {
    db: Arc<DB>,
    prefix: String,
}

impl fmt::Debug for RocksStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RocksStore")
            .field("path", &self.db.path())
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl RocksStore {
    /// Opens (or creates) the database in `config.dir`, scoped to `config.namespace`.
    pub fn open(config: &Config) -> Result<Self, StoreError> {
        let db = DB::open_default(&config.dir).map_err(backend_err)?;
        Ok(Self {
            db: Arc::new(db),
            prefix: namespace_prefix("", &config.namespace),
        })
    }

    /// Returns a handle over the same database restricted to a nested namespace.
    pub fn namespaced(&self, namespace: &str) -> Self {
        Self {
            db: self.db.clone(),
            prefix: namespace_prefix(&self.prefix, namespace),
        }
    }

    fn node_key(&self, key: &Fr) -> String {
        format!("{}{}", self.prefix, encode_key(key))
    }

    fn root_key(&self) -> String {
        format!("{}{}", self.prefix, ROOT_KEY)
    }
}

impl NodeStore for RocksStore {
    fn get_root(&self) -> Result<Fr, StoreError> {
        match self.db.get(self.root_key().as_bytes()).map_err(backend_err)? {
            Some(bz) => Ok(decode_key(&utf8(bz)?)?),
            None => Ok(Fr::zero()),
        }
    }

    fn get(&self, key: &Fr) -> Result<Option<Vec<Fr>>, StoreError> {
        match self.db.get(self.node_key(key).as_bytes()).map_err(backend_err)? {
            Some(bz) => Ok(Some(decode_record(&utf8(bz)?)?)),
            None => Ok(None),
        }
    }

    fn multi_get(&self, keys: &[Fr]) -> Result<Vec<Option<Vec<Fr>>>, StoreError> {
        let db_keys: Vec<String> = keys.iter().map(|k| self.node_key(k)).collect();
        let mut res = Vec::with_capacity(keys.len());
        for item in self.db.multi_get(db_keys.iter().map(|k| k.as_bytes())) {
            let record = match item.map_err(backend_err)? {
                Some(bz) => Some(decode_record(&utf8(bz)?)?),
                None => None,
            };
            res.push(record);
        }
        Ok(res)
    }

    fn set_root(&self, root: &Fr) -> Result<(), StoreError> {
        self.db
            .put(self.root_key().as_bytes(), encode_key(root).as_bytes())
            .map_err(backend_err)
    }

    fn multi_ins(&self, records: &[(Fr, Vec<Fr>)]) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        for (key, record) in records {
            batch.put(self.node_key(key).as_bytes(), encode_record(record)?.as_bytes());
        }
        self.db.write(batch).map_err(backend_err)
    }

    fn multi_del(&self, keys: &[Fr]) -> Result<(), StoreError> {
        let mut batch = WriteBatch::default();
        for key in keys {
            batch.delete(self.node_key(key).as_bytes());
        }
        self.db.write(batch).map_err(backend_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reopen_keeps_records() {
        let temp_dir = ::tempfile::Builder::new()
            .prefix("RocksStore-reopen")
            .tempdir()
            .unwrap();
        let config = Config::from_dir(temp_dir.path().to_str().unwrap()).with_namespace("claims");
        let record = vec![Fr::from(1u64), Fr::from(7u64), Fr::from(77u64)];
        {
            let store = RocksStore::open(&config).unwrap();
            assert_eq!(store.get_root().unwrap(), Fr::zero());
            store.multi_ins(&[(Fr::from(5u64), record.clone())]).unwrap();
            store.set_root(&Fr::from(5u64)).unwrap();
        }
        let store = RocksStore::open(&config).unwrap();
        assert_eq!(store.get_root().unwrap(), Fr::from(5u64));
        assert_eq!(
            store.multi_get(&[Fr::from(5u64), Fr::from(6u64)]).unwrap(),
            vec![Some(record), None]
        );
        store.multi_del(&[Fr::from(5u64)]).unwrap();
        assert_eq!(store.get(&Fr::from(5u64)).unwrap(), None);
        assert_eq!(store.namespaced("other").get_root().unwrap(), Fr::zero());
    }
}
