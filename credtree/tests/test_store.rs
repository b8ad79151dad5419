use std::sync::Arc;

use ark_bn254::Fr;
use ark_ff::Zero;

use credtree::utils::codec::{decode_record, encode_record};
use credtree::{check_tree, BinarySmt, Config, Hasher, MemStore, NodeStore, QuinarySmt};

fn fr(n: u64) -> Fr {
    Fr::from(n)
}

#[test]
fn test_trees_share_one_store() {
    let _ = env_logger::builder().is_test(true).try_init();
    let hasher = Arc::new(Hasher::new());
    let store = MemStore::new();

    let config = Config::for_radix(2).with_namespace("claims");
    let mut claims =
        BinarySmt::new(store.namespaced(&config.namespace), hasher.clone(), &config).unwrap();
    let config = Config::for_radix(5).with_namespace("revocations");
    let mut revocations =
        QuinarySmt::new(store.namespaced(&config.namespace), hasher.clone(), &config).unwrap();

    // same leaf hashes in both trees, kept apart by the namespace prefix
    for k in [3u64, 8, 13] {
        claims.insert(&fr(k), &fr(1)).unwrap();
        revocations.insert(&fr(k), &fr(1)).unwrap();
    }
    claims.delete(&fr(8)).unwrap();

    assert_eq!(revocations.find(&fr(8)).unwrap().found_value(), Some(fr(1)));
    assert!(!claims.find(&fr(8)).unwrap().found());
    assert_ne!(claims.root(), revocations.root());
    check_tree(&claims).unwrap();
    check_tree(&revocations).unwrap();

    assert_eq!(store.get_root().unwrap(), Fr::zero());
    assert_eq!(store.node_count(), 0);
    assert_eq!(store.namespaced("claims").get_root().unwrap(), claims.root());
}

#[test]
fn test_shared_handles() {
    let hasher = Arc::new(Hasher::new());
    let store = Arc::new(MemStore::new());
    let config = Config::for_radix(2).with_max_levels(32);

    let mut writer = BinarySmt::new(store.clone(), hasher.clone(), &config).unwrap();
    writer.insert(&fr(21), &fr(42)).unwrap();
    writer.insert(&fr(22), &fr(44)).unwrap();

    let reader = BinarySmt::new(&*store, hasher, &config).unwrap();
    assert_eq!(reader.root(), writer.root());
    assert_eq!(reader.find(&fr(22)).unwrap().found_value(), Some(fr(44)));
}

#[test]
fn test_records_are_decimal_json() {
    let record = vec![fr(2), Fr::zero(), -Fr::from(1u64)];
    let s = encode_record(&record).unwrap();
    assert!(s.starts_with("[\"2\",\"0\",\"218882428718392752222464057452572750885483644004160343436982041865758084956"));
    assert_eq!(decode_record(&s).unwrap(), record);
    assert!(decode_record("[\"01\"]").is_err());
    assert!(decode_record("[2]").is_err());
}

#[cfg(feature = "rocksdb")]
mod rocks {
    use super::*;
    use credtree::store::RocksStore;

    #[test]
    fn test_reopen_persistent_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let hasher = Arc::new(Hasher::new());
        let config = Config::for_radix(5).with_max_levels(20).with_namespace("claims");
        let config = Config { dir: path.to_string(), ..config };

        let root = {
            let store = RocksStore::open(&config).unwrap();
            let mut tree = QuinarySmt::new(store, hasher.clone(), &config).unwrap();
            for k in 1..=10u64 {
                tree.insert(&fr(k * 5), &fr(k)).unwrap();
            }
            tree.delete(&fr(25)).unwrap();
            tree.root()
        };

        let store = RocksStore::open(&config).unwrap();
        let tree = QuinarySmt::new(store, hasher, &config).unwrap();
        assert_eq!(tree.root(), root);
        assert_eq!(tree.find(&fr(30)).unwrap().found_value(), Some(fr(6)));
        assert!(!tree.find(&fr(25)).unwrap().found());
        assert_eq!(check_tree(&tree).unwrap().leaves, 9);
    }
}
