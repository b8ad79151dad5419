use ark_bn254::Fr;
use ark_ff::Zero;

use credtree::utils::field::{fr_to_le_bytes, modulus};
use credtree::{Entry, EntryError, EntryOption, Hasher, Id, SchemaHash, SubjectKind};

#[derive(Debug, Clone, PartialEq)]
struct Fields {
    schema: SchemaHash,
    subject: SubjectKind,
    id: Option<Id>,
    nonce: u64,
    expiration: Option<u64>,
    updatable: bool,
    version: u32,
    seed: u32,
    index_data: (Fr, Fr),
    value_data: (Fr, Fr),
}

fn fields(e: &Entry) -> Fields {
    Fields {
        schema: e.schema_hash(),
        subject: e.subject_kind().unwrap(),
        id: e.id().unwrap(),
        nonce: e.revocation_nonce(),
        expiration: e.expiration_date(),
        updatable: e.is_updatable(),
        version: e.version(),
        seed: e.seed(),
        index_data: e.index_data().unwrap(),
        value_data: e.value_data().unwrap(),
    }
}

fn base() -> Entry {
    Entry::new(
        SchemaHash::new([0xab; 16]),
        [
            EntryOption::RevocationNonce(5),
            EntryOption::Version(2),
            EntryOption::Seed(9),
            EntryOption::IndexData(Fr::from(1u64), Fr::from(2u64)),
            EntryOption::ValueData(Fr::from(3u64), Fr::from(4u64)),
        ],
    )
    .unwrap()
}

fn id() -> Id {
    Id::from_bytes(&[0x5a; 31]).unwrap()
}

fn check_only_changes<M, X>(name: &str, mutate: M, expect: X)
where
    M: FnOnce(&mut Entry) -> Result<(), EntryError>,
    X: FnOnce(&mut Fields),
{
    let mut entry = base();
    let mut expected = fields(&entry);
    mutate(&mut entry).unwrap();
    expect(&mut expected);
    assert_eq!(fields(&entry), expected, "mutation {}", name);
}

#[test]
fn test_fields_are_independent() {
    let other = SchemaHash::new([0xff; 16]);
    check_only_changes("schema", |e| e.set_schema_hash(&other), |f| f.schema = other);
    check_only_changes(
        "index id",
        |e| e.set_index_id(&id()),
        |f| {
            f.subject = SubjectKind::OtherIdenIndex;
            f.id = Some(id());
        },
    );
    check_only_changes(
        "value id",
        |e| e.set_value_id(&id()),
        |f| {
            f.subject = SubjectKind::OtherIdenValue;
            f.id = Some(id());
        },
    );
    check_only_changes(
        "nonce",
        |e| e.set_revocation_nonce(u64::MAX),
        |f| f.nonce = u64::MAX,
    );
    check_only_changes(
        "expiration",
        |e| e.set_expiration_date(u64::MAX),
        |f| f.expiration = Some(u64::MAX),
    );
    check_only_changes("updatable", |e| e.set_updatable(true), |f| f.updatable = true);
    check_only_changes("version", |e| e.set_version(u32::MAX), |f| f.version = u32::MAX);
    check_only_changes("seed", |e| e.set_seed(u32::MAX), |f| f.seed = u32::MAX);
    check_only_changes(
        "index data",
        |e| e.set_index_data(&Fr::from(7u64), &Fr::zero()),
        |f| f.index_data = (Fr::from(7u64), Fr::zero()),
    );
    check_only_changes(
        "value data",
        |e| e.set_value_data(&Fr::zero(), &Fr::from(8u64)),
        |f| f.value_data = (Fr::zero(), Fr::from(8u64)),
    );
}

#[test]
fn test_reset_restores_fields() {
    let mut entry = base();
    let before = fields(&entry);
    entry.set_expiration_date(1_700_000_000).unwrap();
    entry.set_index_id(&id()).unwrap();
    entry.reset_expiration_date().unwrap();
    entry.reset_id().unwrap();
    assert_eq!(fields(&entry), before);
    assert_eq!(entry, base());
}

#[test]
fn test_hex_round_trip() {
    let mut entry = base();
    entry.set_value_id(&id()).unwrap();
    entry.set_expiration_date(1_800_000_000).unwrap();
    entry.set_updatable(true).unwrap();

    let hex_str = entry.to_hex();
    assert_eq!(hex_str.len(), 512);
    let decoded = Entry::from_hex(&hex_str).unwrap();
    assert_eq!(decoded, entry);
    assert_eq!(fields(&decoded), fields(&entry));

    let hasher = Hasher::new();
    assert_eq!(decoded.hash(&hasher).unwrap(), entry.hash(&hasher).unwrap());

    assert!(matches!(
        Entry::from_hex(&hex_str[..510]),
        Err(EntryError::InvalidEntryLength(255))
    ));
    assert!(matches!(Entry::from_hex("zz"), Err(EntryError::Hex(_))));
}

#[test]
fn test_overflow_is_rejected() {
    let mut p = modulus().to_bytes_le();
    p.resize(32, 0);
    let mut too_big = [0u8; 32];
    too_big.copy_from_slice(&p);

    let mut entry = base();
    let before = entry;
    assert!(matches!(
        entry.set_value_data_bytes(&fr_to_le_bytes(&Fr::from(1u64)), &too_big),
        Err(EntryError::DataOverflow { slot: 7 })
    ));
    assert_eq!(entry, before);

    let mut bytes = entry.to_bytes();
    bytes[2 * 32..3 * 32].copy_from_slice(&too_big);
    assert!(matches!(
        Entry::from_bytes(&bytes),
        Err(EntryError::DataOverflow { slot: 2 })
    ));

    // p - 1 is the largest element that fits
    let max = -Fr::from(1u64);
    entry.set_index_data(&max, &max).unwrap();
    assert_eq!(entry.index_data().unwrap(), (max, max));
}

#[test]
fn test_index_and_value_hashes_split() {
    let hasher = Hasher::new();
    let a = base();
    let mut b = a;
    b.set_revocation_nonce(99).unwrap();
    // the nonce lives in the value part
    assert_eq!(a.hi(&hasher).unwrap(), b.hi(&hasher).unwrap());
    assert_ne!(a.hv(&hasher).unwrap(), b.hv(&hasher).unwrap());

    let mut c = a;
    c.set_version(3).unwrap();
    assert_ne!(a.hi(&hasher).unwrap(), c.hi(&hasher).unwrap());
    assert_eq!(a.hv(&hasher).unwrap(), c.hv(&hasher).unwrap());
}
