use ark_bn254::Fr;

use super::entry::Slot;
use super::{Entry, EntryError, Id};

/// One field assignment applied by [`Entry::new`].
///
/// Options run in the order given; a later option touching the same field wins,
/// except for the schema hash which is always stamped last.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EntryOption {
    IndexId(Id),
    ValueId(Id),
    RevocationNonce(u64),
    ExpirationDate(u64),
    Updatable(bool),
    Version(u32),
    Seed(u32),
    IndexData(Fr, Fr),
    IndexDataBytes(Slot, Slot),
    ValueData(Fr, Fr),
    ValueDataBytes(Slot, Slot),
}

impl EntryOption {
    pub fn apply(self, entry: &mut Entry) -> Result<(), EntryError> {
        match self {
            EntryOption::IndexId(id) => entry.set_index_id(&id),
            EntryOption::ValueId(id) => entry.set_value_id(&id),
            EntryOption::RevocationNonce(nonce) => entry.set_revocation_nonce(nonce),
            EntryOption::ExpirationDate(unix_secs) => entry.set_expiration_date(unix_secs),
            EntryOption::Updatable(updatable) => entry.set_updatable(updatable),
            EntryOption::Version(version) => entry.set_version(version),
            EntryOption::Seed(seed) => entry.set_seed(seed),
            EntryOption::IndexData(a, b) => entry.set_index_data(&a, &b),
            EntryOption::IndexDataBytes(a, b) => entry.set_index_data_bytes(&a, &b),
            EntryOption::ValueData(a, b) => entry.set_value_data(&a, &b),
            EntryOption::ValueDataBytes(a, b) => entry.set_value_data_bytes(&a, &b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{SchemaHash, SubjectKind};

    #[test]
    fn test_options_apply_in_order() {
        let id_a = Id::from_bytes(&[1u8; 31]).unwrap();
        let id_b = Id::from_bytes(&[2u8; 31]).unwrap();
        let e = Entry::new(
            SchemaHash::new([9u8; 16]),
            [
                EntryOption::IndexId(id_a),
                EntryOption::Version(1),
                EntryOption::ValueId(id_b),
                EntryOption::Version(2),
            ],
        )
        .unwrap();
        assert_eq!(e.subject_kind().unwrap(), SubjectKind::OtherIdenValue);
        assert_eq!(e.id().unwrap(), Some(id_b));
        assert_eq!(e.version(), 2);
    }

    #[test]
    fn test_schema_is_stamped_last() {
        let schema = SchemaHash::new([9u8; 16]);
        let e = Entry::new(schema, [EntryOption::Seed(u32::MAX), EntryOption::Updatable(true)])
            .unwrap();
        assert_eq!(e.schema_hash(), schema);
        assert_eq!(e.seed(), u32::MAX);
        assert!(e.is_updatable());
    }

    #[test]
    fn test_failing_option_aborts_construction() {
        let res = Entry::new(
            SchemaHash::default(),
            [EntryOption::ValueDataBytes([0xff; 32], [0u8; 32])],
        );
        assert!(matches!(res, Err(EntryError::DataOverflow { slot: 6 })));
    }
}
