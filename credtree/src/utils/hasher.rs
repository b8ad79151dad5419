//! Poseidon hashing for tree nodes and claims.
//!
//! [`Hasher`] is the cryptographic parameters object: it is built once by the
//! application and shared (usually as `Arc<Hasher>`) by every tree and codec
//! call. It lazily builds one circom-compatible Poseidon instance per arity:
//! - 2 inputs for binary internal nodes and the claim hash
//! - 3 inputs for leaves (`key`, `value`, `1`)
//! - 4 inputs for the claim index and value hashes
//! - 5 inputs for quinary internal nodes

use ark_bn254::Fr;
use ark_ff::One;
use light_poseidon::{Poseidon, PoseidonError, PoseidonHasher};
use parking_lot::Mutex;
use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Largest number of inputs supported by the circom parameter sets.
pub const MAX_HASH_INPUTS: usize = 12;

#[derive(Error, Debug)]
pub enum HashError {
    #[error("Unsupported hash arity {0}, must be between 1 and 12")]
    InvalidArity(usize),

    #[error("Poseidon failure: {0}")]
    Poseidon(#[from] PoseidonError),
}

/// Shared Poseidon parameters, one permutation instance per arity.
#[derive(Default)]
pub struct Hasher {
    sponges: Mutex<HashMap<usize, Poseidon<Fr>>>,
}

impl fmt::Debug for Hasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arities: Vec<usize> = self.sponges.lock().keys().copied().collect();
        arities.sort_unstable();
        f.debug_struct("Hasher").field("arities", &arities).finish()
    }
}

impl Hasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes an ordered list of field elements into one element.
    ///
    /// # Arguments
    /// * `inputs` - Between 1 and [`MAX_HASH_INPUTS`] field elements
    ///
    /// # Returns
    /// The Poseidon digest, identical to circomlib's `poseidon(inputs)`
    pub fn hash(&self, inputs: &[Fr]) -> Result<Fr, HashError> {
        let arity = inputs.len();
        if arity == 0 || arity > MAX_HASH_INPUTS {
            return Err(HashError::InvalidArity(arity));
        }
        let mut sponges = self.sponges.lock();
        let sponge = match sponges.entry(arity) {
            MapEntry::Occupied(e) => e.into_mut(),
            MapEntry::Vacant(e) => e.insert(Poseidon::<Fr>::new_circom(arity)?),
        };
        Ok(sponge.hash(inputs)?)
    }

    /// Hash of a leaf node: `H(key, value, 1)`.
    pub fn hash_leaf(&self, key: &Fr, value: &Fr) -> Result<Fr, HashError> {
        self.hash(&[*key, *value, Fr::one()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::field::from_decimal;

    #[test]
    fn test_circom_vector() {
        let hasher = Hasher::new();
        let h = hasher.hash(&[Fr::from(1u64), Fr::from(2u64)]).unwrap();
        assert_eq!(
            h,
            from_decimal(
                "7853200120776062878684798364095072458815029376092732009249414926327459813530"
            )
            .unwrap()
        );
    }

    #[test]
    fn test_arity() {
        let hasher = Hasher::new();
        assert!(matches!(hasher.hash(&[]), Err(HashError::InvalidArity(0))));
        let too_many = vec![Fr::from(1u64); MAX_HASH_INPUTS + 1];
        assert!(matches!(
            hasher.hash(&too_many),
            Err(HashError::InvalidArity(13))
        ));
        for n in 1..=5 {
            let inputs = vec![Fr::from(n as u64); n];
            let a = hasher.hash(&inputs).unwrap();
            let b = hasher.hash(&inputs).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_leaf_is_domain_separated() {
        let hasher = Hasher::new();
        let (k, v) = (Fr::from(7u64), Fr::from(77u64));
        let leaf = hasher.hash_leaf(&k, &v).unwrap();
        assert_eq!(leaf, hasher.hash(&[k, v, Fr::one()]).unwrap());
        assert_ne!(leaf, hasher.hash(&[k, v]).unwrap());
    }
}
