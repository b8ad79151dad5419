//! Node records and sibling groups.
//!
//! A record is serialized with an explicit leading tag:
//! - leaf: `[1, key, value]`, hashed as `H(key, value, 1)`
//! - internal: `[2, child_0, .., child_{N-1}]`, hashed as `H(child_0, .., child_{N-1})`
//!
//! A zero child means an empty subtree.

use ark_bn254::Fr;
use ark_ff::Zero;
use smallvec::SmallVec;

use crate::def::{INLINE_SIBLINGS, INTERNAL_TAG, LEAF_TAG};
use crate::utils::hasher::{HashError, Hasher};

/// The `N - 1` children of one level that are not on the path, in child order.
pub type SiblingGroup = SmallVec<[Fr; INLINE_SIBLINGS]>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeRecord<const N: usize> {
    Leaf { key: Fr, value: Fr },
    Internal { children: [Fr; N] },
}

impl<const N: usize> NodeRecord<N> {
    pub fn leaf(key: Fr, value: Fr) -> Self {
        NodeRecord::Leaf { key, value }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRecord::Leaf { .. })
    }

    pub fn hash(&self, hasher: &Hasher) -> Result<Fr, HashError> {
        match self {
            NodeRecord::Leaf { key, value } => hasher.hash_leaf(key, value),
            NodeRecord::Internal { children } => hasher.hash(children),
        }
    }

    pub fn encode(&self) -> Vec<Fr> {
        match self {
            NodeRecord::Leaf { key, value } => vec![Fr::from(LEAF_TAG), *key, *value],
            NodeRecord::Internal { children } => {
                let mut res = Vec::with_capacity(N + 1);
                res.push(Fr::from(INTERNAL_TAG));
                res.extend_from_slice(children);
                res
            }
        }
    }

    /// Parses a stored record.
    ///
    /// # Returns
    /// A description of the problem if the tag or the length does not match
    pub fn decode(record: &[Fr]) -> Result<Self, String> {
        let (tag, body) = match record.split_first() {
            Some(x) => x,
            None => return Err("empty record".to_string()),
        };
        if *tag == Fr::from(LEAF_TAG) {
            if body.len() != 2 {
                return Err(format!("leaf with {} fields", body.len()));
            }
            return Ok(NodeRecord::Leaf {
                key: body[0],
                value: body[1],
            });
        }
        if *tag == Fr::from(INTERNAL_TAG) {
            let children: [Fr; N] = body
                .try_into()
                .map_err(|_| format!("internal node with {} children, radix is {}", body.len(), N))?;
            return Ok(NodeRecord::Internal { children });
        }
        Err("unknown record tag".to_string())
    }
}

/// Removes the child at `digit`, returning the other `N - 1` children.
pub fn split_children<const N: usize>(children: &[Fr; N], digit: usize) -> SiblingGroup {
    children
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != digit)
        .map(|(_, c)| *c)
        .collect()
}

/// Inverse of [`split_children`]: puts `child` back at `digit`.
pub fn join_children<const N: usize>(group: &[Fr], digit: usize, child: Fr) -> [Fr; N] {
    debug_assert_eq!(group.len() + 1, N);
    let mut res = [Fr::zero(); N];
    let mut others = group.iter();
    for (i, slot) in res.iter_mut().enumerate() {
        if i == digit {
            *slot = child;
        } else if let Some(c) = others.next() {
            *slot = *c;
        }
    }
    res
}

pub fn zero_group<const N: usize>() -> SiblingGroup {
    SmallVec::from_elem(Fr::zero(), N - 1)
}

pub fn is_zero_group(group: &[Fr]) -> bool {
    group.iter().all(|c| c.is_zero())
}

/// Drops the all-zero groups at the deep end of a root-first sibling list.
pub fn trim_zero_groups(siblings: &mut Vec<SiblingGroup>) {
    while siblings.last().is_some_and(|g| is_zero_group(g)) {
        siblings.pop();
    }
}
