//! Results of tree operations and native proof checking.
//!
//! Sibling lists are ordered from the root level down: `siblings[i]` holds the
//! `N - 1` children of the level-`i` node that are not on the key's path.
//! Circuits that expect a fixed number of levels pad the deep end with zero groups.

use ark_bn254::Fr;
use ark_ff::Zero;

use super::node::{join_children, SiblingGroup};
use super::SmtError;
use crate::utils::field;
use crate::utils::hasher::Hasher;

/// What a search found at the end of the key's path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FindOutcome {
    /// A leaf holding the key.
    Found { value: Fr },
    /// An empty subtree: the key is absent and no other leaf is on its path.
    Empty,
    /// A leaf holding another key that shares the path so far.
    OtherLeaf { key: Fr, value: Fr },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FindResult {
    pub siblings: Vec<SiblingGroup>,
    pub outcome: FindOutcome,
}

impl FindResult {
    pub fn found(&self) -> bool {
        matches!(self.outcome, FindOutcome::Found { .. })
    }

    pub fn found_value(&self) -> Option<Fr> {
        match self.outcome {
            FindOutcome::Found { value } => Some(value),
            _ => None,
        }
    }

    /// True when a non-membership proof ends in an empty subtree.
    pub fn is_old0(&self) -> bool {
        matches!(self.outcome, FindOutcome::Empty)
    }

    /// Key of the leaf met on the path of an absent key, if any.
    pub fn not_found_key(&self) -> Option<Fr> {
        match self.outcome {
            FindOutcome::OtherLeaf { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn not_found_value(&self) -> Option<Fr> {
        match self.outcome {
            FindOutcome::OtherLeaf { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Result of an insert.
///
/// `siblings` prove the absence of the key in the old tree. When the key landed
/// on another leaf's path, `old_key`/`old_value` name that leaf.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertingResult {
    pub old_root: Fr,
    pub new_root: Fr,
    pub siblings: Vec<SiblingGroup>,
    pub old_key: Option<Fr>,
    pub old_value: Option<Fr>,
    pub is_old0: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdatingResult {
    pub old_root: Fr,
    pub new_root: Fr,
    pub siblings: Vec<SiblingGroup>,
    pub key: Fr,
    pub old_value: Fr,
    pub new_value: Fr,
}

/// Result of a delete.
///
/// `siblings` prove the absence of `del_key` in the new tree. If a lone
/// sibling leaf was promoted, `old_key`/`old_value` name it and `is_old0` is false.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeletingResult {
    pub old_root: Fr,
    pub new_root: Fr,
    pub siblings: Vec<SiblingGroup>,
    pub del_key: Fr,
    pub del_value: Fr,
    pub old_key: Option<Fr>,
    pub old_value: Option<Fr>,
    pub is_old0: bool,
}

/// Folds a root-first sibling list over the node hash found at its deep end.
///
/// Callers check the path depth first; [`verify_find`] is the public entry point.
///
/// # Arguments
/// * `hasher` - Hash parameters of the tree
/// * `digits` - The key's digits, at least `siblings.len()` of them
/// * `siblings` - One group of `N - 1` children per level
/// * `leaf` - Hash of the node at depth `siblings.len()` (zero for an empty subtree)
///
/// # Returns
/// The root implied by the path
pub(crate) fn compute_root<const N: usize>(
    hasher: &Hasher,
    digits: &[usize],
    siblings: &[SiblingGroup],
    leaf: Fr,
) -> Result<Fr, SmtError> {
    let mut rt = leaf;
    for (level, group) in siblings.iter().enumerate().rev() {
        let children = join_children::<N>(group, digits[level], rt);
        rt = hasher.hash(&children)?;
    }
    Ok(rt)
}

/// Checks a membership or non-membership proof against `root`.
///
/// A proof with the wrong group width, more levels than `max_levels`, or an
/// auxiliary leaf that does not actually sit on the key's path is rejected.
pub fn verify_find<const N: usize>(
    hasher: &Hasher,
    root: &Fr,
    key: &Fr,
    max_levels: usize,
    result: &FindResult,
) -> Result<bool, SmtError> {
    let depth = result.siblings.len();
    if depth > max_levels || result.siblings.iter().any(|g| g.len() + 1 != N) {
        return Ok(false);
    }
    let digits = field::digits(key, N, max_levels);
    let leaf = match &result.outcome {
        FindOutcome::Found { value } => hasher.hash_leaf(key, value)?,
        FindOutcome::Empty => Fr::zero(),
        FindOutcome::OtherLeaf {
            key: other,
            value: other_value,
        } => {
            if other == key {
                return Ok(false);
            }
            let other_digits = field::digits(other, N, max_levels);
            if other_digits[..depth] != digits[..depth] {
                return Ok(false);
            }
            hasher.hash_leaf(other, other_value)?
        }
    };
    Ok(compute_root::<N>(hasher, &digits, &result.siblings, leaf)? == *root)
}
