//! The sparse Merkle tree engine.
//!
//! [`Smt`] keeps a key/value map over the field in a [`NodeStore`]. A key is
//! split into `max_levels` digits of radix `N`, least significant first; digit
//! `i` picks the child taken at level `i`. A leaf sits at the shallowest level
//! where its key's digit prefix is unique, so the shape of the tree, and hence
//! its root, depends only on the stored pairs and never on the order of the
//! operations that produced them.
//!
//! # Commit protocol
//! Every mutation computes the full path first, then:
//! 1. writes the new nodes with `multi_ins`
//! 2. moves the root pointer with `set_root`, the commit point
//! 3. drops superseded nodes with `multi_del`
//!
//! A crash between 1 and 2 leaves unreferenced nodes behind, never a root that
//! points at missing ones. A failure in step 3 is returned as
//! [`SmtError::Store`] after the root has moved; [`Smt::root`] then already
//! reports the new root, matching the store.
//!
//! # Concurrency
//! Mutations read the root and then write it without any locking. Callers must
//! serialize all mutating calls on one root lineage, which `&mut self` enforces
//! within a process as long as a single `Smt` owns that lineage.

use ark_bn254::Fr;
use ark_ff::Zero;
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

use super::node::{
    is_zero_group, join_children, split_children, trim_zero_groups, zero_group, NodeRecord,
    SiblingGroup,
};
use super::proof::{DeletingResult, FindOutcome, FindResult, InsertingResult, UpdatingResult};
use super::SmtError;
use crate::claim::Entry;
use crate::config::Config;
use crate::store::NodeStore;
use crate::utils::field::{self, to_decimal};
use crate::utils::hasher::Hasher;

pub struct Smt<S: NodeStore, const N: usize> {
    store: S,
    hasher: Arc<Hasher>,
    root: Fr,
    max_levels: usize,
}

impl<S: NodeStore, const N: usize> Smt<S, N> {
    /// Opens the tree whose root is recorded in `store`, or an empty tree if none is.
    ///
    /// # Arguments
    /// * `store` - Backing node store, already scoped to the tree's namespace
    /// * `hasher` - Shared hash parameters
    /// * `config` - Provides `max_levels`
    ///
    /// # Errors
    /// `InvalidConfig` if the radix is below 2 or `max_levels` is zero or larger
    /// than the number of digits of a field element
    pub fn new(store: S, hasher: Arc<Hasher>, config: &Config) -> Result<Self, SmtError> {
        if N < 2 {
            return Err(SmtError::InvalidConfig(format!("radix {} is below 2", N)));
        }
        let cap = field::max_digits(N);
        if config.max_levels == 0 || config.max_levels > cap {
            return Err(SmtError::InvalidConfig(format!(
                "max_levels {} must be between 1 and {} for radix {}",
                config.max_levels, cap, N
            )));
        }
        let root = store.get_root()?;
        info!(
            "open radix-{} tree, max_levels:{}, root:{}",
            N,
            config.max_levels,
            to_decimal(&root)
        );
        Ok(Self {
            store,
            hasher,
            root,
            max_levels: config.max_levels,
        })
    }

    pub fn root(&self) -> Fr {
        self.root
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    pub fn hasher(&self) -> &Arc<Hasher> {
        &self.hasher
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Re-reads the authoritative root from the store.
    pub fn reload_root(&mut self) -> Result<Fr, SmtError> {
        self.root = self.store.get_root()?;
        Ok(self.root)
    }

    pub(crate) fn digits(&self, key: &Fr) -> Vec<usize> {
        field::digits(key, N, self.max_levels)
    }

    /// Loads a node that must exist.
    pub(crate) fn load(&self, hash: &Fr) -> Result<NodeRecord<N>, SmtError> {
        let record = match self.store.get(hash)? {
            Some(r) => r,
            None => {
                warn!("missing node record {}", to_decimal(hash));
                return Err(SmtError::RecordNotFound(to_decimal(hash)));
            }
        };
        NodeRecord::decode(&record).map_err(|reason| {
            warn!("malformed node record {}: {}", to_decimal(hash), reason);
            SmtError::InvalidNodeShape {
                hash: to_decimal(hash),
                reason,
            }
        })
    }

    fn hash_children(&self, children: &[Fr; N]) -> Result<Fr, SmtError> {
        Ok(self.hasher.hash(children)?)
    }

    /// Looks `key` up and returns the proof material for either answer.
    ///
    /// # Errors
    /// `ReachedMaxLevel` if an internal node is met at depth `max_levels`
    pub fn find(&self, key: &Fr) -> Result<FindResult, SmtError> {
        let digits = self.digits(key);
        let mut siblings = Vec::new();
        let mut node = self.root;
        let mut level = 0;
        loop {
            if node.is_zero() {
                return Ok(FindResult {
                    siblings,
                    outcome: FindOutcome::Empty,
                });
            }
            match self.load(&node)? {
                NodeRecord::Leaf { key: k, value } => {
                    let outcome = if k == *key {
                        FindOutcome::Found { value }
                    } else {
                        FindOutcome::OtherLeaf { key: k, value }
                    };
                    return Ok(FindResult { siblings, outcome });
                }
                NodeRecord::Internal { children } => {
                    if level >= self.max_levels {
                        return Err(SmtError::ReachedMaxLevel {
                            max_levels: self.max_levels,
                        });
                    }
                    let digit = digits[level];
                    siblings.push(split_children(&children, digit));
                    node = children[digit];
                    level += 1;
                }
            }
        }
    }

    /// Adds `key -> value`.
    ///
    /// # Errors
    /// - `KeyExists` if the key is already present
    /// - `ReachedMaxLevel` if the key shares all `max_levels` digits with a stored key
    pub fn insert(&mut self, key: &Fr, value: &Fr) -> Result<InsertingResult, SmtError> {
        let digits = self.digits(key);
        let found = self.find(key)?;
        let old_leaf = match found.outcome {
            FindOutcome::Found { .. } => return Err(SmtError::KeyExists(to_decimal(key))),
            FindOutcome::Empty => None,
            FindOutcome::OtherLeaf { key, value } => Some((key, value)),
        };
        let depth = found.siblings.len();

        // groups along the new path, deeper than the old one when a leaf must move down
        let mut path = found.siblings.clone();
        let mut old_leaf_hash = Fr::zero();
        if let Some((old_key, old_value)) = &old_leaf {
            old_leaf_hash = self.hasher.hash_leaf(old_key, old_value)?;
            let old_digits = self.digits(old_key);
            let mut level = depth;
            while level < self.max_levels && old_digits[level] == digits[level] {
                path.push(zero_group::<N>());
                level += 1;
            }
            if level >= self.max_levels {
                return Err(SmtError::ReachedMaxLevel {
                    max_levels: self.max_levels,
                });
            }
            let mut children = [Fr::zero(); N];
            children[old_digits[level]] = old_leaf_hash;
            path.push(split_children(&children, digits[level]));
        }

        let leaf = NodeRecord::leaf(*key, *value);
        let mut rt = leaf.hash(&self.hasher)?;
        let mut inserts = Vec::with_capacity(path.len() + 1);
        inserts.push((rt, leaf));
        for level in (0..path.len()).rev() {
            let children = join_children::<N>(&path[level], digits[level], rt);
            rt = self.hash_children(&children)?;
            inserts.push((rt, NodeRecord::Internal { children }));
        }

        // the old internal nodes from the root down to where the search stopped
        let mut deletes = Vec::with_capacity(depth);
        let mut rt_old = old_leaf_hash;
        for level in (0..depth).rev() {
            let children = join_children::<N>(&found.siblings[level], digits[level], rt_old);
            rt_old = self.hash_children(&children)?;
            deletes.push(rt_old);
        }
        debug_assert!(depth == 0 || rt_old == self.root);

        let old_root = self.root;
        self.commit(inserts, deletes, rt)?;
        debug!(
            "insert key:{} old_root:{} new_root:{}",
            to_decimal(key),
            to_decimal(&old_root),
            to_decimal(&rt)
        );

        let mut siblings = found.siblings;
        trim_zero_groups(&mut siblings);
        Ok(InsertingResult {
            old_root,
            new_root: rt,
            siblings,
            old_key: old_leaf.map(|(k, _)| k),
            old_value: old_leaf.map(|(_, v)| v),
            is_old0: old_leaf.is_none(),
        })
    }

    /// Replaces the value of an existing key. The shape of the tree is unchanged.
    ///
    /// # Errors
    /// `KeyNotFound` if the key is absent; use [`Smt::insert`] to add it
    pub fn update(&mut self, key: &Fr, new_value: &Fr) -> Result<UpdatingResult, SmtError> {
        let digits = self.digits(key);
        let found = self.find(key)?;
        let old_value = found
            .found_value()
            .ok_or_else(|| SmtError::KeyNotFound(to_decimal(key)))?;

        let old_leaf = NodeRecord::<N>::leaf(*key, old_value);
        let new_leaf = NodeRecord::leaf(*key, *new_value);
        let mut rt_old = old_leaf.hash(&self.hasher)?;
        let mut rt_new = new_leaf.hash(&self.hasher)?;
        let mut inserts = vec![(rt_new, new_leaf)];
        let mut deletes = vec![rt_old];
        for level in (0..found.siblings.len()).rev() {
            let group = &found.siblings[level];
            let old_children = join_children::<N>(group, digits[level], rt_old);
            rt_old = self.hash_children(&old_children)?;
            deletes.push(rt_old);
            let children = join_children::<N>(group, digits[level], rt_new);
            rt_new = self.hash_children(&children)?;
            inserts.push((rt_new, NodeRecord::Internal { children }));
        }

        let old_root = self.root;
        self.commit(inserts, deletes, rt_new)?;
        debug!(
            "update key:{} old_root:{} new_root:{}",
            to_decimal(key),
            to_decimal(&old_root),
            to_decimal(&rt_new)
        );

        let mut siblings = found.siblings;
        trim_zero_groups(&mut siblings);
        Ok(UpdatingResult {
            old_root,
            new_root: rt_new,
            siblings,
            key: *key,
            old_value,
            new_value: *new_value,
        })
    }

    /// Removes `key`, collapsing the path so that every remaining leaf sits at
    /// its minimal depth.
    ///
    /// Walking up from the removed leaf, a level whose only remaining child is
    /// a leaf is dropped and that leaf moves up. From the first level that
    /// still has another child (or a lone internal child) up to the root, nodes
    /// are recomputed with the new child hash.
    ///
    /// # Errors
    /// `KeyNotFound` if the key is absent
    pub fn delete(&mut self, key: &Fr) -> Result<DeletingResult, SmtError> {
        let digits = self.digits(key);
        let found = self.find(key)?;
        let del_value = found
            .found_value()
            .ok_or_else(|| SmtError::KeyNotFound(to_decimal(key)))?;

        let mut rt_old = self.hasher.hash_leaf(key, &del_value)?;
        let mut rt_new = Fr::zero();
        let mut deletes = vec![rt_old];
        let mut inserts = Vec::new();
        let mut siblings: Vec<SiblingGroup> = Vec::new();
        let mut promoted: Option<(Fr, Fr)> = None;
        let mut mixed = false;

        for level in (0..found.siblings.len()).rev() {
            let old_group = &found.siblings[level];
            let old_children = join_children::<N>(old_group, digits[level], rt_old);
            rt_old = self.hash_children(&old_children)?;
            deletes.push(rt_old);

            let mut new_group = old_group.clone();
            if !mixed && rt_new.is_zero() {
                let live: Vec<usize> = (0..new_group.len())
                    .filter(|i| !new_group[*i].is_zero())
                    .collect();
                if live.len() == 1 {
                    let idx = live[0];
                    match self.load(&new_group[idx])? {
                        NodeRecord::Leaf { key, value } => {
                            rt_new = new_group[idx];
                            new_group[idx] = Fr::zero();
                            promoted = Some((key, value));
                        }
                        NodeRecord::Internal { .. } => mixed = true,
                    }
                } else if live.len() > 1 {
                    mixed = true;
                }
            }
            if !is_zero_group(&new_group) {
                mixed = true;
            }
            if mixed {
                let children = join_children::<N>(&new_group, digits[level], rt_new);
                rt_new = self.hash_children(&children)?;
                inserts.push((rt_new, NodeRecord::Internal { children }));
                siblings.push(new_group);
            }
        }
        siblings.reverse();

        let old_root = self.root;
        self.commit(inserts, deletes, rt_new)?;
        debug!(
            "delete key:{} old_root:{} new_root:{} collapsed_to:{:?}",
            to_decimal(key),
            to_decimal(&old_root),
            to_decimal(&rt_new),
            promoted.map(|(k, _)| to_decimal(&k))
        );

        Ok(DeletingResult {
            old_root,
            new_root: rt_new,
            siblings,
            del_key: *key,
            del_value,
            old_key: promoted.map(|(k, _)| k),
            old_value: promoted.map(|(_, v)| v),
            is_old0: promoted.is_none(),
        })
    }

    /// Inserts a claim under its index hash, valued by its value hash.
    pub fn insert_entry(&mut self, entry: &Entry) -> Result<InsertingResult, SmtError> {
        let (hi, hv) = entry.hi_hv(&self.hasher)?;
        self.insert(&hi, &hv)
    }

    /// Looks a claim up by its index hash.
    pub fn find_entry(&self, entry: &Entry) -> Result<FindResult, SmtError> {
        let hi = entry.hi(&self.hasher)?;
        self.find(&hi)
    }

    fn commit(
        &mut self,
        inserts: Vec<(Fr, NodeRecord<N>)>,
        deletes: Vec<Fr>,
        new_root: Fr,
    ) -> Result<(), SmtError> {
        let live: HashSet<Fr> = inserts.iter().map(|(h, _)| *h).collect();
        let records: Vec<(Fr, Vec<Fr>)> = inserts
            .into_iter()
            .map(|(h, record)| (h, record.encode()))
            .collect();
        let deletes: Vec<Fr> = deletes.into_iter().filter(|h| !live.contains(h)).collect();

        self.store.multi_ins(&records)?;
        self.store.set_root(&new_root)?;
        self.root = new_root;
        if deletes.is_empty() {
            return Ok(());
        }
        // the root already moved, a failure here only leaves unreachable nodes behind
        if let Err(e) = self.store.multi_del(&deletes) {
            warn!("failed to drop {} stale nodes: {}", deletes.len(), e);
            return Err(e.into());
        }
        Ok(())
    }
}
