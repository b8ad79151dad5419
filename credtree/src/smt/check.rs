//! Whole-tree consistency checks.
//!
//! [`check_tree`] walks every node reachable from the root and verifies that:
//! 1. Each record is stored under its own hash
//! 2. Each leaf sits on the path spelled by its key's digits
//! 3. No internal node is empty or holds a lone leaf that should have moved up
//! 4. No internal node lives at or below `max_levels`
//!
//! The walk reads the whole tree; it is meant for tests and offline tooling.

use ark_bn254::Fr;
use ark_ff::Zero;

use super::node::NodeRecord;
use super::tree::Smt;
use super::SmtError;
use crate::store::NodeStore;
use crate::utils::field::to_decimal;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    pub leaves: usize,
    pub internal_nodes: usize,
    /// Level of the deepest leaf, 0 for a tree that is a single leaf
    pub max_depth: usize,
}

fn inconsistent(level: usize, reason: String) -> SmtError {
    SmtError::Inconsistent { level, reason }
}

/// Visits every node under the root, calling `on_leaf` for each leaf.
fn walk<S, const N: usize, F>(tree: &Smt<S, N>, mut on_leaf: F) -> Result<TreeStats, SmtError>
where
    S: NodeStore,
    F: FnMut(Fr, Fr),
{
    let mut stats = TreeStats::default();
    let root = tree.root();
    if root.is_zero() {
        return Ok(stats);
    }
    // (node hash, digits of the path leading to it)
    let mut stack: Vec<(Fr, Vec<usize>)> = vec![(root, Vec::new())];
    while let Some((hash, path)) = stack.pop() {
        let level = path.len();
        let record = tree.load(&hash)?;
        let actual = record.hash(tree.hasher())?;
        if actual != hash {
            return Err(inconsistent(
                level,
                format!(
                    "record stored under {} hashes to {}",
                    to_decimal(&hash),
                    to_decimal(&actual)
                ),
            ));
        }
        match record {
            NodeRecord::Leaf { key, value } => {
                if tree.digits(&key)[..level] != path[..] {
                    return Err(inconsistent(
                        level,
                        format!("leaf {} is off its key path", to_decimal(&key)),
                    ));
                }
                stats.leaves += 1;
                stats.max_depth = stats.max_depth.max(level);
                on_leaf(key, value);
            }
            NodeRecord::Internal { children } => {
                if level >= tree.max_levels() {
                    return Err(inconsistent(level, "internal node below max_levels".into()));
                }
                let live: Vec<usize> = (0..N).filter(|i| !children[*i].is_zero()).collect();
                match live.as_slice() {
                    [] => return Err(inconsistent(level, "empty internal node".into())),
                    [only] if tree.load(&children[*only])?.is_leaf() => {
                        return Err(inconsistent(
                            level,
                            format!("lone leaf under {} was not collapsed", to_decimal(&hash)),
                        ));
                    }
                    _ => {}
                }
                stats.internal_nodes += 1;
                for digit in live {
                    let mut child_path = path.clone();
                    child_path.push(digit);
                    stack.push((children[digit], child_path));
                }
            }
        }
    }
    Ok(stats)
}

/// Validates the structure of the whole tree.
///
/// # Errors
/// `Inconsistent` on the first violation found, or the store/decoding error
/// that prevented reading a node
pub fn check_tree<S: NodeStore, const N: usize>(tree: &Smt<S, N>) -> Result<TreeStats, SmtError> {
    walk(tree, |_, _| {})
}

/// Returns every stored `(key, value)` pair, sorted by key.
pub fn collect_leaves<S: NodeStore, const N: usize>(
    tree: &Smt<S, N>,
) -> Result<Vec<(Fr, Fr)>, SmtError> {
    let mut leaves = Vec::new();
    walk(tree, |k, v| leaves.push((k, v)))?;
    leaves.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(leaves)
}
