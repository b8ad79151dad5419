//! Configuration for trees and their node stores.
//!
//! A [`Config`] carries:
//! - `dir`: where a persistent store keeps its files (ignored by `MemStore`)
//! - `namespace`: key prefix isolating one tree's records inside a shared store
//! - `max_levels`: depth bound of the tree
//!
//! # Usage Examples
//! ```no_run
//! use credtree::config::Config;
//!
//! // binary tree with the default depth, persisted under /tmp/claims
//! let config = Config::from_dir("/tmp/claims");
//!
//! // quinary tree, 40 levels, in its own namespace
//! let config = Config::for_radix(5).with_max_levels(40).with_namespace("revocations");
//! ```

use crate::def::{DEFAULT_BINARY_MAX_LEVELS, DEFAULT_QUINARY_MAX_LEVELS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base directory for persistent stores
    pub dir: String,
    /// Key prefix of the tree's records; empty means the store root
    pub namespace: String,
    /// Maximum number of internal levels between the root and a leaf
    pub max_levels: usize,
}

impl Default for Config {
    /// Binary depth, empty namespace and the `default` directory.
    fn default() -> Self {
        Self {
            dir: "default".to_string(),
            namespace: String::new(),
            max_levels: DEFAULT_BINARY_MAX_LEVELS,
        }
    }
}

impl Config {
    pub fn new(dir: &str, namespace: &str, max_levels: usize) -> Self {
        Self {
            dir: dir.to_string(),
            namespace: namespace.to_string(),
            max_levels,
        }
    }

    pub fn from_dir(dir: &str) -> Self {
        Config {
            dir: dir.to_string(),
            ..Config::default()
        }
    }

    /// Default configuration with the default depth of the given radix.
    ///
    /// The depth is the number of radix digits needed to spell any 64-bit key:
    /// 64 for radix 2, 28 for radix 5, 41 for radix 3. A radix below 2 gets the
    /// binary depth; such trees are rejected when opened.
    pub fn for_radix(radix: usize) -> Self {
        let max_levels = match radix {
            2 => DEFAULT_BINARY_MAX_LEVELS,
            5 => DEFAULT_QUINARY_MAX_LEVELS,
            r if r > 2 => digits_for_u64(r),
            _ => DEFAULT_BINARY_MAX_LEVELS,
        };
        Config {
            max_levels,
            ..Config::default()
        }
    }

    pub fn with_max_levels(mut self, max_levels: usize) -> Self {
        self.max_levels = max_levels;
        self
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }
}

// Smallest `n` with `radix^n >= 2^64`.
fn digits_for_u64(radix: usize) -> usize {
    let target: u128 = 1 << 64;
    let mut cap: u128 = 1;
    let mut n = 0;
    while cap < target {
        cap *= radix as u128;
        n += 1;
    }
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Config::default().max_levels, 64);
        assert_eq!(Config::for_radix(2).max_levels, 64);
        assert_eq!(Config::for_radix(5).max_levels, 28);

        assert_eq!(Config::for_radix(3).max_levels, 41);
        assert_eq!(Config::for_radix(4).max_levels, 32);
        assert_eq!(Config::for_radix(16).max_levels, 16);
        assert_eq!(Config::for_radix(1).max_levels, 64);
        assert_eq!(digits_for_u64(2), DEFAULT_BINARY_MAX_LEVELS);
        assert_eq!(digits_for_u64(5), DEFAULT_QUINARY_MAX_LEVELS);

        let config = Config::from_dir("/tmp/x").with_max_levels(10).with_namespace("auth");
        assert_eq!(config, Config::new("/tmp/x", "auth", 10));
    }
}
