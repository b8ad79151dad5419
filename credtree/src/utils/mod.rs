//! Utility types and functions shared by the tree engine, the node stores and the claim codec.
//!
//! This module provides:
//! - Field element conversions (bytes, decimal strings, radix digits)
//! - The Poseidon hashing parameters object
//! - Record encoding/decoding for node stores

pub mod codec;
pub mod field;
pub mod hasher;
