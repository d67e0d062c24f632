// Copyright 2023-2025 Irreducible Inc.

//! A keyed, variable-length Merkle-tree hash.
//!
//! The message is padded and split into 64-byte blocks, every block is compressed into a 128-byte
//! leaf digest and sibling digests are compressed pairwise, level by level, until one root digest
//! remains. The output is a prefix of the root digest. Compressions within a level are
//! independent and run on a rayon pool unless [`Parallelism::Sequential`] is requested.
//!
//! ```
//! let digest = md6_hash::hash(b"", b"", 16, 40).unwrap();
//! assert_eq!(digest, "49fc3ca731f7e6fe16441647a8f63b7e");
//! ```

pub mod compression;
pub mod constants;
mod error;
pub mod hasher;
pub mod key;
pub mod padding;
mod output;
mod params;
pub mod round_constants;
pub mod tree;

pub use compression::{IntermediateDigest, Md6Compression, PseudoCompressionFunction};
pub use constants::{BLOCK_SIZE, DIGEST_SIZE};
pub use error::Error;
pub use hasher::{digest, hash, Md6Hasher};
pub use key::{Key, KeyPolicy, KeyPolicyError};
pub use output::Md6Digest;
pub use params::{Md6Params, DEFAULT_OUTPUT_LEN, DEFAULT_ROUNDS};
pub use round_constants::RoundConstants;
pub use tree::Parallelism;
