// Copyright 2025 Irreducible Inc.

use std::fmt;

use subtle::ConstantTimeEq;

use crate::{compression::IntermediateDigest, constants::DIGEST_SIZE};

/// A root digest truncated to the requested output length.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Md6Digest {
	root: IntermediateDigest,
	len: usize,
}

impl Md6Digest {
	/// Truncates `root` to `len` bytes, capped at [`DIGEST_SIZE`].
	pub fn new(root: IntermediateDigest, len: usize) -> Self {
		Self {
			root,
			len: len.min(DIGEST_SIZE),
		}
	}

	/// The untruncated root digest.
	pub fn root(&self) -> &IntermediateDigest {
		&self.root
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.root[..self.len]
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn to_hex(&self) -> String {
		hex::encode(self.as_bytes())
	}

	/// Compares against a hex-encoded digest, ignoring case and surrounding whitespace.
	///
	/// Malformed hex never matches.
	pub fn matches_hex(&self, expected: &str) -> bool {
		match hex::decode(expected.trim()) {
			Ok(expected) => self.as_bytes().ct_eq(&expected).into(),
			Err(_) => false,
		}
	}
}

impl AsRef<[u8]> for Md6Digest {
	fn as_ref(&self) -> &[u8] {
		self.as_bytes()
	}
}

impl fmt::Display for Md6Digest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

impl fmt::Debug for Md6Digest {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Md6Digest({})", self.to_hex())
	}
}
