// Copyright 2025 Irreducible Inc.

use md6_utils::ensure;

use crate::{constants::DIGEST_SIZE, error::Error, tree::Parallelism};

pub const DEFAULT_ROUNDS: usize = 40;
pub const DEFAULT_OUTPUT_LEN: usize = 32;

/// Parameters of one hash computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Md6Params {
	/// Number of rounds of the compression function. Must be at least 1.
	pub rounds: usize,
	/// Requested digest length in bytes, capped at [`DIGEST_SIZE`].
	pub output_len: usize,
	pub parallelism: Parallelism,
}

impl Default for Md6Params {
	fn default() -> Self {
		Self {
			rounds: DEFAULT_ROUNDS,
			output_len: DEFAULT_OUTPUT_LEN,
			parallelism: Parallelism::default(),
		}
	}
}

impl Md6Params {
	pub fn with_rounds(self, rounds: usize) -> Self {
		Self { rounds, ..self }
	}

	pub fn with_output_len(self, output_len: usize) -> Self {
		Self { output_len, ..self }
	}

	pub fn with_parallelism(self, parallelism: Parallelism) -> Self {
		Self {
			parallelism,
			..self
		}
	}

	pub fn validate(&self) -> Result<(), Error> {
		ensure!(self.rounds >= 1, Error::ZeroRounds);
		Ok(())
	}

	/// The number of digest bytes actually produced.
	pub fn effective_output_len(&self) -> usize {
		self.output_len.min(DIGEST_SIZE)
	}
}
