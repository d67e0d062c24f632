// Copyright 2025 Irreducible Inc.

use std::iter;

use md6_utils::ensure;

use crate::{
	constants::{S0, S_STAR},
	error::Error,
};

/// The round-constant table for one round count.
///
/// Entry `j + 1` is derived from entry `j` as `rotl(s, 1) ^ (s & S*)`, starting from the seed
/// `S0`. A table for `rounds` rounds holds `rounds + 1` entries. It is built once per hash
/// operation and then only read, so it can be shared freely between compression tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundConstants {
	words: Vec<u64>,
}

impl RoundConstants {
	pub fn new(rounds: usize) -> Result<Self, Error> {
		ensure!(rounds >= 1, Error::ZeroRounds);

		let words = sequence().take(rounds + 1).collect();
		Ok(Self { words })
	}

	pub fn rounds(&self) -> usize {
		self.words.len() - 1
	}

	pub fn as_slice(&self) -> &[u64] {
		&self.words
	}

	/// The constant used in `phase` of every round.
	///
	/// Tables shorter than a round (fewer than 15 rounds) wrap around.
	#[inline]
	pub fn phase(&self, phase: usize) -> u64 {
		self.words[phase % self.words.len()]
	}
}

/// The infinite round-constant sequence.
pub fn sequence() -> impl Iterator<Item = u64> {
	iter::successors(Some(S0), |&s| Some(s.rotate_left(1) ^ (s & S_STAR)))
}
