// Copyright 2024-2025 Irreducible Inc.

use std::sync::Arc;

use crate::{
	constants::{
		DATA_OFFSET, DATA_WORDS, DIGEST_SIZE, DIGEST_WORDS, KEY_OFFSET, KEY_WORDS, LEFT_SHIFTS, Q,
		Q_WORDS, RIGHT_SHIFTS, ROUND_WORDS, STATE_PREFIX_WORDS, TAPS, U, U_INDEX, V, V_INDEX,
		WORD_BYTES,
	},
	error::Error,
	key::Key,
	padding::Block,
	round_constants::RoundConstants,
};

/// Output of one compression: the last [`DIGEST_WORDS`] words of the state, little-endian.
pub type IntermediateDigest = [u8; DIGEST_SIZE];

/// An `N`-to-1 compression function collision-resistant in a hash tree setting.
///
/// Unlike a general compression function, it is only expected to be collision-resistant where
/// the preimage of a non-leaf node consists of compression outputs.
pub trait PseudoCompressionFunction<T, const N: usize>: Clone {
	fn compress(&self, input: [T; N]) -> T;
}

/// The word-oriented compression function `F`.
///
/// Holds the key schedule and a shared handle to the round-constant table, so cloning is cheap
/// and every clone computes the same function.
#[derive(Debug, Clone)]
pub struct Md6Compression {
	key: Key,
	constants: Arc<RoundConstants>,
}

impl Md6Compression {
	pub fn new(key: Key, rounds: usize) -> Result<Self, Error> {
		let constants = RoundConstants::new(rounds)?;
		Ok(Self::with_constants(key, Arc::new(constants)))
	}

	pub fn with_constants(key: Key, constants: Arc<RoundConstants>) -> Self {
		Self { key, constants }
	}

	pub fn rounds(&self) -> usize {
		self.constants.rounds()
	}

	pub fn key(&self) -> &Key {
		&self.key
	}

	/// Compresses one padded input block into a leaf digest.
	pub fn compress_block(&self, block: &Block) -> IntermediateDigest {
		self.compress_bytes(block)
	}

	/// Runs `F` over `input`, which is read as little-endian words into the data region.
	///
	/// `input` must be a whole number of words and at most [`DATA_WORDS`] words long; the rest of
	/// the data region is zero.
	pub fn compress_bytes(&self, input: &[u8]) -> IntermediateDigest {
		debug_assert_eq!(input.len() % WORD_BYTES, 0);
		debug_assert!(input.len() <= DATA_WORDS * WORD_BYTES);

		let n = STATE_PREFIX_WORDS;
		let [t0, t1, t2, t3, t4] = TAPS;

		let mut state = vec![0u64; n + ROUND_WORDS * self.rounds()];
		state[..Q_WORDS].copy_from_slice(&Q);
		state[KEY_OFFSET..KEY_OFFSET + KEY_WORDS].copy_from_slice(self.key.words());
		state[U_INDEX] = U;
		state[V_INDEX] = V;
		for (word, chunk) in state[DATA_OFFSET..DATA_OFFSET + DATA_WORDS]
			.iter_mut()
			.zip(input.chunks_exact(WORD_BYTES))
		{
			let mut le_bytes = [0u8; WORD_BYTES];
			le_bytes.copy_from_slice(chunk);
			*word = u64::from_le_bytes(le_bytes);
		}

		for i in n..state.len() {
			let phase = (i - n) % ROUND_WORDS;

			let mut x = self.constants.phase(phase)
				^ state[i - n]
				^ state[i - t0]
				^ (state[i - t1] & state[i - t2])
				^ (state[i - t3] & state[i - t4]);
			x ^= x >> RIGHT_SHIFTS[phase];
			x ^= x << LEFT_SHIFTS[phase];
			state[i] = x;
		}

		let mut digest = [0u8; DIGEST_SIZE];
		for (chunk, word) in digest
			.chunks_exact_mut(WORD_BYTES)
			.zip(&state[state.len() - DIGEST_WORDS..])
		{
			chunk.copy_from_slice(&word.to_le_bytes());
		}
		digest
	}
}

/// Combines two sibling digests by compressing their concatenation.
impl PseudoCompressionFunction<IntermediateDigest, 2> for Md6Compression {
	fn compress(&self, input: [IntermediateDigest; 2]) -> IntermediateDigest {
		let [left, right] = input;
		let mut node = [0u8; 2 * DIGEST_SIZE];
		node[..DIGEST_SIZE].copy_from_slice(&left);
		node[DIGEST_SIZE..].copy_from_slice(&right);
		self.compress_bytes(&node)
	}
}
