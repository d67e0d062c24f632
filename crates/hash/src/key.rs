// Copyright 2025 Irreducible Inc.

use std::fmt;

use md6_utils::{bail, ensure};
use rand::Rng;

use crate::{
	constants::{KEY_SIZE, KEY_WORDS, WORD_BYTES},
	error::Error,
};

/// Key material of the compression function, normalized to [`KEY_WORDS`] little-endian words.
///
/// Shorter keys are zero-padded on the right, longer keys are truncated to [`KEY_SIZE`] bytes.
/// The empty key gives the all-zero schedule used for unkeyed hashing.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Key {
	words: [u64; KEY_WORDS],
}

impl Key {
	pub fn new(bytes: &[u8]) -> Self {
		let mut padded = [0u8; KEY_SIZE];
		let len = bytes.len().min(KEY_SIZE);
		padded[..len].copy_from_slice(&bytes[..len]);

		let mut words = [0u64; KEY_WORDS];
		for (word, chunk) in words.iter_mut().zip(padded.chunks_exact(WORD_BYTES)) {
			let mut le_bytes = [0u8; WORD_BYTES];
			le_bytes.copy_from_slice(chunk);
			*word = u64::from_le_bytes(le_bytes);
		}
		Self { words }
	}

	pub fn words(&self) -> &[u64; KEY_WORDS] {
		&self.words
	}

	pub fn is_empty(&self) -> bool {
		self.words.iter().all(|&word| word == 0)
	}
}

impl From<&[u8]> for Key {
	fn from(bytes: &[u8]) -> Self {
		Self::new(bytes)
	}
}

impl From<&str> for Key {
	fn from(key: &str) -> Self {
		Self::new(key.as_bytes())
	}
}

impl fmt::Debug for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Key { .. }")
	}
}

/// Characters counted as special by [`KeyPolicy`].
pub const SPECIAL_CHARACTERS: &str = "!#$%&'*+/=?^_`{|}~@";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
	Digit,
	Lower,
	Upper,
	Special,
}

impl CharClass {
	fn of(c: char) -> Option<Self> {
		if c.is_ascii_digit() {
			Some(Self::Digit)
		} else if c.is_lowercase() {
			Some(Self::Lower)
		} else if c.is_uppercase() {
			Some(Self::Upper)
		} else if SPECIAL_CHARACTERS.contains(c) {
			Some(Self::Special)
		} else {
			None
		}
	}
}

impl fmt::Display for CharClass {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Self::Digit => "digit",
			Self::Lower => "lowercase",
			Self::Upper => "uppercase",
			Self::Special => "special",
		};
		f.write_str(name)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyPolicyError {
	#[error("key length {len} is outside the allowed range {min}..={max}")]
	Length { len: usize, min: usize, max: usize },
	#[error("key contains an excluded {0} character")]
	ExcludedClass(CharClass),
	#[error("every character class is excluded, no key can be generated")]
	EmptyAlphabet,
}

/// Restrictions on user-chosen text keys.
///
/// Lengths are counted in UTF-8 bytes, the unit the key is stored in. Only the first
/// [`KEY_SIZE`] bytes of a key reach the compression function, which is why the default maximum
/// is [`KEY_SIZE`]. Generated keys are ASCII, so their length in characters equals their length
/// in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPolicy {
	pub min_len: usize,
	pub max_len: usize,
	pub exclude_digits: bool,
	pub exclude_lower: bool,
	pub exclude_upper: bool,
	pub exclude_special: bool,
}

impl Default for KeyPolicy {
	fn default() -> Self {
		Self {
			min_len: 8,
			max_len: KEY_SIZE,
			exclude_digits: false,
			exclude_lower: false,
			exclude_upper: false,
			exclude_special: false,
		}
	}
}

impl KeyPolicy {
	fn excludes(&self, class: CharClass) -> bool {
		match class {
			CharClass::Digit => self.exclude_digits,
			CharClass::Lower => self.exclude_lower,
			CharClass::Upper => self.exclude_upper,
			CharClass::Special => self.exclude_special,
		}
	}

	fn check_len(&self, len: usize) -> Result<(), KeyPolicyError> {
		ensure!(
			(self.min_len..=self.max_len).contains(&len),
			KeyPolicyError::Length {
				len,
				min: self.min_len,
				max: self.max_len,
			}
		);
		Ok(())
	}

	pub fn validate(&self, key: &str) -> Result<(), KeyPolicyError> {
		self.check_len(key.len())?;

		for class in key.chars().filter_map(CharClass::of) {
			if self.excludes(class) {
				bail!(KeyPolicyError::ExcludedClass(class));
			}
		}
		Ok(())
	}

	/// Validates a user-supplied text key and converts it into a [`Key`].
	pub fn accept(&self, key: &str) -> Result<Key, Error> {
		self.validate(key)?;
		Ok(Key::from(key))
	}

	/// The characters a generated key is drawn from.
	pub fn alphabet(&self) -> Vec<char> {
		('a'..='z')
			.chain('A'..='Z')
			.chain('0'..='9')
			.chain(SPECIAL_CHARACTERS.chars())
			.filter(|&c| CharClass::of(c).is_some_and(|class| !self.excludes(class)))
			.collect()
	}

	/// Draws a random key of `len` characters that satisfies this policy.
	pub fn generate<R: Rng>(
		&self,
		rng: &mut R,
		len: usize,
	) -> Result<String, KeyPolicyError> {
		let alphabet = self.alphabet();
		ensure!(!alphabet.is_empty(), KeyPolicyError::EmptyAlphabet);
		self.check_len(len)?;

		Ok((0..len)
			.map(|_| alphabet[rng.gen_range(0..alphabet.len())])
			.collect())
	}
}
