// Copyright 2025 Irreducible Inc.

//! Fixed parameters of the compression function.
//!
//! The working state of one compression is laid out as
//!
//! ```text
//! | Q (15) | K (8) | U | V | data (64) | round output (16 * rounds) |
//! 0        15      23  24  25          89
//! ```
//!
//! and the last [`DIGEST_WORDS`] words of the round output are the intermediate digest.

use static_assertions::{const_assert, const_assert_eq};

/// Size of one padded input block in bytes.
pub const BLOCK_SIZE: usize = 64;

/// Number of bytes in a state word.
pub const WORD_BYTES: usize = 8;

/// Width of an intermediate digest in words.
pub const DIGEST_WORDS: usize = 16;

/// Width of an intermediate digest in bytes. Requested output lengths are capped at this value.
pub const DIGEST_SIZE: usize = DIGEST_WORDS * WORD_BYTES;

/// Number of words of the state that exist before the first round step.
pub const STATE_PREFIX_WORDS: usize = 89;

/// Number of state words produced by one round, one per phase.
pub const ROUND_WORDS: usize = 16;

pub const Q_WORDS: usize = 15;
pub const KEY_WORDS: usize = 8;
pub const KEY_SIZE: usize = KEY_WORDS * WORD_BYTES;

pub const KEY_OFFSET: usize = Q_WORDS;
pub const U_INDEX: usize = KEY_OFFSET + KEY_WORDS;
pub const V_INDEX: usize = U_INDEX + 1;
pub const DATA_OFFSET: usize = V_INDEX + 1;

/// Words of the state that may carry input data.
pub const DATA_WORDS: usize = STATE_PREFIX_WORDS - DATA_OFFSET;

/// Fractional part of the square root of 6.
pub const Q: [u64; Q_WORDS] = [
	0x7311c2812425cfa0,
	0x6432286434aac8e7,
	0xb60450e9ef68b7c1,
	0xe8fb23908d9f06f1,
	0xdd2e76cba691e5bf,
	0x0cd0d63b2c30bc41,
	0x1f8ccf6823058f8a,
	0x54e5ed5b88e3775d,
	0x4ad12aae0a6d6031,
	0x3e7f16bb88222e0d,
	0x8af8671d3fb50c2c,
	0x995ad1178bd25c31,
	0xc878c1dd04c4b633,
	0x3b72066c7a1552ac,
	0x0d6f3522631effcb,
];

/// Node identifier word.
pub const U: u64 = 0x0100_0000_0000_0000;

/// Control word.
pub const V: u64 = 0x0028_4040_0000_0200;

/// Backward distances of the feedback taps, `t0` to `t4`.
pub const TAPS: [usize; 5] = [17, 18, 21, 31, 67];

/// Right shift applied in each phase of a round.
pub const RIGHT_SHIFTS: [u32; ROUND_WORDS] = [10, 5, 13, 10, 11, 12, 2, 7, 14, 15, 7, 13, 11, 7, 6, 12];

/// Left shift applied in each phase of a round.
pub const LEFT_SHIFTS: [u32; ROUND_WORDS] = [11, 24, 9, 16, 15, 9, 27, 15, 6, 2, 29, 8, 15, 5, 31, 9];

/// Seed of the round-constant sequence.
pub const S0: u64 = 0x0123_4567_89ab_cdef;

/// Feedback mask of the round-constant sequence.
pub const S_STAR: u64 = 0x7311_c281_2425_cfa0;

const_assert_eq!(DATA_OFFSET, 25);
const_assert_eq!(DATA_WORDS, 64);
const_assert_eq!(DIGEST_SIZE, 128);
// A tree node is the concatenation of two intermediate digests and must fit the data region.
const_assert!(2 * DIGEST_WORDS <= DATA_WORDS);
const_assert!(BLOCK_SIZE / WORD_BYTES <= DATA_WORDS);
const_assert!(TAPS[4] < STATE_PREFIX_WORDS);
