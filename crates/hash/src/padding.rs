// Copyright 2025 Irreducible Inc.

//! Message padding and segmentation into fixed-size blocks.
//!
//! The padded stream is `message || 0x80 || 0x00* || bitlen`, where `bitlen` is the unpadded
//! message length in bits as a little-endian `u64`, and its length is a multiple of
//! [`BLOCK_SIZE`]. The marker and the length field always fit; if the final block has fewer than
//! nine spare bytes, one extra block of padding is appended.

use crate::constants::BLOCK_SIZE;

pub type Block = [u8; BLOCK_SIZE];

const MARKER: u8 = 0x80;
const LENGTH_FIELD_SIZE: usize = 8;

/// Number of padding bytes (marker, zeros and length field) appended to a message of `len` bytes.
pub const fn padding_len(len: u64) -> usize {
	let remainder = (len % BLOCK_SIZE as u64) as usize;
	let padding = BLOCK_SIZE - remainder;
	if padding < LENGTH_FIELD_SIZE + 1 {
		padding + BLOCK_SIZE
	} else {
		padding
	}
}

/// Number of blocks a message of `len` bytes occupies once padded.
pub const fn padded_block_count(len: u64) -> u64 {
	(len + padding_len(len) as u64) / BLOCK_SIZE as u64
}

/// Pads `data` and splits it into blocks.
pub fn pad(data: &[u8]) -> Vec<Block> {
	pad_tail(data, data.len() as u64)
}

/// Pads the last `tail.len()` bytes of a message that is `message_len` bytes long in total.
///
/// Earlier bytes of the message must already have been consumed in whole blocks, i.e.
/// `message_len - tail.len()` must be a multiple of [`BLOCK_SIZE`]. This is what allows a
/// streaming hasher to compress full blocks before it knows the final length.
pub fn pad_tail(tail: &[u8], message_len: u64) -> Vec<Block> {
	debug_assert!(tail.len() as u64 <= message_len);
	debug_assert_eq!((message_len - tail.len() as u64) % BLOCK_SIZE as u64, 0);

	let padding = padding_len(message_len);
	let mut padded = Vec::with_capacity(tail.len() + padding);
	padded.extend_from_slice(tail);
	padded.push(MARKER);
	padded.resize(tail.len() + padding - LENGTH_FIELD_SIZE, 0);
	padded.extend_from_slice(&message_len.wrapping_mul(8).to_le_bytes());

	bytemuck::cast_slice::<u8, Block>(&padded).to_vec()
}
