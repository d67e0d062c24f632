// Copyright 2023-2025 Irreducible Inc.

use std::{io, mem};

use tracing::{debug, instrument};

use crate::{
	compression::{IntermediateDigest, Md6Compression},
	constants::BLOCK_SIZE,
	error::Error,
	key::Key,
	output::Md6Digest,
	padding::{pad_tail, Block},
	params::Md6Params,
	tree::{self, hash_leaves, Scheduler},
};

/// Number of whole blocks buffered before they are compressed as one parallel batch.
pub const LEAF_BATCH_BLOCKS: usize = 1024;

const LEAF_BATCH_BYTES: usize = LEAF_BATCH_BLOCKS * BLOCK_SIZE;

/// Incremental hasher.
///
/// Whole blocks are compressed into leaf digests as soon as a batch of them is available, so
/// only the leaf level and less than one batch of input are held in memory. Splitting the input
/// across `update` calls in any way yields the same digest as hashing it in one piece.
///
/// If an `update` fails the hasher must be discarded.
#[derive(Debug)]
pub struct Md6Hasher {
	params: Md6Params,
	compression: Md6Compression,
	scheduler: Scheduler,
	leaves: Vec<IntermediateDigest>,
	pending: Vec<u8>,
	message_len: u64,
}

impl Md6Hasher {
	pub fn new(params: Md6Params, key: Key) -> Result<Self, Error> {
		params.validate()?;
		let compression = Md6Compression::new(key, params.rounds)?;
		let scheduler = Scheduler::new(params.parallelism)?;
		Ok(Self {
			params,
			compression,
			scheduler,
			leaves: Vec::new(),
			pending: Vec::new(),
			message_len: 0,
		})
	}

	pub fn params(&self) -> &Md6Params {
		&self.params
	}

	/// Number of message bytes absorbed so far.
	pub fn message_len(&self) -> u64 {
		self.message_len
	}

	pub fn update(&mut self, data: impl AsRef<[u8]>) -> Result<(), Error> {
		let mut data = data.as_ref();
		self.message_len = self.message_len.wrapping_add(data.len() as u64);

		if self.pending.is_empty() {
			let direct = data.len() - data.len() % LEAF_BATCH_BYTES;
			if direct > 0 {
				self.absorb(&data[..direct])?;
				data = &data[direct..];
			}
		}

		self.pending.extend_from_slice(data);
		if self.pending.len() >= LEAF_BATCH_BYTES {
			let pending = mem::take(&mut self.pending);
			let whole = pending.len() - pending.len() % BLOCK_SIZE;
			self.absorb(&pending[..whole])?;
			self.pending = pending[whole..].to_vec();
		}
		Ok(())
	}

	pub fn chain_update(mut self, data: impl AsRef<[u8]>) -> Result<Self, Error> {
		self.update(data)?;
		Ok(self)
	}

	/// Compresses whole blocks into leaf digests.
	fn absorb(&mut self, bytes: &[u8]) -> Result<(), Error> {
		let blocks = bytemuck::cast_slice::<u8, Block>(bytes);
		let compression = &self.compression;
		let digests = self
			.scheduler
			.run(|parallelism| hash_leaves(compression, blocks, parallelism))?;
		self.leaves.extend(digests);
		Ok(())
	}

	/// Pads the remaining input, hashes it and reduces the leaf level to the root digest.
	#[instrument(
		"Md6Hasher::finalize",
		skip_all,
		fields(message_len = self.message_len, rounds = self.params.rounds),
		level = "debug"
	)]
	pub fn finalize(self) -> Result<Md6Digest, Error> {
		let Self {
			params,
			compression,
			scheduler,
			mut leaves,
			pending,
			message_len,
		} = self;

		let blocks = pad_tail(&pending, message_len);
		let n_leaves = leaves.len() + blocks.len();
		debug!(n_leaves, height = tree::tree_height(n_leaves), "hashing final blocks");

		let root = scheduler.run(|parallelism| {
			leaves.extend(hash_leaves(&compression, &blocks, parallelism));
			tree::reduce(&compression, leaves, parallelism)
		})??;

		Ok(Md6Digest::new(root, params.output_len))
	}

	pub fn finalize_hex(self) -> Result<String, Error> {
		Ok(self.finalize()?.to_hex())
	}
}

impl io::Write for Md6Hasher {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.update(buf).map_err(io::Error::other)?;
		Ok(buf.len())
	}

	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Computes the digest of `data` in one call.
pub fn digest(params: Md6Params, key: &[u8], data: &[u8]) -> Result<Md6Digest, Error> {
	Md6Hasher::new(params, Key::new(key))?
		.chain_update(data)?
		.finalize()
}

/// Hashes `data` with the default scheduling and returns the first `output_len` bytes of the
/// root digest (at most 128) as lowercase hex.
pub fn hash(data: &[u8], key: &[u8], output_len: usize, rounds: usize) -> Result<String, Error> {
	let params = Md6Params::default()
		.with_rounds(rounds)
		.with_output_len(output_len);
	Ok(digest(params, key, data)?.to_hex())
}
