// Copyright 2024-2025 Irreducible Inc.

//! Tree reduction of the leaf digests and the fan-out/fan-in scheduling of compressions.
//!
//! Every level is built from the complete previous level: sibling pairs are compressed
//! independently (in parallel when enabled) and each result is placed at its pair index, so the
//! outcome never depends on task timing. An unpaired last node is promoted to the next level
//! unchanged.

use std::{any::Any, panic};

use md6_utils::rayon::bounded_thread_pool;
use rayon::{prelude::*, ThreadPool};
use tracing::{debug, instrument};

use crate::{
	compression::{IntermediateDigest, Md6Compression, PseudoCompressionFunction},
	error::Error,
	padding::Block,
};

/// How compressions within one level are executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
	/// Every compression runs on the calling thread.
	Sequential,
	/// Compressions of one level are spread over a rayon pool: the global one when `threads` is
	/// `None`, otherwise a dedicated pool with that many workers.
	Parallel { threads: Option<usize> },
}

impl Default for Parallelism {
	fn default() -> Self {
		Self::Parallel { threads: None }
	}
}

impl Parallelism {
	pub fn is_parallel(self) -> bool {
		matches!(self, Self::Parallel { .. })
	}
}

/// Runs whole hash operations under a [`Parallelism`] policy.
///
/// A panic in any compression task aborts the operation and is reported once as
/// [`Error::WorkerPanic`].
#[derive(Debug)]
pub struct Scheduler {
	parallelism: Parallelism,
	pool: Option<ThreadPool>,
}

impl Scheduler {
	pub fn new(parallelism: Parallelism) -> Result<Self, Error> {
		let pool = match parallelism {
			Parallelism::Parallel {
				threads: Some(threads),
			} => Some(bounded_thread_pool(threads)?),
			_ => None,
		};
		Ok(Self { parallelism, pool })
	}

	pub fn parallelism(&self) -> Parallelism {
		self.parallelism
	}

	pub fn run<R, OP>(&self, op: OP) -> Result<R, Error>
	where
		R: Send,
		OP: FnOnce(Parallelism) -> R + Send,
	{
		let parallelism = self.parallelism;
		let result = panic::catch_unwind(panic::AssertUnwindSafe(|| match &self.pool {
			Some(pool) => pool.install(|| op(parallelism)),
			None => op(parallelism),
		}));
		result.map_err(|payload| Error::WorkerPanic {
			message: panic_message(payload.as_ref()),
		})
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		message.to_string()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown panic payload".to_string()
	}
}

/// Compresses every block into its leaf digest, keeping block order.
#[instrument("hash_leaves", skip_all, fields(n_blocks = blocks.len()), level = "debug")]
pub fn hash_leaves(
	compression: &Md6Compression,
	blocks: &[Block],
	parallelism: Parallelism,
) -> Vec<IntermediateDigest> {
	if parallelism.is_parallel() {
		blocks
			.par_iter()
			.map(|block| compression.compress_block(block))
			.collect()
	} else {
		blocks
			.iter()
			.map(|block| compression.compress_block(block))
			.collect()
	}
}

/// Builds the next tree level from a complete level.
///
/// The result has `ceil(len / 2)` entries: one compression per consecutive pair, followed by the
/// unpaired last entry of an odd-length level.
#[instrument("compress_layer", skip_all, fields(len = prev_layer.len()), level = "debug")]
pub fn next_level<D, C>(compression: &C, prev_layer: &[D], parallelism: Parallelism) -> Vec<D>
where
	D: Copy + Send + Sync,
	C: PseudoCompressionFunction<D, 2> + Sync,
{
	let compress_pair = |pair: &[D]| compression.compress([pair[0], pair[1]]);

	let mut next_layer: Vec<D> = if parallelism.is_parallel() {
		prev_layer.par_chunks_exact(2).map(compress_pair).collect()
	} else {
		prev_layer.chunks_exact(2).map(compress_pair).collect()
	};
	if let [carried] = prev_layer.chunks_exact(2).remainder() {
		next_layer.push(*carried);
	}
	next_layer
}

/// Reduces a leaf level to the root digest.
///
/// ## Throws
///
/// * [`Error::EmptyInput`] if `leaves` is empty
#[instrument("reduce", skip_all, fields(n_leaves = leaves.len()), level = "debug")]
pub fn reduce<D, C>(
	compression: &C,
	leaves: Vec<D>,
	parallelism: Parallelism,
) -> Result<D, Error>
where
	D: Copy + Send + Sync,
	C: PseudoCompressionFunction<D, 2> + Sync,
{
	let mut level = leaves;
	let mut depth = 0;
	while level.len() > 1 {
		level = next_level(compression, &level, parallelism);
		depth += 1;
	}
	debug!(depth, "hash tree reduced");
	level.pop().ok_or(Error::EmptyInput)
}

/// Number of levels, leaf level and root included, of a tree over `n_leaves` leaves.
pub fn tree_height(n_leaves: usize) -> usize {
	let mut width = n_leaves;
	let mut height = usize::from(n_leaves > 0);
	while width > 1 {
		width = width.div_ceil(2);
		height += 1;
	}
	height
}

#[cfg(test)]
mod tests {
	use std::sync::atomic::{AtomicUsize, Ordering};

	use assert_matches::assert_matches;

	use super::*;
	use crate::key::Key;

	/// Records the tree shape as a string, e.g. `((0,1),2)`.
	#[derive(Clone)]
	struct Shape;

	impl PseudoCompressionFunction<&'static str, 2> for Shape {
		fn compress(&self, input: [&'static str; 2]) -> &'static str {
			Box::leak(format!("({},{})", input[0], input[1]).into_boxed_str())
		}
	}

	#[derive(Clone)]
	struct Sum;

	impl PseudoCompressionFunction<u64, 2> for Sum {
		fn compress(&self, input: [u64; 2]) -> u64 {
			input[0].wrapping_mul(31).wrapping_add(input[1])
		}
	}

	#[derive(Clone)]
	struct PanicsOn(u64);

	impl PseudoCompressionFunction<u64, 2> for PanicsOn {
		fn compress(&self, input: [u64; 2]) -> u64 {
			if input[0] == self.0 {
				panic!("refusing to compress {}", self.0);
			}
			input[0] ^ input[1]
		}
	}

	#[test]
	fn test_odd_node_is_carried_forward() {
		let leaves = vec!["0", "1", "2"];
		let level = next_level(&Shape, &leaves, Parallelism::Sequential);
		assert_eq!(level, vec!["(0,1)", "2"]);
		assert_eq!(reduce(&Shape, leaves, Parallelism::Sequential).unwrap(), "((0,1),2)");
	}

	#[test]
	fn test_tree_shapes() {
		let leaves = vec!["0", "1", "2", "3", "4"];
		assert_eq!(reduce(&Shape, leaves, Parallelism::default()).unwrap(), "(((0,1),(2,3)),4)");
		assert_eq!(reduce(&Shape, vec!["0"], Parallelism::default()).unwrap(), "0");
	}

	#[test]
	fn test_empty_level_is_rejected() {
		assert_matches!(
			reduce::<&str, _>(&Shape, vec![], Parallelism::default()),
			Err(Error::EmptyInput)
		);
		let scheduler = Scheduler::new(Parallelism::Parallel { threads: Some(2) }).unwrap();
		let result = scheduler.run(|parallelism| reduce::<u64, _>(&Sum, vec![], parallelism));
		assert_matches!(result, Ok(Err(Error::EmptyInput)));
	}

	#[test]
	fn test_level_sizes() {
		let mut level = (0..11u64).collect::<Vec<_>>();
		let mut sizes = vec![level.len()];
		while level.len() > 1 {
			level = next_level(&Sum, &level, Parallelism::Sequential);
			sizes.push(level.len());
		}
		assert_eq!(sizes, vec![11, 6, 3, 2, 1]);
		assert_eq!(tree_height(11), 5);
	}

	#[test]
	fn test_tree_height() {
		assert_eq!(tree_height(0), 0);
		assert_eq!(tree_height(1), 1);
		assert_eq!(tree_height(2), 2);
		assert_eq!(tree_height(3), 3);
		assert_eq!(tree_height(4), 3);
		assert_eq!(tree_height(5), 4);
	}

	#[test]
	fn test_parallel_matches_sequential() {
		let leaves = (0..1000u64).map(|i| i.wrapping_mul(0x9e3779b97f4a7c15)).collect::<Vec<_>>();
		let sequential = reduce(&Sum, leaves.clone(), Parallelism::Sequential).unwrap();
		let scheduler = Scheduler::new(Parallelism::Parallel { threads: Some(4) }).unwrap();
		let parallel = scheduler
			.run(|parallelism| reduce(&Sum, leaves, parallelism))
			.unwrap()
			.unwrap();
		assert_eq!(sequential, parallel);
	}

	#[test]
	fn test_leaves_keep_block_order() {
		let compression = Md6Compression::new(Key::default(), 4).unwrap();
		let blocks = (0..37u8).map(|i| [i; 64]).collect::<Vec<_>>();
		let parallel = hash_leaves(&compression, &blocks, Parallelism::default());
		let sequential = hash_leaves(&compression, &blocks, Parallelism::Sequential);
		assert_eq!(parallel, sequential);
		assert_eq!(parallel[5], compression.compress_block(&blocks[5]));
	}

	#[test]
	fn test_panicking_task_fails_whole_operation() {
		let leaves = (0..64u64).collect::<Vec<_>>();
		let completed = AtomicUsize::new(0);
		let scheduler = Scheduler::new(Parallelism::Parallel { threads: Some(2) }).unwrap();

		let result = scheduler.run(|parallelism| {
			let root = reduce(&PanicsOn(10), leaves, parallelism);
			completed.fetch_add(1, Ordering::SeqCst);
			root
		});

		assert_matches!(result, Err(Error::WorkerPanic { message }) if message.contains("refusing"));
		assert_eq!(completed.load(Ordering::SeqCst), 0);
	}

	#[test]
	fn test_sequential_panic_is_reported() {
		let scheduler = Scheduler::new(Parallelism::Sequential).unwrap();
		let result = scheduler.run(|parallelism| reduce(&PanicsOn(0), vec![0, 1], parallelism));
		assert_matches!(result, Err(Error::WorkerPanic { .. }));
	}
}
