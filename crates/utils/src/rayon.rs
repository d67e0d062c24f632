// Copyright 2024-2025 Irreducible Inc.

use std::{env, sync::OnceLock};

use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

/// In case when number of threads is set to 1, use rayon thread pool with
/// `use_current_thread` set to true. This way a single-threaded run hashes on the main thread,
/// which keeps profiles and backtraces readable.
///
/// NOTE: rayon doesn't allow initializing global thread pool several times, so
/// in case when it was initialized before this function returns an error.
/// The typical usage of the function is to place it's call in the beginning of the `main`.
/// The function returns reference to the result because `ThreadPoolBuildError`
/// doesn't implement `Clone`.
pub fn adjust_thread_pool() -> &'static Result<(), ThreadPoolBuildError> {
	static ONCE_GUARD: OnceLock<Result<(), ThreadPoolBuildError>> = OnceLock::new();

	ONCE_GUARD.get_or_init(|| {
		// We cannot use `rayon::current_num_threads` because it would force the global thread
		// pool to initialize, so we won't be able to override it.
		match env::var("RAYON_NUM_THREADS") {
			Ok(v) if v == "1" => ThreadPoolBuilder::new()
				.num_threads(1)
				.use_current_thread()
				.build_global(),
			_ => Ok(()),
		}
	})
}

/// Builds a dedicated pool with exactly `num_threads` workers.
///
/// Workers are named `md6-worker-{index}` so they can be told apart from the global pool in
/// traces.
pub fn bounded_thread_pool(num_threads: usize) -> Result<ThreadPool, ThreadPoolBuildError> {
	ThreadPoolBuilder::new()
		.num_threads(num_threads.max(1))
		.thread_name(|index| format!("md6-worker-{index}"))
		.build()
}
