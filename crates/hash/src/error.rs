// Copyright 2025 Irreducible Inc.

use crate::key::KeyPolicyError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("the round count must be at least 1")]
	ZeroRounds,
	#[error("cannot reduce an empty level")]
	EmptyInput,
	#[error("a compression task panicked: {message}")]
	WorkerPanic { message: String },
	#[error("failed to build the compression thread pool: {0}")]
	ThreadPool(#[from] rayon::ThreadPoolBuildError),
	#[error("key rejected by policy: {0}")]
	InvalidKey(#[from] KeyPolicyError),
}
