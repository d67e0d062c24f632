// Copyright 2023-2025 Irreducible Inc.

use tracing_subscriber::{
	filter::{EnvFilter, LevelFilter},
	layer::SubscriberExt,
	util::SubscriberInitExt,
};

/// Environment variable holding the tracing filter directives, e.g. `MD6_LOG=md6_hash=debug`.
pub const LOG_ENV_VAR: &str = "MD6_LOG";

/// Installs the global tracing subscriber.
///
/// Events go to stderr so that digests printed on stdout stay machine readable. Calling this more
/// than once is harmless: later calls leave the first subscriber in place.
pub fn init_tracing() {
	let filter = EnvFilter::builder()
		.with_default_directive(LevelFilter::WARN.into())
		.with_env_var(LOG_ENV_VAR)
		.from_env_lossy();

	let _ = tracing_subscriber::registry()
		.with(filter)
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.try_init();
}
