// Copyright 2024-2025 Irreducible Inc.

/// Returns early with the given error, converted with `Into`.
///
/// With the `bail_panic` feature enabled the error is raised as a panic instead, which keeps the
/// backtrace of the failing guard when debugging.
#[cfg(feature = "bail_panic")]
#[macro_export]
macro_rules! bail {
	($err:expr) => {
		panic!("{}", $err);
	};
}

#[cfg(not(feature = "bail_panic"))]
#[macro_export]
macro_rules! bail {
	($err:expr) => {
		return Err($err.into());
	};
}

/// Bails with `$err` unless `$cond` holds.
#[macro_export]
macro_rules! ensure {
	($cond:expr, $err:expr) => {
		if !$cond {
			$crate::bail!($err);
		}
	};
}
