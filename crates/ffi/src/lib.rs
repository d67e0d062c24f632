// Copyright 2025 Irreducible Inc.

//! C bindings for the `md6_hash` crate.
//!
//! Digests are returned as heap-allocated, NUL-terminated lowercase hex strings that the caller
//! must release with [`md6_free_string`]. A null return value signals an error, which is logged.

use std::{
	ffi::{c_char, c_int, CStr, CString},
	fs, io,
	str::Utf8Error,
};

use md6_hash::hash;
use tracing::error;

#[derive(Debug, thiserror::Error)]
enum Error {
	#[error("null pointer passed for {0}")]
	NullPointer(&'static str),
	#[error("round count {0} is not positive")]
	InvalidRounds(c_int),
	#[error("path is not valid UTF-8: {0}")]
	InvalidPath(#[from] Utf8Error),
	#[error("failed to read input file: {0}")]
	Io(#[from] io::Error),
	#[error(transparent)]
	Hash(#[from] md6_hash::Error),
	#[error("digest contains an interior NUL byte")]
	InteriorNul(#[from] std::ffi::NulError),
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn bytes_or_empty<'a>(ptr: *const c_char) -> &'a [u8] {
	if ptr.is_null() {
		&[]
	} else {
		CStr::from_ptr(ptr).to_bytes()
	}
}

/// # Safety
///
/// Same contract as [`bytes_or_empty`], except that null is an error.
unsafe fn required<'a>(ptr: *const c_char, what: &'static str) -> Result<&'a CStr, Error> {
	if ptr.is_null() {
		return Err(Error::NullPointer(what));
	}
	Ok(CStr::from_ptr(ptr))
}

fn hash_to_c_string(
	data: &[u8],
	key: &[u8],
	output_len: c_int,
	rounds: c_int,
) -> Result<CString, Error> {
	let rounds = usize::try_from(rounds)
		.ok()
		.filter(|&rounds| rounds > 0)
		.ok_or(Error::InvalidRounds(rounds))?;
	let output_len = usize::try_from(output_len).unwrap_or(0);
	let digest = hash(data, key, output_len, rounds)?;
	Ok(CString::new(digest)?)
}

fn into_raw(result: Result<CString, Error>) -> *mut c_char {
	match result {
		Ok(digest) => digest.into_raw(),
		Err(err) => {
			error!("md6 hashing failed: {err}");
			std::ptr::null_mut()
		}
	}
}

/// Hashes the bytes of a NUL-terminated string.
///
/// A null `key` is the empty key. A negative `output_len` yields an empty digest and lengths
/// above 128 are clamped.
///
/// # Safety
///
/// `input` must point to a NUL-terminated string and `key` must be null or point to one.
#[no_mangle]
pub unsafe extern "C" fn md6_from_input(
	input: *const c_char,
	key: *const c_char,
	output_len: c_int,
	rounds: c_int,
) -> *mut c_char {
	let result = required(input, "input").and_then(|input| {
		hash_to_c_string(input.to_bytes(), bytes_or_empty(key), output_len, rounds)
	});
	into_raw(result)
}

/// Hashes `len` bytes starting at `data`, which may contain NUL bytes.
///
/// # Safety
///
/// `data` must be valid for reads of `len` bytes (it may be null when `len` is 0) and `key` must
/// be valid for reads of `key_len` bytes (it may be null when `key_len` is 0).
#[no_mangle]
pub unsafe extern "C" fn md6_from_bytes(
	data: *const u8,
	len: usize,
	key: *const u8,
	key_len: usize,
	output_len: c_int,
	rounds: c_int,
) -> *mut c_char {
	let data = if len == 0 { &[][..] } else { std::slice::from_raw_parts(data, len) };
	let key = if key_len == 0 { &[][..] } else { std::slice::from_raw_parts(key, key_len) };
	into_raw(hash_to_c_string(data, key, output_len, rounds))
}

/// Hashes the contents of the file at `path`.
///
/// # Safety
///
/// `path` must point to a NUL-terminated UTF-8 string and `key` must be null or point to a
/// NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn md6_from_file(
	path: *const c_char,
	key: *const c_char,
	output_len: c_int,
	rounds: c_int,
) -> *mut c_char {
	let result = required(path, "path").and_then(|path| {
		let data = fs::read(path.to_str()?)?;
		hash_to_c_string(&data, bytes_or_empty(key), output_len, rounds)
	});
	into_raw(result)
}

/// Releases a digest string returned by this library.
///
/// # Safety
///
/// `digest` must be null or a pointer returned by one of the `md6_from_*` functions that has
/// not been freed yet.
#[no_mangle]
pub unsafe extern "C" fn md6_free_string(digest: *mut c_char) {
	if !digest.is_null() {
		drop(CString::from_raw(digest));
	}
}
