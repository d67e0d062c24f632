// Copyright 2025 Irreducible Inc.

use md6_hash::{
	digest, hash,
	padding::{pad, padded_block_count},
	tree::{hash_leaves, next_level},
	Key, Md6Compression, Md6Params, Parallelism, PseudoCompressionFunction, DIGEST_SIZE,
};
use proptest::prelude::*;
use rand::{rngs::StdRng, RngCore, SeedableRng};

#[test]
fn test_empty_input() {
	assert_eq!(hash(b"", b"", 16, 40).unwrap(), "49fc3ca731f7e6fe16441647a8f63b7e");
}

#[test]
fn test_full_width_empty_input() {
	let expected = concat!(
		"49fc3ca731f7e6fe16441647a8f63b7ee468273a3992a68a0960e8922435b420",
		"2e76e5ad81752d5aad51bf44e1cfb8e5c826e11fce3a463fc8b00bab81a4225a",
		"9fda62f01e59c8061f25b43bad3a782fd4cb7cc72b4ac5f9500ff3cf669d0acf",
		"2a0222d6116d9a7bfc66e1ec427acf0c6723bf806772d7967d12bf915aca5d23",
	);
	assert_eq!(hash(b"", b"", 128, 40).unwrap(), expected);
	// Longer requests are clamped to the intermediate digest width.
	assert_eq!(hash(b"", b"", 4096, 40).unwrap(), expected);
}

#[test]
fn test_simple_words() {
	assert_eq!(
		hash(b"abc", b"", 32, 40).unwrap(),
		"46dc92f712f3b1df100383c36a5455f911a5b3c8adc32ff25bb7e03502ed3f6e"
	);
	assert_eq!(
		hash(b"The quick brown fox jumps over the lazy dog", b"", 32, 40).unwrap(),
		"1ed977ac1081797007a8ca3194fe50f5023d24f899e0232610c6b3a21e0f1fbf"
	);
	assert_eq!(
		hash(b"abc", b"", 32, 16).unwrap(),
		"cb8173fb7888d9d0a2ba82eb387729cfc0eda5734bf28e36dc31672c50fbf8f7"
	);
}

#[test]
fn test_zero_output_length() {
	assert_eq!(hash(b"abc", b"", 0, 40).unwrap(), "");
}

#[test]
fn test_keyed_four_leaf_tree() {
	let data = (0..200u8).collect::<Vec<_>>();
	let expected = concat!(
		"8b6666bbc38d26d48c41436dde3ffb5c4bbfd2e9fb5d06127684bb5fdf8b135c",
		"756139cde0ad7b8eb40d1a5566b7583a724b554841c93db36bdfb4812a14814e",
	);
	assert_eq!(padded_block_count(data.len() as u64), 4);
	assert_eq!(hash(&data, b"secret", 64, 40).unwrap(), expected);

	// 4 -> 2 -> 1
	let compression = Md6Compression::new(Key::from("secret"), 40).unwrap();
	let leaves = hash_leaves(&compression, &pad(&data), Parallelism::Sequential);
	let middle = next_level(&compression, &leaves, Parallelism::Sequential);
	let top = next_level(&compression, &middle, Parallelism::Sequential);
	assert_eq!((leaves.len(), middle.len(), top.len()), (4, 2, 1));
	assert_eq!(hex::encode(&top[0][..64]), expected);
}

#[test]
fn test_sixteen_leaves() {
	assert_eq!(
		hash(&[b'a'; 1000], b"", 32, 40).unwrap(),
		"0b874a8f563f2a12cffc5aa7b81e0944e27c173e2110ffe124b04c420944ed17"
	);
}

#[test]
fn test_odd_leaf_is_promoted() {
	let data = (0..150).map(|i| (i % 251) as u8).collect::<Vec<_>>();
	let blocks = pad(&data);
	assert_eq!(blocks.len(), 3);

	let f = Md6Compression::new(Key::default(), 40).unwrap();
	let [b0, b1, b2] = [0, 1, 2].map(|i| f.compress_block(&blocks[i]));
	let root = f.compress([f.compress([b0, b1]), b2]);

	let params = Md6Params::default().with_output_len(DIGEST_SIZE);
	assert_eq!(digest(params, b"", &data).unwrap().root(), &root);
	assert_eq!(
		hash(&data, b"", 32, 40).unwrap(),
		"d77b3a811d01cdff34282f0e19631e4fde4a2cbf2f8579394f39eafb41c5d95f"
	);
}

#[test]
fn test_single_block_is_not_combined() {
	let f = Md6Compression::new(Key::from("k"), 12).unwrap();
	let blocks = pad(b"short message");
	assert_eq!(blocks.len(), 1);

	let params = Md6Params::default().with_rounds(12).with_output_len(20);
	let digest = digest(params, b"k", b"short message").unwrap();
	assert_eq!(digest.as_bytes(), &f.compress_block(&blocks[0])[..20]);
}

#[test]
fn test_key_truncated_to_eight_words() {
	let data = (0..=255u8).cycle().take(10240).collect::<Vec<_>>();
	let key = b"0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
	let expected = concat!(
		"2552bbb5d7348a9b4463d1569a8c90c3282212a0f32bc345656f24acbafd8f66",
		"bf8b834ada178576aa152544294a645f",
	);
	assert_eq!(hash(&data, key, 48, 24).unwrap(), expected);

	let mut long_key = key.to_vec();
	long_key.extend_from_slice(b"EXTRA");
	assert_eq!(hash(&data, &long_key, 48, 24).unwrap(), expected);
}

#[test]
fn test_key_sensitivity() {
	let key = b"secret-key";
	let mut flipped = *key;
	flipped[0] ^= 1;

	let a = digest(Md6Params::default(), key, b"hello world").unwrap();
	let b = digest(Md6Params::default(), &flipped, b"hello world").unwrap();
	let differing = a
		.as_bytes()
		.iter()
		.zip(b.as_bytes())
		.filter(|(x, y)| x != y)
		.count();
	assert!(differing > a.len() / 2, "only {differing} bytes differ");

	let unkeyed = digest(Md6Params::default(), b"", b"hello world").unwrap();
	assert_ne!(a, unkeyed);
}

#[test]
fn test_avalanche() {
	let params = Md6Params::default().with_output_len(DIGEST_SIZE);
	let mut data = b"The quick brown fox jumps over the lazy dog".to_vec();
	let a = digest(params, b"", &data).unwrap();
	data[10] ^= 0x04;
	let b = digest(params, b"", &data).unwrap();

	let differing = a
		.as_bytes()
		.iter()
		.zip(b.as_bytes())
		.filter(|(x, y)| x != y)
		.count();
	assert!(differing > DIGEST_SIZE * 3 / 4, "only {differing} bytes differ");
}

#[test]
fn test_parallel_and_sequential_agree() {
	let mut rng = StdRng::seed_from_u64(0);
	let mut data = vec![0u8; 100_003];
	rng.fill_bytes(&mut data);

	let sequential = Md6Params::default().with_parallelism(Parallelism::Sequential);
	let expected = digest(sequential, b"key", &data).unwrap();
	for parallelism in [
		Parallelism::Parallel { threads: None },
		Parallelism::Parallel { threads: Some(1) },
		Parallelism::Parallel { threads: Some(5) },
	] {
		let params = sequential.with_parallelism(parallelism);
		assert_eq!(digest(params, b"key", &data).unwrap(), expected);
		assert_eq!(digest(params, b"key", &data).unwrap(), expected);
	}
}

proptest! {
	#![proptest_config(ProptestConfig::with_cases(24))]

	#[test]
	fn test_truncation_is_prefix(
		data in prop::collection::vec(any::<u8>(), 0..300),
		short in 0usize..=128,
		long in 0usize..=160,
	) {
		prop_assume!(short <= long);
		let short_hex = hash(&data, b"key", short, 20).unwrap();
		let long_hex = hash(&data, b"key", long, 20).unwrap();
		prop_assert_eq!(short_hex.len(), 2 * short);
		prop_assert!(long_hex.starts_with(&short_hex));
	}
}
