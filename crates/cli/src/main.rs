// Copyright 2025 Irreducible Inc.

use std::{
	fs::{self, File},
	io::{self, Write},
	path::{Path, PathBuf},
	process::ExitCode,
};

use anyhow::{bail, Context, Result};
use clap::{builder::TypedValueParser, value_parser, Args, Parser, Subcommand};
use md6_hash::{
	Key, KeyPolicy, Md6Digest, Md6Hasher, Md6Params, Parallelism, DEFAULT_OUTPUT_LEN,
	DEFAULT_ROUNDS,
};
use md6_utils::{env::boolean_env_flag_set, rayon::adjust_thread_pool, tracing::init_tracing};
use rand::thread_rng;

/// Environment flag that forces single-threaded hashing.
const SEQUENTIAL_ENV_VAR: &str = "MD6_SEQUENTIAL";

const STDIN_PATH: &str = "-";

/// Compute keyed Merkle-tree digests of files, standard input or a string.
#[derive(Debug, Parser)]
#[command(name = "md6sum", version, args_conflicts_with_subcommands = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Command>,
	#[command(flatten)]
	hash: HashArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Generate a random key that satisfies the key policy.
	Keygen(KeygenArgs),
}

#[derive(Debug, Args)]
struct HashArgs {
	/// Number of compression rounds.
	#[arg(short, long, default_value_t = DEFAULT_ROUNDS, value_parser = value_parser!(u64).range(1..).map(|r| r as usize))]
	rounds: usize,
	/// Digest length in bytes, at most 128.
	#[arg(short, long, default_value_t = DEFAULT_OUTPUT_LEN)]
	length: usize,
	/// Key for keyed hashing, checked against the key policy flags.
	#[arg(short, long, conflicts_with = "key_file")]
	key: Option<String>,
	/// Read raw key bytes from a file. Only the first 64 bytes are used.
	#[arg(long)]
	key_file: Option<PathBuf>,
	#[command(flatten)]
	policy: KeyPolicyArgs,
	/// Hash this string instead of reading files.
	#[arg(short, long, conflicts_with = "files")]
	string: Option<String>,
	/// Compare the digest against this hex value; exits with status 1 on mismatch.
	#[arg(short, long)]
	check: Option<String>,
	/// Also write the digest to this file.
	#[arg(short, long)]
	output: Option<PathBuf>,
	/// Hash on the calling thread only.
	#[arg(long, conflicts_with = "threads")]
	sequential: bool,
	/// Size of a dedicated worker pool.
	#[arg(long, value_parser = value_parser!(u64).range(1..).map(|t| t as usize))]
	threads: Option<usize>,
	/// Files to hash; `-` or no files reads standard input.
	files: Vec<PathBuf>,
}

#[derive(Debug, Args)]
struct KeygenArgs {
	/// Number of characters in the key.
	#[arg(short, long, default_value_t = 64)]
	length: usize,
	#[command(flatten)]
	policy: KeyPolicyArgs,
}

/// Key policy shared by `--key` validation and `keygen`.
#[derive(Debug, Args)]
struct KeyPolicyArgs {
	/// Smallest key length, in bytes, accepted by the policy.
	#[arg(long, default_value_t = KeyPolicy::default().min_len)]
	min_key_length: usize,
	#[arg(long)]
	exclude_digits: bool,
	#[arg(long)]
	exclude_lower: bool,
	#[arg(long)]
	exclude_upper: bool,
	#[arg(long)]
	exclude_special: bool,
}

impl KeyPolicyArgs {
	fn policy(&self) -> Result<KeyPolicy> {
		let policy = KeyPolicy {
			min_len: self.min_key_length,
			exclude_digits: self.exclude_digits,
			exclude_lower: self.exclude_lower,
			exclude_upper: self.exclude_upper,
			exclude_special: self.exclude_special,
			..KeyPolicy::default()
		};
		if policy.min_len > policy.max_len {
			bail!("minimum key length {} exceeds {}", policy.min_len, policy.max_len);
		}
		Ok(policy)
	}
}

impl HashArgs {
	fn params(&self, force_sequential: bool) -> Md6Params {
		let parallelism = if self.sequential || force_sequential {
			Parallelism::Sequential
		} else {
			Parallelism::Parallel {
				threads: self.threads,
			}
		};
		Md6Params::default()
			.with_rounds(self.rounds)
			.with_output_len(self.length)
			.with_parallelism(parallelism)
	}

	fn key(&self) -> Result<Key> {
		match (&self.key, &self.key_file) {
			(Some(key), _) => Ok(self.policy.policy()?.accept(key)?),
			(None, Some(path)) => {
				let bytes = fs::read(path)
					.with_context(|| format!("failed to read key file {}", path.display()))?;
				Ok(Key::new(&bytes))
			}
			(None, None) => Ok(Key::default()),
		}
	}

	fn inputs(&self) -> Vec<PathBuf> {
		if self.files.is_empty() {
			vec![PathBuf::from(STDIN_PATH)]
		} else {
			self.files.clone()
		}
	}
}

fn hash_reader(params: Md6Params, key: Key, reader: &mut impl io::Read) -> Result<Md6Digest> {
	let mut hasher = Md6Hasher::new(params, key)?;
	io::copy(reader, &mut hasher)?;
	Ok(hasher.finalize()?)
}

fn hash_path(params: Md6Params, key: Key, path: &Path) -> Result<Md6Digest> {
	if path.as_os_str() == STDIN_PATH {
		return hash_reader(params, key, &mut io::stdin().lock()).context("failed to hash stdin");
	}
	let mut file =
		File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
	hash_reader(params, key, &mut file).with_context(|| format!("failed to hash {}", path.display()))
}

/// Hashes every input, prints one `digest  name` line each and returns whether all checks passed.
fn run_hash(args: &HashArgs) -> Result<bool> {
	let params = args.params(boolean_env_flag_set(SEQUENTIAL_ENV_VAR));
	let key = args.key()?;
	tracing::debug!(?params, keyed = !key.is_empty(), "hashing");

	let mut results = Vec::new();
	if let Some(string) = &args.string {
		let digest = Md6Hasher::new(params, key)?
			.chain_update(string)?
			.finalize()?;
		results.push((digest, format!("{string:?}")));
	} else {
		for path in args.inputs() {
			let digest = hash_path(params, key, &path)?;
			results.push((digest, path.display().to_string()));
		}
	}

	let mut stdout = io::stdout().lock();
	let mut all_match = true;
	for (digest, name) in &results {
		writeln!(stdout, "{digest}  {name}")?;
		if let Some(expected) = &args.check {
			let matched = digest.matches_hex(expected);
			all_match &= matched;
			writeln!(stdout, "{name}: {}", if matched { "OK" } else { "FAILED" })?;
		}
	}

	if let Some(output) = &args.output {
		let contents = results
			.iter()
			.map(|(digest, _)| format!("{digest}\n"))
			.collect::<String>();
		fs::write(output, contents)
			.with_context(|| format!("failed to write digest to {}", output.display()))?;
	}

	Ok(all_match)
}

fn run_keygen(args: &KeygenArgs) -> Result<()> {
	let policy = args.policy.policy()?;
	let key = policy.generate(&mut thread_rng(), args.length)?;
	println!("{key}");
	Ok(())
}

fn main() -> Result<ExitCode> {
	adjust_thread_pool()
		.as_ref()
		.expect("failed to init thread pool");

	let cli = Cli::parse();

	init_tracing();

	match &cli.command {
		Some(Command::Keygen(args)) => {
			run_keygen(args)?;
			Ok(ExitCode::SUCCESS)
		}
		None => {
			let all_match = run_hash(&cli.hash)?;
			Ok(if all_match {
				ExitCode::SUCCESS
			} else {
				ExitCode::FAILURE
			})
		}
	}
}
