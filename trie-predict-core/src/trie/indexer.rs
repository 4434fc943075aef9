use std::sync::mpsc;
use std::thread;

use log::debug;

use super::config::{EmptyTokenPolicy, IndexerConfig};
use super::node::TrieNode;
use crate::error::TrieError;

/// Normalizes a raw corpus token into a word.
///
/// Every character that is not an ASCII letter is dropped and the rest is
/// lowercased. The result may be empty (`"--"`, `"1984"`).
pub fn normalize_word(raw: &str) -> String {
	raw.chars()
		.filter(char::is_ascii_alphabetic)
		.map(|ch| ch.to_ascii_lowercase())
		.collect()
}

/// Whether the raw (unstripped) token closes a sentence.
pub fn ends_sentence(raw: &str, terminators: &[char]) -> bool {
	raw.chars().next_back().is_some_and(|last| terminators.contains(&last))
}

/// Bigram context carried from one token to the next.
///
/// `previous_word` is `None` at the start of the corpus and right after a
/// sentence terminal token; no successor link is recorded from it then.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndexerState {
	previous_word: Option<String>,
}

impl IndexerState {
	pub fn previous_word(&self) -> Option<&str> {
		self.previous_word.as_deref()
	}
}

/// Counters collected while indexing, reported in build logs.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
	/// Raw tokens read.
	pub tokens: usize,
	/// Tokens that ended a sentence.
	pub sentence_breaks: usize,
	/// Letterless tokens ignored under `EmptyTokenPolicy::Skip`.
	pub skipped: usize,
}

impl IndexStats {
	fn absorb(&mut self, other: IndexStats) {
		self.tokens += other.tokens;
		self.sentence_breaks += other.sentence_breaks;
		self.skipped += other.skipped;
	}
}

/// Drives insertion of raw tokens into a root trie and its successor tries.
///
/// # Behavior
/// For each raw token:
/// - Inserts the normalized word into the root trie
/// - Inserts it into the previous word's subtrie (created on demand)
/// - Remembers it as the previous word
/// - Forgets the previous word when the raw token ends a sentence
pub struct Indexer<'a> {
	root: &'a mut TrieNode,
	config: &'a IndexerConfig,
	state: IndexerState,
	stats: IndexStats,
}

impl<'a> Indexer<'a> {
	pub fn new(root: &'a mut TrieNode, config: &'a IndexerConfig) -> Self {
		Self {
			root,
			config,
			state: IndexerState::default(),
			stats: IndexStats::default(),
		}
	}

	/// Current bigram context.
	pub fn state(&self) -> &IndexerState {
		&self.state
	}

	/// Processes one raw token.
	///
	/// # Errors
	/// Normalized words only hold `a..=z`, so insertion cannot fail in
	/// practice; the error is propagated rather than assumed away.
	pub fn feed(&mut self, raw: &str) -> Result<(), TrieError> {
		self.stats.tokens += 1;
		let word = normalize_word(raw);

		if word.is_empty() && self.config.empty_tokens == EmptyTokenPolicy::Skip {
			// No link bridges a skipped token
			self.state.previous_word = None;
			self.stats.skipped += 1;
		} else {
			self.root.insert(&word)?;
			if let Some(previous) = &self.state.previous_word {
				self.root.path_or_insert(previous)?.subtrie_or_insert().insert(&word)?;
			}
			self.state.previous_word = Some(word);
		}

		if ends_sentence(raw, self.config.sentence_terminators()) {
			self.state.previous_word = None;
			self.stats.sentence_breaks += 1;
		}
		Ok(())
	}

	/// Ends indexing and returns the collected counters.
	pub fn finish(self) -> IndexStats {
		self.stats
	}
}

/// Indexes every token of `tokens` into `root`.
pub fn index_tokens<'t, I>(root: &mut TrieNode, config: &IndexerConfig, tokens: I) -> Result<IndexStats, TrieError>
where
	I: IntoIterator<Item = &'t str>,
{
	let mut indexer = Indexer::new(root, config);
	for token in tokens {
		indexer.feed(token)?;
	}
	Ok(indexer.finish())
}

/// Groups raw tokens into sentences, each ending with a terminal token.
///
/// The trailing group may lack a terminator. No bigram link crosses two
/// groups, so groups can be indexed independently and merged.
pub fn split_sentences(tokens: Vec<String>, terminators: &[char]) -> Vec<Vec<String>> {
	let mut sentences = Vec::new();
	let mut current = Vec::new();
	for token in tokens {
		let closes = ends_sentence(&token, terminators);
		current.push(token);
		if closes {
			sentences.push(std::mem::take(&mut current));
		}
	}
	if !current.is_empty() {
		sentences.push(current);
	}
	sentences
}

/// Builds a trie from `tokens` on several threads.
///
/// # Behavior
/// - Splits tokens into sentences (see `split_sentences`)
/// - Splits sentences into `cpus * chunk_factor` chunks
/// - Spawns one thread per chunk, each indexing into its own partial trie
/// - Merges the partial tries as they arrive over an MPSC channel
///
/// The merged trie equals the one built sequentially from the same tokens.
pub fn index_parallel(tokens: Vec<String>, config: &IndexerConfig) -> Result<(TrieNode, IndexStats), TrieError> {
	config.validate()?;

	let sentences = split_sentences(tokens, config.sentence_terminators());
	let mut root = TrieNode::new();
	let mut stats = IndexStats::default();
	if sentences.is_empty() {
		return Ok((root, stats));
	}

	let chunks = num_cpus::get() * config.chunk_factor();
	let chunk_size = sentences.len().div_ceil(chunks).max(1);

	let (tx, rx) = mpsc::channel();
	let mut workers = Vec::new();
	for (chunk_index, chunk) in sentences.chunks(chunk_size).enumerate() {
		let tx = tx.clone();
		let chunk: Vec<Vec<String>> = chunk.to_vec();
		let config = config.clone();

		workers.push(thread::spawn(move || {
			let mut partial = TrieNode::new();
			let result = index_tokens(&mut partial, &config, chunk.iter().flatten().map(String::as_str))
				.map(|stats| (partial, stats));
			// The receiver only hangs up after an error elsewhere
			let _ = tx.send((chunk_index, result));
		}));
	}
	drop(tx);

	let mut received = 0;
	for (chunk_index, result) in rx.iter() {
		let (partial, partial_stats) = result?;
		debug!("merging chunk {chunk_index} ({} tokens)", partial_stats.tokens);
		root.merge(partial);
		stats.absorb(partial_stats);
		received += 1;
	}

	let expected = workers.len();
	for worker in workers {
		worker
			.join()
			.map_err(|_| TrieError::Worker("indexing thread panicked".to_owned()))?;
	}
	if received != expected {
		return Err(TrieError::Worker(format!("{received} of {expected} chunks reported")));
	}

	Ok((root, stats))
}
