use std::io::{BufRead, Cursor};
use std::path::Path;
use std::time::Instant;

use log::info;

use super::config::IndexerConfig;
use super::estimator;
use super::indexer::{self, IndexStats, Indexer};
use super::node::TrieNode;
use super::query::{self, DumpFormat, WordCount};
use crate::error::TrieError;
use crate::io;

/// A word trie built from a corpus, with per-word successor tries.
///
/// # Lifecycle
/// - Built once (`build`, `build_parallel`, `from_reader`, `from_text`)
/// - Queried read-only; queries take `&self` and may run concurrently
/// - Released with `destroy` (or simply dropped)
///
/// `new_nodes_required` is the one operation that mutates after the build;
/// it takes `&mut self` so the borrow checker serializes it.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct WordTrie {
	root: TrieNode,
}

impl WordTrie {
	/// Creates an empty trie.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builds a trie from the corpus file at `path` with the default configuration.
	///
	/// # Errors
	/// Returns `TrieError::SourceUnavailable` if the file cannot be opened or read.
	pub fn build<P: AsRef<Path>>(path: P) -> Result<Self, TrieError> {
		Self::build_with_config(path, &IndexerConfig::default())
	}

	/// Builds a trie from the corpus file at `path`, single-threaded.
	pub fn build_with_config<P: AsRef<Path>>(path: P, config: &IndexerConfig) -> Result<Self, TrieError> {
		let name = path.as_ref().display().to_string();
		let reader = io::open_source(&path)?;
		Self::from_named_reader(reader, &name, config)
	}

	/// Builds a trie from the corpus file at `path`, indexing sentences on all CPUs.
	///
	/// Produces the same trie as `build_with_config`.
	pub fn build_parallel<P: AsRef<Path>>(path: P, config: &IndexerConfig) -> Result<Self, TrieError> {
		let started = Instant::now();
		let tokens = io::read_file_tokens(&path)?;
		let (root, stats) = indexer::index_parallel(tokens, config)?;
		let trie = Self { root };
		trie.log_build(&path.as_ref().display().to_string(), stats, started);
		Ok(trie)
	}

	/// Builds a trie from any buffered reader.
	pub fn from_reader<R: BufRead>(reader: R, config: &IndexerConfig) -> Result<Self, TrieError> {
		Self::from_named_reader(reader, "<reader>", config)
	}

	/// Builds a trie from in-memory text.
	pub fn from_text(text: &str, config: &IndexerConfig) -> Result<Self, TrieError> {
		Self::from_named_reader(Cursor::new(text), "<text>", config)
	}

	fn from_named_reader<R: BufRead>(reader: R, name: &str, config: &IndexerConfig) -> Result<Self, TrieError> {
		config.validate()?;
		let started = Instant::now();

		let mut root = TrieNode::new();
		let mut indexer = Indexer::new(&mut root, config);
		let mut failure = None;
		io::for_each_token(reader, name, |token| {
			if failure.is_none() {
				failure = indexer.feed(token).err();
			}
		})?;
		if let Some(err) = failure {
			return Err(err);
		}
		let stats = indexer.finish();

		let trie = Self { root };
		trie.log_build(name, stats, started);
		Ok(trie)
	}

	fn log_build(&self, name: &str, stats: IndexStats, started: Instant) {
		info!(
			"indexed {name}: {} tokens, {} sentence breaks, {} skipped, {} words, {} nodes in {:?}",
			stats.tokens,
			stats.sentence_breaks,
			stats.skipped,
			self.word_count(),
			self.node_count(),
			started.elapsed()
		);
	}

	/// Root of the top-level trie.
	pub fn root(&self) -> &TrieNode {
		&self.root
	}

	/// Whether `word` was inserted at least once.
	pub fn contains(&self, word: &str) -> bool {
		self.root.contains(word)
	}

	/// Node of the stored word `word`.
	pub fn lookup(&self, word: &str) -> Option<&TrieNode> {
		self.root.lookup(word)
	}

	/// Node reached by `prefix`, stored word or not.
	pub fn prefix_subtree(&self, prefix: &str) -> Option<&TrieNode> {
		self.root.prefix_subtree(prefix)
	}

	/// Corpus occurrences of all words starting with `prefix`.
	pub fn prefix_count(&self, prefix: &str) -> usize {
		self.root.prefix_count(prefix)
	}

	/// All stored words in lexicographic order.
	pub fn enumerate(&self) -> Vec<WordCount> {
		self.root.enumerate(DumpFormat::Primary)
	}

	/// Successor distribution of `word`, `None` if unknown or never followed.
	pub fn successors(&self, word: &str) -> Option<&TrieNode> {
		self.lookup(word)?.subtrie()
	}

	/// Most frequent word observed right after `word`.
	pub fn most_likely_next(&self, word: &str) -> Option<String> {
		self.successors(word).map(TrieNode::most_frequent_word)
	}

	/// Extends `seed` with up to `steps` most likely successors.
	///
	/// # Behavior
	/// - Unknown `seed`: returns `[seed]` unmodified
	/// - Otherwise appends the most frequent successor of the current word,
	///   then continues from that word's node in the top-level trie
	/// - Stops early at a word with no successor trie
	///
	/// The result holds between 1 and `steps + 1` words.
	pub fn predict_chain(&self, seed: &str, steps: usize) -> Vec<String> {
		let mut chain = vec![seed.to_owned()];
		let Some(mut node) = self.lookup(seed) else {
			return chain;
		};

		for step in 1..=steps {
			let Some(subtrie) = node.subtrie() else {
				break;
			};
			let word = query::most_frequent_word(Some(subtrie));
			let next = self.lookup(&word);
			chain.push(if step == steps { word } else { word.to_lowercase() });

			match next {
				Some(next) => node = next,
				None => break,
			}
		}
		chain
	}

	/// Counts the nodes inserting `word` would allocate, and allocates them.
	///
	/// See `estimator::new_nodes_required`; no word becomes stored.
	pub fn new_nodes_required(&mut self, word: &str) -> usize {
		estimator::new_nodes_required(Some(&mut self.root), word)
	}

	/// Counts the nodes inserting `word` would allocate, without allocating.
	pub fn count_new_nodes(&self, word: &str) -> usize {
		estimator::count_new_nodes(Some(&self.root), word)
	}

	/// Nodes reachable from the root, subtries included.
	pub fn node_count(&self) -> usize {
		self.root.node_count()
	}

	/// Distinct stored words.
	pub fn word_count(&self) -> usize {
		self.root.word_count()
	}

	/// Total corpus occurrences of stored words.
	pub fn total_count(&self) -> usize {
		self.root.total_count()
	}

	/// Releases the whole structure, returning the number of nodes released.
	pub fn destroy(self) -> usize {
		self.root.destroy()
	}
}
