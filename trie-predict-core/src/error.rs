use std::io;

use thiserror::Error;

/// Errors returned by indexing, configuration and command processing.
///
/// A missing word is not an error: lookups and prefix walks return `None`.
#[derive(Error, Debug)]
pub enum TrieError {
	/// The corpus or command source could not be opened or read.
	#[error("source unavailable: {name}: {source}")]
	SourceUnavailable {
		name: String,
		#[source]
		source: io::Error,
	},

	/// A character outside `a..=z` reached the insertion path.
	#[error("invalid character {ch:?} in word {word:?}")]
	InvalidCharacter { word: String, ch: char },

	/// The command stream ended mid-command or carried a bad argument.
	#[error("malformed command: {0}")]
	MalformedCommand(String),

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	/// A parallel build worker stopped before reporting its partial trie.
	#[error("worker failed: {0}")]
	Worker(String),
}
