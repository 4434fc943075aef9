use crate::error::TrieError;

/// What the indexer does with a raw token that holds no letters (`"--"`, `"42"`).
///
/// # Variants
/// - `Skip`: do not insert it, and forget the previous word so no link
///   bridges it. Keeps the root free of a count and of a subtrie.
/// - `Insert`: insert the empty word as-is. The root gains a count and, when
///   the empty word precedes another word, a successor trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyTokenPolicy {
	#[default]
	Skip,
	Insert,
}

/// Parameters for building a `WordTrie` from a corpus.
///
/// # Responsibilities
/// - Choose how letterless tokens are handled (`empty_tokens`)
/// - Define which trailing characters close a sentence
/// - Size the work split of parallel builds
///
/// # Invariants
/// - `sentence_terminators` is non-empty and holds no whitespace
/// - `chunk_factor >= 1`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
	/// Handling of tokens that normalize to the empty word.
	pub empty_tokens: EmptyTokenPolicy,

	/// A raw token ending with one of these closes the current sentence.
	sentence_terminators: Vec<char>,

	/// Parallel builds split the corpus into `cpus * chunk_factor` chunks.
	chunk_factor: usize,
}

impl Default for IndexerConfig {
	fn default() -> Self {
		Self {
			empty_tokens: EmptyTokenPolicy::Skip,
			sentence_terminators: vec!['.', '!', '?'],
			chunk_factor: 8,
		}
	}
}

impl IndexerConfig {
	/// Returns the sentence terminal characters.
	pub fn sentence_terminators(&self) -> &[char] {
		&self.sentence_terminators
	}

	/// Returns the number of parallel chunks per CPU.
	pub fn chunk_factor(&self) -> usize {
		self.chunk_factor
	}

	/// Replaces the sentence terminal characters.
	///
	/// # Errors
	/// Returns an error if `terminators` is empty or contains whitespace
	/// (raw tokens never end with whitespace).
	pub fn set_sentence_terminators(&mut self, terminators: &[char]) -> Result<(), TrieError> {
		Self::check_terminators(terminators)?;
		self.sentence_terminators = terminators.to_vec();
		Ok(())
	}

	/// Sets the number of parallel chunks per CPU.
	///
	/// # Errors
	/// Returns an error if `chunk_factor` is 0.
	pub fn set_chunk_factor(&mut self, chunk_factor: usize) -> Result<(), TrieError> {
		if chunk_factor == 0 {
			return Err(TrieError::InvalidConfig("chunk_factor must be >= 1".to_owned()));
		}
		self.chunk_factor = chunk_factor;
		Ok(())
	}

	/// Checks the invariants.
	pub fn validate(&self) -> Result<(), TrieError> {
		Self::check_terminators(&self.sentence_terminators)?;
		if self.chunk_factor == 0 {
			return Err(TrieError::InvalidConfig("chunk_factor must be >= 1".to_owned()));
		}
		Ok(())
	}

	fn check_terminators(terminators: &[char]) -> Result<(), TrieError> {
		if terminators.is_empty() {
			return Err(TrieError::InvalidConfig("at least one sentence terminator is required".to_owned()));
		}
		if let Some(ch) = terminators.iter().find(|ch| ch.is_whitespace()) {
			return Err(TrieError::InvalidConfig(format!("whitespace {ch:?} cannot terminate a sentence")));
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_follow_corpus_punctuation() {
		let config = IndexerConfig::default();
		assert_eq!(config.empty_tokens, EmptyTokenPolicy::Skip);
		assert_eq!(config.sentence_terminators(), &['.', '!', '?']);
		assert_eq!(config.chunk_factor(), 8);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn setters_reject_invalid_values() {
		let mut config = IndexerConfig::default();
		assert!(config.set_chunk_factor(0).is_err());
		assert!(config.set_sentence_terminators(&[]).is_err());
		assert!(config.set_sentence_terminators(&['.', ' ']).is_err());
		assert_eq!(config, IndexerConfig::default());

		config.set_sentence_terminators(&[';']).unwrap();
		config.set_chunk_factor(2).unwrap();
		assert_eq!(config.sentence_terminators(), &[';']);
		assert_eq!(config.chunk_factor(), 2);
	}

	#[test]
	fn only_setters_change_a_config() {
		let mut config = IndexerConfig::default();
		config.set_chunk_factor(3).unwrap();
		let copy = config.clone();
		assert_eq!(copy, config);
		assert!(copy.validate().is_ok());
		assert_eq!(copy.chunk_factor(), 3);
	}
}
