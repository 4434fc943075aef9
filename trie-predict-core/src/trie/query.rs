use std::fmt;

use serde::{Deserialize, Serialize};

use super::node::TrieNode;

/// Marker prepended to every word when a successor trie is dumped.
pub const SUBTRIE_MARKER: &str = "- ";

/// Layout of an enumeration.
///
/// # Variants
/// - `Primary`: words as stored.
/// - `Subtrie`: words prefixed with `SUBTRIE_MARKER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpFormat {
	Primary,
	Subtrie,
}

impl DumpFormat {
	fn marker(self) -> &'static str {
		match self {
			DumpFormat::Primary => "",
			DumpFormat::Subtrie => SUBTRIE_MARKER,
		}
	}
}

/// A stored word and its occurrence count.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
	pub word: String,
	pub count: usize,
}

impl fmt::Display for WordCount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} ({})", self.word, self.count)
	}
}

/// Read-only queries, valid on a top-level root as well as on any subtrie root.
///
/// Every walk folds ASCII uppercase to lowercase; any other character
/// outside `a..=z` makes the walk miss.
impl TrieNode {
	/// Node reached by `prefix`, whether or not it terminates a word.
	pub fn prefix_subtree(&self, prefix: &str) -> Option<&TrieNode> {
		prefix.chars().try_fold(self, |node, ch| node.child(ch))
	}

	/// Node of the stored word `word`, `None` if the path breaks or ends on a pure prefix.
	pub fn lookup(&self, word: &str) -> Option<&TrieNode> {
		self.prefix_subtree(word).filter(|node| node.is_terminal())
	}

	/// Whether `word` itself was inserted at least once.
	pub fn contains(&self, word: &str) -> bool {
		self.lookup(word).is_some()
	}

	/// Corpus occurrences of all words starting with `prefix` (including `prefix` itself).
	pub fn prefix_count(&self, prefix: &str) -> usize {
		self.prefix_subtree(prefix).map_or(0, TrieNode::total_count)
	}

	/// Every stored word below this node with its count, in lexicographic order.
	///
	/// Children are visited `a` to `z` and a word is emitted before its
	/// extensions, which yields lexicographic order.
	pub fn enumerate(&self, format: DumpFormat) -> Vec<WordCount> {
		let mut words = Vec::new();
		let mut buffer = String::from(format.marker());
		self.collect_words(&mut buffer, &mut words);
		words
	}

	fn collect_words(&self, buffer: &mut String, words: &mut Vec<WordCount>) {
		if self.is_terminal() {
			words.push(WordCount { word: buffer.clone(), count: self.count });
		}
		for (letter, child) in self.children() {
			buffer.push(letter);
			child.collect_words(buffer, words);
			buffer.pop();
		}
	}

	/// Word with the highest count below this node.
	///
	/// Ties go to the lexicographically smallest word. Returns the empty
	/// string if nothing is stored.
	pub fn most_frequent_word(&self) -> String {
		let mut best = Best::default();
		let mut buffer = String::new();
		self.scan_most_frequent(&mut buffer, &mut best);
		best.word
	}

	fn scan_most_frequent(&self, buffer: &mut String, best: &mut Best) {
		if self.is_terminal()
			&& (self.count > best.count || (self.count == best.count && buffer.as_str() < best.word.as_str()))
		{
			best.count = self.count;
			best.word.clone_from(buffer);
		}
		for (letter, child) in self.children() {
			buffer.push(letter);
			child.scan_most_frequent(buffer, best);
			buffer.pop();
		}
	}
}

#[derive(Default)]
struct Best {
	count: usize,
	word: String,
}

/// `most_frequent_word` of an optional node; an absent node yields `""`.
pub fn most_frequent_word(node: Option<&TrieNode>) -> String {
	node.map(TrieNode::most_frequent_word).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn trie(words: &[(&str, usize)]) -> TrieNode {
		let mut root = TrieNode::new();
		for (word, count) in words {
			for _ in 0..*count {
				root.insert(word).unwrap();
			}
		}
		root
	}

	#[test]
	fn lookup_requires_terminal() {
		let root = trie(&[("dog", 1), ("cat", 2)]);
		assert_eq!(root.lookup("cat").map(TrieNode::count), Some(2));
		assert!(root.lookup("do").is_none());
		assert!(root.prefix_subtree("do").is_some());
		assert!(!root.contains("do"));
		assert!(root.contains("dog"));
	}

	#[test]
	fn walks_fold_case_and_reject_other_characters() {
		let root = trie(&[("dog", 1)]);
		assert!(root.contains("DoG"));
		assert!(root.lookup("dog!").is_none());
		assert!(root.prefix_subtree("d-").is_none());
		assert!(root.lookup("dogs").is_none());
	}

	#[test]
	fn empty_prefix_is_the_root() {
		let root = trie(&[("a", 1), ("b", 2)]);
		assert!(std::ptr::eq(root.prefix_subtree("").unwrap(), &root));
		assert_eq!(root.prefix_count(""), 3);
		assert!(!root.contains(""));
	}

	#[test]
	fn prefix_count_sums_subtree() {
		let root = trie(&[("sat", 2), ("sa", 1), ("saw", 3), ("sun", 5)]);
		assert_eq!(root.prefix_count("sa"), 6);
		assert_eq!(root.prefix_count("s"), 11);
		assert_eq!(root.prefix_count("sat"), 2);
		assert_eq!(root.prefix_count("x"), 0);
	}

	#[test]
	fn enumerate_is_lexicographic() {
		let root = trie(&[("dog", 1), ("do", 2), ("cat", 1), ("zebra", 4), ("a", 1)]);
		let words: Vec<String> = root.enumerate(DumpFormat::Primary).iter().map(ToString::to_string).collect();
		assert_eq!(words, vec!["a (1)", "cat (1)", "do (2)", "dog (1)", "zebra (4)"]);
	}

	#[test]
	fn subtrie_format_prefixes_marker() {
		let root = trie(&[("cat", 1)]);
		let words = root.enumerate(DumpFormat::Subtrie);
		assert_eq!(words, vec![WordCount { word: "- cat".to_owned(), count: 1 }]);
		assert_eq!(words[0].to_string(), "- cat (1)");
	}

	#[test]
	fn most_frequent_breaks_ties_lexicographically() {
		assert_eq!(trie(&[("dog", 1), ("cat", 1)]).most_frequent_word(), "cat");
		assert_eq!(trie(&[("dog", 2), ("cat", 1)]).most_frequent_word(), "dog");
		assert_eq!(trie(&[("ab", 3), ("a", 3), ("b", 3)]).most_frequent_word(), "a");
	}

	#[test]
	fn most_frequent_of_nothing_is_empty() {
		assert_eq!(TrieNode::new().most_frequent_word(), "");
		assert_eq!(most_frequent_word(None), "");
	}
}
