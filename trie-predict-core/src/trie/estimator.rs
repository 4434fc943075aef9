//! Node budget estimation for a prospective insertion.
//!
//! Two flavours are provided:
//! - `new_nodes_required` walks the real trie and allocates the missing path
//!   nodes as it counts them. Counts are left untouched, so no word becomes
//!   stored, but the structure does grow. Callers sharing a trie must hold it
//!   exclusively for this call.
//! - `count_new_nodes` computes the same number without touching the trie.
//!
//! Both read `word` leniently: non-alphabetic characters are skipped, letters
//! are lowercased, and an alphabetic character that does not fold into
//! `a..=z` (`é`, `ß`) makes the whole estimate 0.

use super::node::{letter_index, TrieNode};

/// Slot indices of the letters in `word`, `None` if one cannot be indexed.
fn estimate_path(word: &str) -> Option<Vec<usize>> {
	let mut path = Vec::with_capacity(word.len());
	for ch in word.chars().filter(|ch| ch.is_alphabetic()) {
		for folded in ch.to_lowercase() {
			path.push(letter_index(folded)?);
		}
	}
	Some(path)
}

/// Counts and allocates the nodes needed to insert `word` below `root`.
///
/// With no `root`, a scratch root is allocated and counted as well; it is
/// dropped on return. An empty `word` needs no node at all.
pub fn new_nodes_required(root: Option<&mut TrieNode>, word: &str) -> usize {
	if word.is_empty() {
		return 0;
	}
	let Some(path) = estimate_path(word) else {
		return 0;
	};

	let mut scratch;
	let (mut node, mut created) = match root {
		Some(root) => (root, 0),
		None => {
			scratch = TrieNode::new();
			(&mut scratch, 1)
		}
	};

	for index in path {
		let (child, fresh) = node.child_or_insert(index);
		created += usize::from(fresh);
		node = child;
	}
	created
}

/// Same count as `new_nodes_required`, leaving the trie unchanged.
pub fn count_new_nodes(root: Option<&TrieNode>, word: &str) -> usize {
	if word.is_empty() {
		return 0;
	}
	let Some(path) = estimate_path(word) else {
		return 0;
	};
	let Some(mut node) = root else {
		return 1 + path.len();
	};

	for (depth, index) in path.iter().enumerate() {
		match node.children[*index].as_deref() {
			Some(child) => node = child,
			None => return path.len() - depth,
		}
	}
	0
}

#[cfg(test)]
mod tests {
	use super::*;

	fn root_with(words: &[&str]) -> TrieNode {
		let mut root = TrieNode::new();
		for word in words {
			root.insert(word).unwrap();
		}
		root
	}

	#[test]
	fn counts_only_missing_nodes() {
		let mut root = root_with(&["cat"]);
		assert_eq!(count_new_nodes(Some(&root), "cats"), 1);
		assert_eq!(new_nodes_required(Some(&mut root), "cats"), 1);
		// Path now exists
		assert_eq!(new_nodes_required(Some(&mut root), "cats"), 0);
		assert_eq!(count_new_nodes(Some(&root), "dog"), 3);
	}

	#[test]
	fn allocation_does_not_store_words() {
		let mut root = root_with(&["cat"]);
		new_nodes_required(Some(&mut root), "catalog");
		assert!(!root.contains("catalog"));
		assert_eq!(root.word_count(), 1);
		assert_eq!(root.node_count(), 8);
	}

	#[test]
	fn dry_run_leaves_trie_untouched() {
		let root = root_with(&["cat"]);
		let nodes = root.node_count();
		assert_eq!(count_new_nodes(Some(&root), "dogma"), 5);
		assert_eq!(root.node_count(), nodes);
	}

	#[test]
	fn missing_root_counts_scratch_root() {
		assert_eq!(new_nodes_required(None, "hi"), 3);
		assert_eq!(count_new_nodes(None, "hi"), 3);
		assert_eq!(new_nodes_required(None, "42"), 1);
	}

	#[test]
	fn skips_punctuation_and_folds_case() {
		let mut root = root_with(&["dont"]);
		assert_eq!(new_nodes_required(Some(&mut root), "Don't"), 0);
		assert_eq!(count_new_nodes(Some(&root), "DON'T!"), 0);
	}

	#[test]
	fn unfoldable_letter_reports_zero() {
		let mut root = TrieNode::new();
		assert_eq!(new_nodes_required(Some(&mut root), "café"), 0);
		assert_eq!(count_new_nodes(Some(&root), "café"), 0);
		assert!(root.is_empty());
		assert_eq!(new_nodes_required(None, ""), 0);
	}

	#[test]
	fn both_flavours_agree() {
		let words = ["the", "then", "there", "cat", "catalog", "x", "Zebra!"];
		let mut real = root_with(&["the", "cat"]);
		for word in words {
			let expected = count_new_nodes(Some(&real), word);
			assert_eq!(new_nodes_required(Some(&mut real), word), expected, "{word}");
		}
	}
}
