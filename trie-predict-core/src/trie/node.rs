use std::array;
#[cfg(test)]
use std::cell::Cell;

use crate::error::TrieError;

/// Number of branching letters (`a..=z`).
pub const ALPHABET_SIZE: usize = 26;

#[cfg(test)]
thread_local! {
	/// Nodes created on this thread minus nodes dropped on it.
	pub(crate) static LIVE_NODES: Cell<isize> = const { Cell::new(0) };
}

/// Maps a character to its child slot, folding ASCII uppercase first.
///
/// Returns `None` for anything outside `a..=z` after folding.
pub fn letter_index(ch: char) -> Option<usize> {
	let ch = ch.to_ascii_lowercase();
	if ch.is_ascii_lowercase() {
		Some((ch as u8 - b'a') as usize)
	} else {
		None
	}
}

/// Inverse of `letter_index` for slot numbers below `ALPHABET_SIZE`.
pub(crate) fn index_letter(index: usize) -> char {
	(b'a' + index as u8) as char
}

/// A node of the word trie.
///
/// The letter path from a trie root to a node spells a prefix. A node with a
/// positive `count` terminates a stored word and `count` is the number of
/// times that word was inserted.
///
/// A word node may own a `subtrie`: the root of an independent trie holding
/// the words observed immediately after this word in the corpus.
///
/// ## Invariants
/// - Children are keyed by `a..=z` only
/// - `count > 0` iff the path to this node was inserted at least once
/// - A `subtrie`, once created, is never removed
#[derive(Debug, PartialEq, Eq)]
pub struct TrieNode {
	pub(super) children: [Option<Box<TrieNode>>; ALPHABET_SIZE],
	pub(super) count: usize,
	pub(super) subtrie: Option<Box<TrieNode>>,
}

impl TrieNode {
	/// Creates an empty node: no children, zero count, no subtrie.
	pub fn new() -> Self {
		#[cfg(test)]
		LIVE_NODES.with(|live| live.set(live.get() + 1));

		Self {
			children: array::from_fn(|_| None),
			count: 0,
			subtrie: None,
		}
	}

	/// Occurrence count of the word ending here (0 for pure prefixes).
	pub fn count(&self) -> usize {
		self.count
	}

	/// Whether the path to this node spells a stored word.
	pub fn is_terminal(&self) -> bool {
		self.count > 0
	}

	/// Child reached through `letter`, case-insensitively.
	pub fn child(&self, letter: char) -> Option<&TrieNode> {
		self.children[letter_index(letter)?].as_deref()
	}

	/// Present children in alphabetical order.
	pub fn children(&self) -> impl Iterator<Item = (char, &TrieNode)> {
		self.children
			.iter()
			.enumerate()
			.filter_map(|(index, child)| child.as_deref().map(|node| (index_letter(index), node)))
	}

	/// Successor trie of the word ending here, if one was ever recorded.
	pub fn subtrie(&self) -> Option<&TrieNode> {
		self.subtrie.as_deref()
	}

	/// True when nothing is stored below or at this node.
	pub fn is_empty(&self) -> bool {
		self.count == 0 && self.subtrie.is_none() && self.children.iter().all(Option::is_none)
	}

	/// Returns the child in slot `index`, creating it if absent.
	///
	/// The flag tells whether a node was allocated.
	pub(crate) fn child_or_insert(&mut self, index: usize) -> (&mut TrieNode, bool) {
		let created = self.children[index].is_none();
		let child = self.children[index].get_or_insert_with(|| Box::new(TrieNode::new()));
		(&mut **child, created)
	}

	/// Returns the subtrie root, creating it on first use.
	pub(crate) fn subtrie_or_insert(&mut self) -> &mut TrieNode {
		let subtrie = self.subtrie.get_or_insert_with(|| Box::new(TrieNode::new()));
		&mut **subtrie
	}

	/// Walks `word` from this node, creating missing nodes, without touching counts.
	///
	/// # Errors
	/// Returns `TrieError::InvalidCharacter` before allocating anything if
	/// `word` holds a character outside `a..=z` (after ASCII folding).
	pub(crate) fn path_or_insert(&mut self, word: &str) -> Result<&mut TrieNode, TrieError> {
		let mut indices = Vec::with_capacity(word.len());
		for ch in word.chars() {
			let index = letter_index(ch).ok_or_else(|| TrieError::InvalidCharacter { word: word.to_owned(), ch })?;
			indices.push(index);
		}

		let mut node = self;
		for index in indices {
			node = node.child_or_insert(index).0;
		}
		Ok(node)
	}

	/// Inserts `word` below this node and increments its terminal count.
	pub(crate) fn insert(&mut self, word: &str) -> Result<(), TrieError> {
		self.path_or_insert(word)?.count += 1;
		Ok(())
	}

	/// Merges `other` into this node.
	///
	/// Counts are summed; children and subtries merge recursively, or are
	/// moved over when this node has none. Used to combine partial tries
	/// built from disjoint sentences.
	pub(crate) fn merge(&mut self, mut other: TrieNode) {
		self.count += other.count;

		for (index, slot) in other.children.iter_mut().enumerate() {
			if let Some(child) = slot.take() {
				match &mut self.children[index] {
					Some(existing) => existing.merge(*child),
					empty => *empty = Some(child),
				}
			}
		}

		if let Some(subtrie) = other.subtrie.take() {
			match &mut self.subtrie {
				Some(existing) => existing.merge(*subtrie),
				empty => *empty = Some(subtrie),
			}
		}
	}

	/// Number of nodes reachable from here, subtries included.
	pub fn node_count(&self) -> usize {
		1 + self.children().map(|(_, child)| child.node_count()).sum::<usize>()
			+ self.subtrie().map_or(0, TrieNode::node_count)
	}

	/// Number of distinct words stored in this trie (subtries excluded).
	pub fn word_count(&self) -> usize {
		usize::from(self.is_terminal()) + self.children().map(|(_, child)| child.word_count()).sum::<usize>()
	}

	/// Sum of all counts in this trie (subtries excluded).
	pub fn total_count(&self) -> usize {
		self.count + self.children().map(|(_, child)| child.total_count()).sum::<usize>()
	}
}

impl Default for TrieNode {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
impl Drop for TrieNode {
	fn drop(&mut self) {
		let _ = LIVE_NODES.try_with(|live| live.set(live.get() - 1));
	}
}
