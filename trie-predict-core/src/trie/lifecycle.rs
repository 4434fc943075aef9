use super::node::TrieNode;

impl TrieNode {
	/// Releases this node and everything it owns, returning how many nodes were released.
	///
	/// Post-order: the 26 children first (absent ones skipped), then the
	/// subtrie, then the node itself. Each node is released exactly once.
	pub fn destroy(mut self) -> usize {
		let mut released = 0;
		for slot in self.children.iter_mut() {
			if let Some(child) = slot.take() {
				released += (*child).destroy();
			}
		}
		if let Some(subtrie) = self.subtrie.take() {
			released += (*subtrie).destroy();
		}
		drop(self);
		released + 1
	}
}

/// Destroys an optional subtree; an absent node is a no-op releasing nothing.
pub fn destroy(root: Option<Box<TrieNode>>) -> usize {
	root.map_or(0, |root| (*root).destroy())
}
