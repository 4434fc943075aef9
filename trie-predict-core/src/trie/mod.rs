//! Top-level module for the word prediction trie.
//!
//! This module provides a letter trie with per-word successor tries, including:
//! - The node type and its allocation primitives (`TrieNode`)
//! - Corpus ingestion with sentence-aware bigram links (`indexer`)
//! - Indexing parameters (`IndexerConfig`)
//! - Read-only queries over any node (`query`)
//! - Node budget estimation (`estimator`)
//! - Explicit post-order teardown (`lifecycle`)
//! - A high-level handle tying it together (`WordTrie`)

/// Trie node with 26 letter slots, an occurrence count and a lazy successor trie.
pub mod node;

/// Corpus tokenization, normalization and insertion (sequential and parallel).
pub mod indexer;

/// Indexing parameters: empty token policy, sentence terminators, parallel chunking.
pub mod config;

/// Exact lookups, prefix walks, enumeration and most-frequent-word selection.
pub mod query;

/// Counts the nodes an insertion would allocate.
pub mod estimator;

/// Recursive teardown reporting how many nodes were released.
pub mod lifecycle;

/// High-level trie handle: build, query, predict, destroy.
pub mod word_trie;
