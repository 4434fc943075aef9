//! Corpus-driven word prediction library.
//!
//! This crate provides a letter trie over the distinct words of a corpus,
//! where every word node carries a secondary trie of the words observed
//! immediately after it (a per-word bigram table). It includes:
//! - Corpus indexing with sentence-boundary-aware bigram construction
//! - Exact lookup, prefix walks and prefix-aggregated counts
//! - Deterministic most-frequent-word selection and prediction chains
//! - Node budget estimation and explicit recursive teardown
//! - A small command language matching the batch front-end output

/// Trie structure, corpus indexing and queries.
pub mod trie;

/// Command stream parsing and textual query rendering.
pub mod command;

/// Error type shared by the whole crate.
pub mod error;

/// I/O utilities (token streams, corpus discovery, path helpers).
pub mod io;
