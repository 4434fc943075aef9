//! Randomised checks against a `HashMap` oracle.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use trie_predict_core::trie::config::IndexerConfig;
use trie_predict_core::trie::indexer::normalize_word;
use trie_predict_core::trie::node::TrieNode;
use trie_predict_core::trie::word_trie::WordTrie;

const VOCABULARY: &[&str] = &[
	"a", "an", "and", "ant", "be", "bee", "been", "cat", "Cats", "dog", "do", "door", "the", "then", "there",
];
const PUNCTUATION: &[&str] = &["", "", "", ",", ".", "!", "?", "\""];

/// Oracle: word counts and successor counts, computed directly from tokens.
struct Oracle {
	words: BTreeMap<String, usize>,
	successors: HashMap<String, BTreeMap<String, usize>>,
}

fn random_corpus(rng: &mut StdRng, tokens: usize) -> String {
	(0..tokens)
		.map(|_| {
			let word = VOCABULARY[rng.random_range(0..VOCABULARY.len())];
			let punctuation = PUNCTUATION[rng.random_range(0..PUNCTUATION.len())];
			format!("{word}{punctuation}")
		})
		.collect::<Vec<_>>()
		.join(" ")
}

fn oracle(text: &str) -> Oracle {
	let mut words = BTreeMap::new();
	let mut successors: HashMap<String, BTreeMap<String, usize>> = HashMap::new();
	let mut previous: Option<String> = None;
	for raw in text.split_whitespace() {
		let word = normalize_word(raw);
		*words.entry(word.clone()).or_insert(0) += 1;
		if let Some(previous) = &previous {
			*successors.entry(previous.clone()).or_default().entry(word.clone()).or_insert(0) += 1;
		}
		previous = Some(word);
		if raw.ends_with(|ch: char| matches!(ch, '.' | '!' | '?')) {
			previous = None;
		}
	}
	Oracle { words, successors }
}

#[test]
fn trie_matches_oracle() {
	let mut rng = StdRng::seed_from_u64(7);
	for _ in 0..20 {
		let text = random_corpus(&mut rng, 200);
		let trie = WordTrie::from_text(&text, &IndexerConfig::default()).unwrap();
		let expected = oracle(&text);

		// Counts and membership
		for (word, count) in &expected.words {
			assert_eq!(trie.lookup(word).map(TrieNode::count), Some(*count), "{word}");
		}
		for candidate in VOCABULARY {
			let word = normalize_word(candidate);
			assert_eq!(trie.contains(&word), expected.words.contains_key(&word));
		}

		// Enumeration is sorted, unique and agrees with lookups
		let listed: Vec<(String, usize)> = trie.enumerate().into_iter().map(|wc| (wc.word, wc.count)).collect();
		let oracle_listed: Vec<(String, usize)> = expected.words.clone().into_iter().collect();
		assert_eq!(listed, oracle_listed);

		// Prefix counts
		for prefix in ["", "a", "an", "b", "be", "c", "d", "do", "t", "the", "x"] {
			let sum: usize = expected.words.iter().filter(|(w, _)| w.starts_with(prefix)).map(|(_, c)| c).sum();
			assert_eq!(trie.prefix_count(prefix), sum, "{prefix}");
		}

		// Successor distributions and most likely next word
		for (word, next) in &expected.successors {
			let best = next
				.iter()
				.max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
				.map(|(w, _)| w.clone());
			assert_eq!(trie.most_likely_next(word), best, "{word}");
		}
	}
}

#[test]
fn chains_respect_length_bound() {
	let mut rng = StdRng::seed_from_u64(11);
	for _ in 0..20 {
		let text = random_corpus(&mut rng, 100);
		let trie = WordTrie::from_text(&text, &IndexerConfig::default()).unwrap();
		let expected = oracle(&text);

		for seed in ["the", "cat", "do", "bee", "zebra"] {
			let steps = rng.random_range(0..6);
			let chain = trie.predict_chain(seed, steps);
			assert!(chain.len() <= steps + 1);
			assert_eq!(chain[0], seed);

			// Short chains end on a word nothing ever followed
			if chain.len() < steps + 1 && trie.contains(seed) {
				let last = chain.last().unwrap();
				assert!(!expected.successors.contains_key(last), "{seed}: {chain:?}");
			}
		}
	}
}

#[test]
fn destroy_releases_all_nodes() {
	let mut rng = StdRng::seed_from_u64(3);
	let text = random_corpus(&mut rng, 500);
	let trie = WordTrie::from_text(&text, &IndexerConfig::default()).unwrap();
	let nodes = trie.node_count();
	assert_eq!(trie.destroy(), nodes);
}
