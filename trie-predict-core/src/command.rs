use crate::error::TrieError;
use crate::trie::query::DumpFormat;
use crate::trie::word_trie::WordTrie;

/// Printed by a prefix dump whose token is not a stored word.
pub const INVALID_STRING: &str = "(INVALID STRING)";

/// Printed by a prefix dump whose word has no recorded successor.
pub const EMPTY: &str = "(EMPTY)";

/// A query against a built `WordTrie`.
///
/// # Variants
/// - `DumpAll`: every stored word as `word (count)`, alphabetically.
/// - `Predict`: the seed word followed by up to `steps` predicted words.
/// - `PrefixDump`: the token, then its successor distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
	DumpAll,
	Predict { word: String, steps: usize },
	PrefixDump(String),
}

/// Parses a stream of whitespace-delimited command tokens, one command at a time.
///
/// - A token starting with `!` is `DumpAll`
/// - A token starting with `@` is `Predict`, reading the seed word and the
///   step count from the next two tokens; a negative count predicts nothing
/// - Any other token is `PrefixDump` of that token
///
/// A `@` whose count is not an integer yields `TrieError::MalformedCommand`
/// for that command only; parsing resumes with the following token. A `@`
/// cut short by the end of input yields the error last.
pub fn parse_commands<I, S>(tokens: I) -> Commands<I::IntoIter>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	Commands { tokens: tokens.into_iter() }
}

/// Iterator over the commands of a token stream, see `parse_commands`.
pub struct Commands<I> {
	tokens: I,
}

impl<I, S> Iterator for Commands<I>
where
	I: Iterator<Item = S>,
	S: AsRef<str>,
{
	type Item = Result<Command, TrieError>;

	fn next(&mut self) -> Option<Self::Item> {
		let token = self.tokens.next()?;
		let token = token.as_ref();

		let command = if token.starts_with('!') {
			Ok(Command::DumpAll)
		} else if token.starts_with('@') {
			self.predict()
		} else {
			Ok(Command::PrefixDump(token.to_owned()))
		};
		Some(command)
	}
}

impl<I, S> Commands<I>
where
	I: Iterator<Item = S>,
	S: AsRef<str>,
{
	/// Reads the `word n` arguments following a `@`.
	fn predict(&mut self) -> Result<Command, TrieError> {
		let word = self
			.tokens
			.next()
			.ok_or_else(|| TrieError::MalformedCommand("'@' needs a word and a count".to_owned()))?;
		let count = self
			.tokens
			.next()
			.ok_or_else(|| TrieError::MalformedCommand(format!("'@ {}' needs a count", word.as_ref())))?;
		let steps: i64 = count
			.as_ref()
			.parse()
			.map_err(|_| TrieError::MalformedCommand(format!("invalid count {:?}", count.as_ref())))?;

		Ok(Command::Predict {
			word: word.as_ref().to_owned(),
			steps: usize::try_from(steps).unwrap_or(0),
		})
	}
}

/// Renders the output lines of `command` against `trie`.
pub fn run_query(trie: &WordTrie, command: &Command) -> Vec<String> {
	match command {
		Command::DumpAll => trie.enumerate().iter().map(ToString::to_string).collect(),
		Command::Predict { word, steps } => vec![trie.predict_chain(word, *steps).join(" ")],
		Command::PrefixDump(token) => {
			let mut lines = vec![token.clone()];
			match trie.lookup(token) {
				None => lines.push(INVALID_STRING.to_owned()),
				Some(node) => match node.subtrie() {
					None => lines.push(EMPTY.to_owned()),
					Some(subtrie) => {
						lines.extend(subtrie.enumerate(DumpFormat::Subtrie).iter().map(ToString::to_string))
					}
				},
			}
			lines
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::trie::config::IndexerConfig;

	fn corpus() -> WordTrie {
		WordTrie::from_text("The cat sat. The dog sat. The cat ran!", &IndexerConfig::default()).unwrap()
	}

	#[test]
	fn parses_all_command_kinds() {
		let commands: Vec<Command> = parse_commands("! @ the 3 cat @ dog -2 !again".split_whitespace())
			.collect::<Result<_, _>>()
			.unwrap();
		assert_eq!(
			commands,
			vec![
				Command::DumpAll,
				Command::Predict { word: "the".to_owned(), steps: 3 },
				Command::PrefixDump("cat".to_owned()),
				Command::Predict { word: "dog".to_owned(), steps: 0 },
				Command::DumpAll,
			]
		);
	}

	#[test]
	fn truncated_predict_is_malformed() {
		let parsed: Vec<_> = parse_commands(["@", "the"]).collect();
		assert_eq!(parsed.len(), 1);
		assert!(matches!(parsed[0], Err(TrieError::MalformedCommand(_))));
		assert!(matches!(parse_commands(["@"]).next(), Some(Err(TrieError::MalformedCommand(_)))));
	}

	#[test]
	fn bad_count_only_affects_its_command() {
		let parsed: Vec<_> = parse_commands("! the @ dog x sat".split_whitespace()).collect();
		assert_eq!(parsed.len(), 4);
		assert!(matches!(parsed[0], Ok(Command::DumpAll)));
		assert!(matches!(&parsed[1], Ok(Command::PrefixDump(token)) if token == "the"));
		assert!(matches!(parsed[2], Err(TrieError::MalformedCommand(_))));
		assert!(matches!(&parsed[3], Ok(Command::PrefixDump(token)) if token == "sat"));

		let trie = corpus();
		let output: Vec<String> = parsed.iter().flatten().flat_map(|command| run_query(&trie, command)).collect();
		assert_eq!(output.first().map(String::as_str), Some("cat (2)"));
		assert!(output.contains(&"- cat (2)".to_owned()));
		assert_eq!(output.last().map(String::as_str), Some(EMPTY));
	}

	#[test]
	fn dump_all_lists_words() {
		let lines = run_query(&corpus(), &Command::DumpAll);
		assert_eq!(lines, vec!["cat (2)", "dog (1)", "ran (1)", "sat (2)", "the (3)"]);
	}

	#[test]
	fn predict_joins_chain() {
		let trie = corpus();
		let line = run_query(&trie, &Command::Predict { word: "the".to_owned(), steps: 2 });
		assert_eq!(line, vec!["the cat ran"]);
		let unknown = run_query(&trie, &Command::Predict { word: "Zebra".to_owned(), steps: 2 });
		assert_eq!(unknown, vec!["Zebra"]);
	}

	#[test]
	fn prefix_dump_outcomes() {
		let trie = corpus();
		assert_eq!(
			run_query(&trie, &Command::PrefixDump("the".to_owned())),
			vec!["the", "- cat (2)", "- dog (1)"]
		);
		assert_eq!(run_query(&trie, &Command::PrefixDump("sat".to_owned())), vec!["sat", EMPTY]);
		assert_eq!(run_query(&trie, &Command::PrefixDump("ca".to_owned())), vec!["ca", INVALID_STRING]);
		assert_eq!(run_query(&trie, &Command::PrefixDump("c4t".to_owned())), vec!["c4t", INVALID_STRING]);
	}
}
