use clap::Parser;
use log::info;

use trie_predict_core::command::{parse_commands, run_query};
use trie_predict_core::io::read_file_tokens;
use trie_predict_core::trie::config::{EmptyTokenPolicy, IndexerConfig};
use trie_predict_core::trie::word_trie::WordTrie;

/// Builds a word prediction trie from a corpus and runs a command file against it
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Corpus text file
    corpus: String,

    /// Command file: `!` dumps every word, `@ word n` predicts n words,
    /// any other token dumps the successors of that word
    commands: String,

    /// Index sentences on all CPUs
    #[arg(long)]
    parallel: bool,

    /// Insert letterless tokens as the empty word instead of skipping them
    #[arg(long)]
    keep_empty_tokens: bool,

    /// Chunks per CPU for --parallel
    #[arg(long, default_value_t = 8)]
    chunk_factor: usize,

    /// Verbose/info output (default: quiet)
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Debug output
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // RUST_LOG, when set, overrides the flags
    let level = if args.debug {
        "debug"
    } else if args.verbose {
        "info"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = IndexerConfig::default();
    config.set_chunk_factor(args.chunk_factor)?;
    if args.keep_empty_tokens {
        config.empty_tokens = EmptyTokenPolicy::Insert;
    }

    // Build phase
    let trie = if args.parallel {
        WordTrie::build_parallel(&args.corpus, &config)?
    } else {
        WordTrie::build_with_config(&args.corpus, &config)?
    };

    // Query phase, a malformed command is reported and skipped
    for command in parse_commands(read_file_tokens(&args.commands)?) {
        match command {
            Ok(command) => {
                for line in run_query(&trie, &command) {
                    println!("{line}");
                }
            }
            Err(e) => eprintln!("Skipping command: {e}"),
        }
    }

    // Teardown phase
    let released = trie.destroy();
    info!("released {released} nodes");

    Ok(())
}
