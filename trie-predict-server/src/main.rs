use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use log::{info, warn};
use serde::Deserialize;

use trie_predict_core::command::{run_query, Command};
use trie_predict_core::io::{get_filename, list_files, normalize_folder};
use trie_predict_core::trie::config::{EmptyTokenPolicy, IndexerConfig};
use trie_predict_core::trie::word_trie::WordTrie;

/// HTTP front-end serving word predictions from a corpus trie
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1")]
	bind: String,

	/// Port to listen on
	#[arg(long, default_value_t = 5000)]
	port: u16,

	/// Folder holding `*.txt` corpora
	#[arg(long, default_value = "./data")]
	data: String,

	/// Corpus file to index at startup
	#[arg(long)]
	corpus: Option<String>,
}

/// Query parameters for `/v1/load`
#[derive(Deserialize)]
struct LoadParams {
	name: Option<String>,
	parallel: Option<bool>,
	keep_empty: Option<bool>,
}

/// Query parameters for `/v1/predict`
#[derive(Deserialize)]
struct PredictParams {
	word: String,
	n: Option<usize>,
}

#[derive(Deserialize)]
struct WordQuery {
	word: String,
}

#[derive(Deserialize)]
struct PrefixQuery {
	prefix: String,
}

#[derive(Deserialize)]
struct TokenQuery {
	token: String,
}

struct SharedData {
	trie: WordTrie,
	name: Option<String>,
	data_dir: PathBuf,
}

type SharedTrie = web::Data<RwLock<SharedData>>;

impl LoadParams {
	fn config(&self) -> IndexerConfig {
		let mut config = IndexerConfig::default();
		if self.keep_empty.unwrap_or(false) {
			config.empty_tokens = EmptyTokenPolicy::Insert;
		}
		config
	}

	/// Corpus name, refusing anything that could leave the data folder.
	fn corpus_name(&self) -> Result<&str, String> {
		match self.name.as_deref().map(str::trim) {
			None | Some("") => Err("Missing or empty corpus name".to_owned()),
			Some(name) if name.contains(['/', '\\']) || name.contains("..") => {
				Err(format!("Invalid corpus name: {name}"))
			}
			Some(name) => Ok(name),
		}
	}
}

fn read_lock(data: &SharedTrie) -> Result<RwLockReadGuard<'_, SharedData>, HttpResponse> {
	data.read().map_err(|_| HttpResponse::InternalServerError().body("Trie lock failed"))
}

fn write_lock(data: &SharedTrie) -> Result<RwLockWriteGuard<'_, SharedData>, HttpResponse> {
	data.write().map_err(|_| HttpResponse::InternalServerError().body("Trie lock failed"))
}

/// HTTP GET endpoint `/v1/corpora`
///
/// Lists the corpus names available in the data folder, one per line.
#[get("/v1/corpora")]
async fn get_corpora(data: SharedTrie) -> impl Responder {
	let data_dir = match read_lock(&data) {
		Ok(shared) => shared.data_dir.clone(),
		Err(response) => return response,
	};
	match list_files(&data_dir, "txt") {
		Ok(files) => HttpResponse::Ok().body(files.join("\n").replace(".txt", "")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora"),
	}
}

#[get("/v1/loaded")]
async fn get_loaded(data: SharedTrie) -> impl Responder {
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().body(shared.name.clone().unwrap_or_default()),
		Err(response) => response,
	}
}

/// HTTP PUT endpoint `/v1/load`
///
/// Indexes `<data>/<name>.txt` off the async workers, then swaps it in under
/// the write lock. The previous trie is destroyed after the lock is released.
#[put("/v1/load")]
async fn put_load(data: SharedTrie, query: web::Query<LoadParams>) -> impl Responder {
	let name = match query.corpus_name() {
		Ok(name) => name.to_owned(),
		Err(e) => return HttpResponse::BadRequest().body(e),
	};
	let path = match read_lock(&data) {
		Ok(shared) => shared.data_dir.join(format!("{name}.txt")),
		Err(response) => return response,
	};

	let config = query.config();
	let parallel = query.parallel.unwrap_or(false);
	let built = web::block(move || {
		if parallel {
			WordTrie::build_parallel(&path, &config)
		} else {
			WordTrie::build_with_config(&path, &config)
		}
	})
	.await;

	let trie = match built {
		Ok(Ok(trie)) => trie,
		Ok(Err(e)) => return HttpResponse::NotFound().body(format!("Failed to load corpus: {e}")),
		Err(_) => return HttpResponse::InternalServerError().body("Indexing task failed"),
	};

	let previous = {
		let mut shared = match write_lock(&data) {
			Ok(shared) => shared,
			Err(response) => return response,
		};
		shared.name = Some(name.clone());
		std::mem::replace(&mut shared.trie, trie)
	};
	let released = previous.destroy();
	info!("loaded corpus {name}, released {released} nodes of the previous trie");

	HttpResponse::Ok().body("Corpus loaded successfully")
}

#[get("/v1/dump")]
async fn get_dump(data: SharedTrie) -> impl Responder {
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().body(run_query(&shared.trie, &Command::DumpAll).join("\n")),
		Err(response) => response,
	}
}

/// HTTP GET endpoint `/v1/words`
///
/// Every stored word with its count, as a JSON array.
#[get("/v1/words")]
async fn get_words(data: SharedTrie) -> impl Responder {
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().json(shared.trie.enumerate()),
		Err(response) => response,
	}
}

/// HTTP GET endpoint `/v1/predict`
///
/// Returns the seed word followed by up to `n` (default 1) predicted words.
#[get("/v1/predict")]
async fn get_predict(data: SharedTrie, query: web::Query<PredictParams>) -> impl Responder {
	let command = Command::Predict {
		word: query.word.clone(),
		steps: query.n.unwrap_or(1),
	};
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().body(run_query(&shared.trie, &command).join("\n")),
		Err(response) => response,
	}
}

#[get("/v1/prefix_dump")]
async fn get_prefix_dump(data: SharedTrie, query: web::Query<TokenQuery>) -> impl Responder {
	let command = Command::PrefixDump(query.token.clone());
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().body(run_query(&shared.trie, &command).join("\n")),
		Err(response) => response,
	}
}

#[get("/v1/contains")]
async fn get_contains(data: SharedTrie, query: web::Query<WordQuery>) -> impl Responder {
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().body(shared.trie.contains(&query.word).to_string()),
		Err(response) => response,
	}
}

#[get("/v1/prefix_count")]
async fn get_prefix_count(data: SharedTrie, query: web::Query<PrefixQuery>) -> impl Responder {
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().body(shared.trie.prefix_count(&query.prefix).to_string()),
		Err(response) => response,
	}
}

/// HTTP GET endpoint `/v1/next`
///
/// Most frequent successor of `word`, 404 if the word is unknown or was
/// never followed by another word.
#[get("/v1/next")]
async fn get_next(data: SharedTrie, query: web::Query<WordQuery>) -> impl Responder {
	let shared = match read_lock(&data) {
		Ok(shared) => shared,
		Err(response) => return response,
	};
	match shared.trie.most_likely_next(&query.word) {
		Some(next) => HttpResponse::Ok().body(next),
		None => HttpResponse::NotFound().body(format!("No successor recorded for {}", query.word)),
	}
}

/// HTTP GET endpoint `/v1/estimate`
///
/// Number of nodes inserting `word` would allocate. Read-only.
#[get("/v1/estimate")]
async fn get_estimate(data: SharedTrie, query: web::Query<WordQuery>) -> impl Responder {
	match read_lock(&data) {
		Ok(shared) => HttpResponse::Ok().body(shared.trie.count_new_nodes(&query.word).to_string()),
		Err(response) => response,
	}
}

/// HTTP PUT endpoint `/v1/estimate`
///
/// Same count, allocating the missing path nodes in the live trie.
/// Runs under the write lock since it mutates the structure.
#[put("/v1/estimate")]
async fn put_estimate(data: SharedTrie, query: web::Query<WordQuery>) -> impl Responder {
	match write_lock(&data) {
		Ok(mut shared) => HttpResponse::Ok().body(shared.trie.new_nodes_required(&query.word).to_string()),
		Err(response) => response,
	}
}

/// Main entry point for the server.
///
/// Optionally indexes a startup corpus, wraps the trie in a `RwLock` so
/// queries run concurrently while loads and mutating estimates are
/// exclusive, and starts an Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let args = Args::parse();

	let mut shared_data = SharedData {
		trie: WordTrie::new(),
		name: None,
		data_dir: normalize_folder(&args.data),
	};
	if let Some(corpus) = &args.corpus {
		match WordTrie::build(corpus) {
			Ok(trie) => {
				shared_data.trie = trie;
				shared_data.name = get_filename(corpus).ok();
			}
			Err(e) => warn!("Startup corpus not loaded: {e}"),
		}
	}
	let shared_trie = web::Data::new(RwLock::new(shared_data));

	info!("Listening on {}:{}", args.bind, args.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_trie.clone())
			.service(get_corpora)
			.service(get_loaded)
			.service(put_load)
			.service(get_dump)
			.service(get_words)
			.service(get_predict)
			.service(get_prefix_dump)
			.service(get_contains)
			.service(get_prefix_count)
			.service(get_next)
			.service(get_estimate)
			.service(put_estimate)
	})
		.bind((args.bind.as_str(), args.port))?
		.run()
		.await
}
