use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use crate::error::TrieError;

/// Opens a text source for buffered reading.
///
/// # Errors
/// Returns `TrieError::SourceUnavailable` if the file cannot be opened.
pub fn open_source<P: AsRef<Path>>(path: P) -> Result<BufReader<File>, TrieError> {
	let path = path.as_ref();
	File::open(path)
		.map(BufReader::new)
		.map_err(|source| TrieError::SourceUnavailable { name: path.display().to_string(), source })
}

/// Calls `f` for every whitespace-delimited raw token of `reader`, in order.
///
/// - Reads raw bytes line by line, tokens never span lines
/// - Splits on ASCII whitespace only
/// - Bytes that are not valid UTF-8 become U+FFFD, so any encoding reads
/// - `name` only labels the error if a read fails mid-stream
pub fn for_each_token<R, F>(mut reader: R, name: &str, mut f: F) -> Result<(), TrieError>
where
	R: BufRead,
	F: FnMut(&str),
{
	let mut line = Vec::new();
	loop {
		line.clear();
		let read = reader
			.read_until(b'\n', &mut line)
			.map_err(|source| TrieError::SourceUnavailable { name: name.to_owned(), source })?;
		if read == 0 {
			return Ok(());
		}
		for token in line.split(u8::is_ascii_whitespace).filter(|token| !token.is_empty()) {
			f(&String::from_utf8_lossy(token));
		}
	}
}

/// Reads every whitespace-delimited raw token of `reader` into memory.
pub fn read_tokens<R: BufRead>(reader: R, name: &str) -> Result<Vec<String>, TrieError> {
	let mut tokens = Vec::new();
	for_each_token(reader, name, |token| tokens.push(token.to_owned()))?;
	Ok(tokens)
}

/// Opens `path` and reads all of its raw tokens.
pub fn read_file_tokens<P: AsRef<Path>>(path: P) -> Result<Vec<String>, TrieError> {
	let name = path.as_ref().display().to_string();
	read_tokens(open_source(&path)?, &name)
}

/// Extracts the base filename without extension.
///
/// Examples:
/// - `"./data/alice.txt"` → `"alice"`
/// - `"alice.txt"` → `"alice"`
pub fn get_filename<P: AsRef<Path>>(input_path: P) -> io::Result<String> {
	let stem = input_path
		.as_ref()
		.file_stem()
		.ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "Path has no filename"))?;

	Ok(stem.to_string_lossy().to_string())
}

/// Normalize a folder path.
///
/// - `"."` or `"./"` resolves to the current working directory
/// - Other paths are returned as-is (not canonicalized)
pub fn normalize_folder(input: &str) -> PathBuf {
	if input == "." || input == "./" {
		env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
	} else {
		PathBuf::from(input)
	}
}

/// Lists all files with a given extension in a directory, sorted by name.
///
/// Returns file names only (no paths).
pub fn list_files<P: AsRef<Path>>(dir: P, extension: &str) -> io::Result<Vec<String>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if path.is_file() && path.extension() == Some(std::ffi::OsStr::new(extension)) {
			if let Some(name) = path.file_name() {
				files.push(name.to_string_lossy().to_string());
			}
		}
	}

	files.sort();
	Ok(files)
}
