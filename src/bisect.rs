//! Binary search over sorted, line-based files.
//!
//! The search works directly on a seekable byte stream: it jumps to the middle of the
//! current byte interval, throws away the partial line it landed in, and compares the
//! key of the next whole line against the target. Only O(log n) lines are ever read,
//! so it is usable on multi-gigabyte append-only logs.
//!
//! ```no_run
//! use gv_tools::bisect::{bisect_file_left, Encoding, LineKey};
//!
//! # fn main() -> gv_tools::Result<()> {
//! let key = |line: &str| -> LineKey<u64> {
//!     line.split_whitespace().next().unwrap_or_default().parse::<u64>().into()
//! };
//! let reader = bisect_file_left("numbers.txt", &500, key, Encoding::Utf8)?;
//! for line in reader.decoded_lines() {
//!     println!("{}", line?);
//! }
//! # Ok(())
//! # }
//! ```

mod encoding;
mod probe;
mod search;
mod text;
mod validation;

pub use encoding::Encoding;
pub use text::{DecodedLines, TextReader};
pub use validation::validate_file_path;

use crate::error::{GvError, Result};
use search::TieBreak;
use std::fmt::Display;
use std::fs::File;
use std::io::{Read, Seek};
use std::path::Path;

/// Outcome of extracting a sort key from one line of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKey<K> {
    /// The line carries this key
    Key(K),
    /// The line carries no key and is ignored (headers, comments, blank lines)
    Skip,
    /// The key could not be parsed.
    ///
    /// Blank lines reporting `Invalid` are skipped; any other line aborts the search
    /// with [`GvError::MalformedLine`].
    Invalid(String),
}

impl<K, E: Display> From<std::result::Result<K, E>> for LineKey<K> {
    fn from(result: std::result::Result<K, E>) -> Self {
        match result {
            Ok(key) => LineKey::Key(key),
            Err(e) => LineKey::Invalid(e.to_string()),
        }
    }
}

/// Bisect a sorted stream, stopping at the first probed line whose key equals `target`.
///
/// Returns a [`TextReader`] over the same stream, positioned so that every keyed line
/// before it satisfies `key < target` and the line it starts at satisfies
/// `key >= target`. When several lines share the target key the reader may start at
/// any of them; use [`bisect_leftmost`] to always get the first.
///
/// An empty stream yields a reader at offset 0, and a target larger than every key
/// yields a reader at end of stream.
///
/// # Errors
/// * [`GvError::MalformedLine`] if a probed non-blank line reports [`LineKey::Invalid`]
/// * [`GvError::DecodeError`] if a probed line is not valid in `encoding`
/// * [`GvError::FileError`] on any seek or read failure
pub fn bisect_left<R, K, F>(
    stream: R,
    target: &K,
    mut key_fn: F,
    encoding: Encoding,
) -> Result<TextReader<R>>
where
    R: Read + Seek,
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    search::bisect(stream, target, &mut key_fn, encoding, TieBreak::AnyMatch)
}

/// Like [`bisect_left`], but keeps narrowing on equal keys so the reader always starts
/// at the first line whose key is `>= target`.
pub fn bisect_leftmost<R, K, F>(
    stream: R,
    target: &K,
    mut key_fn: F,
    encoding: Encoding,
) -> Result<TextReader<R>>
where
    R: Read + Seek,
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    search::bisect(stream, target, &mut key_fn, encoding, TieBreak::Leftmost)
}

/// Scan lines sequentially from the stream's current position and stop at the first
/// line whose key is `>= target`, or at end of stream.
///
/// The current position must be the start of a line.
pub fn linear_search<R, K, F>(
    stream: R,
    target: &K,
    mut key_fn: F,
    encoding: Encoding,
) -> Result<TextReader<R>>
where
    R: Read + Seek,
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    search::linear(stream, target, &mut key_fn, encoding)
}

/// Open `path` read-only and bisect it with [`bisect_left`].
///
/// The returned reader owns the file handle.
pub fn bisect_file_left<K, F>(
    path: impl AsRef<Path>,
    target: &K,
    key_fn: F,
    encoding: Encoding,
) -> Result<TextReader<File>>
where
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    bisect_left(open_sorted_file(path.as_ref())?, target, key_fn, encoding)
}

/// Open `path` read-only and bisect it with [`bisect_leftmost`], so the reader starts
/// at the first line whose key is `>= target` even when keys repeat.
pub fn bisect_file_leftmost<K, F>(
    path: impl AsRef<Path>,
    target: &K,
    key_fn: F,
    encoding: Encoding,
) -> Result<TextReader<File>>
where
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    bisect_leftmost(open_sorted_file(path.as_ref())?, target, key_fn, encoding)
}

fn open_sorted_file(path: &Path) -> Result<File> {
    validate_file_path(path)?;
    File::open(path).map_err(|e| GvError::open_error(path, e))
}
