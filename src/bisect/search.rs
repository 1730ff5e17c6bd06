//! Binary search over byte offsets, with a linear scan for the irregular tail.
//!
//! The interval `[start, end)` only ever shrinks. Every keyed line before `start` has a
//! key below the target and every line at or after `end` has a key at or above it,
//! except while `end` is still the stream length.
//!
//! `start` is always the start of a whole line. A probe at `(start + end) / 2` discards
//! the rest of the line it lands in, so the next whole line lies strictly after `start`.
//! When that line lies at or beyond `end`, the probe fell inside the last line of the
//! interval and cannot be trusted; the remainder is then scanned line by line from
//! `start`.

use super::probe::LineProbe;
use super::text::TextReader;
use super::{Encoding, LineKey};
use crate::error::{GvError, Result};
use log::{debug, trace};
use std::cmp::Ordering;
use std::io::{Read, Seek};

/// What to do when a probe lands on a line whose key equals the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TieBreak {
    /// Stop at the probed line
    AnyMatch,
    /// Keep narrowing towards the first equal line
    Leftmost,
}

pub(crate) fn bisect<R, K, F>(
    stream: R,
    target: &K,
    key_fn: &mut F,
    encoding: Encoding,
    tie_break: TieBreak,
) -> Result<TextReader<R>>
where
    R: Read + Seek,
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    let mut probe = LineProbe::new(stream)?;
    let boundary = find_boundary(&mut probe, target, key_fn, encoding, tie_break)?;
    debug!("bisect boundary at byte {boundary}");
    Ok(TextReader::new(
        probe.into_reader_at(boundary)?,
        boundary,
        encoding,
    ))
}

pub(crate) fn linear<R, K, F>(
    stream: R,
    target: &K,
    key_fn: &mut F,
    encoding: Encoding,
) -> Result<TextReader<R>>
where
    R: Read + Seek,
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    let mut probe = LineProbe::new(stream)?;
    let boundary = scan(&mut probe, target, key_fn, encoding)?;
    Ok(TextReader::new(
        probe.into_reader_at(boundary)?,
        boundary,
        encoding,
    ))
}

fn find_boundary<R, K, F>(
    probe: &mut LineProbe<R>,
    target: &K,
    key_fn: &mut F,
    encoding: Encoding,
    tie_break: TieBreak,
) -> Result<u64>
where
    R: Read + Seek,
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    let length = probe.stream_len()?;
    if length == 0 {
        return Ok(0);
    }

    let mut start = 0u64;
    let mut end = length;
    let mut line = Vec::new();

    while start != end {
        // Same as floor((start + end) / 2) without the overflow
        let midpoint = start + (end - start) / 2;
        probe.seek_to(midpoint)?;
        probe.skip_line()?;

        let (line_start, key) = loop {
            let line_start = probe.offset();
            if line_start >= end {
                debug!(
                    "probe at {midpoint} reached end of interval [{start}, {end}), scanning linearly"
                );
                probe.seek_to(start)?;
                return scan(probe, target, key_fn, encoding);
            }
            probe.read_line(&mut line)?;
            if let Some(key) = extract_key(key_fn, &line, line_start, encoding)? {
                break (line_start, key);
            }
        };

        let ordering = target.cmp(&key);
        trace!("interval [{start}, {end}) probe line at {line_start}: target {ordering:?} key");
        match ordering {
            Ordering::Less => end = line_start,
            Ordering::Greater => start = line_start,
            Ordering::Equal => match tie_break {
                TieBreak::AnyMatch => return Ok(line_start),
                TieBreak::Leftmost => end = line_start,
            },
        }
    }

    Ok(start)
}

/// Read whole lines from the probe's position until one has a key `>= target`.
///
/// Returns the start of that line, or the end of stream if there is none.
fn scan<R, K, F>(
    probe: &mut LineProbe<R>,
    target: &K,
    key_fn: &mut F,
    encoding: Encoding,
) -> Result<u64>
where
    R: Read + Seek,
    K: Ord,
    F: FnMut(&str) -> LineKey<K>,
{
    let mut line = Vec::new();
    loop {
        let line_start = probe.offset();
        if probe.read_line(&mut line)? == 0 {
            return Ok(line_start);
        }
        if let Some(key) = extract_key(key_fn, &line, line_start, encoding)? {
            if *target <= key {
                return Ok(line_start);
            }
        }
    }
}

/// Decode a raw line and run the key function over it.
///
/// `Ok(None)` means the line is to be skipped.
fn extract_key<K, F>(
    key_fn: &mut F,
    raw: &[u8],
    offset: u64,
    encoding: Encoding,
) -> Result<Option<K>>
where
    F: FnMut(&str) -> LineKey<K>,
{
    let text = encoding.decode(raw).ok_or(GvError::DecodeError {
        offset,
        encoding: encoding.name(),
    })?;

    match key_fn(&text) {
        LineKey::Key(key) => Ok(Some(key)),
        LineKey::Skip => Ok(None),
        LineKey::Invalid(_) if text.trim().is_empty() => Ok(None),
        LineKey::Invalid(reason) => Err(GvError::malformed_line(offset, &text, reason)),
    }
}
