//! Decoding view over a positioned stream.

use super::Encoding;
use crate::error::{GvError, Result};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Text reader returned by the bisection functions.
///
/// Wraps the very stream that was searched; nothing is copied and no second handle
/// is opened. [`TextReader::offset`] is the byte offset of the next unread byte.
#[derive(Debug)]
pub struct TextReader<R> {
    reader: BufReader<R>,
    offset: u64,
    encoding: Encoding,
}

impl<R: Read> TextReader<R> {
    pub(crate) fn new(reader: BufReader<R>, offset: u64, encoding: Encoding) -> Self {
        Self {
            reader,
            offset,
            encoding,
        }
    }

    /// Byte offset of the next line to be read
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Encoding used to decode lines
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Read and decode one line, terminator included, appending it to `buf`.
    ///
    /// Returns the number of bytes consumed from the stream; 0 means end of stream.
    pub fn read_line(&mut self, buf: &mut String) -> Result<usize> {
        let mut raw = Vec::new();
        let line_start = self.offset;
        let read = self.reader.read_until(b'\n', &mut raw)?;
        self.offset += read as u64;
        let text = self.encoding.decode(&raw).ok_or(GvError::DecodeError {
            offset: line_start,
            encoding: self.encoding.name(),
        })?;
        buf.push_str(&text);
        Ok(read)
    }

    /// Iterate over the remaining lines, without their `\n` or `\r\n` terminators
    pub fn decoded_lines(self) -> DecodedLines<R> {
        DecodedLines { reader: self }
    }
}

impl<R: Read + Seek> TextReader<R> {
    /// Give back the underlying stream, positioned at [`TextReader::offset`]
    pub fn into_inner(mut self) -> Result<R> {
        self.reader.seek(SeekFrom::Start(self.offset))?;
        Ok(self.reader.into_inner())
    }
}

impl<R: Read> Read for TextReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let read = self.reader.read(buf)?;
        self.offset += read as u64;
        Ok(read)
    }
}

impl<R: Read> BufRead for TextReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.reader.fill_buf()
    }

    fn consume(&mut self, amt: usize) {
        self.reader.consume(amt);
        self.offset += amt as u64;
    }
}

/// Iterator over decoded lines, see [`TextReader::decoded_lines`]
#[derive(Debug)]
pub struct DecodedLines<R> {
    reader: TextReader<R>,
}

impl<R> DecodedLines<R> {
    /// Byte offset of the next line the iterator will yield
    pub fn offset(&self) -> u64 {
        self.reader.offset
    }
}

impl<R: Read> Iterator for DecodedLines<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(Ok(line))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader_at(data: &[u8], offset: u64, encoding: Encoding) -> TextReader<Cursor<Vec<u8>>> {
        let mut cursor = Cursor::new(data.to_vec());
        cursor.set_position(offset);
        TextReader::new(BufReader::new(cursor), offset, encoding)
    }

    #[test]
    fn test_decoded_lines_strip_terminators() {
        let reader = reader_at(b"skip\none\r\ntwo\nthree", 5, Encoding::Utf8);
        let lines: Vec<String> = reader.decoded_lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_decoded_lines_offset_follows_iteration() {
        let mut lines = reader_at(b"one\r\ntwo\n", 0, Encoding::Utf8).decoded_lines();
        assert_eq!(lines.offset(), 0);
        assert_eq!(lines.next().unwrap().unwrap(), "one");
        assert_eq!(lines.offset(), 5);
        assert_eq!(lines.next().unwrap().unwrap(), "two");
        assert_eq!(lines.offset(), 9);
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_read_line_tracks_offset() {
        let mut reader = reader_at(b"ab\ncd\n", 0, Encoding::Utf8);
        let mut line = String::new();
        assert_eq!(reader.read_line(&mut line).unwrap(), 3);
        assert_eq!(line, "ab\n");
        assert_eq!(reader.offset(), 3);
    }

    #[test]
    fn test_read_line_reports_decode_error_offset() {
        let mut reader = reader_at(b"ok\n\xff\xfe\n", 3, Encoding::Utf8);
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Err(GvError::DecodeError { offset, encoding }) => {
                assert_eq!(offset, 3);
                assert_eq!(encoding, "utf-8");
            }
            other => panic!("expected DecodeError, got {other:?}"),
        }
    }

    #[test]
    fn test_into_inner_rewinds_read_ahead() {
        let mut reader = reader_at(b"ab\ncd\nef\n", 0, Encoding::Utf8);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        // BufReader has buffered the whole input; the inner cursor must come back at 3
        let cursor = reader.into_inner().unwrap();
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn test_bufread_consume_advances_offset() {
        let mut reader = reader_at(b"abcdef", 0, Encoding::Utf8);
        let available = reader.fill_buf().unwrap().len();
        assert_eq!(available, 6);
        reader.consume(2);
        assert_eq!(reader.offset(), 2);
    }
}
