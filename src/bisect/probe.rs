//! Offset-tracking line reader used while probing the stream.

use memchr::memchr;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};

/// Buffered reader that always knows the absolute byte offset of its next read.
///
/// Tracking the offset here avoids a `stream_position` call after every read, which
/// for a `BufReader` costs a seek on the inner stream.
#[derive(Debug)]
pub(crate) struct LineProbe<R> {
    reader: BufReader<R>,
    offset: u64,
}

impl<R: Read + Seek> LineProbe<R> {
    /// Wrap `inner`, starting from its current position
    pub fn new(mut inner: R) -> io::Result<Self> {
        let offset = inner.stream_position()?;
        Ok(Self {
            reader: BufReader::new(inner),
            offset,
        })
    }

    /// Total stream length in bytes. Leaves the probe at end of stream.
    pub fn stream_len(&mut self) -> io::Result<u64> {
        let len = self.reader.seek(SeekFrom::End(0))?;
        self.offset = len;
        Ok(len)
    }

    /// Absolute seek; drops any buffered bytes
    pub fn seek_to(&mut self, offset: u64) -> io::Result<()> {
        self.reader.seek(SeekFrom::Start(offset))?;
        self.offset = offset;
        Ok(())
    }

    /// Offset of the next byte to be read
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Discard everything up to and including the next `\n`, or up to end of stream.
    ///
    /// Afterwards the probe sits at the start of a whole line (or at EOF).
    pub fn skip_line(&mut self) -> io::Result<u64> {
        let mut skipped = 0u64;
        loop {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let (used, done) = match memchr(b'\n', buf) {
                Some(i) => (i + 1, true),
                None => (buf.len(), false),
            };
            self.reader.consume(used);
            skipped += used as u64;
            if done {
                break;
            }
        }
        self.offset += skipped;
        Ok(skipped)
    }

    /// Read one line including its terminator into `line`, replacing its contents.
    ///
    /// Returns the number of bytes read; 0 means end of stream.
    pub fn read_line(&mut self, line: &mut Vec<u8>) -> io::Result<usize> {
        line.clear();
        let read = self.reader.read_until(b'\n', line)?;
        self.offset += read as u64;
        Ok(read)
    }

    /// Seek to `offset` and hand back the buffered reader, now empty and positioned there
    pub fn into_reader_at(mut self, offset: u64) -> io::Result<BufReader<R>> {
        self.seek_to(offset)?;
        Ok(self.reader)
    }
}
