//! Input sources for the tokenizer.
//!
//! A source is either an owned reader consumed incrementally or a borrowed
//! byte slice that is already fully loaded. Both present the same window
//! interface: [`fill`](InputSource::fill) returns the bytes available right
//! now (empty at end of input) and [`consume`](InputSource::consume) marks a
//! prefix of that window as used.
//!
//! The tokenizer never assumes a total length for `Stream` sources. It only
//! looks at the current window, so state carries across chunk boundaries.

use std::fmt;
use std::io::{self, BufRead, BufReader, Read};

/// Chunk size used when buffering a `Stream` source.
pub const READ_CHUNK: usize = 8 * 1024;

/// Where the tokenizer reads bytes from.
pub enum InputSource<'a> {
    /// Owned reader (file, stdin, socket), read in chunks.
    Stream(BufReader<Box<dyn Read + 'a>>),
    /// Caller-owned bytes; no reads are ever issued.
    Buffer {
        bytes: &'a [u8],
        /// Offset of the first unconsumed byte.
        pos: usize,
    },
}

impl<'a> InputSource<'a> {
    /// Wrap a reader, buffering it in [`READ_CHUNK`]-sized chunks.
    pub fn stream<R: Read + 'a>(reader: R) -> Self {
        Self::stream_with_capacity(reader, READ_CHUNK)
    }

    /// Wrap a reader with an explicit chunk size (minimum 1).
    pub fn stream_with_capacity<R: Read + 'a>(reader: R, capacity: usize) -> Self {
        let reader: Box<dyn Read + 'a> = Box::new(reader);
        Self::Stream(BufReader::with_capacity(capacity.max(1), reader))
    }

    /// Borrow pre-loaded bytes.
    pub fn buffer(bytes: &'a [u8]) -> Self {
        Self::Buffer { bytes, pos: 0 }
    }

    /// Returns the currently available bytes, reading more if needed.
    ///
    /// An empty window means end of input. `Interrupted` reads are retried.
    pub fn fill(&mut self) -> io::Result<&[u8]> {
        match self {
            Self::Stream(reader) => {
                loop {
                    match reader.fill_buf() {
                        Ok(_) => break,
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                        Err(e) => return Err(e),
                    }
                }
                Ok(reader.buffer())
            }
            Self::Buffer { bytes, pos } => Ok(&bytes[*pos..]),
        }
    }

    /// Mark `amount` bytes of the last window as consumed.
    #[inline]
    pub fn consume(&mut self, amount: usize) {
        match self {
            Self::Stream(reader) => reader.consume(amount),
            Self::Buffer { bytes, pos } => *pos = (*pos + amount).min(bytes.len()),
        }
    }

    /// Returns `true` for sources that may block on reads.
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }
}

impl<'a> From<&'a [u8]> for InputSource<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::buffer(bytes)
    }
}

impl<'a> From<&'a str> for InputSource<'a> {
    fn from(text: &'a str) -> Self {
        Self::buffer(text.as_bytes())
    }
}

impl fmt::Debug for InputSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(reader) => f
                .debug_struct("Stream")
                .field("capacity", &reader.capacity())
                .field("buffered", &reader.buffer().len())
                .finish_non_exhaustive(),
            Self::Buffer { bytes, pos } => f
                .debug_struct("Buffer")
                .field("len", &bytes.len())
                .field("pos", pos)
                .finish(),
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
