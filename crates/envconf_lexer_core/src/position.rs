//! Source positions for diagnostics.

use std::fmt;

/// Location of a byte in the input.
///
/// `line` and `column` are 1-based; `column` counts bytes, not characters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset from the start of the input.
    pub offset: u64,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Position of the first byte of the input.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    /// Step past a single byte.
    #[inline]
    pub(crate) fn advance(&mut self, byte: u8) {
        self.offset += 1;
        if byte == b'\n' {
            self.line = self.line.saturating_add(1);
            self.column = 1;
        } else {
            self.column = self.column.saturating_add(1);
        }
    }

    /// Step past a run of bytes.
    ///
    /// Counts newlines with `memchr` instead of walking the run byte by byte.
    pub(crate) fn advance_over(&mut self, run: &[u8]) {
        self.offset += run.len() as u64;
        let newlines = memchr::memchr_iter(b'\n', run).count();
        let tail = match memchr::memrchr(b'\n', run) {
            Some(last) => {
                self.line = self
                    .line
                    .saturating_add(u32::try_from(newlines).unwrap_or(u32::MAX));
                self.column = 1;
                &run[last + 1..]
            }
            None => run,
        };
        self.column = self
            .column
            .saturating_add(u32::try_from(tail.len()).unwrap_or(u32::MAX));
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
