//! Tokenizer states and the byte classes their transitions test.

use std::fmt;

/// Parse mode of the tokenizer.
///
/// The machine starts in [`Divider`](ScanState::Divider). There is no
/// terminal state; the end of a pass is reported through the return value
/// of [`Tokenizer::next_pair`](crate::Tokenizer::next_pair).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ScanState {
    /// Between assignments: whitespace, comments, or the start of a name.
    #[default]
    Divider = 0,
    /// Inside a `#` comment, discarding bytes up to the newline.
    Comment,
    /// Accumulating a variable name.
    VarName,
    /// Accumulating an unquoted value.
    ValueBase,
    /// The byte after a backslash in an unquoted value.
    ValueEscape,
    /// Inside a `"..."` span.
    ValueQuoted1,
    /// Inside a `'...'` span.
    ValueQuoted2,
}

impl ScanState {
    /// Returns `true` for states where end of input is a clean finish.
    #[inline]
    pub fn is_boundary(self) -> bool {
        matches!(self, Self::Divider | Self::Comment)
    }

    /// What the machine accepts in this state, phrased for diagnostics.
    pub fn expectation(self) -> &'static str {
        match self {
            Self::Divider => "expected a variable name, `#`, or whitespace",
            Self::Comment => "expected the end of the comment line",
            Self::VarName => "expected `=` or an alphanumeric character in variable name",
            Self::ValueBase => "expected a value terminated by whitespace",
            Self::ValueEscape => "expected a character after `\\`",
            Self::ValueQuoted1 => "expected a closing `\"`",
            Self::ValueQuoted2 => "expected a closing `'`",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Divider => "divider",
            Self::Comment => "comment",
            Self::VarName => "variable name",
            Self::ValueBase => "value",
            Self::ValueEscape => "escape",
            Self::ValueQuoted1 => "double-quoted value",
            Self::ValueQuoted2 => "single-quoted value",
        };
        f.write_str(name)
    }
}

/// Whitespace in the C `isspace` sense: space, `\t`, `\n`, `\v`, `\f`, `\r`.
#[inline]
pub(crate) fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | 0x0B | 0x0C | b'\r')
}

#[inline]
pub(crate) fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic()
}

#[inline]
pub(crate) fn is_name_continue(byte: u8) -> bool {
    byte.is_ascii_alphanumeric()
}
