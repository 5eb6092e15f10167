//! The assignment state machine and its driver.
//!
//! [`Machine`] consumes whatever window the [`InputSource`] offers and stops
//! as soon as it emits a pair or fails; everything it needs to resume (state
//! plus the two accumulation buffers) lives on the struct, so windows can be
//! split anywhere, including in the middle of a quoted span or right after a
//! backslash.
//!
//! # Design
//!
//! Dispatch is one `match` on [`ScanState`], with a focused method per
//! state. Comments and quoted spans have bulk paths that jump to the next
//! interesting byte with `memchr`; the observable behaviour is the same as
//! feeding those bytes one at a time.

use std::borrow::Cow;
use std::io::Read;
use std::iter::FusedIterator;

use crate::error::{ScanError, ScanErrorKind};
use crate::scan_buffer::ScanBuffer;
use crate::source::InputSource;
use crate::state::{is_name_continue, is_name_start, is_space, ScanState};
use crate::Position;

/// What happens when input ends while an assignment is still open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum EofPolicy {
    /// End of input terminates an unquoted value, so a final `KEY=value`
    /// without a trailing newline is still emitted.
    #[default]
    EmitPending,
    /// Any end of input outside `Divider`/`Comment` is an error; the last
    /// assignment must be followed by whitespace.
    Reject,
}

/// Tokenizer settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScanConfig {
    pub eof_policy: EofPolicy,
    /// Longest name or value accepted, in bytes. `None` is unbounded.
    pub max_token_len: Option<usize>,
}

impl ScanConfig {
    #[must_use]
    pub fn with_eof_policy(mut self, eof_policy: EofPolicy) -> Self {
        self.eof_policy = eof_policy;
        self
    }

    #[must_use]
    pub fn with_max_token_len(mut self, max_token_len: usize) -> Self {
        self.max_token_len = Some(max_token_len);
        self
    }

    fn new_buffer(&self) -> ScanBuffer {
        match self.max_token_len {
            Some(limit) => ScanBuffer::with_limit(limit),
            None => ScanBuffer::new(),
        }
    }
}

/// A parsed `NAME=value` assignment.
///
/// `name` always matches `[A-Za-z][A-Za-z0-9]*`. `value` is raw bytes: quotes
/// and escapes are already resolved, and no encoding is assumed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pair {
    pub name: String,
    pub value: Vec<u8>,
}

impl Pair {
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// The value as UTF-8, if it is valid UTF-8.
    pub fn value_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.value).ok()
    }

    /// The value as text, replacing invalid UTF-8 sequences.
    pub fn value_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// Result of one state transition.
enum Step {
    Continue,
    /// The value just ended; the buffers hold a complete pair.
    Emit,
}

/// Result of feeding one input window.
enum Feed {
    NeedMore,
    Emit(Pair),
    Fail(ScanErrorKind, Position),
}

/// Resumable state: parse mode, both buffers, and where we are.
#[derive(Debug)]
struct Machine {
    state: ScanState,
    name: ScanBuffer,
    value: ScanBuffer,
    /// Position of the next byte to be consumed.
    position: Position,
    eof_policy: EofPolicy,
}

impl Machine {
    fn new(config: &ScanConfig) -> Self {
        Self {
            state: ScanState::Divider,
            name: config.new_buffer(),
            value: config.new_buffer(),
            position: Position::START,
            eof_policy: config.eof_policy,
        }
    }

    /// Run the machine over `window` until it emits, fails, or runs dry.
    ///
    /// Returns how many bytes of `window` were consumed.
    fn feed(&mut self, window: &[u8]) -> (usize, Feed) {
        let mut i = 0;
        while i < window.len() {
            match self.state {
                ScanState::Comment => {
                    let rest = &window[i..];
                    let run = memchr::memchr(b'\n', rest).unwrap_or(rest.len());
                    self.position.advance_over(&rest[..run]);
                    i += run;
                }
                ScanState::ValueQuoted1 | ScanState::ValueQuoted2 => {
                    let close = if self.state == ScanState::ValueQuoted1 {
                        b'"'
                    } else {
                        b'\''
                    };
                    let rest = &window[i..];
                    let run = memchr::memchr(close, rest).unwrap_or(rest.len());
                    // Bulk-copy only what fits under the limit. The byte path
                    // then reports the first byte that does not fit.
                    let bulk = self.value.remaining().map_or(run, |room| run.min(room));
                    if self.value.extend(&rest[..bulk]).is_ok() {
                        self.position.advance_over(&rest[..bulk]);
                        i += bulk;
                    }
                }
                _ => {}
            }
            if i == window.len() {
                break;
            }

            let byte = window[i];
            match self.step(byte) {
                Ok(step) => {
                    self.position.advance(byte);
                    i += 1;
                    if let Step::Emit = step {
                        return (i, Feed::Emit(self.take_pair()));
                    }
                }
                Err(kind) => return (i, Feed::Fail(kind, self.position)),
            }
        }
        (i, Feed::NeedMore)
    }

    #[inline]
    fn step(&mut self, byte: u8) -> Result<Step, ScanErrorKind> {
        match self.state {
            ScanState::Divider => self.divider(byte),
            ScanState::Comment => Ok(self.comment(byte)),
            ScanState::VarName => self.var_name(byte),
            ScanState::ValueBase => self.value_base(byte),
            ScanState::ValueEscape => self.value_escape(byte),
            ScanState::ValueQuoted1 => self.quoted(byte, b'"'),
            ScanState::ValueQuoted2 => self.quoted(byte, b'\''),
        }
    }

    // ─── Between assignments ────────────────────────────────────────

    fn divider(&mut self, byte: u8) -> Result<Step, ScanErrorKind> {
        if is_name_start(byte) {
            self.name.push(byte)?;
            self.state = ScanState::VarName;
        } else if byte == b'#' {
            self.state = ScanState::Comment;
        } else if !is_space(byte) {
            return Err(ScanErrorKind::UnexpectedByte { byte });
        }
        Ok(Step::Continue)
    }

    fn comment(&mut self, byte: u8) -> Step {
        if byte == b'\n' {
            self.reset();
            self.state = ScanState::Divider;
        }
        Step::Continue
    }

    // ─── Names ──────────────────────────────────────────────────────

    fn var_name(&mut self, byte: u8) -> Result<Step, ScanErrorKind> {
        if is_name_continue(byte) {
            self.name.push(byte)?;
        } else if byte == b'=' {
            self.state = ScanState::ValueBase;
        } else {
            return Err(ScanErrorKind::UnexpectedByte { byte });
        }
        Ok(Step::Continue)
    }

    // ─── Values ─────────────────────────────────────────────────────

    fn value_base(&mut self, byte: u8) -> Result<Step, ScanErrorKind> {
        match byte {
            b'"' => self.state = ScanState::ValueQuoted1,
            b'\'' => self.state = ScanState::ValueQuoted2,
            b'\\' => self.state = ScanState::ValueEscape,
            b if is_space(b) => {
                self.state = ScanState::Divider;
                return Ok(Step::Emit);
            }
            b => self.value.push(b)?,
        }
        Ok(Step::Continue)
    }

    fn value_escape(&mut self, byte: u8) -> Result<Step, ScanErrorKind> {
        // Backslash-newline is a line continuation and produces nothing.
        if byte != b'\n' {
            self.value.push(byte)?;
        }
        self.state = ScanState::ValueBase;
        Ok(Step::Continue)
    }

    fn quoted(&mut self, byte: u8, close: u8) -> Result<Step, ScanErrorKind> {
        if byte == close {
            self.state = ScanState::ValueBase;
        } else {
            self.value.push(byte)?;
        }
        Ok(Step::Continue)
    }

    // ─── Emission & end of input ────────────────────────────────────

    fn take_pair(&mut self) -> Pair {
        // Names only ever receive ASCII alphanumerics.
        let name = self.name.as_bytes().iter().copied().map(char::from).collect();
        let value = self.value.as_bytes().to_vec();
        self.reset();
        Pair { name, value }
    }

    fn reset(&mut self) {
        self.name.clear();
        self.value.clear();
    }

    fn finish(&mut self) -> Result<Option<Pair>, ScanErrorKind> {
        match self.state {
            ScanState::Divider | ScanState::Comment => Ok(None),
            ScanState::ValueBase if self.eof_policy == EofPolicy::EmitPending => {
                self.state = ScanState::Divider;
                Ok(Some(self.take_pair()))
            }
            _ => Err(ScanErrorKind::UnexpectedEof),
        }
    }
}

/// Pulls `(name, value)` pairs out of one input source.
///
/// Call [`next_pair`](Self::next_pair) until it returns `Ok(None)` (clean end
/// of input) or an error. After either, the tokenizer is finished and keeps
/// returning `Ok(None)`. Pairs returned before an error remain valid.
///
/// ```
/// use envconf_lexer_core::{Pair, Tokenizer};
///
/// let mut tok = Tokenizer::from_bytes(b"# app\nHOST=localhost\nMSG='hi there'\n");
/// assert_eq!(tok.next_pair().ok().flatten(), Some(Pair::new("HOST", "localhost")));
/// assert_eq!(tok.next_pair().ok().flatten(), Some(Pair::new("MSG", "hi there")));
/// assert!(matches!(tok.next_pair(), Ok(None)));
/// ```
#[derive(Debug)]
pub struct Tokenizer<'a> {
    source: InputSource<'a>,
    machine: Machine,
    finished: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: InputSource<'a>) -> Self {
        Self::with_config(source, ScanConfig::default())
    }

    pub fn with_config(source: InputSource<'a>, config: ScanConfig) -> Self {
        Self {
            source,
            machine: Machine::new(&config),
            finished: false,
        }
    }

    /// Tokenize pre-loaded bytes with the default configuration.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::new(InputSource::buffer(bytes))
    }

    /// Tokenize a reader with the default configuration.
    pub fn from_reader<R: Read + 'a>(reader: R) -> Self {
        Self::new(InputSource::stream(reader))
    }

    /// Scan up to and including the next complete assignment.
    ///
    /// Returns `Ok(None)` once input ends at a boundary (between assignments
    /// or inside a comment).
    pub fn next_pair(&mut self) -> Result<Option<Pair>, ScanError> {
        if self.finished {
            return Ok(None);
        }
        loop {
            let window = match self.source.fill() {
                Ok(window) => window,
                Err(e) => return Err(self.fail(ScanErrorKind::Io(e))),
            };

            if window.is_empty() {
                return match self.machine.finish() {
                    Ok(Some(pair)) => {
                        // The source already reported end of input; never read it again.
                        self.finished = true;
                        tracing::trace!(name = %pair.name, len = pair.value.len(), "pair at end of input");
                        Ok(Some(pair))
                    }
                    Ok(None) => {
                        self.finished = true;
                        Ok(None)
                    }
                    Err(kind) => Err(self.fail(kind)),
                };
            }

            let (consumed, feed) = self.machine.feed(window);
            self.source.consume(consumed);
            match feed {
                Feed::NeedMore => {}
                Feed::Emit(pair) => {
                    tracing::trace!(name = %pair.name, len = pair.value.len(), "pair");
                    return Ok(Some(pair));
                }
                Feed::Fail(kind, position) => return Err(self.fail_at(kind, position)),
            }
        }
    }

    /// Current parse mode.
    pub fn state(&self) -> ScanState {
        self.machine.state
    }

    /// Position of the next unconsumed byte.
    pub fn position(&self) -> Position {
        self.machine.position
    }

    /// Returns `true` once the source has reported end of input, or after
    /// an error.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn fail(&mut self, kind: ScanErrorKind) -> ScanError {
        let position = self.machine.position;
        self.fail_at(kind, position)
    }

    fn fail_at(&mut self, kind: ScanErrorKind, position: Position) -> ScanError {
        self.finished = true;
        let error = ScanError::new(kind, position, self.machine.state);
        tracing::debug!(%error, "scan failed");
        error
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Result<Pair, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_pair().transpose()
    }
}

impl FusedIterator for Tokenizer<'_> {}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests;
