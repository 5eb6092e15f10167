//! Tokenizer errors.
//!
//! Every error carries WHERE (`position`), WHAT (`kind`), and the state the
//! machine was in, which is also what callers use to decide whether a
//! stream failure happened between assignments.

use std::{fmt, io};

use crate::{CapacityError, Position, ScanState};

/// Coarse outcome class of a failed scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    /// Malformed token sequence.
    Syntax,
    /// An accumulation buffer could not grow.
    OutOfMemory,
    /// Read failure, or input ended in the middle of an assignment.
    Stream,
}

/// What went wrong.
#[derive(Debug)]
pub enum ScanErrorKind {
    /// A byte not accepted by the current state.
    UnexpectedByte { byte: u8 },
    /// Input ended outside a boundary state.
    UnexpectedEof,
    /// A name or value buffer could not grow to `requested` bytes.
    OutOfMemory {
        requested: usize,
        limit: Option<usize>,
    },
    /// The underlying reader failed.
    Io(io::Error),
}

impl ScanErrorKind {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnexpectedByte { .. } => ErrorClass::Syntax,
            Self::OutOfMemory { .. } => ErrorClass::OutOfMemory,
            Self::UnexpectedEof | Self::Io(_) => ErrorClass::Stream,
        }
    }
}

impl From<CapacityError> for ScanErrorKind {
    fn from(e: CapacityError) -> Self {
        Self::OutOfMemory {
            requested: e.requested,
            limit: e.limit,
        }
    }
}

/// A failed scan, located in the input.
#[derive(Debug)]
pub struct ScanError {
    kind: ScanErrorKind,
    position: Position,
    state: ScanState,
}

impl ScanError {
    pub(crate) fn new(kind: ScanErrorKind, position: Position, state: ScanState) -> Self {
        Self {
            kind,
            position,
            state,
        }
    }

    pub fn kind(&self) -> &ScanErrorKind {
        &self.kind
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }

    /// Position of the offending byte, or of end of input.
    pub fn position(&self) -> Position {
        self.position
    }

    /// State the machine was in when it failed.
    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn into_kind(self) -> ScanErrorKind {
        self.kind
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.position)?;
        match &self.kind {
            ScanErrorKind::UnexpectedByte { byte } => {
                write!(f, "{}, found {}", self.state.expectation(), ByteDisplay(*byte))
            }
            ScanErrorKind::UnexpectedEof => {
                write!(f, "unexpected end of input in {}", self.state)
            }
            ScanErrorKind::OutOfMemory { requested, limit } => match limit {
                Some(limit) => write!(
                    f,
                    "{} of {requested} bytes exceeds the {limit}-byte limit",
                    self.state
                ),
                None => write!(f, "cannot allocate {requested} bytes for {}", self.state),
            },
            ScanErrorKind::Io(e) => write!(f, "read failed: {e}"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            ScanErrorKind::Io(e) => Some(e),
            _ => None,
        }
    }
}

/// Renders a byte as a quoted ASCII character or a hex literal.
struct ByteDisplay(u8);

impl fmt::Display for ByteDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            b' ' => f.write_str("' '"),
            b if b.is_ascii_graphic() => write!(f, "'{}'", char::from(b)),
            b => write!(f, "byte {b:#04x}"),
        }
    }
}
