//! Numeric result codes for a failed pass.

use std::fmt;

use envconf_lexer_core::ErrorClass;

/// Stable numeric code for each failure class.
///
/// Success is `0`. The numbering is part of the CLI's exit-status contract,
/// so existing values never change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCode {
    /// A token buffer could not grow.
    Memory = 1,
    /// Malformed input.
    Syntax = 2,
    /// The environment store refused a binding.
    Bind = 3,
    /// Reading failed or input ended mid-assignment.
    Stream = 4,
}

impl ErrorCode {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Short lowercase name, used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Syntax => "syntax",
            Self::Bind => "bind",
            Self::Stream => "stream",
        }
    }
}

impl From<ErrorClass> for ErrorCode {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::Syntax => Self::Syntax,
            ErrorClass::OutOfMemory => Self::Memory,
            ErrorClass::Stream => Self::Stream,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_u8(), self.name())
    }
}
