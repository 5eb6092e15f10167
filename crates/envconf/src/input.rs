//! Selecting and opening the input file.

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use crate::commands::CommandError;

/// Where a command reads its configuration from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputArg {
    /// `-` on the command line.
    Stdin,
    Path(PathBuf),
}

impl InputArg {
    /// `-` selects standard input; anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }

    /// Open the input for streaming.
    pub fn open(&self) -> Result<Box<dyn Read>, CommandError> {
        match self {
            Self::Stdin => Ok(Box::new(io::stdin().lock())),
            Self::Path(path) => match File::open(path) {
                Ok(file) => Ok(Box::new(file)),
                Err(e) => Err(CommandError::Open {
                    message: open_error_message(&path.display().to_string(), &e),
                }),
            },
        }
    }
}

fn open_error_message(path: &str, e: &io::Error) -> String {
    match e.kind() {
        io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
        io::ErrorKind::PermissionDenied => format!("permission denied reading '{path}'"),
        _ => format!("error reading '{path}': {e}"),
    }
}

impl fmt::Display for InputArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
