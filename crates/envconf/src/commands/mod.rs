//! Command handlers for the envconf CLI.
//!
//! Each submodule implements one command. Handlers write their normal output
//! to the `out` they are given and return a [`CommandError`] on failure; the
//! binary turns that into an `error:` line and an exit status.

use std::io::{self, Write};

use envconf_env::{ApplyError, ApplyReport, BindError, ErrorCode};
use envconf_lexer_core::{InputSource, ScanError, Tokenizer};

use crate::input::InputArg;
use crate::options::CliOptions;

mod apply;
mod check;
mod lex;

pub use apply::apply_input;
pub use check::check_input;
pub use lex::lex_input;

/// A command failed.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{message}")]
    Open { message: String },
    #[error("{input}:{source}")]
    Scan {
        input: String,
        #[source]
        source: ScanError,
    },
    #[error("{input}: {source}")]
    Bind {
        input: String,
        #[source]
        source: BindError,
    },
    #[error("cannot write output: {0}")]
    Output(#[from] io::Error),
}

impl CommandError {
    /// The exit status for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Open { .. } | Self::Output(_) => ErrorCode::Stream,
            Self::Scan { source, .. } => source.class().into(),
            Self::Bind { .. } => ErrorCode::Bind,
        }
    }

    fn scan(input: &InputArg, source: ScanError) -> Self {
        Self::Scan {
            input: input.to_string(),
            source,
        }
    }

    fn from_apply(input: &InputArg, error: ApplyError) -> Self {
        match error {
            ApplyError::Scan(source) => Self::scan(input, source),
            ApplyError::Bind { source, .. } => Self::Bind {
                input: input.to_string(),
                source,
            },
        }
    }
}

/// Open the configured input and wrap it in a tokenizer.
fn open_tokenizer(options: &CliOptions) -> Result<Tokenizer<'static>, CommandError> {
    let reader = options.input.open()?;
    Ok(Tokenizer::with_config(
        InputSource::stream(reader),
        options.scan_config(),
    ))
}

/// Tell the user when a read failure between assignments cut the input short.
fn warn_if_interrupted(input: &InputArg, report: &ApplyReport) {
    if let Some(error) = report.interruption() {
        eprintln!("warning: {input}:{error} (treated as end of input)");
    }
}

fn write_binding(out: &mut dyn Write, name: &str, value: &[u8]) -> io::Result<()> {
    writeln!(out, "{name}={}", String::from_utf8_lossy(value))
}
