//! The `lex` command: dump the pairs the tokenizer produces.

use std::io::Write;

use super::{open_tokenizer, CommandError};
use crate::options::CliOptions;

/// Print each pair as `NAME=<value>` with non-printable bytes escaped.
pub fn lex_input(options: &CliOptions, out: &mut dyn Write) -> Result<(), CommandError> {
    let mut tokenizer = open_tokenizer(options)?;

    while let Some(pair) = tokenizer
        .next_pair()
        .map_err(|source| CommandError::scan(&options.input, source))?
    {
        writeln!(out, "{}={}", pair.name, pair.value.escape_ascii())?;
    }
    Ok(())
}
