//! The `check` command: validate a file without touching the environment.

use std::io::Write;

use envconf_env::{ApplyOptions, MapEnv};

use super::{open_tokenizer, warn_if_interrupted, CommandError};
use crate::options::CliOptions;

/// Dry-run the input against an empty in-memory store.
///
/// Catches everything `apply` would, including values the environment
/// would refuse, and prints `<input>: ok (<n> assignments)`.
pub fn check_input(options: &CliOptions, out: &mut dyn Write) -> Result<(), CommandError> {
    let mut tokenizer = open_tokenizer(options)?;
    let mut env = MapEnv::new();

    let report = envconf_env::apply(&mut tokenizer, &mut env, ApplyOptions::default())
        .map_err(|failure| CommandError::from_apply(&options.input, failure.error))?;

    warn_if_interrupted(&options.input, &report);
    writeln!(out, "{}: ok ({} assignments)", options.input, report.len())?;
    Ok(())
}
