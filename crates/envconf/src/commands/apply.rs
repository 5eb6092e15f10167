//! The `apply` command: bind every assignment into an environment.

use std::io::Write;

use envconf_env::{ApplyOptions, Bind};

use super::{open_tokenizer, warn_if_interrupted, write_binding, CommandError};
use crate::options::CliOptions;

/// Bind the input's assignments into `env` and print what changed.
///
/// Prints one `NAME=value` line per binding that took effect, or the whole
/// resulting environment with `--all`. On failure the bindings made before
/// the error stay in place and are still printed, but a failure to print
/// them never hides the original error.
pub fn apply_input<B: Bind + ?Sized>(
    options: &CliOptions,
    env: &mut B,
    out: &mut dyn Write,
) -> Result<(), CommandError> {
    let mut tokenizer = open_tokenizer(options)?;
    let apply_options = ApplyOptions::default().with_overwrite(options.overwrite);

    match envconf_env::apply(&mut tokenizer, env, apply_options) {
        Ok(report) => {
            warn_if_interrupted(&options.input, &report);
            if options.print_all {
                for (name, value) in env.entries() {
                    write_binding(out, &name, &value)?;
                }
            } else {
                for binding in report.applied() {
                    write_binding(out, &binding.name, &binding.value)?;
                }
            }
            Ok(())
        }
        Err(failure) => {
            // Best effort: the apply error is the one to report.
            for binding in failure.report.applied() {
                if write_binding(out, &binding.name, &binding.value).is_err() {
                    break;
                }
            }
            Err(CommandError::from_apply(&options.input, failure.error))
        }
    }
}
