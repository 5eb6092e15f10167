//! envconf: load `KEY=VALUE` configuration files into the environment.
//!
//! The binary in `main.rs` is a thin argument dispatcher. Everything it runs
//! lives here so tests can drive commands against an in-memory store and a
//! byte buffer instead of the real process environment and stdout.

pub mod commands;
mod input;
mod options;
mod tracing_setup;

pub use input::InputArg;
pub use options::{parse_options, CliOptions, Command, OptionError};
pub use tracing_setup::init_tracing;
