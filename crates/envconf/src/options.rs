//! Command-line option parsing.
//!
//! Flags follow the `--flag` / `--key=value` shape. Exactly one positional
//! argument names the input.

use envconf_lexer_core::{EofPolicy, ScanConfig};

use crate::input::InputArg;

/// The input-reading subcommands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Apply,
    Check,
    Lex,
}

impl Command {
    pub fn name(self) -> &'static str {
        match self {
            Self::Apply => "apply",
            Self::Check => "check",
            Self::Lex => "lex",
        }
    }

    /// Flags that only make sense when binding into the environment.
    fn accepts_apply_flags(self) -> bool {
        matches!(self, Self::Apply)
    }
}

/// Parsed options for one command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliOptions {
    pub input: InputArg,
    /// Replace variables that are already set.
    pub overwrite: bool,
    pub eof_policy: EofPolicy,
    pub max_token_len: Option<usize>,
    /// Print the whole resulting environment instead of just the new bindings.
    pub print_all: bool,
}

impl CliOptions {
    pub fn new(input: InputArg) -> Self {
        Self {
            input,
            overwrite: true,
            eof_policy: EofPolicy::default(),
            max_token_len: None,
            print_all: false,
        }
    }

    pub fn scan_config(&self) -> ScanConfig {
        let config = ScanConfig::default().with_eof_policy(self.eof_policy);
        match self.max_token_len {
            Some(limit) => config.with_max_token_len(limit),
            None => config,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("missing input file (use `-` for standard input)")]
    MissingInput,
    #[error("unexpected extra argument '{0}'")]
    ExtraArgument(String),
    #[error("unknown option '{flag}' for `{command}`")]
    UnknownFlag { flag: String, command: &'static str },
    #[error("invalid token length limit '{0}': expected a positive integer")]
    InvalidTokenLimit(String),
}

/// Parse the arguments that follow the command name.
pub fn parse_options(command: Command, args: &[String]) -> Result<CliOptions, OptionError> {
    let mut input = None;
    let mut overwrite = true;
    let mut eof_policy = EofPolicy::default();
    let mut max_token_len = None;
    let mut print_all = false;

    for arg in args {
        if let Some(limit) = arg.strip_prefix("--max-token-len=") {
            max_token_len = Some(parse_token_limit(limit)?);
        } else if arg == "--strict-eof" {
            eof_policy = EofPolicy::Reject;
        } else if arg == "--no-overwrite" && command.accepts_apply_flags() {
            overwrite = false;
        } else if arg == "--all" && command.accepts_apply_flags() {
            print_all = true;
        } else if arg.starts_with('-') && arg != "-" {
            return Err(OptionError::UnknownFlag {
                flag: arg.clone(),
                command: command.name(),
            });
        } else if input.is_none() {
            input = Some(InputArg::parse(arg));
        } else {
            return Err(OptionError::ExtraArgument(arg.clone()));
        }
    }

    let input = input.ok_or(OptionError::MissingInput)?;
    Ok(CliOptions {
        input,
        overwrite,
        eof_policy,
        max_token_len,
        print_all,
    })
}

fn parse_token_limit(raw: &str) -> Result<usize, OptionError> {
    match raw.parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(OptionError::InvalidTokenLimit(raw.to_owned())),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;

    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn defaults() {
        let opts = parse_options(Command::Apply, &args(&["app.env"])).unwrap();
        assert_eq!(opts, CliOptions::new(InputArg::Path(PathBuf::from("app.env"))));
        assert_eq!(opts.scan_config(), ScanConfig::default());
    }

    #[test]
    fn all_apply_flags() {
        let opts = parse_options(
            Command::Apply,
            &args(&["--no-overwrite", "-", "--strict-eof", "--max-token-len=32", "--all"]),
        )
        .unwrap();
        assert_eq!(opts.input, InputArg::Stdin);
        assert!(!opts.overwrite);
        assert!(opts.print_all);
        assert_eq!(opts.eof_policy, EofPolicy::Reject);
        assert_eq!(
            opts.scan_config(),
            ScanConfig::default()
                .with_eof_policy(EofPolicy::Reject)
                .with_max_token_len(32)
        );
    }

    #[test]
    fn apply_flags_rejected_elsewhere() {
        let err = parse_options(Command::Lex, &args(&["a.env", "--all"])).unwrap_err();
        assert_eq!(
            err,
            OptionError::UnknownFlag {
                flag: "--all".to_owned(),
                command: "lex",
            }
        );
        assert_eq!(err.to_string(), "unknown option '--all' for `lex`");
    }

    #[test]
    fn missing_and_extra_inputs() {
        assert_eq!(
            parse_options(Command::Check, &args(&["--strict-eof"])),
            Err(OptionError::MissingInput)
        );
        assert_eq!(
            parse_options(Command::Check, &args(&["a.env", "b.env"])),
            Err(OptionError::ExtraArgument("b.env".to_owned()))
        );
    }

    #[test]
    fn token_limit_must_be_positive() {
        for bad in ["0", "-3", "lots", ""] {
            let arg = format!("--max-token-len={bad}");
            assert_eq!(
                parse_options(Command::Check, &args(&["a.env", &arg])),
                Err(OptionError::InvalidTokenLimit(bad.to_owned()))
            );
        }
    }
}
