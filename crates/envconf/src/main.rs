//! envconf CLI
//!
//! Loads shell-like `KEY=VALUE` files into the process environment.

use std::io::Write;

use envconf::commands::{apply_input, check_input, lex_input, CommandError};
use envconf::{init_tracing, parse_options, CliOptions, Command};
use envconf_env::ProcessEnv;

/// Exit status for command-line usage errors (`EX_USAGE`), kept apart from
/// the failure codes 1-4.
const USAGE_EXIT: i32 = 64;

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    let (command, rest) = match command.as_str() {
        "apply" => (Command::Apply, &args[2..]),
        "check" => (Command::Check, &args[2..]),
        "lex" => (Command::Lex, &args[2..]),
        "help" | "--help" | "-h" => {
            print_usage();
            return;
        }
        "version" | "--version" | "-V" => {
            println!("envconf {}", env!("CARGO_PKG_VERSION"));
            return;
        }
        // `envconf <file>` is shorthand for `envconf apply <file>`
        arg if arg == "-" || !arg.starts_with('-') => (Command::Apply, &args[1..]),
        other => {
            eprintln!("error: unknown command '{other}'");
            eprintln!();
            print_usage();
            std::process::exit(USAGE_EXIT);
        }
    };

    let options = match parse_options(command, rest) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("Usage: envconf {} <file|-> [options]", command.name());
            std::process::exit(USAGE_EXIT);
        }
    };

    if let Err(e) = run(command, &options) {
        eprintln!("error: {e}");
        std::process::exit(i32::from(e.code().as_u8()));
    }
}

fn run(command: Command, options: &CliOptions) -> Result<(), CommandError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Command::Apply => apply_input(options, &mut ProcessEnv, &mut out)?,
        Command::Check => check_input(options, &mut out)?,
        Command::Lex => lex_input(options, &mut out)?,
    }
    out.flush()?;
    Ok(())
}

fn print_usage() {
    println!("envconf - load KEY=VALUE configuration files into the environment");
    println!();
    println!("Usage: envconf <command> [options]");
    println!();
    println!("Commands:");
    println!("  apply <file|->    Bind every assignment and print what was set");
    println!("  check <file|->    Validate a file without changing the environment");
    println!("  lex <file|->      Print the pairs the tokenizer produces");
    println!("  help              Show this message");
    println!("  version           Show version information");
    println!("  <file>            Shorthand for `apply <file>`");
    println!();
    println!("Options:");
    println!("  --no-overwrite        Keep variables that are already set (apply)");
    println!("  --all                 Print the whole resulting environment (apply)");
    println!("  --strict-eof          Require whitespace after the last assignment");
    println!("  --max-token-len=<n>   Reject names or values longer than n bytes");
    println!();
    println!("Use `-` to read from standard input. Set RUST_LOG to enable logging.");
    println!();
    println!("Exit status: 0 ok, 1 memory, 2 syntax, 3 bind, 4 input/output, 64 usage");
}
