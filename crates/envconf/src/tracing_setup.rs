use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the global tracing subscriber if `RUST_LOG` is set.
///
/// Output goes to stderr so it never mixes with command output on stdout.
/// Safe to call more than once; only the first call does anything.
///
/// ```bash
/// RUST_LOG=envconf_lexer_core=trace envconf lex config.env
/// RUST_LOG=envconf_env=debug envconf apply config.env
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            use tracing_subscriber::prelude::*;
            use tracing_subscriber::{fmt, EnvFilter};

            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}
