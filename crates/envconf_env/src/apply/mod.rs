//! The pass-driving loop: tokenize, bind, repeat.
//!
//! Each pair is bound as soon as it is emitted, so a failure partway through
//! leaves earlier bindings in place. [`ApplyFailure`] hands back the report
//! of what was applied alongside the error.

use envconf_lexer_core::{ErrorClass, ScanError, Tokenizer};

use crate::bind::{Bind, BindError, BindOutcome};
use crate::code::ErrorCode;

/// How [`apply`] treats names that are already bound.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ApplyOptions {
    /// Replace existing bindings (`true`) or keep them (`false`).
    pub overwrite: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

impl ApplyOptions {
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// One pair that reached the store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppliedBinding {
    pub name: String,
    pub value: Vec<u8>,
    pub outcome: BindOutcome,
}

/// What a pass did, in input order.
#[derive(Debug, Default)]
pub struct ApplyReport {
    bindings: Vec<AppliedBinding>,
    interruption: Option<ScanError>,
}

impl ApplyReport {
    /// Every pair handed to the store, including ones it kept unchanged.
    pub fn bindings(&self) -> &[AppliedBinding] {
        &self.bindings
    }

    /// Pairs that changed the store.
    pub fn applied(&self) -> impl Iterator<Item = &AppliedBinding> {
        self.bindings.iter().filter(|b| b.outcome.is_applied())
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The read failure that ended the pass early, if it hit between
    /// assignments and was therefore treated as end of input.
    pub fn interruption(&self) -> Option<&ScanError> {
        self.interruption.as_ref()
    }
}

/// Why a pass stopped.
#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error("cannot bind `{name}`: {source}")]
    Bind {
        name: String,
        #[source]
        source: BindError,
    },
}

impl ApplyError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Scan(e) => e.class().into(),
            Self::Bind { .. } => ErrorCode::Bind,
        }
    }
}

/// A failed pass, with the bindings applied before the failure.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct ApplyFailure {
    pub error: ApplyError,
    pub report: ApplyReport,
}

impl ApplyFailure {
    pub fn code(&self) -> ErrorCode {
        self.error.code()
    }
}

/// Drive `tokenizer` to completion, binding every pair into `env`.
///
/// A stream error while the tokenizer sits between assignments is treated
/// as the end of input (recorded in [`ApplyReport::interruption`]). Any
/// other scan error, or the first bind error, stops the pass.
pub fn apply<B: Bind + ?Sized>(
    tokenizer: &mut Tokenizer<'_>,
    env: &mut B,
    options: ApplyOptions,
) -> Result<ApplyReport, ApplyFailure> {
    let mut report = ApplyReport::default();
    loop {
        let pair = match tokenizer.next_pair() {
            Ok(Some(pair)) => pair,
            Ok(None) => break,
            Err(error) if error.class() == ErrorClass::Stream && error.state().is_boundary() => {
                tracing::warn!(%error, "input ended between assignments; treating as end of input");
                report.interruption = Some(error);
                break;
            }
            Err(error) => {
                return Err(ApplyFailure {
                    error: error.into(),
                    report,
                })
            }
        };

        match env.bind(&pair.name, &pair.value, options.overwrite) {
            Ok(outcome) => {
                tracing::debug!(name = %pair.name, ?outcome, "bound");
                report.bindings.push(AppliedBinding {
                    name: pair.name,
                    value: pair.value,
                    outcome,
                });
            }
            Err(source) => {
                tracing::debug!(name = %pair.name, %source, "bind failed");
                return Err(ApplyFailure {
                    error: ApplyError::Bind {
                        name: pair.name,
                        source,
                    },
                    report,
                });
            }
        }
    }
    tracing::debug!(count = report.len(), "pass complete");
    Ok(report)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "test assertions use unwrap/expect for clarity"
)]
