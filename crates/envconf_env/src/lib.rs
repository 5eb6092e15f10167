//! Environment binding for tokenized configuration pairs.
//!
//! The tokenizer in `envconf_lexer_core` is side-effect free; this crate is
//! where pairs meet a store. [`Bind`] is the narrow seam: the process
//! environment ([`ProcessEnv`]) and an in-memory map ([`MapEnv`]) both sit
//! behind it, and [`apply`] drives one tokenizer pass into either.

mod apply;
mod bind;
mod code;
mod map;
mod process;

pub use apply::{apply, AppliedBinding, ApplyError, ApplyFailure, ApplyOptions, ApplyReport};
pub use bind::{validate_name, Bind, BindError, BindOutcome};
pub use code::ErrorCode;
pub use map::MapEnv;
pub use process::ProcessEnv;
