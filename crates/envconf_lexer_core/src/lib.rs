//! Resumable tokenizer for shell-like `KEY=VALUE` configuration files.
//!
//! The tokenizer is a seven-state machine driven one byte at a time. It emits
//! owned [`Pair`] values and never touches the environment itself; binding
//! pairs is the caller's job.
//!
//! # Architecture
//!
//! ```text
//! InputSource ──fill()/consume()──► Machine ──► Pair
//!  (Stream | Buffer)                  │
//!                                     ├── name:  ScanBuffer
//!                                     └── value: ScanBuffer
//! ```
//!
//! - **source** - explicit `Stream` / `Buffer` input with a window interface
//! - **`scan_buffer`** - growable accumulation buffer with fallible growth
//! - **state** - [`ScanState`] and the byte classes the transitions use
//! - **tokenizer** - the state machine and the [`Tokenizer`] driver
//! - **error** - [`ScanError`] with position and state context

mod error;
mod position;
mod scan_buffer;
mod source;
mod state;
mod tokenizer;

pub use error::{ErrorClass, ScanError, ScanErrorKind};
pub use position::Position;
pub use scan_buffer::{CapacityError, ScanBuffer, MIN_CAPACITY};
pub use source::{InputSource, READ_CHUNK};
pub use state::ScanState;
pub use tokenizer::{EofPolicy, Pair, ScanConfig, Tokenizer};
