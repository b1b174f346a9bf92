//! Error types for the Calliope interactive story engine.
//!
//! This crate provides the foundation error types used throughout the Calliope
//! workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use calliope_error::{CalliopeResult, ConfigError};
//!
//! fn load_settings() -> CalliopeResult<String> {
//!     Err(ConfigError::new("missing temperature"))?
//! }
//!
//! match load_settings() {
//!     Ok(settings) => println!("Got: {}", settings),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod gemini;
mod generation;
mod story;

pub use config::ConfigError;
pub use error::{CalliopeError, CalliopeErrorKind, CalliopeResult};
pub use gemini::{GeminiError, GeminiErrorKind, RetryableError};
pub use generation::{FailureReason, GenerationError, GenerationErrorKind};
pub use story::{StoryError, StoryErrorKind};
