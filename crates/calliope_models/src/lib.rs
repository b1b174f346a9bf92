//! Generation backend implementations for Calliope.
//!
//! Currently provides a single backend: the Google Gemini REST API via
//! [`GeminiClient`]. All backends implement
//! [`CalliopeDriver`](calliope_interface::CalliopeDriver).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;

pub use gemini::{GeminiClient, GeminiResult};
