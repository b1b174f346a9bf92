//! Trait definitions for Calliope generation backends.
//!
//! The story orchestrator talks to the outside world through exactly one
//! boundary: [`CalliopeDriver`]. Production code plugs in the Gemini client
//! from `calliope_models`; tests substitute a deterministic fake.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::CalliopeDriver;
