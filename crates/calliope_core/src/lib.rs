//! Core data types for the Calliope interactive story engine.
//!
//! This crate provides the request/response types shared by the generation
//! backends and the story orchestrator.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod message;
mod request;
mod role;
mod telemetry;

pub use message::{Message, MessageBuilder};
pub use request::{GenerateRequest, GenerateRequestBuilder, GenerateResponse};
pub use role::Role;
pub use telemetry::init_telemetry;
