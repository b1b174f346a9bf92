//! Calliope: an interactive branching-story engine.
//!
//! A reader supplies a premise, the engine generates a scene with two
//! choices, the reader picks one, and the loop continues until the
//! configured length bound forces an ending. This facade crate re-exports
//! the workspace surface:
//!
//! - [`calliope_story`] — the story engine: graph, session, generation
//!   orchestration, and configuration.
//! - [`calliope_models`] — the Gemini backend driver.
//! - [`calliope_interface`] — the driver trait for custom backends.
//! - [`calliope_core`] — request, response, and message types.
//! - [`calliope_error`] — the workspace error taxonomy.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use calliope::{GeminiClient, StoryConfig, StorySession};
//!
//! let config = StoryConfig::load()?;
//! let driver = GeminiClient::with_model(config.model().clone())?;
//! let session = StorySession::new(driver, config);
//!
//! let opening = session.start("A lighthouse keeper finds a message in a bottle").await?;
//! let next = session.select(0).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub use calliope_core::{
    GenerateRequest, GenerateRequestBuilder, GenerateResponse, Message, Role, init_telemetry,
};
pub use calliope_error::{
    CalliopeError, CalliopeErrorKind, CalliopeResult, ConfigError, FailureReason, GeminiError,
    GeminiErrorKind, GenerationError, GenerationErrorKind, RetryableError, StoryError,
    StoryErrorKind,
};
pub use calliope_interface::CalliopeDriver;
pub use calliope_models::GeminiClient;
pub use calliope_story::{
    CHOICES_PER_SCENE, Choice, ContextBuilder, MIN_CHOICE_LEN, MIN_PREMISE_LEN, MIN_SCENE_LEN,
    Scene, SceneGenerator, Story, StoryConfig, StorySession, StoryState, StorySummary,
};
