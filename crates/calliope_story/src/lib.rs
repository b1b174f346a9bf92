//! Branching-narrative orchestration engine.
//!
//! This crate implements the story core: a user supplies a premise, receives a
//! generated scene, picks one of two offered continuations, and repeats until
//! the configured length bound forces an ending.
//!
//! # Architecture
//!
//! - [`Story`] / [`Scene`] / [`Choice`] — the narrative graph: an append-only
//!   path of scenes, holding only the branch actually taken.
//! - [`ContextBuilder`] — compresses story history into a bounded,
//!   deterministic prompt payload.
//! - [`SceneGenerator`] — turns a context payload into the next scene through
//!   an injected [`CalliopeDriver`](calliope_interface::CalliopeDriver), with
//!   bounded retry on transient backend failures and one corrective
//!   re-request on malformed responses.
//! - [`StorySession`] — the turn-taking state machine
//!   ([`StoryState`]) and the only mutating surface exposed to a renderer:
//!   `start`, `select`, `restart`.
//!
//! # Example
//!
//! ```rust,ignore
//! use calliope_story::{StoryConfig, StorySession};
//! use calliope_models::GeminiClient;
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

mod config;
mod context;
mod extraction;
mod generator;
mod prompts;
mod scene;
mod session;
mod turn;

pub use config::StoryConfig;
pub use context::ContextBuilder;
pub use extraction::{MIN_CHOICE_LEN, MIN_SCENE_LEN, clean_scene_text};
pub use generator::SceneGenerator;
pub use scene::{CHOICES_PER_SCENE, Choice, MIN_PREMISE_LEN, Scene, Story};
pub use session::{StorySession, StorySummary};
pub use turn::StoryState;
