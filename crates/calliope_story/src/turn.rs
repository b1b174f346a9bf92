//! Turn-taking state machine for a story session.

use serde::{Deserialize, Serialize};

/// The lifecycle state of a story session.
///
/// Transitions:
///
/// ```text
/// NotStarted --start--> Generating --ok--> SceneReady
/// SceneReady --select--> Generating --ok--> SceneReady | Ended
/// Generating --err--> (previous state)
/// any --restart--> NotStarted
/// ```
///
/// While `Generating`, every other mutating call is rejected with `Busy`;
/// read-only accessors remain available in every state.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum StoryState {
    /// No story exists yet; only `start` is valid.
    #[display("not started")]
    NotStarted,
    /// A scene is displayed and awaiting the reader's choice.
    #[display("scene ready")]
    SceneReady,
    /// A generation request is in flight; mutating calls are rejected.
    #[display("generating")]
    Generating,
    /// The terminal scene has been generated; only `restart` mutates.
    #[display("ended")]
    Ended,
}

impl StoryState {
    /// Whether a generation request is currently in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, StoryState::Generating)
    }
}
