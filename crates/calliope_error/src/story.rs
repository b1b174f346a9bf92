//! Story and session error types.

/// Specific error conditions for story and session operations.
///
/// These are all rejected synchronously and never mutate the story,
/// so the caller can correct the input and retry the same action.
///
/// `TerminalScene` and `ChoiceAlreadyRecorded` are refinements of the
/// invalid-choice family: a front end that does not care why a selection
/// was rejected can treat them and `InvalidChoice` as one case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoryErrorKind {
    /// Premise failed validation before any generation call was made
    #[display("Premise must be at least {} characters, got {}", min, got)]
    PremiseTooShort {
        /// Minimum premise length in characters
        min: usize,
        /// Length actually supplied (after trimming)
        got: usize,
    },
    /// Choice index is out of range for the current scene
    #[display("Invalid choice index: {}", index)]
    InvalidChoice {
        /// The rejected index
        index: usize,
    },
    /// The story has no scenes yet
    #[display("Story has no scenes")]
    EmptyStory,
    /// Appending a scene would exceed the story length bound
    #[display("Story already holds its maximum of {} scenes", max)]
    CapacityExceeded {
        /// The configured maximum scene count
        max: usize,
    },
    /// A choice was already recorded for the current scene
    #[display("A choice was already recorded for the current scene")]
    ChoiceAlreadyRecorded,
    /// The current scene is terminal and offers no choices
    #[display("The current scene is terminal and offers no choices")]
    TerminalScene,
    /// The operation is not legal in the session's current state
    #[display("Cannot {} while the session is {}", operation, state)]
    InvalidState {
        /// The rejected operation
        operation: &'static str,
        /// The session state at the time of the call
        state: String,
    },
    /// A generation is already in flight for this session
    #[display("A generation request is already in flight")]
    Busy,
}

/// Error type for story and session operations.
///
/// # Examples
///
/// ```
/// use calliope_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::InvalidChoice { index: 2 });
/// assert!(format!("{}", err).contains("Invalid choice"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
