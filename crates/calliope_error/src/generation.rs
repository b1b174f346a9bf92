//! Generation error types surfaced by the scene orchestrator.

/// Why a generation request ultimately failed.
///
/// Transient failures are retried internally before one of these surfaces,
/// so a caller seeing `RateLimited` or `Timeout` knows the retry budget was
/// already exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum FailureReason {
    /// The backend call timed out after all retries
    #[display("timeout")]
    Timeout,
    /// The backend rate limit persisted through all retries
    #[display("rate limited")]
    RateLimited,
    /// Authentication or authorization failure (never retried)
    #[display("authentication")]
    Auth,
    /// The response could not be parsed into a scene and choices,
    /// even after the corrective re-request
    #[display("parse")]
    Parse,
    /// Any other failure mode
    #[display("unknown")]
    Unknown,
}

/// Specific error conditions for scene generation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The generation request failed after exhausting its retry budget.
    #[display("Generation failed ({}): {}", reason, message)]
    Failed {
        /// Classification of the failure
        reason: FailureReason,
        /// Human-readable detail
        message: String,
    },
}

impl GenerationErrorKind {
    /// The failure classification carried by this error.
    pub fn reason(&self) -> FailureReason {
        match self {
            GenerationErrorKind::Failed { reason, .. } => *reason,
        }
    }
}

/// Error type for scene generation operations.
///
/// # Examples
///
/// ```
/// use calliope_error::{FailureReason, GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::Failed {
///     reason: FailureReason::Parse,
///     message: "missing CHOICE_2 label".to_string(),
/// });
/// assert_eq!(err.kind.reason(), FailureReason::Parse);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Create a `Failed` error from a reason and message.
    #[track_caller]
    pub fn failed(reason: FailureReason, message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Failed {
            reason,
            message: message.into(),
        })
    }
}
