//! Top-level error wrapper types.

use crate::{ConfigError, GeminiError, GenerationError, RetryableError, StoryError};

/// This is the foundation error enum for the Calliope workspace.
///
/// # Examples
///
/// ```
/// use calliope_error::{CalliopeError, ConfigError};
///
/// let config_err = ConfigError::new("max_length must be at least 2");
/// let err: CalliopeError = config_err.into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum CalliopeErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Gemini backend error
    #[from(GeminiError)]
    Gemini(GeminiError),
    /// Scene generation error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Story or session error
    #[from(StoryError)]
    Story(StoryError),
}

/// Calliope error with kind discrimination.
///
/// # Examples
///
/// ```
/// use calliope_error::{CalliopeResult, StoryError, StoryErrorKind};
///
/// fn might_fail() -> CalliopeResult<()> {
///     Err(StoryError::new(StoryErrorKind::EmptyStory))?
/// }
///
/// match might_fail() {
///     Ok(_) => println!("Success"),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Calliope Error: {}", _0)]
pub struct CalliopeError(Box<CalliopeErrorKind>);

impl CalliopeError {
    /// Create a new error from a kind.
    pub fn new(kind: CalliopeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &CalliopeErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to CalliopeErrorKind
impl<T> From<T> for CalliopeError
where
    T: Into<CalliopeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl RetryableError for CalliopeError {
    /// Only backend-local errors carry a transient classification; story,
    /// generation, and configuration errors never warrant a retry.
    fn is_retryable(&self) -> bool {
        match self.kind() {
            CalliopeErrorKind::Gemini(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for Calliope operations.
///
/// # Examples
///
/// ```
/// use calliope_error::{CalliopeResult, ConfigError};
///
/// fn load() -> CalliopeResult<String> {
///     Err(ConfigError::new("missing model name"))?
/// }
/// ```
pub type CalliopeResult<T> = std::result::Result<T, CalliopeError>;
