//! Story engine configuration.

use calliope_error::{CalliopeResult, ConfigError};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Bundled defaults, compiled into the binary.
const DEFAULT_CONFIG: &str = include_str!("../calliope.toml");

/// Tunable parameters for a story session.
///
/// Loaded from bundled defaults with `CALLIOPE_*` environment variable
/// overrides, e.g. `CALLIOPE_MAX_LENGTH=5`.
///
/// # Examples
///
/// ```
/// use calliope_story::StoryConfig;
///
/// let config = StoryConfig::default();
/// assert_eq!(*config.max_length(), 20);
/// assert_eq!(*config.context_scenes(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct StoryConfig {
    /// Model identifier sent to the generation backend
    model: String,
    /// Sampling temperature, 0.0 to 1.0
    temperature: f32,
    /// Maximum output tokens per generation request
    max_tokens: u32,
    /// Scene cap: the story ends once this many scenes exist
    max_length: usize,
    /// How many recent scenes are replayed to the backend
    context_scenes: usize,
}

impl StoryConfig {
    /// Load configuration from bundled defaults and environment overrides.
    ///
    /// # Errors
    ///
    /// Fails with a [`ConfigError`] if an override cannot be parsed or the
    /// resulting values are out of range.
    pub fn load() -> CalliopeResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .add_source(config::Environment::with_prefix("CALLIOPE"))
            .build()
            .map_err(|e| ConfigError::new(format!("failed to build configuration: {e}")))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("failed to parse configuration: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// A `max_length` below 2 is rejected because a story needs at least an
    /// opening scene and a terminal scene.
    fn validate(&self) -> CalliopeResult<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::new("model must not be empty").into());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(ConfigError::new(format!(
                "temperature must be between 0.0 and 1.0, got {}",
                self.temperature
            ))
            .into());
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::new("max_tokens must be positive").into());
        }
        if self.max_length < 2 {
            return Err(ConfigError::new(format!(
                "max_length must be at least 2, got {}",
                self.max_length
            ))
            .into());
        }
        if self.context_scenes == 0 {
            return Err(ConfigError::new("context_scenes must be at least 1").into());
        }
        Ok(())
    }

    /// Replace the scene cap, for shorter or longer stories.
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Replace the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.0-flash-lite".to_string(),
            temperature: 0.85,
            max_tokens: 800,
            max_length: 20,
            context_scenes: 3,
        }
    }
}
