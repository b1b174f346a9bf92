//! Scene generation orchestration: retry, corrective re-request, and
//! failure classification.

use calliope_core::{GenerateRequest, Message};
use calliope_error::{
    CalliopeError, CalliopeErrorKind, CalliopeResult, FailureReason, GeminiErrorKind,
    GenerationError, RetryableError,
};
use calliope_interface::CalliopeDriver;
use tracing::{instrument, warn};

use crate::config::StoryConfig;
use crate::extraction::{parse_ending, parse_scene_with_choices};
use crate::prompts;
use crate::scene::Scene;

/// Total attempts per outbound request, counting the first.
const MAX_ATTEMPTS: usize = 3;

/// Initial backoff delay between attempts, in milliseconds.
const INITIAL_BACKOFF_MS: u64 = 500;

/// Ceiling on any single backoff delay.
const MAX_BACKOFF_SECS: u64 = 8;

/// Turns a story position into the next scene through an injected driver.
///
/// The generator owns the full reliability policy:
/// - transient transport failures (per [`RetryableError`]) are retried with
///   exponential backoff and jitter, three attempts in total;
/// - a response that survives transport but fails to parse triggers exactly
///   one corrective re-request with a stricter format instruction;
/// - whatever still fails surfaces as a [`GenerationError`] classified by
///   [`FailureReason`].
///
/// Drivers perform a single attempt per call, which keeps the policy in one
/// place and lets tests exercise it with scripted drivers.
#[derive(Debug)]
pub struct SceneGenerator<D> {
    driver: D,
    config: StoryConfig,
}

impl<D: CalliopeDriver> SceneGenerator<D> {
    /// Create a generator over a driver and configuration.
    pub fn new(driver: D, config: StoryConfig) -> Self {
        Self { driver, config }
    }

    /// The driver's provider name, for logging.
    pub fn provider_name(&self) -> &'static str {
        self.driver.provider_name()
    }

    /// Borrow the underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Generate the opening scene for a premise.
    #[instrument(skip(self))]
    pub async fn generate_opening(&self, premise: &str) -> CalliopeResult<Scene> {
        let prompt = prompts::opening_prompt(premise);
        let (content, choices) = self.scene_with_choices(&prompt).await?;
        Ok(Scene::with_choices(0, content, choices))
    }

    /// Generate the scene that follows a choice.
    #[instrument(skip(self, context))]
    pub async fn generate_next(
        &self,
        context: &str,
        choice: &str,
        index: usize,
    ) -> CalliopeResult<Scene> {
        let prompt = prompts::continuation_prompt(context, choice);
        let (content, choices) = self.scene_with_choices(&prompt).await?;
        Ok(Scene::with_choices(index, content, choices))
    }

    /// Generate the forced terminal scene.
    #[instrument(skip(self, context))]
    pub async fn generate_ending(
        &self,
        context: &str,
        choice: &str,
        index: usize,
    ) -> CalliopeResult<Scene> {
        let prompt = prompts::ending_prompt(context, choice);
        let raw = self.request_text(&prompt).await?;
        let content = match parse_ending(&raw) {
            Ok(content) => content,
            Err(parse_err) => {
                warn!(%parse_err, "malformed ending response, issuing corrective re-request");
                let retry_prompt = format!("{prompt}\n\n{}", prompts::STRICT_ENDING_REMINDER);
                let raw = self.request_text(&retry_prompt).await?;
                parse_ending(&raw)?
            }
        };
        Ok(Scene::terminal(index, content))
    }

    /// Request a combined scene-and-choices response, re-requesting once with
    /// a strict format reminder if the first response fails to parse.
    async fn scene_with_choices(
        &self,
        prompt: &str,
    ) -> CalliopeResult<(String, (String, String))> {
        let raw = self.request_text(prompt).await?;
        match parse_scene_with_choices(&raw) {
            Ok(parsed) => Ok(parsed),
            Err(parse_err) => {
                warn!(%parse_err, "malformed scene response, issuing corrective re-request");
                let retry_prompt = format!("{prompt}\n\n{}", prompts::STRICT_FORMAT_REMINDER);
                let raw = self.request_text(&retry_prompt).await?;
                Ok(parse_scene_with_choices(&raw)?)
            }
        }
    }

    /// Issue one logical request through the driver, retrying transient
    /// failures with backoff and converting the final error into a
    /// classified [`GenerationError`].
    async fn request_text(&self, prompt: &str) -> CalliopeResult<String> {
        use tokio_retry2::{Retry, RetryError, strategy::ExponentialBackoff, strategy::jitter};

        let request = GenerateRequest::builder()
            .messages(vec![Message::user(prompt)])
            .max_tokens(Some(*self.config.max_tokens()))
            .temperature(Some(*self.config.temperature()))
            .model(Some(self.config.model().clone()))
            .build()
            .map_err(|e| {
                GenerationError::failed(FailureReason::Unknown, format!("request build: {e}"))
            })?;

        let retry_strategy = ExponentialBackoff::from_millis(INITIAL_BACKOFF_MS)
            .factor(2)
            .max_delay(std::time::Duration::from_secs(MAX_BACKOFF_SECS))
            .map(jitter)
            .take(MAX_ATTEMPTS - 1);

        let result = Retry::spawn(retry_strategy, || async {
            match self.driver.generate(&request).await {
                Ok(response) => Ok(response),
                Err(e) => {
                    if e.is_retryable() {
                        warn!(provider = self.driver.provider_name(), error = %e,
                            "transient backend error, will retry");
                        Err(RetryError::Transient {
                            err: e,
                            retry_after: None,
                        })
                    } else {
                        Err(RetryError::Permanent(e))
                    }
                }
            }
        })
        .await;

        match result {
            Ok(response) => Ok(response.text().clone()),
            Err(e) => Err(classify(e).into()),
        }
    }
}

/// Map an exhausted or permanent transport error to its failure class.
///
/// Parse errors keep their own classification; everything else is derived
/// from the backend error kind.
fn classify(err: CalliopeError) -> GenerationError {
    let reason = match err.kind() {
        CalliopeErrorKind::Gemini(e) => match &e.kind {
            GeminiErrorKind::HttpError { status_code, .. } => match status_code {
                429 => FailureReason::RateLimited,
                408 => FailureReason::Timeout,
                401 | 403 => FailureReason::Auth,
                _ => FailureReason::Unknown,
            },
            GeminiErrorKind::MissingApiKey => FailureReason::Auth,
            _ => FailureReason::Unknown,
        },
        CalliopeErrorKind::Generation(e) => e.kind.reason(),
        _ => FailureReason::Unknown,
    };
    GenerationError::failed(reason, err.to_string())
}
