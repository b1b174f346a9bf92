//! Trait definitions for generation backends.

use async_trait::async_trait;
use calliope_core::{GenerateRequest, GenerateResponse};
use calliope_error::CalliopeResult;

/// Core trait that all generation backends must implement.
///
/// A driver performs exactly one outbound request per call and never retries
/// internally; the retry policy belongs to the orchestrator, which classifies
/// the returned error through
/// [`RetryableError`](calliope_error::RetryableError).
#[async_trait]
pub trait CalliopeDriver: Send + Sync {
    /// Generate model output for a text request.
    async fn generate(&self, req: &GenerateRequest) -> CalliopeResult<GenerateResponse>;

    /// Provider name (e.g., "gemini").
    fn provider_name(&self) -> &'static str;

    /// Default model identifier (e.g., "gemini-2.0-flash-lite").
    fn model_name(&self) -> &str;
}

// Shared drivers work anywhere a driver is expected.
#[async_trait]
impl<D: CalliopeDriver + ?Sized> CalliopeDriver for std::sync::Arc<D> {
    async fn generate(&self, req: &GenerateRequest) -> CalliopeResult<GenerateResponse> {
        (**self).generate(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
