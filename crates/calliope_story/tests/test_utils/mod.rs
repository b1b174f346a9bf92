//! Shared helpers for story engine integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use calliope_core::{GenerateRequest, GenerateResponse};
use calliope_error::{CalliopeError, CalliopeResult, GeminiError, GeminiErrorKind};
use calliope_interface::CalliopeDriver;

/// A driver that replays a fixed script of responses.
///
/// Records every prompt it receives and counts calls, so tests can assert on
/// retry behavior and prompt contents. Once the script is exhausted, further
/// calls fail with an empty-response error.
pub struct ScriptedDriver {
    responses: Mutex<VecDeque<CalliopeResult<GenerateResponse>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedDriver {
    pub fn new(responses: Vec<CalliopeResult<GenerateResponse>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalliopeDriver for ScriptedDriver {
    async fn generate(&self, req: &GenerateRequest) -> CalliopeResult<GenerateResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let prompt = req
            .messages()
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        self.prompts.lock().unwrap().push(prompt);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GeminiError::new(GeminiErrorKind::EmptyResponse).into()))
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted-model"
    }
}

/// A driver that blocks inside `generate` until released, for exercising the
/// busy guard. Signals `entered` when a call arrives and waits on `gate`.
pub struct GatedDriver {
    pub entered: tokio::sync::Notify,
    pub gate: tokio::sync::Notify,
    response: GenerateResponse,
}

impl GatedDriver {
    pub fn new(response: GenerateResponse) -> Self {
        Self {
            entered: tokio::sync::Notify::new(),
            gate: tokio::sync::Notify::new(),
            response,
        }
    }
}

#[async_trait]
impl CalliopeDriver for GatedDriver {
    async fn generate(&self, _req: &GenerateRequest) -> CalliopeResult<GenerateResponse> {
        self.entered.notify_one();
        self.gate.notified().await;
        Ok(self.response.clone())
    }

    fn provider_name(&self) -> &'static str {
        "gated"
    }

    fn model_name(&self) -> &str {
        "gated-model"
    }
}

/// A well-formed scene-and-choices response, parameterized so successive
/// scenes are distinguishable.
pub fn scene_response(n: usize) -> CalliopeResult<GenerateResponse> {
    Ok(GenerateResponse::new(scene_text(n)))
}

pub fn scene_text(n: usize) -> String {
    format!(
        "SCENE: The lighthouse beam sweeps the rocks in scene {n} as the storm gathers force over the bay.\n\
CHOICE_1: Climb down to the shore for a closer look\n\
CHOICE_2: Radio the mainland and report what you saw"
    )
}

/// A well-formed terminal scene response.
pub fn ending_response() -> CalliopeResult<GenerateResponse> {
    Ok(GenerateResponse::new(
        "The storm finally breaks, and dawn finds the keeper safe in the lamp room, \
the bottle's message delivered at last.",
    ))
}

/// A response with no parsable choice labels.
pub fn malformed_response() -> CalliopeResult<GenerateResponse> {
    Ok(GenerateResponse::new(
        "The lighthouse beam sweeps the rocks as the storm gathers force over the bay, \
but no options present themselves.",
    ))
}

/// A retryable backend failure.
pub fn transient_error() -> CalliopeError {
    GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 503,
        message: "service unavailable".to_string(),
    })
    .into()
}

/// A permanent backend failure that must not be retried.
pub fn auth_error() -> CalliopeError {
    GeminiError::new(GeminiErrorKind::HttpError {
        status_code: 401,
        message: "unauthorized".to_string(),
    })
    .into()
}
