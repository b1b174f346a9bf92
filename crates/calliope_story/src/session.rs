//! Session lifecycle and turn control.

use std::sync::Mutex;

use calliope_error::{CalliopeResult, StoryError, StoryErrorKind};
use calliope_interface::CalliopeDriver;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::StoryConfig;
use crate::context::ContextBuilder;
use crate::generator::SceneGenerator;
use crate::scene::{Scene, Story};
use crate::turn::StoryState;

/// Mutable session state, guarded by one lock.
#[derive(Debug)]
struct SessionInner {
    story: Option<Story>,
    state: StoryState,
}

/// A single reader's story session: the only mutating surface a renderer
/// needs.
///
/// All methods take `&self`; internal state lives behind a mutex so the
/// session can be shared (for example in an `Arc`) across a UI task and a
/// generation task. While a generation request is in flight the state is
/// [`StoryState::Generating`] and every other mutating call fails fast with
/// `Busy` rather than queueing. The lock is never held across an await:
/// state transitions are committed before and after the backend call.
///
/// # Examples
///
/// ```rust,ignore
/// let session = StorySession::new(driver, StoryConfig::load()?);
/// let opening = session.start("A cartographer maps a city that rearranges itself nightly").await?;
/// println!("{}", opening.content());
/// let next = session.select(1).await?;
/// ```
#[derive(Debug)]
pub struct StorySession<D> {
    inner: Mutex<SessionInner>,
    generator: SceneGenerator<D>,
    context: ContextBuilder,
    config: StoryConfig,
}

/// Read-only snapshot of a session for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct StorySummary {
    /// Scenes generated so far
    total_scenes: usize,
    /// Current lifecycle state
    state: StoryState,
    /// Whether the reader is expected to pick a choice
    awaiting_choice: bool,
    /// Texts of the choices taken, in order
    chosen_path: Vec<String>,
}

impl<D: CalliopeDriver> StorySession<D> {
    /// Create a session over a driver and configuration.
    pub fn new(driver: D, config: StoryConfig) -> Self {
        let context = ContextBuilder::new(*config.context_scenes());
        Self {
            inner: Mutex::new(SessionInner {
                story: None,
                state: StoryState::NotStarted,
            }),
            generator: SceneGenerator::new(driver, config.clone()),
            context,
            config,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StoryState {
        self.inner.lock().unwrap().state
    }

    /// The scene currently shown to the reader, if any.
    pub fn current_scene(&self) -> Option<Scene> {
        let inner = self.inner.lock().unwrap();
        inner
            .story
            .as_ref()
            .and_then(|s| s.current_scene().ok().cloned())
    }

    /// All scenes generated so far, in narrative order.
    pub fn history(&self) -> Vec<Scene> {
        let inner = self.inner.lock().unwrap();
        inner
            .story
            .as_ref()
            .map(|s| s.scenes().clone())
            .unwrap_or_default()
    }

    /// Number of scenes generated so far.
    pub fn scene_count(&self) -> usize {
        let inner = self.inner.lock().unwrap();
        inner.story.as_ref().map_or(0, Story::scene_count)
    }

    /// Texts of the choices taken so far.
    pub fn chosen_path(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        inner.story.as_ref().map_or_else(Vec::new, |s| {
            s.chosen_path().into_iter().map(String::from).collect()
        })
    }

    /// A display snapshot of the session.
    pub fn summary(&self) -> StorySummary {
        let inner = self.inner.lock().unwrap();
        let chosen_path = inner.story.as_ref().map_or_else(Vec::new, |s| {
            s.chosen_path().into_iter().map(String::from).collect()
        });
        StorySummary {
            total_scenes: inner.story.as_ref().map_or(0, Story::scene_count),
            state: inner.state,
            awaiting_choice: inner.state == StoryState::SceneReady,
            chosen_path,
        }
    }

    /// Begin a story from a premise and generate its opening scene.
    ///
    /// The premise is validated before any backend call is made. On
    /// generation failure the session returns to `NotStarted` and the
    /// premise is not retained.
    ///
    /// # Errors
    ///
    /// - `PremiseTooShort` if the trimmed premise is under the minimum
    /// - `Busy` if a generation request is already in flight
    /// - `InvalidState` unless the session is `NotStarted`
    /// - a classified generation error if the backend ultimately fails
    #[instrument(skip(self))]
    pub async fn start(&self, premise: &str) -> CalliopeResult<Scene> {
        let mut story = Story::new(premise, *self.config.max_length())?;

        {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_busy() {
                return Err(StoryError::new(StoryErrorKind::Busy).into());
            }
            if inner.state != StoryState::NotStarted {
                return Err(StoryError::new(StoryErrorKind::InvalidState {
                    operation: "start",
                    state: inner.state.to_string(),
                })
                .into());
            }
            inner.state = StoryState::Generating;
        }

        let result = self.generator.generate_opening(story.premise()).await;

        // Every path out of this block must leave a non-Generating state,
        // or the session would reject mutating calls forever.
        let mut inner = self.inner.lock().unwrap();
        match result {
            Ok(scene) => match story.append_scene(scene.clone()) {
                Ok(()) => {
                    inner.story = Some(story);
                    inner.state = StoryState::SceneReady;
                    info!(provider = self.generator.provider_name(), "story started");
                    Ok(scene)
                }
                Err(e) => {
                    inner.state = StoryState::NotStarted;
                    Err(e.into())
                }
            },
            Err(e) => {
                inner.state = StoryState::NotStarted;
                Err(e)
            }
        }
    }

    /// Record the reader's choice and generate the next scene.
    ///
    /// When the story is one scene short of its length bound, the request is
    /// for a terminal scene and the session moves to `Ended` on success. On
    /// generation failure the recorded choice is rolled back and the session
    /// returns to `SceneReady` with the story observably unchanged.
    ///
    /// # Errors
    ///
    /// - `Busy` if a generation request is already in flight
    /// - `InvalidState` unless the session is `SceneReady`
    /// - `InvalidChoice` if the index is not 0 or 1
    /// - a classified generation error if the backend ultimately fails
    #[instrument(skip(self))]
    pub async fn select(&self, index: usize) -> CalliopeResult<Scene> {
        let (context, choice_text, next_index, is_final) = {
            let mut inner = self.inner.lock().unwrap();
            if inner.state.is_busy() {
                return Err(StoryError::new(StoryErrorKind::Busy).into());
            }
            if inner.state != StoryState::SceneReady {
                return Err(StoryError::new(StoryErrorKind::InvalidState {
                    operation: "select",
                    state: inner.state.to_string(),
                })
                .into());
            }
            let story = inner
                .story
                .as_mut()
                .ok_or_else(|| StoryError::new(StoryErrorKind::EmptyStory))?;

            story.record_choice(index)?;
            let choice_text = story
                .current_scene()?
                .selected_choice()
                .map(|c| c.text().clone())
                .unwrap_or_default();
            let context = self.context.build(story);
            let next_index = story.scene_count();
            // The bound is enforced here, before any request is issued: the
            // scene that would hit max_length is requested as an ending.
            let is_final = next_index + 1 >= *story.max_length();
            inner.state = StoryState::Generating;
            (context, choice_text, next_index, is_final)
        };

        let result = if is_final {
            self.generator
                .generate_ending(&context, &choice_text, next_index)
                .await
        } else {
            self.generator
                .generate_next(&context, &choice_text, next_index)
                .await
        };

        // Every path out of this block must leave a non-Generating state,
        // or the session would reject mutating calls forever.
        let mut inner = self.inner.lock().unwrap();
        match result {
            Ok(scene) => {
                let Some(story) = inner.story.as_mut() else {
                    inner.state = StoryState::NotStarted;
                    return Err(StoryError::new(StoryErrorKind::EmptyStory).into());
                };
                match story.append_scene(scene.clone()) {
                    Ok(()) => {
                        inner.state = if scene.is_terminal() {
                            info!(scenes = story.scene_count(), "story ended");
                            StoryState::Ended
                        } else {
                            StoryState::SceneReady
                        };
                        Ok(scene)
                    }
                    Err(e) => {
                        story.clear_current_selection();
                        inner.state = StoryState::SceneReady;
                        Err(e.into())
                    }
                }
            }
            Err(e) => {
                if let Some(story) = inner.story.as_mut() {
                    story.clear_current_selection();
                }
                inner.state = StoryState::SceneReady;
                Err(e)
            }
        }
    }

    /// Discard the current story and return to `NotStarted`.
    ///
    /// # Errors
    ///
    /// Fails with `Busy` if a generation request is in flight.
    pub fn restart(&self) -> CalliopeResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.state.is_busy() {
            return Err(StoryError::new(StoryErrorKind::Busy).into());
        }
        inner.story = None;
        inner.state = StoryState::NotStarted;
        Ok(())
    }
}
