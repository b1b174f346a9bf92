//! Core data structures for the narrative graph.
//!
//! The graph is deliberately a simple append-only path rather than a tree:
//! only the branch the reader actually takes is retained, and the untaken
//! choice's continuation is never materialized.

use calliope_error::{StoryError, StoryErrorKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Minimum premise length in characters, after trimming.
pub const MIN_PREMISE_LEN: usize = 10;

/// Number of choices offered at every non-terminal scene.
pub const CHOICES_PER_SCENE: usize = 2;

/// One of the two options offered at a scene.
///
/// Owned exclusively by its parent [`Scene`]; a choice has no independent
/// identity or lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Choice {
    /// Short descriptive text displayed to the reader
    text: String,
    /// Ordinal position within the scene (0 or 1)
    ordinal: usize,
}

impl Choice {
    /// Create a new choice.
    pub fn new(text: impl Into<String>, ordinal: usize) -> Self {
        Self {
            text: text.into(),
            ordinal,
        }
    }
}

/// A single generated narrative beat.
///
/// Scene content is immutable once created; the only permitted mutation is
/// recording the reader's selected choice, exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Scene {
    /// Monotonically increasing position within the story (0-based)
    index: usize,
    /// The scene narrative text
    content: String,
    /// Offered choices: exactly two for a normal scene, empty for an ending
    choices: Vec<Choice>,
    /// Index of the choice the reader selected to leave this scene
    selected: Option<usize>,
}

impl Scene {
    /// Create a non-terminal scene with its pair of choices.
    pub fn with_choices(index: usize, content: impl Into<String>, choices: (String, String)) -> Self {
        Self {
            index,
            content: content.into(),
            choices: vec![Choice::new(choices.0, 0), Choice::new(choices.1, 1)],
            selected: None,
        }
    }

    /// Create a terminal ending scene with no choices.
    pub fn terminal(index: usize, content: impl Into<String>) -> Self {
        Self {
            index,
            content: content.into(),
            choices: Vec::new(),
            selected: None,
        }
    }

    /// Whether this scene ends the story.
    pub fn is_terminal(&self) -> bool {
        self.choices.is_empty()
    }

    /// The choice the reader selected, if any.
    pub fn selected_choice(&self) -> Option<&Choice> {
        self.selected.and_then(|i| self.choices.get(i))
    }

    /// Record the reader's selection.
    ///
    /// # Errors
    ///
    /// Fails with `TerminalScene` if the scene offers no choices, with
    /// `ChoiceAlreadyRecorded` if a selection already exists, and with
    /// `InvalidChoice` if the index is out of range.
    pub(crate) fn select(&mut self, index: usize) -> Result<(), StoryError> {
        if self.is_terminal() {
            return Err(StoryError::new(StoryErrorKind::TerminalScene));
        }
        if self.selected.is_some() {
            return Err(StoryError::new(StoryErrorKind::ChoiceAlreadyRecorded));
        }
        if index >= self.choices.len() {
            return Err(StoryError::new(StoryErrorKind::InvalidChoice { index }));
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Undo a recorded selection after a failed generation, restoring the
    /// scene to its pre-selection state.
    pub(crate) fn clear_selection(&mut self) {
        self.selected = None;
    }
}

/// The full story session: the reader's premise and the path of scenes taken.
///
/// Invariants upheld by the mutation methods:
/// - `scenes.len() <= max_length`
/// - every scene except the last has a recorded choice selection
/// - the last scene is always the "current" one shown to the reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct Story {
    /// The reader's original premise
    premise: String,
    /// The path of scenes actually taken, in narrative order
    scenes: Vec<Scene>,
    /// Maximum number of scenes before the story must end
    max_length: usize,
}

impl Story {
    /// Create an empty story from a premise.
    ///
    /// The premise is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Fails with `PremiseTooShort` if the trimmed premise has fewer than
    /// [`MIN_PREMISE_LEN`] characters.
    pub fn new(premise: impl Into<String>, max_length: usize) -> Result<Self, StoryError> {
        let premise = premise.into().trim().to_string();
        let got = premise.chars().count();
        if got < MIN_PREMISE_LEN {
            return Err(StoryError::new(StoryErrorKind::PremiseTooShort {
                min: MIN_PREMISE_LEN,
                got,
            }));
        }
        Ok(Self {
            premise,
            scenes: Vec::new(),
            max_length,
        })
    }

    /// Number of scenes generated so far.
    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    /// The last scene in the path, which is always the one shown to the reader.
    ///
    /// # Errors
    ///
    /// Fails with `EmptyStory` if no scenes exist yet.
    pub fn current_scene(&self) -> Result<&Scene, StoryError> {
        self.scenes
            .last()
            .ok_or_else(|| StoryError::new(StoryErrorKind::EmptyStory))
    }

    /// Append a freshly generated scene to the path.
    ///
    /// # Errors
    ///
    /// Fails with `CapacityExceeded` if the story already holds `max_length`
    /// scenes. The bound is also checked by the session before any generation
    /// request is issued, so this is a guard rather than the primary control.
    pub fn append_scene(&mut self, scene: Scene) -> Result<(), StoryError> {
        if self.scenes.len() >= self.max_length {
            return Err(StoryError::new(StoryErrorKind::CapacityExceeded {
                max: self.max_length,
            }));
        }
        self.scenes.push(scene);
        Ok(())
    }

    /// Record the reader's choice on the current scene.
    ///
    /// # Errors
    ///
    /// Fails with `EmptyStory` if no scenes exist, and propagates the scene's
    /// own validation (`InvalidChoice`, `TerminalScene`,
    /// `ChoiceAlreadyRecorded`). The story is unchanged on any failure.
    pub fn record_choice(&mut self, index: usize) -> Result<(), StoryError> {
        let scene = self
            .scenes
            .last_mut()
            .ok_or_else(|| StoryError::new(StoryErrorKind::EmptyStory))?;
        scene.select(index)
    }

    /// Whether the story has reached its terminal scene.
    pub fn is_complete(&self) -> bool {
        self.scenes.last().is_some_and(Scene::is_terminal)
    }

    /// The texts of the choices taken so far, in narrative order.
    pub fn chosen_path(&self) -> Vec<&str> {
        self.scenes
            .iter()
            .filter_map(|scene| scene.selected_choice().map(|c| c.text().as_str()))
            .collect()
    }

    /// Undo the current scene's recorded selection after a failed generation.
    pub(crate) fn clear_current_selection(&mut self) {
        if let Some(scene) = self.scenes.last_mut() {
            scene.clear_selection();
        }
    }
}
