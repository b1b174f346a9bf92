//! Bounded prompt context assembly.

use crate::{Scene, Story};

/// Compresses story history into a bounded textual payload for the backend.
///
/// The premise is always included verbatim; after it come the last `window`
/// scenes in chronological order, each followed by the choice text that was
/// selected to leave it. Earlier scenes are omitted entirely rather than
/// summarized, which keeps the payload size deterministic.
///
/// Given the same story state and window, the output is byte-identical —
/// the builder reads nothing but its inputs.
///
/// # Examples
///
/// ```
/// use calliope_story::{ContextBuilder, Story};
///
/// let story = Story::new("A detective investigates a haunted mansion", 20).unwrap();
/// let builder = ContextBuilder::new(3);
/// let context = builder.build(&story);
/// assert!(context.starts_with("Story premise:"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextBuilder {
    /// Number of most-recent scenes to include
    window: usize,
}

impl ContextBuilder {
    /// Create a builder with the given scene window.
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// The configured scene window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Render the story's recent history as a prompt payload.
    pub fn build(&self, story: &Story) -> String {
        let mut parts = vec![format!("Story premise: {}", story.premise())];

        let scenes = story.scenes();
        if !scenes.is_empty() {
            parts.push("\nStory so far:".to_string());
            let start = scenes.len().saturating_sub(self.window);
            for scene in &scenes[start..] {
                parts.push(self.render_scene(scene));
            }
        }

        parts.join("\n")
    }

    fn render_scene(&self, scene: &Scene) -> String {
        let mut lines = vec![format!("\nScene {}:", scene.index() + 1)];
        lines.push(scene.content().clone());
        if let Some(choice) = scene.selected_choice() {
            lines.push(format!("[Chose: {}]", choice.text()));
        }
        lines.join("\n")
    }
}
