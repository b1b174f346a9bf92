//! Parsing and cleaning of raw backend responses.
//!
//! The backend is asked for labeled `SCENE:` / `CHOICE_1:` / `CHOICE_2:`
//! lines, but models drift: the parser tolerates markdown wrapping, blank
//! lines, and narrative text spilling across multiple lines, while still
//! rejecting responses that are missing a label or produce degenerate
//! choices.

use calliope_error::{FailureReason, GenerationError};

/// Minimum length of a usable scene narrative, in characters.
pub const MIN_SCENE_LEN: usize = 50;

/// Minimum length of a usable choice, in characters.
pub const MIN_CHOICE_LEN: usize = 8;

/// Strip formatting artifacts from scene narrative text.
///
/// Removes markdown emphasis markers, drops lines that look like leaked
/// choices or meta-commentary, and normalizes paragraph breaks.
///
/// # Examples
///
/// ```
/// use calliope_story::clean_scene_text;
///
/// let raw = "**The door creaks open.**\nCHOICE_1: run\nWhat do you do?";
/// assert_eq!(clean_scene_text(raw), "The door creaks open.");
/// ```
pub fn clean_scene_text(raw: &str) -> String {
    let stripped = raw.replace("**", "").replace('*', "");

    let kept: Vec<&str> = stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let lower = line.to_lowercase();
            !(line.starts_with("CHOICE")
                || line.starts_with("Option")
                || line.starts_with('[')
                || lower.starts_with("what do you")
                || lower.starts_with("what will you"))
        })
        .collect();

    kept.join("\n\n").trim().to_string()
}

/// Parse a combined scene-and-choices response.
///
/// Returns the cleaned scene narrative and the two choice texts. Everything
/// before the first `CHOICE_1:` label counts as narrative, with an optional
/// leading `SCENE:` label stripped.
///
/// # Errors
///
/// Fails with a `Parse` classified [`GenerationError`] when either choice
/// label is missing, the narrative is shorter than [`MIN_SCENE_LEN`], a
/// choice is shorter than [`MIN_CHOICE_LEN`], or the two choices are
/// identical ignoring case.
pub(crate) fn parse_scene_with_choices(
    raw: &str,
) -> Result<(String, (String, String)), GenerationError> {
    let mut scene_lines: Vec<&str> = Vec::new();
    let mut choice1: Option<String> = None;
    let mut choice2: Option<String> = None;

    for line in raw.lines() {
        let line = line.trim();
        if let Some(rest) = labeled(line, "CHOICE_1:") {
            choice1 = Some(rest.to_string());
        } else if let Some(rest) = labeled(line, "CHOICE_2:") {
            choice2 = Some(rest.to_string());
        } else if let Some(rest) = labeled(line, "SCENE:") {
            scene_lines.push(rest);
        } else {
            scene_lines.push(line);
        }
    }

    let Some(choice1) = choice1.filter(|c| !c.is_empty()) else {
        return Err(parse_failure(raw, "missing CHOICE_1 label"));
    };
    let Some(choice2) = choice2.filter(|c| !c.is_empty()) else {
        return Err(parse_failure(raw, "missing CHOICE_2 label"));
    };

    let scene = clean_scene_text(&scene_lines.join("\n"));
    if scene.chars().count() < MIN_SCENE_LEN {
        return Err(parse_failure(raw, "scene narrative too short"));
    }
    validate_choices(raw, &choice1, &choice2)?;

    Ok((scene, (choice1, choice2)))
}

/// Parse a terminal scene response, which carries narrative only.
///
/// # Errors
///
/// Fails with a `Parse` classified error when the cleaned narrative is
/// shorter than [`MIN_SCENE_LEN`].
pub(crate) fn parse_ending(raw: &str) -> Result<String, GenerationError> {
    let scene = clean_scene_text(raw);
    if scene.chars().count() < MIN_SCENE_LEN {
        return Err(parse_failure(raw, "ending narrative too short"));
    }
    Ok(scene)
}

fn labeled<'a>(line: &'a str, label: &str) -> Option<&'a str> {
    line.strip_prefix(label).map(str::trim)
}

fn validate_choices(raw: &str, choice1: &str, choice2: &str) -> Result<(), GenerationError> {
    if choice1.chars().count() < MIN_CHOICE_LEN || choice2.chars().count() < MIN_CHOICE_LEN {
        return Err(parse_failure(raw, "choice text too short"));
    }
    if choice1.to_lowercase() == choice2.to_lowercase() {
        return Err(parse_failure(raw, "choices are not distinct"));
    }
    Ok(())
}

#[track_caller]
fn parse_failure(raw: &str, detail: &str) -> GenerationError {
    // Truncate the echoed response so log lines stay readable.
    let preview: String = raw.chars().take(120).collect();
    GenerationError::failed(
        FailureReason::Parse,
        format!("{detail}; response began: {preview:?}"),
    )
}
