//! Narrative graph invariants: premise validation, choice recording, and
//! the scene capacity bound.

use calliope_error::StoryErrorKind;
use calliope_story::{CHOICES_PER_SCENE, MIN_PREMISE_LEN, Scene, Story};

fn story() -> Story {
    Story::new("A lighthouse keeper finds a message in a bottle", 3).unwrap()
}

fn scene(index: usize) -> Scene {
    Scene::with_choices(
        index,
        format!("Scene {index} narrative"),
        (
            "Climb down to the shore".to_string(),
            "Radio the mainland".to_string(),
        ),
    )
}

#[test]
fn premise_trimmed_and_validated() {
    let story = Story::new("  A ghost ship drifts into harbor  ", 5).unwrap();
    assert_eq!(story.premise(), "A ghost ship drifts into harbor");

    let err = Story::new("   short   ", 5).unwrap_err();
    assert!(matches!(
        err.kind,
        StoryErrorKind::PremiseTooShort {
            min: MIN_PREMISE_LEN,
            got: 5
        }
    ));
}

#[test]
fn premise_length_counts_characters_not_bytes() {
    // Ten multibyte characters satisfy the minimum.
    assert!(Story::new("日本語の物語の始まり!", 5).is_ok());
}

#[test]
fn empty_story_has_no_current_scene() {
    let story = story();
    assert_eq!(story.scene_count(), 0);
    assert!(matches!(
        story.current_scene().unwrap_err().kind,
        StoryErrorKind::EmptyStory
    ));
    assert!(matches!(
        story.clone().record_choice(0).unwrap_err().kind,
        StoryErrorKind::EmptyStory
    ));
}

#[test]
fn append_respects_capacity() {
    let mut story = story();
    story.append_scene(scene(0)).unwrap();
    story.append_scene(scene(1)).unwrap();
    story.append_scene(Scene::terminal(2, "The end of the tale")).unwrap();

    let err = story.append_scene(scene(3)).unwrap_err();
    assert!(matches!(err.kind, StoryErrorKind::CapacityExceeded { max: 3 }));
    assert_eq!(story.scene_count(), 3);
}

#[test]
fn non_terminal_scene_offers_the_full_pair() {
    let scene = scene(0);
    assert_eq!(scene.choices().len(), CHOICES_PER_SCENE);
    assert!(!scene.is_terminal());
    assert!(Scene::terminal(0, "The end").choices().is_empty());
}

#[test]
fn choice_recorded_exactly_once() {
    let mut story = story();
    story.append_scene(scene(0)).unwrap();

    story.record_choice(1).unwrap();
    let selected = story.current_scene().unwrap().selected_choice().unwrap();
    assert_eq!(selected.text(), "Radio the mainland");
    assert_eq!(*selected.ordinal(), 1);

    let err = story.record_choice(0).unwrap_err();
    assert!(matches!(err.kind, StoryErrorKind::ChoiceAlreadyRecorded));
}

#[test]
fn out_of_range_choice_rejected_without_mutation() {
    let mut story = story();
    story.append_scene(scene(0)).unwrap();

    let err = story.record_choice(2).unwrap_err();
    assert!(matches!(err.kind, StoryErrorKind::InvalidChoice { index: 2 }));
    assert!(story.current_scene().unwrap().selected_choice().is_none());
}

#[test]
fn terminal_scene_accepts_no_choice() {
    let mut story = story();
    story.append_scene(Scene::terminal(0, "It ends here")).unwrap();
    assert!(story.is_complete());

    let err = story.record_choice(0).unwrap_err();
    assert!(matches!(err.kind, StoryErrorKind::TerminalScene));
}

#[test]
fn chosen_path_tracks_selections_in_order() {
    let mut story = story();
    story.append_scene(scene(0)).unwrap();
    story.record_choice(0).unwrap();
    story.append_scene(scene(1)).unwrap();
    story.record_choice(1).unwrap();
    story.append_scene(Scene::terminal(2, "The end")).unwrap();

    assert_eq!(
        story.chosen_path(),
        vec!["Climb down to the shore", "Radio the mainland"]
    );
    assert!(story.is_complete());
}
