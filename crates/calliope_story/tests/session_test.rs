//! Session lifecycle, turn control, and rollback behavior.

mod test_utils;

use std::sync::Arc;

use calliope_error::{CalliopeErrorKind, StoryErrorKind};
use calliope_story::{StoryConfig, StorySession, StoryState};
use test_utils::{
    GatedDriver, ScriptedDriver, auth_error, ending_response, scene_response, scene_text,
};

fn session(
    driver: ScriptedDriver,
    max_length: usize,
) -> StorySession<ScriptedDriver> {
    StorySession::new(driver, StoryConfig::default().with_max_length(max_length))
}

fn story_kind(err: &calliope_error::CalliopeError) -> &StoryErrorKind {
    match err.kind() {
        CalliopeErrorKind::Story(e) => &e.kind,
        other => panic!("expected story error, got {other}"),
    }
}

const PREMISE: &str = "A lighthouse keeper finds a message in a bottle";

#[tokio::test]
async fn shortest_story_runs_start_to_ended() {
    let driver = ScriptedDriver::new(vec![scene_response(1), ending_response()]);
    let session = session(driver, 2);

    assert_eq!(session.state(), StoryState::NotStarted);

    let opening = session.start(PREMISE).await.unwrap();
    assert_eq!(session.state(), StoryState::SceneReady);
    assert_eq!(*opening.index(), 0);
    assert_eq!(opening.choices().len(), 2);

    // max_length 2 forces the very next scene to be the ending.
    let ending = session.select(0).await.unwrap();
    assert_eq!(session.state(), StoryState::Ended);
    assert!(ending.is_terminal());
    assert_eq!(*ending.index(), 1);
    assert_eq!(session.scene_count(), 2);
    assert_eq!(
        session.chosen_path(),
        vec!["Climb down to the shore for a closer look"]
    );
}

#[tokio::test]
async fn longer_story_continues_before_forced_ending() {
    let driver = ScriptedDriver::new(vec![
        scene_response(1),
        scene_response(2),
        ending_response(),
    ]);
    let session = session(driver, 3);

    session.start(PREMISE).await.unwrap();
    let middle = session.select(1).await.unwrap();
    assert!(!middle.is_terminal());
    assert_eq!(session.state(), StoryState::SceneReady);

    let ending = session.select(0).await.unwrap();
    assert!(ending.is_terminal());
    assert_eq!(session.state(), StoryState::Ended);
    assert_eq!(session.chosen_path().len(), 2);
}

#[tokio::test]
async fn short_premise_rejected_without_backend_call() {
    let driver = ScriptedDriver::new(vec![scene_response(1)]);
    let session = session(driver, 5);

    let err = session.start("too short").await.unwrap_err();
    assert!(matches!(
        story_kind(&err),
        StoryErrorKind::PremiseTooShort { min: 10, .. }
    ));
    assert_eq!(session.state(), StoryState::NotStarted);
    // Validation happens before any generation request.
    assert_eq!(session.scene_count(), 0);
}

#[tokio::test]
async fn invalid_choice_index_leaves_session_unchanged() {
    let driver = ScriptedDriver::new(vec![scene_response(1)]);
    let session = session(driver, 5);
    session.start(PREMISE).await.unwrap();

    let err = session.select(2).await.unwrap_err();
    assert!(matches!(
        story_kind(&err),
        StoryErrorKind::InvalidChoice { index: 2 }
    ));
    assert_eq!(session.state(), StoryState::SceneReady);
    assert!(session.current_scene().unwrap().selected_choice().is_none());

    // The same turn can then be completed normally.
    assert_eq!(session.chosen_path().len(), 0);
}

#[tokio::test]
async fn failed_generation_rolls_back_recorded_choice() {
    let driver = ScriptedDriver::new(vec![scene_response(1), Err(auth_error())]);
    let session = session(driver, 5);
    session.start(PREMISE).await.unwrap();

    let err = session.select(0).await.unwrap_err();
    assert!(matches!(err.kind(), CalliopeErrorKind::Generation(_)));

    // Story observably unchanged: same scene count, no recorded selection.
    assert_eq!(session.state(), StoryState::SceneReady);
    assert_eq!(session.scene_count(), 1);
    assert!(session.current_scene().unwrap().selected_choice().is_none());

    // The turn is retryable after the failure.
    let err = session.select(1).await.unwrap_err();
    assert!(matches!(err.kind(), CalliopeErrorKind::Generation(_)));
}

#[tokio::test]
async fn failed_opening_returns_to_not_started() {
    let driver = ScriptedDriver::new(vec![Err(auth_error())]);
    let session = session(driver, 5);

    assert!(session.start(PREMISE).await.is_err());
    assert_eq!(session.state(), StoryState::NotStarted);
    assert_eq!(session.scene_count(), 0);
}

#[tokio::test]
async fn select_rejected_outside_scene_ready() {
    let driver = ScriptedDriver::new(vec![scene_response(1), ending_response()]);
    let session = session(driver, 2);

    // Before any story exists.
    let err = session.select(0).await.unwrap_err();
    assert!(matches!(
        story_kind(&err),
        StoryErrorKind::InvalidState {
            operation: "select",
            ..
        }
    ));

    session.start(PREMISE).await.unwrap();
    session.select(0).await.unwrap();
    assert_eq!(session.state(), StoryState::Ended);

    // After the ending, selecting is no longer legal.
    let err = session.select(0).await.unwrap_err();
    assert!(matches!(
        story_kind(&err),
        StoryErrorKind::InvalidState { .. }
    ));
}

#[tokio::test]
async fn second_start_rejected_while_story_in_progress() {
    let driver = ScriptedDriver::new(vec![scene_response(1)]);
    let session = session(driver, 5);
    session.start(PREMISE).await.unwrap();

    let err = session.start(PREMISE).await.unwrap_err();
    assert!(matches!(
        story_kind(&err),
        StoryErrorKind::InvalidState {
            operation: "start",
            ..
        }
    ));
}

#[tokio::test]
async fn mutating_calls_busy_while_generation_in_flight() {
    let driver = Arc::new(GatedDriver::new(calliope_core::GenerateResponse::new(
        scene_text(1),
    )));
    let session = Arc::new(StorySession::new(
        Arc::clone(&driver),
        StoryConfig::default().with_max_length(5),
    ));

    let background = {
        let session = Arc::clone(&session);
        tokio::spawn(async move { session.start(PREMISE).await })
    };

    // Wait until the driver call is actually in flight.
    driver.entered.notified().await;
    assert_eq!(session.state(), StoryState::Generating);

    let err = session.start(PREMISE).await.unwrap_err();
    assert!(matches!(story_kind(&err), StoryErrorKind::Busy));
    let err = session.select(0).await.unwrap_err();
    assert!(matches!(story_kind(&err), StoryErrorKind::Busy));
    let err = session.restart().unwrap_err();
    assert!(matches!(story_kind(&err), StoryErrorKind::Busy));

    // Reads stay available while busy.
    assert_eq!(session.scene_count(), 0);

    driver.gate.notify_one();
    background.await.unwrap().unwrap();
    assert_eq!(session.state(), StoryState::SceneReady);
}

#[tokio::test]
async fn capacity_error_does_not_strand_session_in_generating() {
    // A one-scene cap means the opening fills the story, so the ending
    // generated by the first selection has nowhere to go.
    let driver = ScriptedDriver::new(vec![
        scene_response(1),
        ending_response(),
        scene_response(2),
    ]);
    let session = session(driver, 1);
    session.start(PREMISE).await.unwrap();

    let err = session.select(0).await.unwrap_err();
    assert!(matches!(
        story_kind(&err),
        StoryErrorKind::CapacityExceeded { max: 1 }
    ));

    // The session stays usable: choice rolled back, state SceneReady,
    // restart and a fresh start both succeed.
    assert_eq!(session.state(), StoryState::SceneReady);
    assert!(session.current_scene().unwrap().selected_choice().is_none());
    session.restart().unwrap();
    session.start(PREMISE).await.unwrap();
    assert_eq!(session.state(), StoryState::SceneReady);
}

#[tokio::test]
async fn restart_clears_story_and_allows_new_start() {
    let driver = ScriptedDriver::new(vec![scene_response(1), scene_response(2)]);
    let session = session(driver, 5);
    session.start(PREMISE).await.unwrap();
    assert_eq!(session.scene_count(), 1);

    session.restart().unwrap();
    assert_eq!(session.state(), StoryState::NotStarted);
    assert_eq!(session.scene_count(), 0);
    assert!(session.current_scene().is_none());

    session.start("A cartographer maps a shifting city").await.unwrap();
    assert_eq!(session.state(), StoryState::SceneReady);
}

#[tokio::test]
async fn summary_reflects_session_progress() {
    let driver = ScriptedDriver::new(vec![scene_response(1), ending_response()]);
    let session = session(driver, 2);

    let summary = session.summary();
    assert_eq!(*summary.total_scenes(), 0);
    assert!(!*summary.awaiting_choice());

    session.start(PREMISE).await.unwrap();
    let summary = session.summary();
    assert_eq!(*summary.total_scenes(), 1);
    assert!(*summary.awaiting_choice());

    session.select(0).await.unwrap();
    let summary = session.summary();
    assert_eq!(*summary.state(), StoryState::Ended);
    assert!(!*summary.awaiting_choice());
    assert_eq!(summary.chosen_path().len(), 1);
}
