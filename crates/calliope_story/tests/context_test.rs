//! Context payload formatting and windowing.

use calliope_story::{ContextBuilder, Scene, Story};

fn story_with_scenes(count: usize) -> Story {
    let mut story = Story::new("A lighthouse keeper finds a message in a bottle", 20).unwrap();
    for i in 0..count {
        let scene = Scene::with_choices(
            i,
            format!("Narrative of scene {}", i + 1),
            (format!("Choice A{}", i + 1), format!("Choice B{}", i + 1)),
        );
        story.append_scene(scene).unwrap();
        story.record_choice(0).unwrap();
    }
    story
}

#[test]
fn empty_story_renders_premise_only() {
    let story = Story::new("A lighthouse keeper finds a message in a bottle", 20).unwrap();
    let context = ContextBuilder::new(3).build(&story);
    assert_eq!(
        context,
        "Story premise: A lighthouse keeper finds a message in a bottle"
    );
}

#[test]
fn scenes_rendered_in_order_with_choices() {
    let story = story_with_scenes(2);
    let context = ContextBuilder::new(3).build(&story);

    assert!(context.contains("Story so far:"));
    let scene1 = context.find("Scene 1:").unwrap();
    let scene2 = context.find("Scene 2:").unwrap();
    assert!(scene1 < scene2);
    assert!(context.contains("Narrative of scene 1"));
    assert!(context.contains("[Chose: Choice A1]"));
    assert!(context.contains("[Chose: Choice A2]"));
}

#[test]
fn window_drops_oldest_scenes() {
    let story = story_with_scenes(5);
    let context = ContextBuilder::new(3).build(&story);

    assert!(!context.contains("Scene 1:"));
    assert!(!context.contains("Scene 2:"));
    assert!(context.contains("Scene 3:"));
    assert!(context.contains("Scene 4:"));
    assert!(context.contains("Scene 5:"));
    // The premise survives no matter how old the early scenes are.
    assert!(context.starts_with("Story premise:"));
}

#[test]
fn unselected_current_scene_has_no_chose_line() {
    let mut story = story_with_scenes(1);
    let scene = Scene::with_choices(
        1,
        "Narrative of scene 2",
        ("Choice A2".to_string(), "Choice B2".to_string()),
    );
    story.append_scene(scene).unwrap();

    let context = ContextBuilder::new(3).build(&story);
    assert!(context.contains("[Chose: Choice A1]"));
    assert!(!context.contains("[Chose: Choice A2]"));
}

#[test]
fn identical_state_renders_identically() {
    let story = story_with_scenes(4);
    let builder = ContextBuilder::new(3);
    assert_eq!(builder.build(&story), builder.build(&story));
}
