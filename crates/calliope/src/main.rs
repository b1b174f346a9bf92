//! Interactive terminal front end for the story engine.

use std::io::{self, Write};

use calliope::{
    CalliopeResult, GeminiClient, Scene, StoryConfig, StorySession, StoryState, init_telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> CalliopeResult<()> {
    // Load .env if present; a missing file is not an error.
    dotenvy::dotenv().ok();
    init_telemetry()?;

    let config = StoryConfig::load()?;
    info!(model = %config.model(), max_length = *config.max_length(), "configuration loaded");

    let driver = GeminiClient::with_model(config.model().clone())?;
    let session = StorySession::new(driver, config);

    println!("Calliope — an interactive story engine.");
    println!("Enter a story premise (at least 10 characters), or 'q' to quit.\n");

    loop {
        match session.state() {
            StoryState::NotStarted => {
                let premise = read_line("Premise> ");
                if premise.eq_ignore_ascii_case("q") {
                    break;
                }
                match session.start(&premise).await {
                    Ok(scene) => print_scene(&scene),
                    Err(e) => eprintln!("{e}\n"),
                }
            }
            StoryState::SceneReady => {
                let input = read_line("Choose [1/2], 'r' to restart, 'q' to quit> ");
                match input.as_str() {
                    "q" | "Q" => break,
                    "r" | "R" => {
                        session.restart()?;
                        println!("\nStarting over.\n");
                    }
                    "1" | "2" => {
                        let index = if input == "1" { 0 } else { 1 };
                        match session.select(index).await {
                            Ok(scene) => print_scene(&scene),
                            Err(e) => eprintln!("{e}\n"),
                        }
                    }
                    _ => println!("Please enter 1, 2, 'r', or 'q'."),
                }
            }
            StoryState::Ended => {
                let summary = session.summary();
                println!(
                    "The story is complete after {} scenes.",
                    summary.total_scenes()
                );
                let input = read_line("'r' for a new story, 'q' to quit> ");
                if input.eq_ignore_ascii_case("r") {
                    session.restart()?;
                    println!();
                } else {
                    break;
                }
            }
            // Mutating calls are serialized through this loop, so the
            // session is never observed mid-generation here.
            StoryState::Generating => {}
        }
    }

    println!("Goodbye.");
    Ok(())
}

fn print_scene(scene: &Scene) {
    println!("\n{}\n", scene.content());
    for choice in scene.choices() {
        println!("  {}. {}", choice.ordinal() + 1, choice.text());
    }
    if scene.is_terminal() {
        println!("  THE END");
    }
    println!();
}

fn read_line(prompt: &str) -> String {
    print!("{prompt}");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if io::stdin().read_line(&mut line).is_err() {
        return "q".to_string();
    }
    line.trim().to_string()
}
