//! Prompt templates for scene generation.
//!
//! Every non-terminal request asks for the scene narrative and both choices
//! in a single response, delimited by `SCENE:`, `CHOICE_1:`, and `CHOICE_2:`
//! labels. Ending requests ask for narrative only.

/// Format instructions appended to every non-terminal prompt.
const FORMAT_BLOCK: &str = "\
Format your response EXACTLY as:
SCENE: [the scene narrative here]
CHOICE_1: [first choice text here]
CHOICE_2: [second choice text here]

Each choice should be 8-15 words, action-oriented, and lead to a different
outcome. Do not add any other text, explanations, or formatting.";

/// Sent verbatim as an extra instruction when a response fails to parse,
/// before the single corrective re-request.
pub(crate) const STRICT_FORMAT_REMINDER: &str = "\
Your previous response did not follow the required format. Respond again with
EXACTLY three labeled lines and nothing else:
SCENE: [the scene narrative]
CHOICE_1: [first choice, 8-15 words]
CHOICE_2: [second choice, 8-15 words, different from the first]";

/// Corrective instruction for a malformed ending response.
pub(crate) const STRICT_ENDING_REMINDER: &str = "\
Your previous response was not usable. Respond again with ONLY the ending
scene narrative, 4-6 complete sentences, no labels, no choices, no
meta-commentary.";

/// Prompt for the opening scene of a new story.
pub(crate) fn opening_prompt(premise: &str) -> String {
    format!(
        "You are a creative storytelling AI. Create an engaging opening scene \
for an interactive story.

Story premise: {premise}

Instructions:
1. Write a brief, engaging opening scene (3-5 sentences max)
2. Set the atmosphere and introduce the situation concisely
3. End at a decision point where the reader must make a choice
4. Use present tense for immediacy

{FORMAT_BLOCK}"
    )
}

/// Prompt for the next scene after the reader picks a choice.
pub(crate) fn continuation_prompt(context: &str, choice: &str) -> String {
    format!(
        "You are continuing an interactive story. Write the next scene based \
on the reader's choice.

{context}

The reader chose: \"{choice}\"

Instructions:
1. Write the next scene (3-5 sentences max) that follows naturally from the choice
2. Show the consequences and developments from the decision
3. Maintain consistency with previous events
4. End at another decision point
5. Use present tense

{FORMAT_BLOCK}"
    )
}

/// Prompt for the forced terminal scene.
pub(crate) fn ending_prompt(context: &str, choice: &str) -> String {
    format!(
        "You are concluding an interactive story. Write a satisfying ending scene.

{context}

The reader's final choice: \"{choice}\"

Instructions:
1. Write a conclusive scene (4-6 sentences max)
2. Resolve the main story threads
3. Provide a satisfying emotional payoff
4. Reference key moments from the journey briefly
5. Use present tense

This is the final scene. Do not end with a cliffhanger or new choices.
Write ONLY the ending scene narrative."
    )
}
