//! Question text generation.
//!
//! The prompt pins down the whole animation: gear count and arrangement,
//! the first gear's sense, the alternation rule, and the green-teeth stop
//! condition. Given the same facts it is fully deterministic.

use std::fmt::Write;

use crate::sample::TaskFacts;

/// Render the question text for a sample.
#[must_use]
pub fn render_prompt(facts: &TaskFacts) -> String {
    let n = facts.gear_count;
    let mut prompt = String::new();

    // Infallible for String, unwrap is fine.
    writeln!(
        prompt,
        "A chain of {n} connected gears is {}.",
        facts.axis.description()
    )
    .unwrap();
    writeln!(prompt, "Each gear has one GREEN colored tooth.").unwrap();
    writeln!(prompt).unwrap();
    writeln!(
        prompt,
        "G1 (the first gear) rotates {} (shown by blue arrow).",
        facts.root_direction
    )
    .unwrap();
    writeln!(prompt, "Adjacent gears always rotate in OPPOSITE directions.").unwrap();
    writeln!(prompt).unwrap();
    writeln!(prompt, "Animation requirements:").unwrap();
    writeln!(prompt, "1. All gears rotate according to the direction rules").unwrap();
    writeln!(
        prompt,
        "2. The rotation STOPS when the green teeth of the last two gears (G{} and G{n}) meet exactly",
        n - 1
    )
    .unwrap();
    writeln!(
        prompt,
        "3. At the end, G{n}'s rotation direction is revealed with a blue arrow"
    )
    .unwrap();
    writeln!(prompt, "4. G{n} is highlighted when the answer is shown").unwrap();
    writeln!(prompt).unwrap();
    write!(
        prompt,
        "What direction does G{n} rotate? Show the gears rotating until the green teeth alignment stopping condition is met."
    )
    .unwrap();

    prompt
}
