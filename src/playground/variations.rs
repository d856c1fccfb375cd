use rand::seq::SliceRandom;
use rand::Rng;

pub const PROMPT_VARIATIONS: &[&str] = &[
    "Can you explain this concept as if I'm a beginner?",
    "Analyze the following scenario with technical depth.",
    "Compare and contrast these approaches.",
];

/// Suggest a variation for the editor. A blank prompt is replaced by the
/// first variation; otherwise a random one is appended.
pub fn suggest_variation<R: Rng>(prompt: &str, rng: &mut R) -> String {
    if prompt.trim().is_empty() {
        return PROMPT_VARIATIONS[0].to_string();
    }

    let idea = PROMPT_VARIATIONS.choose(rng).copied().unwrap_or(PROMPT_VARIATIONS[0]);
    format!("{}\n\nVariation idea: {}", prompt, idea)
}
