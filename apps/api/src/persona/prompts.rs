// All LLM prompt constants for the Persona module.
// The instruction block is identical for every request; only the transcript varies.

use crate::activity::ActivityItem;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;

/// Persona extraction prompt. Replace `{json_only_instruction}` and `{transcript}`.
pub const PERSONA_PROMPT_TEMPLATE: &str = r#"You are a UX researcher. You will receive Reddit comments and posts written by a single user.
Build a user persona from that activity.

ONLY return a valid JSON object matching the following structure exactly:

{
  "name": string,
  "age": string or integer,
  "location": string,
  "profile_quote": string,
  "goals": [string],
  "frustrations": [string],
  "interests": [string],
  "personality": {
    "openness": integer 0-100,
    "conscientiousness": integer 0-100,
    "extraversion": integer 0-100,
    "agreeableness": integer 0-100,
    "neuroticism": integer 0-100
  },
  "technology": [string],
  "image_hint": string,
  "citations": {
    "goals": [url],
    "frustrations": [url],
    "interests": [url],
    "personality": [url]
  }
}

Rules:
1. Every key above MUST be present. Use an empty string or empty list when the activity gives no evidence.
2. Personality scores are whole numbers between 0 and 100 inclusive.
3. Citations list the (URL: ...) values of the items that support each section.

{json_only_instruction}

Reddit Data:
{transcript}"#;

/// Renders the items in input order, one block per item.
pub fn build_transcript(items: &[ActivityItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} in {}:\n{}\n(URL: {})\n\n",
                item.kind.label(),
                item.group,
                item.text,
                item.url
            )
        })
        .collect()
}

/// Compiles the full prompt. The transcript is never truncated.
pub fn build_persona_prompt(items: &[ActivityItem]) -> String {
    PERSONA_PROMPT_TEMPLATE
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{transcript}", &build_transcript(items))
}
