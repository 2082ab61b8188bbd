// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Output-format fragment appended to every prompt that expects a JSON object back.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond with the JSON object ONLY. \
Do NOT wrap it in markdown code fences. \
Do NOT include explanations, commentary, or any text before or after the object.";
