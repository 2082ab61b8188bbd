// Persona pipeline: aggregate → compile prompt → extract → render.
// All LLM calls go through llm_client — no direct Gemini calls here.

pub mod extractor;
pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod record;
