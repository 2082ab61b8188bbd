//! Persona Extractor — one backend call, strict parse, persist.
//!
//! Outcomes:
//! - empty input → `NoDataFound` before any backend call
//! - backend failure, unparseable or schema-violating output → `InvalidModelOutput`
//! - success → the record, persisted as `{username}_persona.json`
//!
//! No retries and no repair attempts. Nothing is written unless the record is valid.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::activity::ActivityItem;
use crate::errors::AppError;
use crate::llm_client::{strip_json_fences, TextGenerator};
use crate::output::OutputDir;
use crate::persona::prompts::build_persona_prompt;
use crate::persona::record::{PersonaRecord, SchemaError};

#[derive(Debug, Clone)]
pub struct ExtractedPersona {
    pub record: PersonaRecord,
    pub json_path: PathBuf,
}

pub async fn extract_persona(
    items: &[ActivityItem],
    llm: &dyn TextGenerator,
    output: &OutputDir,
    username: &str,
) -> Result<ExtractedPersona, AppError> {
    if items.is_empty() {
        info!("No activity for {username}; skipping generation");
        return Err(AppError::NoDataFound);
    }

    let prompt = build_persona_prompt(items);
    info!(
        "Requesting persona for {} from {} items ({} prompt chars)",
        username,
        items.len(),
        prompt.len()
    );

    let response = llm
        .generate(&prompt)
        .await
        .map_err(|e| AppError::InvalidModelOutput(format!("Persona LLM call failed: {e}")))?;

    let record = parse_persona_response(&response).map_err(|e| {
        warn!(
            "Discarding persona response for {}: {} ({:?}...)",
            username,
            e,
            response.chars().take(80).collect::<String>()
        );
        AppError::InvalidModelOutput(e.to_string())
    })?;

    let json_path = output.write_persona_json(username, &record).await?;

    Ok(ExtractedPersona { record, json_path })
}

/// Trim, strip fixed-width fences, parse, strictly decode.
pub fn parse_persona_response(response: &str) -> Result<PersonaRecord, SchemaError> {
    PersonaRecord::from_json(strip_json_fences(response))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
