//! Persona Generation — orchestrates the full pipeline for one account.
//!
//! Flow: aggregate_activity → extract_persona (prompt → LLM → strict parse →
//!       persist JSON) → render_persona (measure → paint → persist PNG).
//!
//! Stages run strictly in sequence; each either succeeds or aborts the run
//! before the next stage starts.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::activity::aggregate_activity;
use crate::errors::AppError;
use crate::layout::render_persona;
use crate::persona::extractor::extract_persona;
use crate::persona::record::PersonaRecord;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct GeneratedPersona {
    pub username: String,
    pub record: PersonaRecord,
    pub json_path: PathBuf,
    pub image_path: PathBuf,
    pub generated_at: DateTime<Utc>,
}

/// Runs the pipeline for `username` and returns both artifact paths.
///
/// Steps:
/// 1. aggregate_activity() → Vec<ActivityItem> (per-kind failures already folded to empty)
/// 2. extract_persona() → PersonaRecord + `{username}_persona.json`
///    (`NoDataFound` / `InvalidModelOutput` abort here, nothing written)
/// 3. render_persona() on the blocking pool → `{username}_persona.png`
pub async fn generate_persona(
    state: &AppState,
    username: &str,
) -> Result<GeneratedPersona, AppError> {
    info!("Generating persona for {username}");

    // Step 1: Aggregate
    let items = aggregate_activity(state.activity.as_ref(), username, state.config.fetch_limit).await;

    // Step 2: Extract + persist JSON
    let extracted = extract_persona(&items, state.llm.as_ref(), &state.output, username).await?;

    // Step 3: Render on the blocking pool
    let record = extracted.record.clone();
    let owned_username = username.to_string();
    let output = state.output.clone();
    let font_path = state.config.font_path.clone();
    let canvas = state.canvas.clone();

    let image_path = tokio::task::spawn_blocking(move || {
        render_persona(&record, &owned_username, &output, &font_path, &canvas)
    })
    .await
    .map_err(|e| AppError::Render(format!("Render task failed: {e}")))??;

    info!(
        "Generated persona for {}: {} and {}",
        username,
        extracted.json_path.display(),
        image_path.display()
    );

    Ok(GeneratedPersona {
        username: username.to_string(),
        record: extracted.record,
        json_path: extracted.json_path,
        image_path,
        generated_at: Utc::now(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::activity::tests::{remark, FakeSource};
    use crate::config::Config;
    use crate::layout::plan::plan_persona;
    use crate::layout::{default_canvas_config, CanvasConfig};
    use crate::output::OutputDir;
    use crate::persona::extractor::tests::ScriptedLlm;
    use crate::persona::record::tests::sample_value;

    pub(crate) fn test_config(output_dir: PathBuf) -> Config {
        Config {
            gemini_api_key: "test-key".to_string(),
            reddit_client_id: "id".to_string(),
            reddit_secret: "secret".to_string(),
            reddit_user_agent: "persona-api tests".to_string(),
            output_dir,
            font_path: PathBuf::from("/nonexistent/arial.ttf"),
            fetch_limit: 30,
            port: 0,
            rust_log: "info".to_string(),
        }
    }

    pub(crate) fn test_state(
        tmp: &TempDir,
        source: Arc<FakeSource>,
        llm: Arc<ScriptedLlm>,
    ) -> AppState {
        let output_dir = tmp.path().join("output");
        AppState {
            config: test_config(output_dir.clone()),
            activity: source,
            llm,
            output: OutputDir::new(output_dir),
            canvas: default_canvas_config(),
        }
    }

    fn five_remarks() -> Vec<crate::activity::RawActivity> {
        (0..5)
            .map(|i| remark(&format!("remark {i}"), "rust", &format!("c{i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_five_remarks_yield_json_and_image() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(FakeSource::new(Some(five_remarks()), Some(vec![])));
        let llm = Arc::new(ScriptedLlm::replying(sample_value().to_string()));
        let state = test_state(&tmp, source, llm.clone());

        let generated = generate_persona(&state, "kojied").await.unwrap();

        // JSON document equals the parsed object.
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&generated.json_path).unwrap()).unwrap();
        assert_eq!(written, sample_value());

        // Image persisted at the fixed location.
        assert_eq!(generated.image_path, state.output.image_path("kojied"));
        let image = image::open(&generated.image_path).unwrap();
        assert_eq!(image.width(), 900);

        // Personality section: 5 bars at 80/40/20/60/30 percent of the track.
        let canvas: CanvasConfig = default_canvas_config();
        let plan = plan_persona(&generated.record, &canvas);
        let fractions: Vec<(u32, u32)> = plan
            .bars
            .iter()
            .map(|b| (b.filled_width, b.track_width))
            .collect();
        assert_eq!(
            fractions,
            vec![(320, 400), (160, 400), (80, 400), (240, 400), (120, 400)]
        );

        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        let prompt = llm.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(prompt.matches("COMMENT in r/rust:").count(), 5);
        assert!(!prompt.contains("POST in"));
    }

    #[tokio::test]
    async fn test_no_activity_is_no_data_found_and_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(FakeSource::new(Some(vec![]), Some(vec![])));
        let llm = Arc::new(ScriptedLlm::replying(sample_value().to_string()));
        let state = test_state(&tmp, source, llm.clone());

        let result = generate_persona(&state, "ghost").await;

        assert!(matches!(result, Err(AppError::NoDataFound)));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
        assert!(!state.output.json_path("ghost").exists());
        assert!(!state.output.image_path("ghost").exists());
    }

    #[tokio::test]
    async fn test_failing_sources_are_no_data_found() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(FakeSource::new(None, None));
        let llm = Arc::new(ScriptedLlm::replying(sample_value().to_string()));
        let state = test_state(&tmp, source, llm.clone());

        let result = generate_persona(&state, "suspended").await;

        assert!(matches!(result, Err(AppError::NoDataFound)));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_malformed_output_writes_no_artifacts() {
        let tmp = TempDir::new().unwrap();
        let source = Arc::new(FakeSource::new(Some(five_remarks()), None));
        let llm = Arc::new(ScriptedLlm::replying("```json\n{\"name\": \"half\"\n```"));
        let state = test_state(&tmp, source, llm);

        let result = generate_persona(&state, "kojied").await;

        assert!(matches!(result, Err(AppError::InvalidModelOutput(_))));
        assert!(!state.output.json_path("kojied").exists());
        assert!(!state.output.image_path("kojied").exists());
    }
}
