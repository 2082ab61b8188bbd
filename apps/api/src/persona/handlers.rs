//! Axum route handlers for the Persona API.

use std::path::PathBuf;

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::profile::{username_from_profile_url, validate_username};
use crate::errors::AppError;
use crate::persona::generator::generate_persona;
use crate::persona::record::PersonaRecord;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// e.g. `https://www.reddit.com/user/kojied/`
    pub profile_url: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub username: String,
    pub persona: PersonaRecord,
    pub json_path: PathBuf,
    pub image_path: PathBuf,
    pub json_download: String,
    pub image_download: String,
    pub generated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/personas
///
/// Full pipeline for the account behind `profile_url`: fetch → LLM → JSON → PNG.
pub async fn handle_generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let username = username_from_profile_url(&request.profile_url)?;

    let generated = generate_persona(&state, &username).await?;

    Ok(Json(GenerateResponse {
        json_download: format!("/api/v1/personas/{username}/json"),
        image_download: format!("/api/v1/personas/{username}/image"),
        username: generated.username,
        persona: generated.record,
        json_path: generated.json_path,
        image_path: generated.image_path,
        generated_at: generated.generated_at,
    }))
}

/// GET /api/v1/personas/:username/json
pub async fn handle_download_json(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    validate_username(&username)?;
    let path = state.output.json_path(&username);
    attachment(path, "application/json", format!("{username}_persona.json")).await
}

/// GET /api/v1/personas/:username/image
pub async fn handle_download_image(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response, AppError> {
    validate_username(&username)?;
    let path = state.output.image_path(&username);
    attachment(path, "image/png", format!("{username}_persona.png")).await
}

async fn attachment(
    path: PathBuf,
    content_type: &str,
    file_name: String,
) -> Result<Response, AppError> {
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!(
                "No persona has been generated yet ({file_name})"
            )));
        }
        Err(e) => return Err(AppError::Io(e)),
    };

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
