use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::persona::record::PersonaRecord;

/// The fixed output location. Artifacts are named by account identifier.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn json_path(&self, username: &str) -> PathBuf {
        self.root.join(format!("{username}_persona.json"))
    }

    pub fn image_path(&self, username: &str) -> PathBuf {
        self.root.join(format!("{username}_persona.png"))
    }

    /// Writes the record pretty-printed and returns its path.
    pub async fn write_persona_json(
        &self,
        username: &str,
        record: &PersonaRecord,
    ) -> Result<PathBuf, AppError> {
        let body = serde_json::to_string_pretty(record)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to serialize persona: {e}")))?;

        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.json_path(username);
        tokio::fs::write(&path, body).await?;

        info!("Persisted persona JSON to {}", path.display());
        Ok(path)
    }
}
