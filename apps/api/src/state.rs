use std::sync::Arc;

use crate::activity::ActivitySource;
use crate::config::Config;
use crate::layout::CanvasConfig;
use crate::llm_client::TextGenerator;
use crate::output::OutputDir;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is immutable or a stateless client handle; no request data
/// is cached between invocations.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Remote activity source. Default: `RedditClient`.
    pub activity: Arc<dyn ActivitySource>,
    /// Text-generation backend. Default: `GeminiClient`.
    pub llm: Arc<dyn TextGenerator>,
    pub output: OutputDir,
    /// Persona sheet geometry and palette.
    pub canvas: CanvasConfig,
}
