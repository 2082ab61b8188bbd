// Layout Engine: measure pass (plan) then paint pass (render).
// Painting is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod canvas;
pub mod plan;
pub mod render;
pub mod wrap;

// Re-export the public API consumed by the pipeline.
pub use canvas::{default_canvas_config, CanvasConfig};
pub use render::render_persona;
