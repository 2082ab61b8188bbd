//! Paint pass — turns a `LayoutPlan` into pixels and writes the PNG.
//!
//! CPU-bound: callers run `render_persona` inside `tokio::task::spawn_blocking`.

use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::layout::canvas::CanvasConfig;
use crate::layout::plan::{plan_persona, DrawOp, LayoutPlan, PlanRect, TextStyle};
use crate::output::OutputDir;
use crate::persona::record::PersonaRecord;

/// Side length of a `font8x8` glyph cell.
const BITMAP_GLYPH_PX: u32 = 8;
/// Requested pixel size per whole-number glyph magnification.
const BITMAP_PX_PER_STEP: f32 = 12.0;

/// The face used for every text op of one render.
pub enum Typeface {
    TrueType(FontVec),
    /// Built-in 8×8 glyphs, scaled to roughly the requested pixel size.
    Bitmap,
}

impl Typeface {
    /// Loads the TrueType file at `path`, falling back to the bitmap glyphs.
    pub fn load(path: &Path) -> Self {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(
                    "Font {} unavailable ({e}); using built-in bitmap glyphs",
                    path.display()
                );
                return Typeface::Bitmap;
            }
        };
        match FontVec::try_from_vec(bytes) {
            Ok(font) => Typeface::TrueType(font),
            Err(e) => {
                warn!(
                    "Font {} is not a usable TrueType face ({e}); using built-in bitmap glyphs",
                    path.display()
                );
                Typeface::Bitmap
            }
        }
    }

    fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, px: f32, color: Rgb<u8>, text: &str) {
        match self {
            Typeface::TrueType(font) => {
                draw_text_mut(canvas, color, x, y, PxScale::from(px), font, text)
            }
            Typeface::Bitmap => draw_bitmap_text(canvas, x, y, px, color, text),
        }
    }
}

fn draw_bitmap_text(canvas: &mut RgbImage, x: i32, y: i32, px: f32, color: Rgb<u8>, text: &str) {
    // Truncation is intended: body (20 px) → 1×, heading (24 px) → 2×.
    let scale = ((px / BITMAP_PX_PER_STEP) as u32).max(1);
    let advance = i32::try_from(BITMAP_GLYPH_PX * scale).unwrap_or(i32::MAX);
    let step = i32::try_from(scale).unwrap_or(1);

    let mut pen_x = x;
    for c in text.chars() {
        let glyph = BASIC_FONTS
            .get(c)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..8i32 {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                let px_x = pen_x + col * step;
                let px_y = y + row as i32 * step;
                draw_filled_rect_mut(canvas, Rect::at(px_x, px_y).of_size(scale, scale), color);
            }
        }
        pen_x = pen_x.saturating_add(advance);
    }
}

fn fill_rect(canvas: &mut RgbImage, rect: &PlanRect, color: Rgb<u8>) {
    if rect.width == 0 || rect.height == 0 {
        return;
    }
    draw_filled_rect_mut(
        canvas,
        Rect::at(rect.x, rect.y).of_size(rect.width, rect.height),
        color,
    );
}

/// Allocates a canvas sized for `plan` and draws every op in order.
pub fn paint(plan: &LayoutPlan, config: &CanvasConfig, typeface: &Typeface) -> RgbImage {
    let height = plan.canvas_height(config);
    let mut canvas = RgbImage::from_pixel(config.width, height, config.background);

    for op in &plan.ops {
        match op {
            DrawOp::Fill { rect, color } => fill_rect(&mut canvas, rect, *color),
            DrawOp::Text { x, y, text, style } => {
                let px = match style {
                    TextStyle::Heading => config.heading_font_px,
                    TextStyle::Body => config.body_font_px,
                };
                typeface.draw(&mut canvas, *x, *y, px, config.text, text);
            }
        }
    }
    canvas
}

/// Measure, paint and save `{username}_persona.png`. Returns the written path.
pub fn render_persona(
    record: &PersonaRecord,
    username: &str,
    output: &OutputDir,
    font_path: &Path,
    config: &CanvasConfig,
) -> Result<PathBuf, AppError> {
    let plan = plan_persona(record, config);
    let typeface = Typeface::load(font_path);
    let canvas = paint(&plan, config, &typeface);

    std::fs::create_dir_all(output.root())?;
    let path = output.image_path(username);
    canvas
        .save(&path)
        .map_err(|e| AppError::Render(format!("Failed to write {}: {e}", path.display())))?;

    info!(
        "Rendered persona image {} ({}x{}, {} bars)",
        path.display(),
        canvas.width(),
        canvas.height(),
        plan.bars.len()
    );
    Ok(path)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
