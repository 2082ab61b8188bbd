//! Canvas geometry, spacing and palette for the persona sheet.
//!
//! All offsets are in pixels. The canvas is fixed-width; its height is the
//! larger of `min_height` and the measured content height.

use image::Rgb;

#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    /// Canvas never shrinks below this, even for sparse personas.
    pub min_height: u32,
    pub padding: i32,
    pub line_height: i32,
    /// Extra space after a `Label: value` block.
    pub text_block_spacing: i32,
    /// Space after each list section and after the header block.
    pub section_gap: i32,
    /// Fixed term in `(items + 1) × line_height + section_padding`.
    pub section_padding: i32,
    /// The section background starts this far above the title baseline.
    pub section_inset: i32,
    /// Extra space between a section title and its first item.
    pub title_spacing: i32,
    pub item_indent: i32,
    /// Wrap limit for list items, in characters.
    pub wrap_width: usize,
    /// Bar track starts at `padding + bar_offset`.
    pub bar_offset: i32,
    pub bar_track_width: u32,
    pub bar_height: u32,
    pub bar_spacing: i32,
    /// Gap between the end of the track and the `NN%` label.
    pub bar_value_gap: i32,
    pub body_font_px: f32,
    pub heading_font_px: f32,
    pub background: Rgb<u8>,
    pub section_background: Rgb<u8>,
    pub bar_track: Rgb<u8>,
    pub bar_fill: Rgb<u8>,
    pub text: Rgb<u8>,
}

/// The persona sheet layout: 900 px wide, at least 1600 px tall.
pub fn default_canvas_config() -> CanvasConfig {
    CanvasConfig {
        width: 900,
        min_height: 1600,
        padding: 25,
        line_height: 28,
        text_block_spacing: 5,
        section_gap: 40,
        section_padding: 30,
        section_inset: 10,
        title_spacing: 10,
        item_indent: 20,
        wrap_width: 60,
        bar_offset: 180,
        bar_track_width: 400,
        bar_height: 20,
        bar_spacing: 10,
        bar_value_gap: 10,
        body_font_px: 20.0,
        heading_font_px: 24.0,
        background: Rgb([255, 255, 255]),
        section_background: Rgb([0xf0, 0xf0, 0xf0]),
        bar_track: Rgb([0xdd, 0xdd, 0xdd]),
        bar_fill: Rgb([0x4a, 0x90, 0xe2]),
        text: Rgb([0, 0, 0]),
    }
}

impl CanvasConfig {
    /// x coordinate where every bar track begins.
    pub fn bar_x(&self) -> i32 {
        self.padding + self.bar_offset
    }
}
