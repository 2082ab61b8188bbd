//! Measure pass — walks a `PersonaRecord` top-to-bottom and records every
//! draw operation without touching pixels.
//!
//! Three primitives share one monotonically increasing cursor:
//! - text block:  `Label: value` (or `Label: N/A`)
//! - wrapped list: shaded section of height `(items + 1) × line_height + section_padding`
//! - proportional bar: track plus a fill of `track_width × value / 100` (truncating)
//!
//! The resulting `LayoutPlan` knows its content height, so the canvas can be
//! sized before painting and nothing clips.

use image::Rgb;

use crate::layout::canvas::CanvasConfig;
use crate::layout::wrap::wrap_text;
use crate::persona::record::{PersonaRecord, Scalar};

// ────────────────────────────────────────────────────────────────────────────
// Plan types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStyle {
    Heading,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Fill { rect: PlanRect, color: Rgb<u8> },
    Text { x: i32, y: i32, text: String, style: TextStyle },
}

/// A measured list section. `height` excludes the inset above the title.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedSection {
    pub title: String,
    pub top: i32,
    pub height: i32,
    pub item_count: usize,
    pub line_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannedBar {
    pub label: String,
    pub value: u8,
    pub y: i32,
    pub track_width: u32,
    pub filled_width: u32,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutPlan {
    pub ops: Vec<DrawOp>,
    pub sections: Vec<PlannedSection>,
    pub bars: Vec<PlannedBar>,
    /// Lowest y reached by any primitive.
    pub content_bottom: i32,
}

impl LayoutPlan {
    /// `max(min_height, content_bottom + padding)`.
    pub fn canvas_height(&self, config: &CanvasConfig) -> u32 {
        let needed = u32::try_from(self.content_bottom + config.padding).unwrap_or(0);
        needed.max(config.min_height)
    }
}

/// Filled width for a 0–100 score, truncating toward zero.
pub fn filled_width(track_width: u32, value: u8) -> u32 {
    track_width * u32::from(value.min(100)) / 100
}

/// `(items + 1) × line_height + section_padding`, independent of text length.
pub fn section_height(config: &CanvasConfig, item_count: usize) -> i32 {
    let rows = i32::try_from(item_count).unwrap_or(i32::MAX - 1) + 1;
    rows * config.line_height + config.section_padding
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor + primitives
// ────────────────────────────────────────────────────────────────────────────

/// Vertical offset threaded through the primitives. Only moves down.
#[derive(Debug, Clone, Copy)]
struct LayoutCursor {
    y: i32,
}

impl LayoutCursor {
    fn advance(&mut self, dy: i32) {
        self.y += dy.max(0);
    }
}

struct Planner<'a> {
    config: &'a CanvasConfig,
    cursor: LayoutCursor,
    plan: LayoutPlan,
}

impl<'a> Planner<'a> {
    fn new(config: &'a CanvasConfig) -> Self {
        Self {
            config,
            cursor: LayoutCursor { y: config.padding },
            plan: LayoutPlan::default(),
        }
    }

    fn text(&mut self, x: i32, y: i32, text: String, style: TextStyle) {
        self.plan.ops.push(DrawOp::Text { x, y, text, style });
    }

    fn fill(&mut self, rect: PlanRect, color: Rgb<u8>) {
        self.plan.content_bottom = self
            .plan
            .content_bottom
            .max(rect.y + i32::try_from(rect.height).unwrap_or(i32::MAX));
        self.plan.ops.push(DrawOp::Fill { rect, color });
    }

    fn mark_bottom(&mut self) {
        self.plan.content_bottom = self.plan.content_bottom.max(self.cursor.y);
    }

    fn text_block(&mut self, label: &str, value: Option<&Scalar>, style: TextStyle) {
        let shown = value
            .and_then(Scalar::display)
            .unwrap_or_else(|| "N/A".to_string());
        self.text(
            self.config.padding,
            self.cursor.y,
            format!("{label}: {shown}"),
            style,
        );
        self.cursor
            .advance(self.config.line_height + self.config.text_block_spacing);
        self.mark_bottom();
    }

    fn wrapped_list(&mut self, title: &str, items: &[String]) {
        let c = self.config;
        let top = self.cursor.y;
        let height = section_height(c, items.len());

        self.fill(
            PlanRect {
                x: 0,
                y: top - c.section_inset,
                width: c.width,
                height: u32::try_from(height + c.section_inset).unwrap_or(0),
            },
            c.section_background,
        );
        self.text(c.padding, top, format!("{title}:"), TextStyle::Heading);
        self.cursor.advance(c.line_height + c.title_spacing);

        let mut line_count = 0;
        for item in items {
            for line in wrap_text(&format!("- {item}"), c.wrap_width) {
                self.text(c.padding + c.item_indent, self.cursor.y, line, TextStyle::Body);
                self.cursor.advance(c.line_height);
                line_count += 1;
            }
        }
        self.mark_bottom();

        self.plan.sections.push(PlannedSection {
            title: title.to_string(),
            top,
            height,
            item_count: items.len(),
            line_count,
        });
        self.cursor.advance(c.section_gap);
    }

    fn proportional_bar(&mut self, label: &str, value: u8) {
        let c = self.config;
        let y = self.cursor.y;
        let bar_x = c.bar_x();
        let filled = filled_width(c.bar_track_width, value);

        self.text(c.padding, y, format!("{label}:"), TextStyle::Body);
        self.fill(
            PlanRect {
                x: bar_x,
                y,
                width: c.bar_track_width,
                height: c.bar_height,
            },
            c.bar_track,
        );
        if filled > 0 {
            self.fill(
                PlanRect {
                    x: bar_x,
                    y,
                    width: filled,
                    height: c.bar_height,
                },
                c.bar_fill,
            );
        }
        let value_x = bar_x + i32::try_from(c.bar_track_width).unwrap_or(0) + c.bar_value_gap;
        self.text(value_x, y, format!("{value}%"), TextStyle::Body);

        self.plan.bars.push(PlannedBar {
            label: label.to_string(),
            value,
            y,
            track_width: c.bar_track_width,
            filled_width: filled,
        });
        self.cursor
            .advance(i32::try_from(c.bar_height).unwrap_or(0) + c.bar_spacing);
        self.mark_bottom();
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Lays out the whole sheet in fixed order: header blocks, the four list
/// sections, the personality header, then one bar per trait in canonical order.
pub fn plan_persona(record: &PersonaRecord, config: &CanvasConfig) -> LayoutPlan {
    let mut planner = Planner::new(config);

    planner.text_block("Name", record.name.as_ref(), TextStyle::Heading);
    planner.text_block("Age", record.age.as_ref(), TextStyle::Body);
    planner.text_block("Location", record.location.as_ref(), TextStyle::Body);
    planner.text_block("Quote", record.quote.as_ref(), TextStyle::Body);
    planner.cursor.advance(config.section_gap);

    for (title, items) in record.list_sections() {
        planner.wrapped_list(title, items);
    }

    planner.wrapped_list("Personality Traits", &[]);
    for (t, value) in record.personality.iter() {
        planner.proportional_bar(t.label(), value);
    }

    planner.plan
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
