//! The drawing backend contract.
//!
//! Figures never rasterize anything themselves. They issue calls against a
//! [`RenderSurface`] supplied by the host; coordinates passed to the surface
//! are in document space and the host applies the view transform it was
//! given through [`RenderSurface::set_transform`].

use crate::geometry::{Point, Rect};
use serde::{Deserialize, Serialize};

/// An RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const ACCENT: Color = Color::rgb(0.2, 0.45, 0.9);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Size information for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextMetrics {
    pub width: f64,
    pub ascent: f64,
    pub descent: f64,
}

impl TextMetrics {
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

pub trait RenderSurface {
    /// Replace the current transform with the affine matrix `[a, b, c, d, e, f]`.
    fn set_transform(&mut self, matrix: [f64; 6]);
    fn reset_transform(&mut self);
    fn stroke_rect(&mut self, rect: Rect, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    /// Draw `text` with its alphabetic baseline starting at `position`.
    fn fill_text(&mut self, text: &str, position: Point, color: Color);
    fn measure_text(&mut self, text: &str) -> TextMetrics;
}

/// A surface that records every call, for tests and headless tooling.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
    /// Advance per character reported by [`RenderSurface::measure_text`].
    pub char_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    SetTransform([f64; 6]),
    ResetTransform,
    StrokeRect(Rect),
    FillRect(Rect),
    FillText(String, Point),
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            char_width: 6.0,
        }
    }

    pub fn stroked_rects(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::StrokeRect(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                DrawCall::FillText(text, _) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl RenderSurface for RecordingSurface {
    fn set_transform(&mut self, matrix: [f64; 6]) {
        self.calls.push(DrawCall::SetTransform(matrix));
    }

    fn reset_transform(&mut self) {
        self.calls.push(DrawCall::ResetTransform);
    }

    fn stroke_rect(&mut self, rect: Rect, _color: Color) {
        self.calls.push(DrawCall::StrokeRect(rect));
    }

    fn fill_rect(&mut self, rect: Rect, _color: Color) {
        self.calls.push(DrawCall::FillRect(rect));
    }

    fn fill_text(&mut self, text: &str, position: Point, _color: Color) {
        self.calls.push(DrawCall::FillText(text.to_string(), position));
    }

    fn measure_text(&mut self, text: &str) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f64 * self.char_width,
            ascent: 8.0,
            descent: 2.0,
        }
    }
}
