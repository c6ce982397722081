//! Drawing surface abstraction.
//!
//! The scheduler only talks to [`Surface`]; in the browser that is
//! [`crate::canvas::CanvasSurface`], in tests a [`RecordingSurface`]. All
//! coordinates are logical (CSS) pixels; the surface owns the DPR scaling.

use std::fmt;

use crate::error::{FxError, Result};

// --- Viewport ----------------------------------------------------------------

/// Logical viewport size plus device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, dpr: f64) -> Self {
        Self { width, height, dpr }
    }

    /// DPR below 1 (or garbage) renders at 1.
    pub fn effective_dpr(&self) -> f64 {
        if self.dpr.is_finite() { self.dpr.max(1.0) } else { 1.0 }
    }

    /// Backing buffer size in physical pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let dpr = self.effective_dpr();
        (
            (self.width.max(0.0) * dpr).floor() as u32,
            (self.height.max(0.0) * dpr).floor() as u32,
        )
    }

    pub fn min_side(&self) -> f64 {
        self.width.min(self.height).max(0.0)
    }
}

// --- Color -------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Color {
    Rgba { r: u8, g: u8, b: u8, a: f64 },
    /// Saturation and lightness in percent.
    Hsla { h: f64, s: f64, l: f64, a: f64 },
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Color::Rgba { r, g, b, a }
    }

    pub fn alpha(&self) -> f64 {
        match *self {
            Color::Rgba { a, .. } | Color::Hsla { a, .. } => a,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Color::Rgba { r, g, b, a } => write!(f, "rgba({r},{g},{b},{a})"),
            Color::Hsla { h, s, l, a } => write!(f, "hsla({h}, {s}%, {l}%, {a})"),
        }
    }
}

// --- Surface -----------------------------------------------------------------

pub trait Surface {
    /// Size the backing buffer to `viewport * dpr` and scale drawing by dpr.
    fn resize(&mut self, viewport: Viewport) -> Result<()>;
    fn clear(&mut self, w: f64, h: f64) -> Result<()>;
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) -> Result<()>;
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) -> Result<()>;
    /// Center-aligned text.
    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: Color) -> Result<()>;
}

/// One recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Resize(Viewport),
    Clear { w: f64, h: f64 },
    Rect { x: f64, y: f64, w: f64, h: f64, color: Color },
    Circle { cx: f64, cy: f64, r: f64, color: Color },
    Text { text: String, x: f64, y: f64, font: String, color: Color },
}

/// Headless surface that records draw calls. Used by tests and for
/// rendering without a document.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    pub viewport: Option<Viewport>,
    /// While set, every draw call fails (resize still succeeds).
    pub failing: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take_ops(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }

    fn record(&mut self, op: DrawOp) -> Result<()> {
        if self.failing {
            return Err(FxError::Draw("surface unavailable".into()));
        }
        self.ops.push(op);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        self.viewport = Some(viewport);
        self.ops.push(DrawOp::Resize(viewport));
        Ok(())
    }

    fn clear(&mut self, w: f64, h: f64) -> Result<()> {
        self.record(DrawOp::Clear { w, h })
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) -> Result<()> {
        self.record(DrawOp::Rect { x, y, w, h, color })
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) -> Result<()> {
        self.record(DrawOp::Circle { cx, cy, r, color })
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: Color) -> Result<()> {
        self.record(DrawOp::Text {
            text: text.to_string(),
            x,
            y,
            font: font.to_string(),
            color,
        })
    }
}
