//! `web_sys` canvas backend for [`Surface`].

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use crate::error::{FxError, Result};
use crate::scheduler::Overlay;
use crate::surface::{Color, Surface, Viewport};

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(FxError::draw)?
            .ok_or(FxError::NoContext("2d context"))?
            .dyn_into()
            .map_err(|_| FxError::NoContext("2d context"))?;
        Ok(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, viewport: Viewport) -> Result<()> {
        let dpr = viewport.effective_dpr();
        let (w, h) = viewport.backing_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let style = self.canvas.style();
        style
            .set_property("width", &format!("{}px", viewport.width))
            .map_err(FxError::draw)?;
        style
            .set_property("height", &format!("{}px", viewport.height))
            .map_err(FxError::draw)?;
        self.ctx
            .set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)
            .map_err(FxError::draw)
    }

    fn clear(&mut self, w: f64, h: f64) -> Result<()> {
        self.ctx.clear_rect(0.0, 0.0, w, h);
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) -> Result<()> {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.fill_rect(x, y, w, h);
        Ok(())
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: Color) -> Result<()> {
        self.ctx.begin_path();
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.arc(cx, cy, r, 0.0, TAU).map_err(FxError::draw)?;
        self.ctx.fill();
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f64, y: f64, font: &str, color: Color) -> Result<()> {
        self.ctx.set_fill_style_str(&color.to_string());
        self.ctx.set_font(font);
        self.ctx.set_text_align("center");
        self.ctx.fill_text(text, x, y).map_err(FxError::draw)
    }
}

/// Overlay element toggled via `style.display`.
pub struct DomOverlay {
    element: HtmlElement,
}

impl DomOverlay {
    pub fn new(element: HtmlElement) -> Self {
        Self { element }
    }

    fn set_display(&self, value: &str) -> Result<()> {
        self.element
            .style()
            .set_property("display", value)
            .map_err(FxError::draw)
    }
}

impl Overlay for DomOverlay {
    fn show(&mut self) -> Result<()> {
        self.set_display("block")
    }

    fn hide(&mut self) -> Result<()> {
        self.set_display("none")
    }
}
