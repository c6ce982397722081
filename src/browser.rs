//! Browser wiring: DOM lookup, `requestAnimationFrame` loop and hide timer.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlCanvasElement, HtmlElement, Window, window};

use crate::canvas::{CanvasSurface, DomOverlay};
use crate::config::FxConfig;
use crate::error::{FxError, Result};
use crate::keepsake::{self, Keepsake, LocalStore};
use crate::scheduler::{FrameOutcome, HeartFx};
use crate::surface::Viewport;

pub const OVERLAY_ID: &str = "fxOverlay";
pub const CANVAS_ID: &str = "fxCanvas";

type SharedFx = Rc<RefCell<HeartFx<CanvasSurface, DomOverlay>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

thread_local! {
    static DEFAULT_FX: RefCell<Option<SharedFx>> = const { RefCell::new(None) };
}

/// Heart effect bound to explicit overlay / canvas elements.
#[wasm_bindgen]
pub struct HeartFxHandle {
    fx: SharedFx,
}

#[wasm_bindgen]
impl HeartFxHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(overlay: HtmlElement, canvas: HtmlCanvasElement) -> std::result::Result<HeartFxHandle, JsValue> {
        let surface = CanvasSurface::new(canvas)?;
        Ok(Self {
            fx: Rc::new(RefCell::new(HeartFx::new(surface, DomOverlay::new(overlay)))),
        })
    }

    pub fn start(&self, duration_ms: Option<f64>) -> std::result::Result<(), JsValue> {
        start_run(&self.fx, config_for(duration_ms))?;
        Ok(())
    }

    /// Start with a JSON config, e.g. `{"durationMs": 3000, "seed": 7}`.
    #[wasm_bindgen(js_name = startWithConfig)]
    pub fn start_with_config(&self, config_json: &str) -> std::result::Result<(), JsValue> {
        let config: FxConfig = serde_json::from_str(config_json).map_err(FxError::from)?;
        start_run(&self.fx, config)?;
        Ok(())
    }

    pub fn cancel(&self) {
        self.fx.borrow_mut().cancel();
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.fx.borrow().is_active()
    }
}

/// Play the effect on the page's `#fxOverlay` / `#fxCanvas`.
#[wasm_bindgen(js_name = runPixelHeartFX)]
pub fn run_pixel_heart_fx(duration_ms: Option<f64>) -> std::result::Result<(), JsValue> {
    let fx = default_fx()?;
    start_run(&fx, config_for(duration_ms))?;
    Ok(())
}

/// Counters from localStorage as JSON, seeding the defaults on first use.
#[wasm_bindgen(js_name = loadCounters)]
pub fn load_counters() -> std::result::Result<String, JsValue> {
    let mut keepsake = Keepsake::new(LocalStore::open()?);
    let counters = keepsake.load_counters();
    Ok(serde_json::to_string(&counters).map_err(FxError::from)?)
}

/// Whether this tab passed the entry page. The page redirects when it has not.
#[wasm_bindgen(js_name = isUnlocked)]
pub fn is_unlocked() -> std::result::Result<bool, JsValue> {
    Ok(keepsake::is_unlocked(&LocalStore::session()?))
}

fn config_for(duration_ms: Option<f64>) -> FxConfig {
    duration_ms.map(FxConfig::with_duration).unwrap_or_default()
}

fn default_fx() -> Result<SharedFx> {
    if let Some(fx) = DEFAULT_FX.with(|cell| cell.borrow().clone()) {
        return Ok(fx);
    }
    let doc = window()
        .and_then(|w| w.document())
        .ok_or(FxError::NoContext("document"))?;
    let overlay: HtmlElement = element_by_id(&doc, OVERLAY_ID, "HTMLElement")?;
    let canvas: HtmlCanvasElement = element_by_id(&doc, CANVAS_ID, "HTMLCanvasElement")?;
    let fx = Rc::new(RefCell::new(HeartFx::new(
        CanvasSurface::new(canvas)?,
        DomOverlay::new(overlay),
    )));
    DEFAULT_FX.with(|cell| *cell.borrow_mut() = Some(fx.clone()));
    Ok(fx)
}

fn element_by_id<T: JsCast>(doc: &Document, id: &str, expected: &'static str) -> Result<T> {
    doc.get_element_by_id(id)
        .ok_or_else(|| FxError::MissingElement { id: id.to_string() })?
        .dyn_into::<T>()
        .map_err(|_| FxError::WrongElement {
            id: id.to_string(),
            expected,
        })
}

fn viewport_of(win: &Window) -> Viewport {
    let dim = |v: std::result::Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(dim(win.inner_width()), dim(win.inner_height()), win.device_pixel_ratio())
}

fn now_ms(win: &Window) -> f64 {
    win.performance().map(|p| p.now()).unwrap_or(0.0)
}

fn start_run(fx: &SharedFx, config: FxConfig) -> Result<()> {
    let win = window().ok_or(FxError::NoContext("window"))?;
    let generation = fx
        .borrow_mut()
        .start(config, viewport_of(&win), now_ms(&win))?;
    start_frame_loop(fx.clone(), generation);
    Ok(())
}

fn start_frame_loop(fx: SharedFx, generation: u64) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let outcome = fx.borrow_mut().tick(generation, ts);
        match outcome {
            FrameOutcome::RequestFrame => request_frame(&f),
            FrameOutcome::HideAfter(delay_ms) => {
                let (fx, f) = (fx.clone(), f.clone());
                set_timeout(delay_ms, move || {
                    fx.borrow_mut().hide(generation);
                    f.borrow_mut().take();
                });
            }
            FrameOutcome::Idle => {
                // Superseded run: release the loop closure once this frame returns.
                let f = f.clone();
                set_timeout(0.0, move || {
                    f.borrow_mut().take();
                });
            }
        }
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}

fn request_frame(f: &FrameCallback) {
    let Some(win) = window() else { return };
    if let Some(cb) = f.borrow().as_ref() {
        if let Err(err) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
            log::warn!("heart fx: requestAnimationFrame failed: {err:?}");
        }
    }
}

fn set_timeout(delay_ms: f64, callback: impl FnOnce() + 'static) {
    let Some(win) = window() else { return };
    let cb = Closure::once_into_js(callback);
    if let Err(err) =
        win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), delay_ms.round() as i32)
    {
        log::warn!("heart fx: setTimeout failed: {err:?}");
    }
}
