//! Heart FX core crate.
//!
//! A full-screen pixel-heart celebration: a heart silhouette is rasterised on
//! a cell grid, one particle is spawned per cell at a random spot, and over a
//! fixed duration the particles are pulled into formation with attraction and
//! damping that ramp up as the run settles. The simulation and scheduler are
//! plain Rust and run natively under `cargo test`; the canvas / DOM / frame
//! loop wiring is only compiled for `wasm32`.
//!
//! The `keepsake` module carries the page's small persistence and countdown
//! helpers; the effect does not depend on it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod keepsake;
pub mod mask;
pub mod particles;
pub mod rng;
pub mod scheduler;
pub mod surface;

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
#[cfg(target_arch = "wasm32")]
mod logger;

pub use config::FxConfig;
pub use error::{FxError, Result};
pub use mask::{GridLayout, HeartMask};
pub use particles::{Particle, ParticleSystem};
pub use rng::{RandomSource, XorShiftRng};
pub use scheduler::{AnimationRun, FrameOutcome, HeartFx, Overlay, RunPhase};
pub use surface::{Color, Surface, Viewport};

#[cfg(target_arch = "wasm32")]
pub use browser::{HeartFxHandle, run_pixel_heart_fx};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}
