//! Run lifecycle and per-frame driver for the heart effect.
//!
//! [`HeartFx`] is a plain state machine: the host calls [`HeartFx::start`],
//! then [`HeartFx::tick`] with a timestamp on every frame it grants, and
//! [`HeartFx::hide`] once the grace delay returned by the final tick has
//! passed. The browser wiring lives in `browser.rs`; tests drive it with
//! simulated time.
//!
//! Only one run is ever active. Starting again cancels the current run and
//! bumps the generation, so frames and hide timers belonging to the old run
//! fall through as [`FrameOutcome::Idle`].

use crate::config::FxConfig;
use crate::error::Result;
use crate::mask::{GridLayout, HeartMask};
use crate::particles::ParticleSystem;
use crate::rng::XorShiftRng;
use crate::surface::{Color, Surface, Viewport};

const BACKDROP: Color = Color::rgba(0, 0, 0, 0.30);
const GLOW: Color = Color::rgba(255, 79, 166, 0.13);
/// Glow radius as a fraction of the heart square side.
const GLOW_RADIUS: f64 = 0.42;
const GLYPH_COLOR: Color = Color::rgba(255, 255, 255, 0.90);
const GLYPH_FONT: &str = "900 22px system-ui";
/// Glyph baseline as a fraction of viewport height.
const GLYPH_Y: f64 = 0.78;

/// Full-screen overlay that hosts the canvas.
pub trait Overlay {
    fn show(&mut self) -> Result<()>;
    fn hide(&mut self) -> Result<()>;
}

/// Overlay stand-in that only tracks visibility.
#[derive(Debug, Default)]
pub struct FlagOverlay {
    pub visible: bool,
    pub shows: u32,
    pub hides: u32,
}

impl Overlay for FlagOverlay {
    fn show(&mut self) -> Result<()> {
        self.visible = true;
        self.shows += 1;
        Ok(())
    }

    fn hide(&mut self) -> Result<()> {
        self.visible = false;
        self.hides += 1;
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunPhase {
    Init,
    Running,
    /// Past the finish threshold; the glyph is drawn every frame.
    Completing,
    Hidden,
}

/// What the host should do after a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    RequestFrame,
    /// Progress hit 1; call `hide` after this many milliseconds.
    HideAfter(f64),
    /// Stale generation, no run, or hide already pending.
    Idle,
}

/// Progress in `[0, 1]` for a run that started at `start_ms`.
pub fn progress_at(start_ms: f64, duration_ms: f64, now: f64) -> f64 {
    ((now - start_ms) / duration_ms).clamp(0.0, 1.0)
}

pub fn settle_for(progress: f64) -> f64 {
    progress * progress
}

/// State of one effect run. Dropped when the overlay is hidden.
#[derive(Debug)]
pub struct AnimationRun {
    pub generation: u64,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub viewport: Viewport,
    pub layout: GridLayout,
    pub mask: HeartMask,
    pub particles: ParticleSystem,
    progress: f64,
    phase: RunPhase,
    hide_pending: bool,
}

impl AnimationRun {
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn settle(&self) -> f64 {
        settle_for(self.progress)
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }
}

pub struct HeartFx<S: Surface, O: Overlay> {
    surface: S,
    overlay: O,
    config: FxConfig,
    rng: XorShiftRng,
    run: Option<AnimationRun>,
    generation: u64,
}

impl<S: Surface, O: Overlay> HeartFx<S, O> {
    pub fn new(surface: S, overlay: O) -> Self {
        Self {
            surface,
            overlay,
            config: FxConfig::default(),
            rng: XorShiftRng::new(1),
            run: None,
            generation: 0,
        }
    }

    /// Begin a run; returns its generation. Any active run is cancelled.
    pub fn start(&mut self, config: FxConfig, viewport: Viewport, now: f64) -> Result<u64> {
        config.validate()?;
        if self.run.is_some() {
            log::debug!("heart fx: new start cancels run {}", self.generation);
            self.run = None;
        }
        self.generation += 1;
        let generation = self.generation;

        self.rng = match config.seed {
            Some(seed) => XorShiftRng::new(seed),
            None => XorShiftRng::from_entropy(now),
        };

        // Init
        self.overlay.show()?;
        if let Err(err) = self.surface.resize(viewport) {
            // No run follows, so nothing would ever hide the overlay.
            if let Err(hide_err) = self.overlay.hide() {
                log::warn!("heart fx: failed to hide overlay: {hide_err}");
            }
            return Err(err);
        }
        let layout = GridLayout::for_viewport(&viewport, &config);
        let mask = HeartMask::for_layout(&layout);
        let particles = ParticleSystem::spawn(&mask, &mut self.rng);
        log::debug!(
            "heart fx run {generation}: {}x{} grid, cell {}px, {} particles",
            layout.cols,
            layout.rows,
            layout.cell,
            particles.len()
        );

        let mut run = AnimationRun {
            generation,
            start_ms: now,
            duration_ms: config.duration_ms,
            viewport,
            layout,
            mask,
            particles,
            progress: 0.0,
            phase: RunPhase::Init,
            hide_pending: false,
        };
        run.phase = RunPhase::Running;
        self.run = Some(run);
        self.config = config;
        Ok(generation)
    }

    /// Advance and draw one frame of run `generation`.
    pub fn tick(&mut self, generation: u64, now: f64) -> FrameOutcome {
        let Some(run) = self.run.as_mut() else {
            return FrameOutcome::Idle;
        };
        if run.generation != generation || run.hide_pending {
            return FrameOutcome::Idle;
        }

        // Late timestamps never move progress backwards.
        run.progress = run
            .progress
            .max(progress_at(run.start_ms, run.duration_ms, now));
        let settle = run.settle();
        if run.progress > self.config.finish_threshold {
            run.phase = RunPhase::Completing;
        }

        run.particles.step(settle, &mut self.rng);
        if let Err(err) = draw_frame(&mut self.surface, run, &self.config) {
            log::warn!("heart fx: skipped frame at progress {:.3}: {err}", run.progress);
        }

        if run.progress < 1.0 {
            FrameOutcome::RequestFrame
        } else {
            run.phase = RunPhase::Completing;
            run.hide_pending = true;
            FrameOutcome::HideAfter(self.config.hide_delay_ms)
        }
    }

    /// Hide the overlay and drop run `generation`. Returns false for stale generations.
    pub fn hide(&mut self, generation: u64) -> bool {
        match &self.run {
            Some(run) if run.generation == generation => {
                self.finish();
                true
            }
            _ => false,
        }
    }

    /// Drop the active run immediately, if any.
    pub fn cancel(&mut self) {
        if self.run.is_some() {
            log::debug!("heart fx: run {} cancelled", self.generation);
            self.finish();
        }
    }

    fn finish(&mut self) {
        if let Err(err) = self.overlay.hide() {
            log::warn!("heart fx: failed to hide overlay: {err}");
        }
        self.run = None;
    }

    pub fn phase(&self) -> RunPhase {
        self.run.as_ref().map_or(RunPhase::Hidden, |r| r.phase)
    }

    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn run(&self) -> Option<&AnimationRun> {
        self.run.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }
}

fn draw_frame(surface: &mut dyn Surface, run: &AnimationRun, cfg: &FxConfig) -> Result<()> {
    let (w, h) = (run.viewport.width, run.viewport.height);
    let settle = run.settle();

    surface.clear(w, h)?;
    surface.fill_rect(0.0, 0.0, w, h, BACKDROP)?;
    surface.fill_circle(w / 2.0, h / 2.0, run.layout.size * GLOW_RADIUS, GLOW)?;
    run.particles.render(surface, &run.layout, settle)?;

    if run.progress > cfg.finish_threshold {
        surface.fill_text(&cfg.glyph, w / 2.0, h * GLYPH_Y, GLYPH_FONT, GLYPH_COLOR)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FxError;
    use crate::surface::{DrawOp, RecordingSurface};

    fn fx() -> HeartFx<RecordingSurface, FlagOverlay> {
        HeartFx::new(RecordingSurface::new(), FlagOverlay::default())
    }

    fn seeded(duration_ms: f64) -> FxConfig {
        FxConfig {
            duration_ms,
            seed: Some(11),
            ..FxConfig::default()
        }
    }

    #[test]
    fn progress_and_settle() {
        assert_eq!(progress_at(100.0, 2400.0, 50.0), 0.0);
        assert!((progress_at(100.0, 2400.0, 1300.0) - 0.5).abs() < 1e-12);
        assert_eq!(progress_at(100.0, 2400.0, 9999.0), 1.0);
        assert!((settle_for(0.5) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn start_shows_overlay_and_sizes_surface() {
        let mut fx = fx();
        let vp = Viewport::new(800.0, 600.0, 2.0);
        fx.start(seeded(2400.0), vp, 0.0).unwrap();
        assert!(fx.overlay().visible);
        assert_eq!(fx.surface().viewport, Some(vp));
        assert_eq!(fx.phase(), RunPhase::Running);
        let run = fx.run().unwrap();
        assert_eq!(run.particles.len(), run.mask.len());
    }

    #[test]
    fn frame_draw_order() {
        let mut fx = fx();
        let g = fx.start(seeded(2400.0), Viewport::new(500.0, 500.0, 1.0), 0.0).unwrap();
        fx.surface_mut().take_ops();
        assert_eq!(fx.tick(g, 16.0), FrameOutcome::RequestFrame);
        let ops = fx.surface_mut().take_ops();
        assert!(matches!(ops[0], DrawOp::Clear { w, h } if w == 500.0 && h == 500.0));
        assert!(matches!(ops[1], DrawOp::Rect { color, .. } if color == BACKDROP));
        match ops[2] {
            DrawOp::Circle { cx, cy, r, color } => {
                assert_eq!((cx, cy), (250.0, 250.0));
                assert!((r - 500.0 * 0.58 * 0.42).abs() < 1e-9);
                assert_eq!(color, GLOW);
            }
            ref other => panic!("expected glow, got {other:?}"),
        }
        let particles = fx.run().unwrap().particles.len();
        assert_eq!(ops.len(), 3 + particles);
    }

    #[test]
    fn glyph_only_after_threshold() {
        let mut fx = fx();
        let g = fx.start(seeded(1000.0), Viewport::new(400.0, 400.0, 1.0), 0.0).unwrap();
        let has_glyph = |ops: &[DrawOp]| ops.iter().any(|op| matches!(op, DrawOp::Text { .. }));

        fx.tick(g, 900.0);
        assert!(!has_glyph(&fx.surface_mut().take_ops()));
        assert_eq!(fx.phase(), RunPhase::Running);

        fx.tick(g, 950.0);
        let ops = fx.surface_mut().take_ops();
        assert!(has_glyph(&ops));
        assert_eq!(fx.phase(), RunPhase::Completing);
        let text = ops.iter().find_map(|op| match op {
            DrawOp::Text { text, x, y, font, .. } => Some((text.clone(), *x, *y, font.clone())),
            _ => None,
        });
        assert_eq!(text, Some(("❤️".to_string(), 200.0, 312.0, GLYPH_FONT.to_string())));
    }

    #[test]
    fn completes_then_hides() {
        let mut fx = fx();
        let g = fx.start(seeded(100.0), Viewport::new(300.0, 300.0, 1.0), 1000.0).unwrap();
        assert_eq!(fx.tick(g, 1050.0), FrameOutcome::RequestFrame);
        assert_eq!(fx.tick(g, 1100.0), FrameOutcome::HideAfter(450.0));
        assert_eq!(fx.tick(g, 1116.0), FrameOutcome::Idle);
        assert!(fx.overlay().visible);
        assert!(fx.hide(g));
        assert!(!fx.overlay().visible);
        assert_eq!(fx.phase(), RunPhase::Hidden);
        assert!(fx.run().is_none());
    }

    #[test]
    fn late_timestamp_does_not_rewind_progress() {
        let mut fx = fx();
        let g = fx.start(seeded(1000.0), Viewport::new(300.0, 300.0, 1.0), 0.0).unwrap();
        fx.tick(g, 600.0);
        fx.tick(g, 400.0);
        assert!((fx.run().unwrap().progress() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn draw_failure_skips_frame_but_keeps_running() {
        let mut fx = fx();
        let g = fx.start(seeded(1000.0), Viewport::new(300.0, 300.0, 1.0), 0.0).unwrap();
        fx.surface_mut().failing = true;
        assert_eq!(fx.tick(g, 100.0), FrameOutcome::RequestFrame);
        fx.surface_mut().failing = false;
        fx.surface_mut().take_ops();
        assert_eq!(fx.tick(g, 200.0), FrameOutcome::RequestFrame);
        assert!(!fx.surface().ops.is_empty());
    }

    #[test]
    fn restart_cancels_previous_run() {
        let mut fx = fx();
        let first = fx.start(seeded(1000.0), Viewport::new(300.0, 300.0, 1.0), 0.0).unwrap();
        let second = fx.start(seeded(1000.0), Viewport::new(300.0, 300.0, 1.0), 500.0).unwrap();
        assert_ne!(first, second);
        assert_eq!(fx.tick(first, 600.0), FrameOutcome::Idle);
        assert!(!fx.hide(first));
        assert!(fx.is_active());
        assert_eq!(fx.tick(second, 600.0), FrameOutcome::RequestFrame);
    }

    #[test]
    fn invalid_config_leaves_state_untouched() {
        let mut fx = fx();
        assert!(fx.start(FxConfig::with_duration(0.0), Viewport::new(1.0, 1.0, 1.0), 0.0).is_err());
        assert!(!fx.overlay().visible);
        assert_eq!(fx.generation(), 0);
    }

    struct NoResize;

    impl Surface for NoResize {
        fn resize(&mut self, _: Viewport) -> Result<()> {
            Err(FxError::Draw("canvas detached".into()))
        }
        fn clear(&mut self, _: f64, _: f64) -> Result<()> {
            Ok(())
        }
        fn fill_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: Color) -> Result<()> {
            Ok(())
        }
        fn fill_circle(&mut self, _: f64, _: f64, _: f64, _: Color) -> Result<()> {
            Ok(())
        }
        fn fill_text(&mut self, _: &str, _: f64, _: f64, _: &str, _: Color) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_resize_leaves_overlay_hidden() {
        let mut fx = HeartFx::new(NoResize, FlagOverlay::default());
        let err = fx.start(seeded(1000.0), Viewport::new(300.0, 300.0, 1.0), 0.0);
        assert!(matches!(err, Err(FxError::Draw(_))));
        assert!(!fx.overlay().visible);
        assert_eq!(fx.overlay().hides, 1);
        assert!(!fx.is_active());
        assert_eq!(fx.phase(), RunPhase::Hidden);
    }

    #[test]
    fn cancel_hides_overlay() {
        let mut fx = fx();
        fx.start(seeded(1000.0), Viewport::new(300.0, 300.0, 1.0), 0.0).unwrap();
        fx.cancel();
        assert!(!fx.is_active());
        assert_eq!(fx.overlay().hides, 1);
    }
}
