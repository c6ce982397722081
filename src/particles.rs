//! Particles that drift from random spawn points into the heart mask.

use crate::error::Result;
use crate::mask::{GridLayout, HeartMask};
use crate::rng::RandomSource;
use crate::surface::{Color, Surface};

/// Attraction gain toward the target, scaled by settle.
pub const ATTRACTION: f64 = 0.12;
/// Velocity damping at settle = 0; rises by `DAMPING_RAMP` at settle = 1.
pub const DAMPING_BASE: f64 = 0.82;
pub const DAMPING_RAMP: f64 = 0.14;
/// Per-axis jitter span at settle = 0.
pub const JITTER: f64 = 0.14;
/// Initial velocity range per axis is `[-SPAWN_SPEED, SPAWN_SPEED)`.
pub const SPAWN_SPEED: f64 = 0.45;
pub const HUE_RANGE: (f64, f64) = (330.0, 344.0);

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    /// Position in cell units.
    pub x: f64,
    pub y: f64,
    /// Target cell, fixed at spawn.
    pub tx: u32,
    pub ty: u32,
    pub vx: f64,
    pub vy: f64,
    pub hue: f64,
}

impl Particle {
    /// Attraction + damping, no jitter.
    fn integrate(&mut self, settle: f64) {
        let ax = (self.tx as f64 - self.x) * ATTRACTION * settle;
        let ay = (self.ty as f64 - self.y) * ATTRACTION * settle;
        let damping = DAMPING_BASE + DAMPING_RAMP * settle;
        self.vx = (self.vx + ax) * damping;
        self.vy = (self.vy + ay) * damping;
    }

    pub fn distance_to_target(&self) -> f64 {
        let dx = self.tx as f64 - self.x;
        let dy = self.ty as f64 - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Fill color of a particle at the given settle factor.
pub fn particle_color(hue: f64, settle: f64) -> Color {
    Color::Hsla {
        h: hue,
        s: 95.0,
        l: particle_lightness(settle),
        a: particle_alpha(settle),
    }
}

pub fn particle_alpha(settle: f64) -> f64 {
    0.22 + 0.74 * settle
}

/// Lightness in percent.
pub fn particle_lightness(settle: f64) -> f64 {
    56.0 + 8.0 * settle
}

/// One particle per mask cell.
#[derive(Clone, Debug, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn spawn(mask: &HeartMask, rng: &mut dyn RandomSource) -> Self {
        let (cols, rows) = (mask.cols as f64, mask.rows as f64);
        let particles = mask
            .cells()
            .iter()
            .map(|&(tx, ty)| Particle {
                x: rng.next_f64() * cols,
                y: rng.next_f64() * rows,
                tx,
                ty,
                vx: rng.range(-SPAWN_SPEED, SPAWN_SPEED),
                vy: rng.range(-SPAWN_SPEED, SPAWN_SPEED),
                hue: rng.range(HUE_RANGE.0, HUE_RANGE.1),
            })
            .collect();
        Self { particles }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance every particle one frame, with jitter fading out as settle -> 1.
    pub fn step(&mut self, settle: f64, rng: &mut dyn RandomSource) {
        let jitter = (1.0 - settle) * JITTER;
        for p in &mut self.particles {
            p.integrate(settle);
            p.vx += (rng.next_f64() - 0.5) * jitter;
            p.vy += (rng.next_f64() - 0.5) * jitter;
            p.x += p.vx;
            p.y += p.vy;
        }
    }

    /// Same as [`step`](Self::step) with jitter disabled.
    pub fn step_deterministic(&mut self, settle: f64) {
        for p in &mut self.particles {
            p.integrate(settle);
            p.x += p.vx;
            p.y += p.vy;
        }
    }

    /// Draw each particle as a `cell - 1` square at its floored cell.
    pub fn render(&self, surface: &mut dyn Surface, layout: &GridLayout, settle: f64) -> Result<()> {
        let side = layout.cell.saturating_sub(1) as f64;
        for p in &self.particles {
            let (px, py) = layout.cell_origin(p.x, p.y);
            surface.fill_rect(px, py, side, side, particle_color(p.hue, settle))?;
        }
        Ok(())
    }

    pub fn max_distance_to_target(&self) -> f64 {
        self.particles
            .iter()
            .map(Particle::distance_to_target)
            .fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::XorShiftRng;
    use crate::surface::{DrawOp, RecordingSurface};

    fn system(seed: u64) -> (HeartMask, ParticleSystem) {
        let mask = HeartMask::generate(40, 40);
        let mut rng = XorShiftRng::new(seed);
        let sys = ParticleSystem::spawn(&mask, &mut rng);
        (mask, sys)
    }

    #[test]
    fn one_particle_per_cell_with_matching_targets() {
        let (mask, sys) = system(1);
        assert_eq!(sys.len(), mask.len());
        for (p, &(tx, ty)) in sys.particles().iter().zip(mask.cells()) {
            assert_eq!((p.tx, p.ty), (tx, ty));
        }
    }

    #[test]
    fn spawn_ranges() {
        let (mask, sys) = system(99);
        for p in sys.particles() {
            assert!(p.x >= 0.0 && p.x < mask.cols as f64);
            assert!(p.y >= 0.0 && p.y < mask.rows as f64);
            assert!(p.vx >= -SPAWN_SPEED && p.vx < SPAWN_SPEED);
            assert!(p.vy >= -SPAWN_SPEED && p.vy < SPAWN_SPEED);
            assert!(p.hue >= 330.0 && p.hue < 344.0);
        }
    }

    #[test]
    fn zero_settle_has_no_attraction() {
        let mut p = Particle { x: 0.0, y: 0.0, tx: 10, ty: 10, vx: 1.0, vy: 0.0, hue: 330.0 };
        p.integrate(0.0);
        assert!((p.vx - 0.82).abs() < 1e-12);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn full_settle_damping_and_pull() {
        let mut p = Particle { x: 0.0, y: 0.0, tx: 10, ty: 0, vx: 0.0, vy: 0.0, hue: 330.0 };
        p.integrate(1.0);
        assert!((p.vx - 10.0 * 0.12 * 0.96).abs() < 1e-12);
    }

    #[test]
    fn hue_is_stable_across_steps() {
        let (_, mut sys) = system(5);
        let hues: Vec<f64> = sys.particles().iter().map(|p| p.hue).collect();
        let mut rng = XorShiftRng::new(6);
        for i in 0..50 {
            sys.step(i as f64 / 50.0, &mut rng);
        }
        let after: Vec<f64> = sys.particles().iter().map(|p| p.hue).collect();
        assert_eq!(hues, after);
    }

    #[test]
    fn render_draws_cell_minus_one_squares() {
        let (_, sys) = system(3);
        let layout = GridLayout { size: 280.0, cell: 7, cols: 40, rows: 40, left: 10.0, top: 20.0 };
        let mut surface = RecordingSurface::new();
        sys.render(&mut surface, &layout, 0.0).unwrap();
        assert_eq!(surface.ops.len(), sys.len());
        for op in &surface.ops {
            match op {
                DrawOp::Rect { w, h, color, .. } => {
                    assert_eq!((*w, *h), (6.0, 6.0));
                    assert!((color.alpha() - 0.22).abs() < 1e-12);
                }
                other => panic!("unexpected op {other:?}"),
            }
        }
    }

    #[test]
    fn color_endpoints() {
        assert!((particle_alpha(0.0) - 0.22).abs() < 1e-12);
        assert!((particle_alpha(1.0) - 0.96).abs() < 1e-12);
        assert!((particle_lightness(0.0) - 56.0).abs() < 1e-12);
        assert!((particle_lightness(1.0) - 64.0).abs() < 1e-12);
    }
}
