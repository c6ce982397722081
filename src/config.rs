//! Run configuration for the heart effect.
//!
//! Only `duration_ms` is meant to be tuned by callers; the remaining knobs are
//! the shape/timing constants of the effect, kept here so tests and embedders
//! can see them in one place. JS callers may pass a partial object
//! (`{ durationMs: 3000 }`); missing fields take their defaults.

use serde::Deserialize;

use crate::error::{FxError, Result};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FxConfig {
    /// Total run length before the grace delay.
    pub duration_ms: f64,
    /// Heart square side as a fraction of min(viewport width, height).
    pub size_fraction: f64,
    /// Smallest cell edge in logical pixels.
    pub min_cell: u32,
    /// Roughly how many cells span the heart square.
    pub cells_across: u32,
    /// How long the last frame lingers before the overlay is hidden.
    pub hide_delay_ms: f64,
    /// The finishing glyph is drawn once progress is strictly greater than
    /// this, matching the page's `p > 0.9` check.
    pub finish_threshold: f64,
    pub glyph: String,
    /// Fixed RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2400.0,
            size_fraction: 0.58,
            min_cell: 6,
            cells_across: 78,
            hide_delay_ms: 450.0,
            finish_threshold: 0.9,
            glyph: "❤️".to_string(),
            seed: None,
        }
    }
}

impl FxConfig {
    pub fn with_duration(duration_ms: f64) -> Self {
        Self {
            duration_ms,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            return Err(FxError::InvalidConfig(format!(
                "durationMs must be positive, got {}",
                self.duration_ms
            )));
        }
        if !self.size_fraction.is_finite() || self.size_fraction <= 0.0 {
            return Err(FxError::InvalidConfig(format!(
                "sizeFraction must be positive, got {}",
                self.size_fraction
            )));
        }
        if self.min_cell == 0 || self.cells_across == 0 {
            return Err(FxError::InvalidConfig(
                "minCell and cellsAcross must be non-zero".into(),
            ));
        }
        if !self.hide_delay_ms.is_finite() || self.hide_delay_ms < 0.0 {
            return Err(FxError::InvalidConfig(format!(
                "hideDelayMs must be >= 0, got {}",
                self.hide_delay_ms
            )));
        }
        Ok(())
    }
}
