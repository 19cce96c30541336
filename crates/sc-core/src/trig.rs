//! Fixed-resolution sine/cosine lookup table.
//!
//! The integrator and collision resolver evaluate `sin`/`cos` of every
//! agent's heading several times per tick.  A table keyed by a fixed angular
//! resolution makes those evaluations cheap and, more importantly,
//! bit-reproducible: the same heading always snaps to the same entry, so a
//! re-run of the integrator during collision correction sees exactly the
//! trigonometry of the first pass.
//!
//! Build one `TrigTable` per simulation run and share it (`Arc<TrigTable>`)
//! with every component that needs it.  It is read-only after construction.

use std::f64::consts::TAU;

use glam::{DMat2, DVec2};

/// Precomputed sine and cosine over one full turn.
#[derive(Debug, Clone)]
pub struct TrigTable {
    sin: Vec<f64>,
    cos: Vec<f64>,
    /// Table entries per radian.
    scale: f64,
}

impl TrigTable {
    /// Build a table with `resolution` entries over `[0, 2π)`.
    ///
    /// # Panics
    /// Panics if `resolution == 0` (rejected earlier by
    /// [`SimConfig::validate`][crate::SimConfig::validate]).
    pub fn new(resolution: usize) -> Self {
        assert!(resolution > 0, "trig table resolution must be non-zero");
        let step = TAU / resolution as f64;
        let (sin, cos) = (0..resolution)
            .map(|i| {
                let angle = i as f64 * step;
                (angle.sin(), angle.cos())
            })
            .unzip();
        Self { sin, cos, scale: resolution as f64 / TAU }
    }

    /// Number of entries over one full turn.
    #[inline]
    pub fn resolution(&self) -> usize {
        self.sin.len()
    }

    #[inline]
    fn slot(&self, angle: f64) -> usize {
        let idx = (angle.rem_euclid(TAU) * self.scale).round() as usize;
        idx % self.sin.len()
    }

    #[inline]
    pub fn sin(&self, angle: f64) -> f64 {
        self.sin[self.slot(angle)]
    }

    #[inline]
    pub fn cos(&self, angle: f64) -> f64 {
        self.cos[self.slot(angle)]
    }

    /// Unit vector pointing along `angle`.
    #[inline]
    pub fn heading(&self, angle: f64) -> DVec2 {
        let i = self.slot(angle);
        DVec2::new(self.cos[i], self.sin[i])
    }

    /// Counter-clockwise rotation by `angle`.
    #[inline]
    pub fn rotation(&self, angle: f64) -> DMat2 {
        let i = self.slot(angle);
        let (s, c) = (self.sin[i], self.cos[i]);
        DMat2::from_cols(DVec2::new(c, s), DVec2::new(-s, c))
    }
}
