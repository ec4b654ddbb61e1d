//! Generative pattern library: (kind, params, t) -> height field.

pub mod generators;
pub mod kind;
pub mod params;
pub mod surface;

pub use kind::{PatternKind, UnknownPattern};
pub use params::Params;
pub use surface::Surface;

use crate::kernel::grid::Grid;
use params::{
    BreatheParams, ChaosParams, MountainParams, RainParams, RippleParams, SpiralParams, WaveParams,
};

/// A pattern with its parameters already validated.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    Wave(WaveParams),
    Ripple(RippleParams),
    Breathe(BreatheParams),
    Mountain(MountainParams),
    Spiral(SpiralParams),
    Rain(RainParams),
    Chaos(ChaosParams),
    Speaking,
}

impl Pattern {
    pub fn resolve(kind: PatternKind, params: &Params, surface: &Surface) -> Self {
        match kind {
            PatternKind::Wave => Pattern::Wave(WaveParams::from_params(params)),
            PatternKind::Ripple => Pattern::Ripple(RippleParams::from_params(params, surface)),
            PatternKind::Breathe => Pattern::Breathe(BreatheParams::from_params(params, surface)),
            PatternKind::Mountain => Pattern::Mountain(MountainParams::from_params(params, surface)),
            PatternKind::Spiral => Pattern::Spiral(SpiralParams::from_params(params)),
            PatternKind::Rain => Pattern::Rain(RainParams::from_params(params)),
            PatternKind::Chaos => Pattern::Chaos(ChaosParams::from_params(params)),
            PatternKind::Speaking => Pattern::Speaking,
        }
    }

    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::Wave(_) => PatternKind::Wave,
            Pattern::Ripple(_) => PatternKind::Ripple,
            Pattern::Breathe(_) => PatternKind::Breathe,
            Pattern::Mountain(_) => PatternKind::Mountain,
            Pattern::Spiral(_) => PatternKind::Spiral,
            Pattern::Rain(_) => PatternKind::Rain,
            Pattern::Chaos(_) => PatternKind::Chaos,
            Pattern::Speaking => PatternKind::Speaking,
        }
    }

    pub fn generate(&self, surface: &Surface, t: f64) -> Grid {
        match self {
            Pattern::Wave(p) => generators::wave(surface, t, p),
            Pattern::Ripple(p) => generators::ripple(surface, t, p),
            Pattern::Breathe(p) => generators::breathe(surface, t, p),
            Pattern::Mountain(p) => generators::mountain(surface, t, p),
            Pattern::Spiral(p) => generators::spiral(surface, t, p),
            Pattern::Rain(p) => generators::rain(surface, t, p),
            Pattern::Chaos(p) => generators::chaos(surface, t, p),
            Pattern::Speaking => generators::speaking(surface, t),
        }
    }
}

/// Holds the active pattern and renders it at any time `t`.
#[derive(Debug, Clone)]
pub struct PatternLibrary {
    surface: Surface,
    active: Pattern,
}

impl PatternLibrary {
    pub fn new(rows: usize, cols: usize, max_height: f64) -> Self {
        Self {
            surface: Surface::new(rows, cols, max_height),
            active: Pattern::Wave(WaveParams::default()),
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn set_pattern(&mut self, kind: PatternKind, params: &Params) {
        self.active = Pattern::resolve(kind, params, &self.surface);
    }

    /// Activates a pattern by name. Unknown names draw `wave`.
    pub fn set_pattern_named(&mut self, name: &str, params: &Params) {
        self.set_pattern(PatternKind::from_name_lossy(name), params);
    }

    pub fn active(&self) -> &Pattern {
        &self.active
    }

    pub fn generate(&self, t: f64) -> Grid {
        self.active.generate(&self.surface, t)
    }
}
