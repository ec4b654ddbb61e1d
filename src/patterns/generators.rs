//! The height-field generators. Each is a pure function of
//! `(surface, t, params)` and always returns a field inside the pin travel.

use std::f64::consts::{PI, TAU};

use super::params::{
    BreatheParams, ChaosParams, MountainParams, RainParams, RippleParams, SpiralParams, WaveParams,
};
use super::surface::Surface;
use crate::kernel::grid::Grid;

/// Rain drops re-spawn every this many time units.
const RAIN_CYCLE: f64 = 4.0;

pub fn wave(surface: &Surface, t: f64, p: &WaveParams) -> Grid {
    let angle = p.direction_angle.to_radians();
    let (sin_a, cos_a) = angle.sin_cos();
    let field = surface.field(|x, y| {
        let projection = x * cos_a + y * sin_a;
        (projection * p.frequency * TAU + t * p.speed * 2.0).sin()
    });
    surface.remap(field)
}

pub fn ripple(surface: &Surface, t: f64, p: &RippleParams) -> Grid {
    let cx = p.center_x / surface.col_span();
    let cy = p.center_y / surface.row_span();
    let field = surface.field(|x, y| {
        let dist = (x - cx).hypot(y - cy);
        (dist * p.frequency * TAU - t * p.speed * 2.0).sin() * (-dist * 2.0).exp()
    });
    surface.remap(field)
}

pub fn breathe(surface: &Surface, t: f64, p: &BreatheParams) -> Grid {
    let base = ((t * p.speed).sin() + 1.0) / 2.0;
    let field = surface.field(|x, y| {
        let spatial = 1.0 + 0.15 * (x * PI).sin() * (y * PI).sin();
        base * p.max_amplitude * spatial
    });
    surface.clamp(field)
}

pub fn mountain(surface: &Surface, t: f64, p: &MountainParams) -> Grid {
    let longest = surface.rows().max(surface.cols()).max(1) as f64;
    let mut field = Grid::zeros(surface.rows(), surface.cols());
    for peak in &p.peaks {
        let px = peak.x / surface.col_span();
        let py = peak.y / surface.row_span();
        let spread = peak.spread / longest;
        let breath = 0.8 + 0.2 * (t * 0.5 + px * 3.0).sin();
        let bump = surface.field(|x, y| {
            let d2 = (x - px).powi(2) + (y - py).powi(2);
            (-d2 / (2.0 * spread * spread)).exp() * peak.height * breath
        });
        for (acc, v) in field.cells_mut().iter_mut().zip(bump.iter()) {
            *acc += v;
        }
    }
    surface.clamp(field)
}

pub fn spiral(surface: &Surface, t: f64, p: &SpiralParams) -> Grid {
    let field = surface.field(|x, y| {
        let (dx, dy) = (x - 0.5, y - 0.5);
        let angle = dy.atan2(dx);
        let radius = dx.hypot(dy);
        (angle * p.arms + radius * p.tightness * TAU - t * p.speed * 2.0).sin()
    });
    surface.remap(field)
}

pub fn rain(surface: &Surface, t: f64, p: &RainParams) -> Grid {
    let mut field = Grid::zeros(surface.rows(), surface.cols());
    for i in 0..p.intensity {
        let fi = i as f64;
        // Drop centers hop to a new spot every two time units.
        let phase = (t * 0.5).trunc() + fi * 17.0;
        let cx = (phase * 1.1 + fi).sin() * 0.4 + 0.5;
        let cy = (phase * 0.9 + fi * 2.0).cos() * 0.4 + 0.5;
        let age = (t * p.drop_speed + fi * 0.7).rem_euclid(RAIN_CYCLE);
        let fade = (1.0 - age * 0.3).max(0.0);
        let drop = surface.field(|x, y| {
            let dist = (x - cx).hypot(y - cy);
            (dist * 25.0 - age * 6.0).sin() * (-dist * 5.0).exp() * fade
        });
        for (acc, v) in field.cells_mut().iter_mut().zip(drop.iter()) {
            *acc += v;
        }
    }
    let mut field = surface.normalize(field);
    field.map_in_place(|v| v * 0.8);
    field
}

pub fn chaos(surface: &Surface, t: f64, p: &ChaosParams) -> Grid {
    let field = surface.field(|x, y| {
        let mut z = 0.0;
        for i in 1..=p.complexity {
            let fi = i as f64;
            let f = fi * 1.5;
            let ph = t * p.speed * (0.5 + fi * 0.3);
            z += (x * f * TAU + ph).sin() * (y * f * TAU + ph * 0.7).cos();
            z += ((x + y) * f * PI + ph * 1.3).sin() * 0.5;
        }
        z
    });
    surface.normalize(field)
}

/// Voice-waveform band across the middle row, pulsing at a syllable rhythm.
pub fn speaking(surface: &Surface, t: f64) -> Grid {
    let s1 = (t * 4.0).sin().abs();
    let s2 = (t * 2.7 + 0.5).sin().abs();
    let s3 = (t * 6.3 + 1.2).sin().abs();
    let envelope = s1 * 0.5 + s2 * 0.3 + s3 * 0.2;
    let band_width = 0.12 + 0.08 * envelope;

    let field = surface.field(|x, y| {
        let harmonics = (x * 10.0 * PI + t * 15.0).sin()
            + (x * 14.0 * PI - t * 10.0).sin() * 0.7
            + (x * 6.0 * PI + t * 20.0).sin() * 0.5
            + (x * 18.0 * PI - t * 12.0).sin() * 0.3
            + (x * 22.0 * PI + t * 8.0).sin() * 0.2;
        let y_dist = (y - 0.5).abs();
        let band = (-(y_dist * y_dist) / (2.0 * band_width * band_width)).exp();
        harmonics * band * envelope
    });
    surface.remap(field)
}
