//! Typed parameters for each pattern.
//!
//! Directives carry a loose key/value map straight from the model. It is
//! validated once here, when a pattern is activated: anything missing,
//! non-numeric, non-finite or outside the accepted limits is replaced by the
//! documented default, so generators never see a bad value.

use serde_json::{Map, Value};
use std::ops::RangeInclusive;

use super::surface::Surface;

pub type Params = Map<String, Value>;

/// At most this many mountain peaks are drawn.
pub const MAX_PEAKS: usize = 4;

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn number(params: &Params, key: &str, default: f64, limits: RangeInclusive<f64>) -> f64 {
    params
        .get(key)
        .and_then(as_number)
        .filter(|v| v.is_finite() && limits.contains(v))
        .unwrap_or(default)
}

fn count(params: &Params, key: &str, default: usize, limits: RangeInclusive<usize>) -> usize {
    let lo = *limits.start() as f64;
    let hi = *limits.end() as f64;
    // Fractional counts truncate toward zero.
    number(params, key, default as f64, lo..=hi).trunc() as usize
}

/// `wave`: frequency 2.0 in [0, 20], speed 1.0 in [-10, 10],
/// direction_angle 0 degrees in [-720, 720].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParams {
    pub frequency: f64,
    pub speed: f64,
    pub direction_angle: f64,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            frequency: 2.0,
            speed: 1.0,
            direction_angle: 0.0,
        }
    }
}

impl WaveParams {
    pub fn from_params(p: &Params) -> Self {
        let d = Self::default();
        Self {
            frequency: number(p, "frequency", d.frequency, 0.0..=20.0),
            speed: number(p, "speed", d.speed, -10.0..=10.0),
            direction_angle: number(p, "direction_angle", d.direction_angle, -720.0..=720.0),
        }
    }
}

/// `ripple`: center_x/center_y are pin indices (default: middle of the table,
/// limited to the table), frequency 3.0 in [0, 20], speed 2.0 in [-10, 10].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleParams {
    pub center_x: f64,
    pub center_y: f64,
    pub frequency: f64,
    pub speed: f64,
}

impl RippleParams {
    pub fn defaults(surface: &Surface) -> Self {
        Self {
            center_x: (surface.cols() / 2) as f64,
            center_y: (surface.rows() / 2) as f64,
            frequency: 3.0,
            speed: 2.0,
        }
    }

    pub fn from_params(p: &Params, surface: &Surface) -> Self {
        let d = Self::defaults(surface);
        Self {
            center_x: number(p, "center_x", d.center_x, 0.0..=surface.col_span()),
            center_y: number(p, "center_y", d.center_y, 0.0..=surface.row_span()),
            frequency: number(p, "frequency", d.frequency, 0.0..=20.0),
            speed: number(p, "speed", d.speed, -10.0..=10.0),
        }
    }
}

/// `breathe`: speed 1.0 in [0, 10], max_amplitude 80% of the pin travel,
/// limited to [0, max_height].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreatheParams {
    pub speed: f64,
    pub max_amplitude: f64,
}

impl BreatheParams {
    pub fn defaults(surface: &Surface) -> Self {
        Self {
            speed: 1.0,
            max_amplitude: surface.max_height() * 0.8,
        }
    }

    pub fn from_params(p: &Params, surface: &Surface) -> Self {
        let d = Self::defaults(surface);
        Self {
            speed: number(p, "speed", d.speed, 0.0..=10.0),
            max_amplitude: number(p, "max_amplitude", d.max_amplitude, 0.0..=surface.max_height()),
        }
    }
}

/// One Gaussian bump. `x`/`y` are pin indices, `spread` is in pins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    pub x: f64,
    pub y: f64,
    pub height: f64,
    pub spread: f64,
}

impl Peak {
    fn from_value(value: &Value, surface: &Surface) -> Option<Self> {
        let p = value.as_object()?;
        let max_height = surface.max_height();
        let longest = surface.rows().max(surface.cols()).max(1) as f64;
        Some(Self {
            x: number(p, "x", (surface.cols() / 2) as f64, 0.0..=surface.col_span()),
            y: number(p, "y", (surface.rows() / 2) as f64, 0.0..=surface.row_span()),
            height: number(p, "height", max_height * 0.8, 0.0..=max_height),
            spread: number(p, "spread", 5.0, 0.5..=longest),
        })
    }
}

/// `mountain`: 1 to 4 peaks. Without usable peaks a single 90%-high
/// peak sits in the middle of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct MountainParams {
    pub peaks: Vec<Peak>,
}

impl MountainParams {
    pub fn defaults(surface: &Surface) -> Self {
        Self {
            peaks: vec![Peak {
                x: (surface.cols() / 2) as f64,
                y: (surface.rows() / 2) as f64,
                height: surface.max_height() * 0.9,
                spread: 5.0,
            }],
        }
    }

    pub fn from_params(p: &Params, surface: &Surface) -> Self {
        let peaks: Vec<Peak> = p
            .get("peaks")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(|v| Peak::from_value(v, surface))
                    .take(MAX_PEAKS)
                    .collect()
            })
            .unwrap_or_default();

        if peaks.is_empty() {
            Self::defaults(surface)
        } else {
            Self { peaks }
        }
    }
}

/// `spiral`: arms 2 in [0, 12], speed 1.5 in [-10, 10], tightness 2.0 in [0, 20].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    pub arms: f64,
    pub speed: f64,
    pub tightness: f64,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            arms: 2.0,
            speed: 1.5,
            tightness: 2.0,
        }
    }
}

impl SpiralParams {
    pub fn from_params(p: &Params) -> Self {
        let d = Self::default();
        Self {
            arms: number(p, "arms", d.arms, 0.0..=12.0),
            speed: number(p, "speed", d.speed, -10.0..=10.0),
            tightness: number(p, "tightness", d.tightness, 0.0..=20.0),
        }
    }
}

/// `rain`: intensity 5 drops in [1, 32], drop_speed 3.0 in [0, 10].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainParams {
    pub intensity: usize,
    pub drop_speed: f64,
}

impl Default for RainParams {
    fn default() -> Self {
        Self {
            intensity: 5,
            drop_speed: 3.0,
        }
    }
}

impl RainParams {
    pub fn from_params(p: &Params) -> Self {
        let d = Self::default();
        Self {
            intensity: count(p, "intensity", d.intensity, 1..=32),
            drop_speed: number(p, "drop_speed", d.drop_speed, 0.0..=10.0),
        }
    }
}

/// `chaos`: complexity 3 harmonics in [1, 8], speed 1.0 in [-10, 10].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaosParams {
    pub complexity: usize,
    pub speed: f64,
}

impl Default for ChaosParams {
    fn default() -> Self {
        Self {
            complexity: 3,
            speed: 1.0,
        }
    }
}

impl ChaosParams {
    pub fn from_params(p: &Params) -> Self {
        let d = Self::default();
        Self {
            complexity: count(p, "complexity", d.complexity, 1..=8),
            speed: number(p, "speed", d.speed, -10.0..=10.0),
        }
    }
}
