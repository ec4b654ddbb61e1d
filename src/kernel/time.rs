use std::time::Duration;

/// Control-loop frame counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tick {
    pub frame: u64,
}

pub const DEFAULT_FRAME_RATE_HZ: u32 = 60;

impl Tick {
    pub fn new() -> Self {
        Tick { frame: 0 }
    }

    pub fn next(&self) -> Self {
        Tick { frame: self.frame + 1 }
    }
}

/// Wall-clock spacing between frames. A zero rate falls back to the default cadence.
pub fn frame_period(rate_hz: u32) -> Duration {
    let rate = if rate_hz == 0 { DEFAULT_FRAME_RATE_HZ } else { rate_hz };
    Duration::from_secs_f64(1.0 / rate as f64)
}
