use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::actuator::{ActuatorConfig, ActuatorModel};
use super::grid::{Grid, GridError};
use super::time::{frame_period, Tick};
use crate::director::{Directive, DirectorHandle, DirectorSnapshot};
use crate::outputs::Renderer;
use crate::patterns::{Params, PatternKind, PatternLibrary};

/// Caption shown while the director's narration plays.
pub const SPEAKING_CAPTION: &str = "Speaking...";

/// What one tick hands to the renderer.
#[derive(Debug, Clone)]
pub struct Frame {
    pub tick: Tick,
    pub pattern: PatternKind,
    pub heights: Grid,
    pub caption: String,
}

/// Drives the table: directive -> pattern field -> actuator target -> motion.
pub struct ControlLoop {
    pub actuators: ActuatorModel,
    pub patterns: PatternLibrary,
    pub tick: Tick,
    frame_period: Duration,
    // Directive and speaking flag the pattern library was last set from.
    active: Option<(Arc<Directive>, bool)>,
}

impl ControlLoop {
    pub fn new(config: ActuatorConfig, frame_rate_hz: u32) -> Self {
        Self {
            patterns: PatternLibrary::new(config.rows, config.cols, config.max_height),
            actuators: ActuatorModel::new(config),
            tick: Tick::new(),
            frame_period: frame_period(frame_rate_hz),
            active: None,
        }
    }

    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    /// One control tick at `elapsed` seconds since start. `dt` of `None`
    /// lets the actuators measure the wall-clock gap themselves.
    ///
    /// Synchronous: never awaits.
    pub fn tick_step(
        &mut self,
        elapsed: f64,
        dt: Option<f64>,
        view: &DirectorSnapshot,
    ) -> Result<Frame, GridError> {
        self.tick = self.tick.next();

        let speaking = view.is_speaking();
        self.activate(&view.directive, speaking);

        let field = self.patterns.generate(elapsed);
        self.actuators.set_target(field)?;
        match dt {
            Some(dt) => self.actuators.advance(dt),
            None => {
                self.actuators.advance_auto();
            }
        }

        let caption = if speaking {
            SPEAKING_CAPTION.to_string()
        } else {
            view.directive.mood.clone()
        };

        Ok(Frame {
            tick: self.tick,
            pattern: self.patterns.active().kind(),
            heights: self.actuators.current_heights(),
            caption,
        })
    }

    fn activate(&mut self, directive: &Arc<Directive>, speaking: bool) {
        let unchanged = matches!(
            &self.active,
            Some((last, was_speaking)) if Arc::ptr_eq(last, directive) && *was_speaking == speaking
        );
        if unchanged {
            return;
        }

        if speaking {
            self.patterns.set_pattern(PatternKind::Speaking, &Params::new());
        } else {
            self.patterns.set_pattern(directive.pattern, &directive.params);
        }
        debug!(pattern = %self.patterns.active().kind(), mood = %directive.mood, "Pattern activated");
        self.active = Some((directive.clone(), speaking));
    }

    /// Runs at the frame cadence until the renderer closes or `cancel` fires.
    /// Returns the number of frames produced.
    pub async fn run<R: Renderer>(
        &mut self,
        director: &DirectorHandle,
        renderer: &mut R,
        cancel: &CancellationToken,
    ) -> Result<u64, GridError> {
        info!(period = ?self.frame_period, "Control loop started");

        let start = Instant::now();
        let mut cadence = interval(self.frame_period);
        cadence.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(frames = self.tick.frame, "Control loop cancelled");
                    break;
                }
                _ = cadence.tick() => {}
            }

            let view = director.snapshot();
            let frame = self.tick_step(start.elapsed().as_secs_f64(), None, &view)?;

            if !renderer.present(&frame.heights, &frame.caption) {
                info!(frames = self.tick.frame, "Renderer closed");
                break;
            }
        }

        Ok(self.tick.frame)
    }
}
