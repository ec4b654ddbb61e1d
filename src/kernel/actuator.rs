use tokio::time::Instant;

use super::grid::{clamp_cell, non_negative, Grid, GridError};

/// Physical envelope of the pin table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorConfig {
    pub rows: usize,
    pub cols: usize,
    /// Pin travel in mm.
    pub max_height: f64,
    /// Motor speed limit in mm/s, per pin.
    pub max_speed: f64,
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 30,
            max_height: 100.0,
            max_speed: 50.0,
        }
    }
}

/// Simulated motor layer. Holds where every pin is and where it is headed.
///
/// `current` only changes inside `advance`/`reset`, `target` only inside
/// `set_target`/`reset`. Both stay within `[0, max_height]`.
#[derive(Debug, Clone)]
pub struct ActuatorModel {
    config: ActuatorConfig,
    current: Grid,
    target: Grid,
    last_update: Instant,
}

impl ActuatorModel {
    /// Negative or non-finite `max_height`/`max_speed` are floored to zero:
    /// such a table holds every pin at zero.
    pub fn new(config: ActuatorConfig) -> Self {
        let config = ActuatorConfig {
            max_height: non_negative(config.max_height),
            max_speed: non_negative(config.max_speed),
            ..config
        };
        Self {
            config,
            current: Grid::zeros(config.rows, config.cols),
            target: Grid::zeros(config.rows, config.cols),
            last_update: Instant::now(),
        }
    }

    pub fn config(&self) -> &ActuatorConfig {
        &self.config
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.config.rows, self.config.cols)
    }

    /// Stores a new target field, clamped into the pin travel.
    pub fn set_target(&mut self, mut grid: Grid) -> Result<(), GridError> {
        if grid.shape() != self.shape() {
            return Err(GridError::Shape {
                expected_rows: self.config.rows,
                expected_cols: self.config.cols,
                rows: grid.rows(),
                cols: grid.cols(),
            });
        }
        grid.clamp_in_place(0.0, self.config.max_height);
        self.target = grid;
        Ok(())
    }

    /// Moves every pin toward its target by at most `max_speed * dt`.
    ///
    /// Large `dt` (after a stall) just yields a bigger single step.
    /// Negative or non-finite `dt` moves nothing.
    pub fn advance(&mut self, dt: f64) {
        self.last_update = Instant::now();
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let max_move = self.config.max_speed * dt;
        let max_height = self.config.max_height;

        let target = self.target.as_slice();
        for (cell, &goal) in self.current.cells_mut().iter_mut().zip(target) {
            let diff = goal - *cell;
            let step = diff.signum() * diff.abs().min(max_move);
            *cell = clamp_cell(*cell + step, 0.0, max_height);
        }
    }

    /// Advances by the wall-clock time since the previous update. Returns the dt used.
    pub fn advance_auto(&mut self) -> f64 {
        let dt = self.last_update.elapsed().as_secs_f64();
        self.advance(dt);
        dt
    }

    pub fn current_heights(&self) -> Grid {
        self.current.clone()
    }

    pub fn target_heights(&self) -> Grid {
        self.target.clone()
    }

    /// Drops the table flat immediately.
    pub fn reset(&mut self) {
        self.current.map_in_place(|_| 0.0);
        self.target.map_in_place(|_| 0.0);
    }
}
