use tracing::{debug, info};

use crate::kernel::grid::Grid;

/// Consumer of one frame per control-loop tick.
pub trait Renderer {
    /// Shows the pin heights and caption. Returning `false` means the display
    /// was closed and the control loop should end.
    fn present(&mut self, heights: &Grid, caption: &str) -> bool;
}

/// Headless stand-in for a 3D view: logs caption changes and, every
/// `summary_every` frames, a height summary.
#[derive(Debug)]
pub struct ConsoleRenderer {
    caption: String,
    frames: u64,
    summary_every: u64,
}

impl ConsoleRenderer {
    pub fn new(summary_every: u64) -> Self {
        Self {
            caption: String::new(),
            frames: 0,
            summary_every: summary_every.max(1),
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for ConsoleRenderer {
    fn present(&mut self, heights: &Grid, caption: &str) -> bool {
        self.frames += 1;

        if caption != self.caption {
            info!(target: "table", "{}", caption);
            self.caption = caption.to_string();
        }

        if self.frames % self.summary_every == 0 {
            debug!(
                target: "table",
                frame = self.frames,
                min = heights.min().unwrap_or(0.0),
                mean = heights.mean().unwrap_or(0.0),
                max = heights.max().unwrap_or(0.0),
                "Pin heights"
            );
        }
        true
    }
}
