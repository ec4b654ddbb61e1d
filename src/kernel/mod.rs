pub mod actuator;
pub mod grid;
pub mod reactor;
pub mod time;

pub use actuator::{ActuatorConfig, ActuatorModel};
pub use grid::{Grid, GridError};
pub use reactor::{ControlLoop, Frame};
