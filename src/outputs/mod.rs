pub mod renderer;

pub use renderer::{ConsoleRenderer, Renderer};
