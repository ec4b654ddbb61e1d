pub mod config;
pub mod director;
pub mod kernel;
pub mod outputs;
pub mod patterns;
pub mod services;

// Re-export specific items for convenient access
pub use config::TableConfig;
pub use director::{CreativeDirector, DirectorHandle};
pub use kernel::reactor::ControlLoop;
