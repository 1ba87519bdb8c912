//! Application systems
//!
//! The window, simulation and render pieces the application sequences.

mod render;
mod simulation;
mod window;

pub use render::{projection_for, RenderError, RenderSystem};
pub use simulation::{FramePacer, Rotation, SimulationSystem};
pub use window::{WindowError, WindowSystem};
