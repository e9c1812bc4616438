//! Terminal presentation module
//!
//! Renders the coach's view as text lines and turns typed lines into commands.

pub mod input;
pub mod render;

// Re-export main functions
pub use input::input_task;
pub use render::render_task;
