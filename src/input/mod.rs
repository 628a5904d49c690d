//! Input handling module
//!
//! Maps special keys and clicks to controller actions.

mod input_mapper;

pub use input_mapper::{InputAction, InputMapper};
