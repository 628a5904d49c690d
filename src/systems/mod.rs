//! Application systems
//!
//! Hosts that drive the controller outside of a window.

mod walkthrough;

pub use walkthrough::{ScriptAction, ScriptStep, WalkthroughStats, WalkthroughSystem};
