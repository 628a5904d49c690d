//! Raywalk - first-person walkthrough with raycast collision
//!
//! The root package wires the workspace crates into an application:
//! layered configuration, special-key mapping and a headless walkthrough host.

pub mod config;
pub mod input;
pub mod systems;
