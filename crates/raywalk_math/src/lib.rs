//! Math Library
//!
//! This crate provides the small amount of geometry the controller needs on
//! top of `glam`.
//!
//! ## Core Types
//!
//! - [`Ray3`] - A ray with an origin and a unit direction
//! - [`HorizontalExt`] - Helpers for working on the X-Z (ground) plane
//!
//! The vector, quaternion and matrix types themselves are re-exported from
//! `glam` so downstream crates agree on a single math backend.

mod horizontal;
mod ray;

pub use horizontal::{HorizontalExt, UP};
pub use ray::Ray3;

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
