//! Scene graph for raywalk
//!
//! This crate provides the scene the controller walks through and the ray
//! queries it uses to find obstacles:
//!
//! - [`SceneGraph`] - Container for all nodes, keyed by [`NodeKey`]
//! - [`SceneNode`] - A node with a transform, a shape and layer flags
//! - [`Shape`] - What a node looks like to a ray (group, cuboid, point)
//! - [`SceneLayers`] - Layer flags used to keep debug geometry out of queries
//! - [`SceneQuery`] - The raycasting surface consumed by collision detection
//! - [`SceneDescription`] - Loadable/saveable RON scene

mod description;
mod graph;
mod layers;
mod shapes;
mod transform;

pub use description::{ObjectTemplate, SceneDescription, SceneLoadError, SceneSaveError, ShapeTemplate};
pub use graph::{Intersection, NodeKey, SceneGraph, SceneNode, SceneQuery};
pub use layers::SceneLayers;
pub use shapes::{LocalHit, Shape};
pub use transform::NodeTransform;
