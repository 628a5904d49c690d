//! Single-height collision probe

use log::trace;
use raywalk_math::{HorizontalExt, Mat4, Ray3, Vec3, UP};
use raywalk_scene::{Intersection, NodeKey, SceneQuery};
use serde::{Deserialize, Serialize};

use crate::base_controller::ControllerState;
use crate::debugger::DebugSink;

/// Probe height and blocking distance of one detector
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CollisionProbeConfig {
    /// Absolute world height the probe ray is cast at
    pub height: f32,
    /// Hits strictly closer than this are collisions
    pub collision_distance: f32,
}

/// A face hit that blocks movement
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub node: NodeKey,
    pub distance: f32,
    pub point: Vec3,
    /// Face normal in the hit object's local space
    pub normal: Vec3,
    /// Local-to-world matrix of the hit object
    pub object_transform: Mat4,
}

impl Hit {
    /// Accept only face hits that carry both a normal and a transform
    pub fn from_intersection(intersection: &Intersection) -> Option<Self> {
        Some(Self {
            node: intersection.node,
            distance: intersection.distance,
            point: intersection.point,
            normal: intersection.normal?,
            object_transform: intersection.object_transform?,
        })
    }

    /// Unit face normal in world space
    pub fn world_normal(&self) -> Vec3 {
        self.normal.transform_direction(&self.object_transform)
    }

    /// World normal with its vertical component removed
    pub fn horizontal_normal(&self) -> Vec3 {
        self.world_normal().project_on_plane(UP)
    }
}

/// Casts one horizontal ray along the movement direction
#[derive(Clone, Copy, Debug)]
pub struct CollisionDetector {
    config: CollisionProbeConfig,
}

impl CollisionDetector {
    pub fn new(config: CollisionProbeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollisionProbeConfig {
        &self.config
    }

    /// Probe ray for a state: starts under/over the camera at the probe height
    pub fn probe_ray(&self, state: &ControllerState) -> Ray3 {
        let origin = Vec3::new(state.position.x, self.config.height, state.position.z);
        Ray3::new(origin, state.movement_direction)
    }

    /// Nearest face hit closer than the collision distance, if any
    ///
    /// Debug-only nodes are never probed; with a sink attached the sink
    /// decides which nodes those are. The probe (plus the hit normal) is
    /// reported to the sink, which never changes the result.
    pub fn get_collision(
        &self,
        state: &ControllerState,
        scene: &dyn SceneQuery,
        debug: Option<&mut dyn DebugSink>,
    ) -> Option<Hit> {
        let ray = self.probe_ray(state);
        if ray.is_degenerate() {
            return None;
        }

        let objects = match debug.as_deref() {
            Some(sink) => sink.filter_debug_meshes(scene),
            None => geometry_roots(scene),
        };

        // Intersections arrive sorted by ascending distance, so the first
        // face hit is the nearest one. Equal distances keep the query's order.
        let hit = scene
            .intersect_objects(&ray, &objects, true)
            .iter()
            .find_map(Hit::from_intersection)
            .filter(|hit| hit.distance < self.config.collision_distance);

        if let Some(hit) = &hit {
            trace!(
                "Probe at height {} hit {:?} at distance {}",
                self.config.height,
                hit.node,
                hit.distance
            );
        }

        if let Some(sink) = debug {
            sink.add_debugging_arrows(&ray, hit.as_ref());
        }

        hit
    }
}

/// Top-level nodes outside the debug layer
pub(crate) fn geometry_roots(scene: &dyn SceneQuery) -> Vec<NodeKey> {
    scene
        .children()
        .into_iter()
        .filter(|&key| !scene.layers(key).is_debug())
        .collect()
}
