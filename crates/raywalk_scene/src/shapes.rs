//! Intersectable shapes
//!
//! Shapes are tested in the node's local space. The graph transforms the
//! query ray into local space, asks the shape for a [`LocalHit`] and maps the
//! result back to world space.

use raywalk_math::Vec3;
use serde::{Deserialize, Serialize};

/// Below this the ray is treated as parallel to a slab
const PARALLEL_EPSILON: f32 = 1e-8;

/// What a node looks like to a ray
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Pure container, never hit
    Group,
    /// Box centered at the local origin
    ///
    /// Only front faces are hit: a ray starting inside the box passes out
    /// of it without reporting an intersection.
    Cuboid { half_extents: Vec3 },
    /// Point marker with a pick radius. Hits carry no surface normal.
    Point { radius: f32 },
}

/// Intersection in the shape's local space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalHit {
    /// Ray parameter in local units
    pub t: f32,
    /// Hit point in local space
    pub point: Vec3,
    /// Face normal in local space, `None` for shapes without faces
    pub normal: Option<Vec3>,
}

impl Shape {
    /// Create a cuboid from its full size
    pub fn cuboid(size: Vec3) -> Self {
        Shape::Cuboid {
            half_extents: size * 0.5,
        }
    }

    /// Intersect a local-space ray with this shape
    ///
    /// `direction` does not have to be unit length (non-uniform node scale
    /// distorts it), so `t` is only meaningful in local units.
    pub fn intersect_local(&self, origin: Vec3, direction: Vec3) -> Option<LocalHit> {
        match *self {
            Shape::Group => None,
            Shape::Cuboid { half_extents } => ray_vs_cuboid(origin, direction, half_extents),
            Shape::Point { radius } => ray_vs_point(origin, direction, radius),
        }
    }
}

/// Slab test against an origin-centered box, returning the entry face
fn ray_vs_cuboid(origin: Vec3, direction: Vec3, half_extents: Vec3) -> Option<LocalHit> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_axis = None;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        let h = half_extents[axis];

        if d.abs() < PARALLEL_EPSILON {
            if o.abs() > h {
                return None;
            }
            continue;
        }

        let t1 = (-h - o) / d;
        let t2 = (h - o) / d;
        let (near, far) = if t1 < t2 { (t1, t2) } else { (t2, t1) };

        if near > t_enter {
            t_enter = near;
            enter_axis = Some(axis);
        }
        t_exit = t_exit.min(far);

        if t_enter > t_exit {
            return None;
        }
    }

    // Origin inside the box (or box behind the ray): back faces are culled
    let axis = enter_axis?;
    if t_enter < 0.0 {
        return None;
    }

    let mut normal = Vec3::ZERO;
    normal[axis] = -direction[axis].signum();

    Some(LocalHit {
        t: t_enter,
        point: origin + direction * t_enter,
        normal: Some(normal),
    })
}

/// Closest approach of the ray to the local origin
fn ray_vs_point(origin: Vec3, direction: Vec3, radius: f32) -> Option<LocalHit> {
    let len_sq = direction.length_squared();
    if len_sq == 0.0 {
        return None;
    }

    let t = -origin.dot(direction) / len_sq;
    if t < 0.0 {
        return None;
    }

    let closest = origin + direction * t;
    if closest.length_squared() > radius * radius {
        return None;
    }

    Some(LocalHit {
        t,
        point: closest,
        normal: None,
    })
}
