//! Probe visualisation
//!
//! The detectors report each probe ray (and the hit normal, when there is
//! one) to an optional [`DebugSink`]. [`ControllerDebugger`] keeps the most
//! recent arrows in a bounded buffer and turns them into line vertices a
//! host renderer can upload as-is.

use bytemuck::{Pod, Zeroable};
use log::debug;
use raywalk_math::{Ray3, Vec3, UP};
use raywalk_scene::{NodeKey, SceneQuery};
use std::collections::VecDeque;

use crate::collision_detector::{geometry_roots, Hit};

/// Default number of arrows kept before the oldest are evicted
pub const DEFAULT_MAX_ARROWS: usize = 100;

/// Default drawn length of probe and normal arrows
pub const DEFAULT_ARROW_LENGTH: f32 = 3.0;

/// Arrow head length as a fraction of the arrow length
const HEAD_FRACTION: f32 = 0.2;

/// 0xRRGGBB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Color = Color(0xff0000);
    pub const GREEN: Color = Color(0x00ff00);
    pub const YELLOW: Color = Color(0xffff00);

    /// Normalized RGBA with full alpha
    pub fn to_rgba(self) -> [f32; 4] {
        let channel = |shift: u32| ((self.0 >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0), 1.0]
    }
}

/// One arrow to draw
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebugArrow {
    /// Unit direction
    pub direction: Vec3,
    pub origin: Vec3,
    pub length: f32,
    pub color: Color,
}

/// Line-list vertex for a host line renderer
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: position.to_array(),
            color,
        }
    }
}

/// Receiver for probe visualisation
pub trait DebugSink {
    fn add_arrow(&mut self, arrow: DebugArrow);

    /// Top-level scene nodes the probes may hit (debug-only nodes removed)
    fn filter_debug_meshes(&self, scene: &dyn SceneQuery) -> Vec<NodeKey>;

    /// Drawn length of every arrow, independent of the blocking distance
    fn arrow_length(&self) -> f32 {
        DEFAULT_ARROW_LENGTH
    }

    /// Emit the probe ray and, on a hit, its horizontal surface normal
    fn add_debugging_arrows(&mut self, ray: &Ray3, hit: Option<&Hit>) {
        let length = self.arrow_length();
        let color = if hit.is_some() { Color::RED } else { Color::GREEN };
        self.add_arrow(DebugArrow {
            direction: ray.direction,
            origin: ray.origin,
            length,
            color,
        });

        if let Some(hit) = hit {
            let normal = hit.horizontal_normal().normalize_or_zero();
            if normal != Vec3::ZERO {
                self.add_arrow(DebugArrow {
                    direction: normal,
                    origin: hit.point,
                    length,
                    color: Color::YELLOW,
                });
            }
        }
    }
}

/// Bounded arrow buffer; the oldest arrows are evicted first
#[derive(Clone, Debug)]
pub struct ControllerDebugger {
    arrows: VecDeque<DebugArrow>,
    max_arrows: usize,
    arrow_length: f32,
}

impl Default for ControllerDebugger {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ARROWS)
    }
}

impl ControllerDebugger {
    pub fn new(max_arrows: usize) -> Self {
        Self {
            arrows: VecDeque::with_capacity(max_arrows),
            max_arrows,
            arrow_length: DEFAULT_ARROW_LENGTH,
        }
    }

    /// Builder: set the drawn arrow length
    pub fn with_arrow_length(mut self, length: f32) -> Self {
        self.arrow_length = length;
        self
    }

    pub fn max_arrows(&self) -> usize {
        self.max_arrows
    }

    /// Arrows, oldest first
    pub fn arrows(&self) -> impl Iterator<Item = &DebugArrow> {
        self.arrows.iter()
    }

    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    /// Line-list vertices: a shaft and two head strokes per arrow
    pub fn line_vertices(&self) -> Vec<LineVertex> {
        let mut vertices = Vec::with_capacity(self.arrows.len() * 6);
        for arrow in &self.arrows {
            let direction = arrow.direction.normalize_or_zero();
            if direction == Vec3::ZERO || arrow.length <= 0.0 {
                continue;
            }

            let color = arrow.color.to_rgba();
            let tip = arrow.origin + direction * arrow.length;
            let head = arrow.length * HEAD_FRACTION;
            let side = direction.cross(UP).try_normalize().unwrap_or(Vec3::X);
            let back = tip - direction * head;

            vertices.push(LineVertex::new(arrow.origin, color));
            vertices.push(LineVertex::new(tip, color));
            for sign in [1.0, -1.0] {
                vertices.push(LineVertex::new(tip, color));
                vertices.push(LineVertex::new(back + side * (head * 0.5 * sign), color));
            }
        }
        vertices
    }

    /// Drop every arrow
    pub fn destroy(&mut self) {
        debug!("Destroying controller debugger ({} arrows)", self.arrows.len());
        self.arrows.clear();
        self.arrows.shrink_to_fit();
    }
}

impl DebugSink for ControllerDebugger {
    fn add_arrow(&mut self, arrow: DebugArrow) {
        if self.max_arrows == 0 {
            return;
        }
        while self.arrows.len() >= self.max_arrows {
            self.arrows.pop_front();
        }
        self.arrows.push_back(arrow);
    }

    fn filter_debug_meshes(&self, scene: &dyn SceneQuery) -> Vec<NodeKey> {
        geometry_roots(scene)
    }

    fn arrow_length(&self) -> f32 {
        self.arrow_length
    }
}
