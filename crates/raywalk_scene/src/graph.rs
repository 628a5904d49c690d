//! Scene graph container and ray queries
//!
//! The [`SceneGraph`] stores nodes in a slotmap so keys handed out to the
//! host (and stored in hits) stay valid until the node is removed, and stale
//! keys simply fail to resolve.

use log::debug;
use raywalk_math::{Mat4, Ray3, Vec3};
use slotmap::{new_key_type, SlotMap};

use crate::layers::SceneLayers;
use crate::shapes::Shape;
use crate::transform::NodeTransform;

new_key_type! {
    /// Generational key to a node in the [`SceneGraph`]
    pub struct NodeKey;
}

/// A node in the scene
#[derive(Clone, Debug)]
pub struct SceneNode {
    /// Display name (for logging/debugging)
    pub name: String,
    /// Transform relative to the parent node
    pub transform: NodeTransform,
    /// Shape tested by ray queries
    pub shape: Shape,
    /// Layer membership
    pub layers: SceneLayers,
    children: Vec<NodeKey>,
    parent: Option<NodeKey>,
}

impl SceneNode {
    /// Create a node with the default (geometry) layer
    pub fn new(name: impl Into<String>, shape: Shape, transform: NodeTransform) -> Self {
        Self {
            name: name.into(),
            transform,
            shape,
            layers: SceneLayers::default(),
            children: Vec::new(),
            parent: None,
        }
    }

    /// Create an empty group node
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Shape::Group, NodeTransform::IDENTITY)
    }

    /// Builder: set the layers
    pub fn with_layers(mut self, layers: SceneLayers) -> Self {
        self.layers = layers;
        self
    }

    /// Child node keys
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    /// Parent node key (None for top-level nodes)
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }
}

/// A ray hit reported by a [`SceneQuery`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Intersection {
    /// Node that was hit
    pub node: NodeKey,
    /// World-space distance from the ray origin
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Face normal in the hit object's local space (None for faceless hits)
    pub normal: Option<Vec3>,
    /// Local-to-world matrix of the hit object, if known
    pub object_transform: Option<Mat4>,
}

/// Raycasting surface of a scene
///
/// Implementors must return hits sorted by ascending distance. Collision
/// detection takes the first qualifying hit as the nearest one and does not
/// re-sort.
pub trait SceneQuery {
    /// Top-level nodes of the scene
    fn children(&self) -> Vec<NodeKey>;

    /// Layers of a node (empty for unknown keys)
    fn layers(&self, key: NodeKey) -> SceneLayers;

    /// Intersect `ray` with `objects` (and their descendants when `recursive`)
    fn intersect_objects(&self, ray: &Ray3, objects: &[NodeKey], recursive: bool) -> Vec<Intersection>;
}

/// The scene containing all nodes
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeKey, SceneNode>,
    roots: Vec<NodeKey>,
}

impl SceneGraph {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node
    pub fn add(&mut self, mut node: SceneNode) -> NodeKey {
        node.parent = None;
        node.children.clear();
        let key = self.nodes.insert(node);
        self.roots.push(key);
        key
    }

    /// Add a node under `parent`
    ///
    /// Returns None if the parent does not exist.
    pub fn add_child(&mut self, parent: NodeKey, mut node: SceneNode) -> Option<NodeKey> {
        if !self.nodes.contains_key(parent) {
            return None;
        }
        node.parent = Some(parent);
        node.children.clear();
        let key = self.nodes.insert(node);
        self.nodes[parent].children.push(key);
        Some(key)
    }

    /// Remove a node and all of its descendants
    ///
    /// Returns the removed node itself (its children are dropped).
    pub fn remove(&mut self, key: NodeKey) -> Option<SceneNode> {
        let node = self.nodes.remove(key)?;

        match node.parent {
            Some(parent) => {
                if let Some(p) = self.nodes.get_mut(parent) {
                    p.children.retain(|&c| c != key);
                }
            }
            None => self.roots.retain(|&r| r != key),
        }

        let mut pending = node.children.clone();
        while let Some(child) = pending.pop() {
            if let Some(removed) = self.nodes.remove(child) {
                pending.extend(removed.children);
            }
        }

        Some(node)
    }

    /// Get a node
    pub fn get(&self, key: NodeKey) -> Option<&SceneNode> {
        self.nodes.get(key)
    }

    /// Get a node mutably
    pub fn get_mut(&mut self, key: NodeKey) -> Option<&mut SceneNode> {
        self.nodes.get_mut(key)
    }

    /// Find the first node with the given name
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes.iter().find(|(_, n)| n.name == name).map(|(k, _)| k)
    }

    /// Number of nodes (at any depth)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level node keys
    pub fn roots(&self) -> &[NodeKey] {
        &self.roots
    }

    /// Local-to-world matrix of a node, composed along its parent chain
    pub fn world_matrix(&self, key: NodeKey) -> Option<Mat4> {
        let mut node = self.nodes.get(key)?;
        let mut matrix = node.transform.to_matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            matrix = node.transform.to_matrix() * matrix;
        }
        Some(matrix)
    }

    fn intersect_node(
        &self,
        ray: &Ray3,
        key: NodeKey,
        world: Mat4,
        recursive: bool,
        hits: &mut Vec<Intersection>,
    ) {
        let Some(node) = self.nodes.get(key) else {
            return;
        };

        if let Some(hit) = intersect_shape(ray, &node.shape, &world) {
            hits.push(Intersection {
                node: key,
                distance: hit.0,
                point: hit.1,
                normal: hit.2,
                object_transform: Some(world),
            });
        }

        if recursive {
            for &child in &node.children {
                if let Some(child_node) = self.nodes.get(child) {
                    let child_world = world * child_node.transform.to_matrix();
                    self.intersect_node(ray, child, child_world, recursive, hits);
                }
            }
        }
    }
}

/// Map the ray into the shape's local space and back
fn intersect_shape(ray: &Ray3, shape: &Shape, world: &Mat4) -> Option<(f32, Vec3, Option<Vec3>)> {
    if matches!(shape, Shape::Group) || ray.is_degenerate() {
        return None;
    }

    // Singular matrices (zero scale) cannot be inverted: nothing to hit
    if world.determinant().abs() < f32::EPSILON {
        return None;
    }
    let inverse = world.inverse();
    let local_origin = inverse.transform_point3(ray.origin);
    let local_direction = inverse.transform_vector3(ray.direction);

    let hit = shape.intersect_local(local_origin, local_direction)?;
    let point = world.transform_point3(hit.point);
    let distance = (point - ray.origin).length();

    Some((distance, point, hit.normal))
}

impl SceneQuery for SceneGraph {
    fn children(&self) -> Vec<NodeKey> {
        self.roots.clone()
    }

    fn layers(&self, key: NodeKey) -> SceneLayers {
        self.nodes
            .get(key)
            .map(|n| n.layers)
            .unwrap_or(SceneLayers::empty())
    }

    fn intersect_objects(&self, ray: &Ray3, objects: &[NodeKey], recursive: bool) -> Vec<Intersection> {
        let mut hits = Vec::new();
        for &key in objects {
            if let Some(world) = self.world_matrix(key) {
                self.intersect_node(ray, key, world, recursive, &mut hits);
            } else {
                debug!("Skipping stale node key {:?} in ray query", key);
            }
        }

        // Stable: equal distances keep traversal order
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}
