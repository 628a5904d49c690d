//! Scene serialization
//!
//! Provides [`SceneDescription`] for loading/saving scenes from RON files
//! and turning them into a [`SceneGraph`].

use raywalk_math::Vec3;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

use crate::graph::{NodeKey, SceneGraph, SceneNode};
use crate::layers::SceneLayers;
use crate::shapes::Shape;
use crate::transform::NodeTransform;

/// Serializable shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ShapeTemplate {
    /// Empty container
    Group,
    /// Box with full size [x, y, z]
    Cuboid { size: [f32; 3] },
    /// Point marker with a pick radius
    Point { radius: f32 },
}

impl ShapeTemplate {
    /// Convert to a runtime shape
    pub fn to_shape(&self) -> Shape {
        match self {
            ShapeTemplate::Group => Shape::Group,
            ShapeTemplate::Cuboid { size } => Shape::cuboid(Vec3::from_array(*size)),
            ShapeTemplate::Point { radius } => Shape::Point { radius: *radius },
        }
    }
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

/// Serializable scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectTemplate {
    pub name: String,
    pub shape: ShapeTemplate,
    /// Position relative to the parent [x, y, z]
    #[serde(default)]
    pub position: [f32; 3],
    /// XYZ Euler rotation in degrees
    #[serde(default)]
    pub rotation: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
    #[serde(default)]
    pub layers: SceneLayers,
    #[serde(default)]
    pub children: Vec<ObjectTemplate>,
}

impl ObjectTemplate {
    /// Create a box object at a position
    pub fn cuboid(name: impl Into<String>, size: [f32; 3], position: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            shape: ShapeTemplate::Cuboid { size },
            position,
            rotation: [0.0; 3],
            scale: default_scale(),
            layers: SceneLayers::default(),
            children: Vec::new(),
        }
    }

    fn to_node(&self) -> SceneNode {
        let [rx, ry, rz] = self.rotation;
        let transform = NodeTransform::from_translation(Vec3::from_array(self.position))
            .with_euler_degrees(rx, ry, rz)
            .with_scale(Vec3::from_array(self.scale));
        SceneNode::new(self.name.clone(), self.shape.to_shape(), transform).with_layers(self.layers)
    }
}

/// A serializable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Scene name (for display/debugging)
    pub name: String,
    /// Camera spawn position [x, y, z]; y is replaced by the camera height
    #[serde(default)]
    pub spawn: Option<[f32; 3]>,
    pub objects: Vec<ObjectTemplate>,
}

impl SceneDescription {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            spawn: None,
            objects: Vec::new(),
        }
    }

    /// Load a scene from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SceneLoadError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a scene from a RON string
    pub fn from_ron(contents: &str) -> Result<Self, SceneLoadError> {
        Ok(ron::from_str(contents)?)
    }

    /// Save a scene to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneSaveError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        let contents = ron::ser::to_string_pretty(self, pretty)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Builder: add an object
    pub fn with_object(mut self, object: ObjectTemplate) -> Self {
        self.objects.push(object);
        self
    }

    /// Builder: set the spawn position
    pub fn with_spawn(mut self, x: f32, y: f32, z: f32) -> Self {
        self.spawn = Some([x, y, z]);
        self
    }

    /// Instantiate every object into a new scene graph
    pub fn instantiate(&self) -> SceneGraph {
        let mut graph = SceneGraph::new();
        for object in &self.objects {
            let key = graph.add(object.to_node());
            add_children(&mut graph, key, &object.children);
        }
        log::info!("Instantiated scene '{}' with {} nodes", self.name, graph.len());
        graph
    }
}

impl SceneGraph {
    /// Build a scene graph from a description
    pub fn from_description(description: &SceneDescription) -> Self {
        description.instantiate()
    }
}

fn add_children(graph: &mut SceneGraph, parent: NodeKey, children: &[ObjectTemplate]) {
    for child in children {
        if let Some(key) = graph.add_child(parent, child.to_node()) {
            add_children(graph, key, &child.children);
        }
    }
}

/// Error loading a scene
#[derive(Debug)]
pub enum SceneLoadError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
}

impl From<io::Error> for SceneLoadError {
    fn from(e: io::Error) -> Self {
        SceneLoadError::Io(e)
    }
}

impl From<ron::error::SpannedError> for SceneLoadError {
    fn from(e: ron::error::SpannedError) -> Self {
        SceneLoadError::Parse(e)
    }
}

impl std::fmt::Display for SceneLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneLoadError::Io(e) => write!(f, "IO error: {}", e),
            SceneLoadError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for SceneLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneLoadError::Io(e) => Some(e),
            SceneLoadError::Parse(e) => Some(e),
        }
    }
}

/// Error saving a scene
#[derive(Debug)]
pub enum SceneSaveError {
    /// IO error (permission denied, disk full, etc.)
    Io(io::Error),
    /// Serialization error
    Serialize(ron::Error),
}

impl From<io::Error> for SceneSaveError {
    fn from(e: io::Error) -> Self {
        SceneSaveError::Io(e)
    }
}

impl From<ron::Error> for SceneSaveError {
    fn from(e: ron::Error) -> Self {
        SceneSaveError::Serialize(e)
    }
}

impl std::fmt::Display for SceneSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneSaveError::Io(e) => write!(f, "IO error: {}", e),
            SceneSaveError::Serialize(e) => write!(f, "Serialize error: {}", e),
        }
    }
}

impl std::error::Error for SceneSaveError {}
