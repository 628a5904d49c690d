//! Layer flags for scene nodes

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Layers a scene node belongs to
    ///
    /// Collision probes only care about [`SceneLayers::GEOMETRY`]; anything
    /// tagged [`SceneLayers::DEBUG`] is visualisation and must never block
    /// movement.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct SceneLayers: u32 {
        /// Solid scene geometry (walls, props)
        const GEOMETRY = 1 << 0;
        /// Debug visualisation (probe arrows, normals)
        const DEBUG = 1 << 1;
        /// Editor/helper objects (markers, gizmos)
        const HELPER = 1 << 2;
        /// Every layer
        const ALL = 0xFFFFFFFF;
    }
}

impl Default for SceneLayers {
    fn default() -> Self {
        SceneLayers::GEOMETRY
    }
}

impl SceneLayers {
    /// Whether this node is debug-only geometry
    pub fn is_debug(&self) -> bool {
        self.contains(SceneLayers::DEBUG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_geometry() {
        assert_eq!(SceneLayers::default(), SceneLayers::GEOMETRY);
        assert!(!SceneLayers::default().is_debug());
    }

    #[test]
    fn test_debug_detection() {
        assert!(SceneLayers::DEBUG.is_debug());
        assert!((SceneLayers::GEOMETRY | SceneLayers::DEBUG).is_debug());
        assert!(!SceneLayers::HELPER.is_debug());
    }
}
