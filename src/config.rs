//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`RW_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use raywalk_controller::ControllerConfig;
use serde::{Serialize, Deserialize};
use std::path::Path;

use crate::systems::ScriptStep;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Controller tunables
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Scene configuration
    #[serde(default)]
    pub scene: SceneConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
    /// Scripted walkthrough
    #[serde(default)]
    pub walkthrough: WalkthroughConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`RW_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // RW_CONTROLLER__COLLISION_DISTANCE=2.0 -> controller.collision_distance = 2.0
        figment = figment.merge(Env::prefixed("RW_").split("__"));

        figment.extract().map_err(ConfigError::from)
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Path to the RON scene file
    pub path: String,
    /// Camera start [x, z] when the scene has no spawn point
    pub start_position: [f32; 2],
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            path: "scenes/cubes.ron".to_string(),
            start_position: [0.0, 5.0],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Attach the probe debugger
    pub enabled: bool,
    /// Arrows kept by the debugger
    pub max_arrows: usize,
    /// Drawn length of probe and normal arrows
    pub arrow_length: f32,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            max_arrows: raywalk_controller::DEFAULT_MAX_ARROWS,
            arrow_length: raywalk_controller::DEFAULT_ARROW_LENGTH,
            log_level: "info".to_string(),
        }
    }
}

/// Walkthrough configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkthroughConfig {
    /// Frames to run before stopping
    pub frames: u32,
    /// Input events, replayed at their frame numbers
    pub steps: Vec<ScriptStep>,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            frames: 120,
            steps: Vec::new(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
