//! Raywalk - headless walkthrough
//!
//! Loads the configured scene and replays the scripted walkthrough through
//! the collision controller.

use raywalk::config::AppConfig;
use raywalk::systems::WalkthroughSystem;
use raywalk_math::Vec3;
use raywalk_scene::{SceneDescription, SceneGraph};

fn main() {
    // The log level comes from the config, so report load failures after init
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }
    log::info!("Starting Raywalk");

    let description = match SceneDescription::load(&config.scene.path) {
        Ok(description) => description,
        Err(e) => {
            log::error!("Failed to load scene '{}': {}", config.scene.path, e);
            std::process::exit(1);
        }
    };
    let scene = SceneGraph::from_description(&description);

    let spawn = description
        .spawn
        .map(Vec3::from_array)
        .unwrap_or_else(|| {
            let [x, z] = config.scene.start_position;
            log::warn!("Scene '{}' has no spawn point, starting at ({}, {})", description.name, x, z);
            Vec3::new(x, 0.0, z)
        });

    let mut walkthrough = WalkthroughSystem::new(&config, spawn);
    let stats = walkthrough.run(&scene, config.walkthrough.frames, &config.walkthrough.steps);

    let position = walkthrough.controller().camera().position;
    println!(
        "{} frames: {} moved, {} slid, {} idle, {} paused; final position ({:.2}, {:.2}, {:.2})",
        stats.frames, stats.moved, stats.slid, stats.idle, stats.paused, position.x, position.y, position.z
    );
}
