//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use raywalk::config::AppConfig;
use serial_test::serial;

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("RW_CONTROLLER__COLLISION_DISTANCE", "2.5");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("RW_CONTROLLER__COLLISION_DISTANCE");

    assert_eq!(config.controller.collision_distance, 2.5);
    // Untouched fields keep the file values
    assert_eq!(config.controller.low_collision_height, 0.2);
}

#[test]
#[serial]
fn test_default_file_loading() {
    std::env::remove_var("RW_CONTROLLER__COLLISION_DISTANCE");

    let config = AppConfig::load().unwrap();
    assert_eq!(config.scene.path, "scenes/cubes.ron");
    assert_eq!(config.walkthrough.frames, 240);
    assert!(!config.walkthrough.steps.is_empty());
}

#[test]
#[serial]
fn test_env_debug_section() {
    std::env::set_var("RW_DEBUG__ENABLED", "true");
    std::env::set_var("RW_DEBUG__MAX_ARROWS", "12");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("RW_DEBUG__ENABLED");
    std::env::remove_var("RW_DEBUG__MAX_ARROWS");

    assert!(config.debug.enabled);
    assert_eq!(config.debug.max_arrows, 12);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.controller.movement_distance, 0.1);
    assert_eq!(config.walkthrough.frames, 120);
}
