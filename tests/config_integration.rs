//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use lumen::config::AppConfig;
use serial_test::serial;
use std::path::PathBuf;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("lumen_config_{}_{}", name, std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("LUMEN_SIMULATION__FRAMES", "7");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("LUMEN_SIMULATION__FRAMES");
    assert_eq!(config.simulation.frames, 7);
}

#[test]
#[serial]
fn test_default_file_loading() {
    let config = AppConfig::load().unwrap();
    assert_eq!(config.scheduler.collision_samples, 4);
    assert!(config.scheduler.collision_detect);
    assert_eq!(config.debug.log_level, "info");
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user");
    std::fs::write(dir.join("default.toml"), "[scheduler]\ncollision_samples = 4\n").unwrap();
    std::fs::write(dir.join("user.toml"), "[scheduler]\ncollision_samples = 9\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.scheduler.collision_samples, 9);

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_env_beats_user_file() {
    let dir = scratch_dir("env");
    std::fs::write(dir.join("user.toml"), "[debug]\nlog_level = \"warn\"\n").unwrap();

    std::env::set_var("LUMEN_DEBUG__LOG_LEVEL", "trace");
    let config = AppConfig::load_from(&dir);
    std::env::remove_var("LUMEN_DEBUG__LOG_LEVEL");

    assert_eq!(config.unwrap().debug.log_level, "trace");
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let config = AppConfig::load_from("does/not/exist").unwrap();
    assert_eq!(config.simulation.frames, 120);
}

#[test]
#[serial]
fn test_bad_value_is_an_error() {
    std::env::set_var("LUMEN_SCHEDULER__COLLISION_SAMPLES", "many");
    let result = AppConfig::load_from("does/not/exist");
    std::env::remove_var("LUMEN_SCHEDULER__COLLISION_SAMPLES");

    let err = result.unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}
