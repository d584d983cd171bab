//! Game configuration resource.
//!
//! Manages game settings loaded from an INI configuration file. Provides
//! defaults for safe startup and methods to load/save configuration.
//!
//! # Configuration File Format
//!
//! ```ini
//! [window]
//! width = 1280
//! height = 720
//! target_fps = 60
//!
//! [world]
//! pixels_per_meter = 32
//! gravity_x = 0
//! gravity_y = -9.8
//! max_substep = 0.0166667
//!
//! [assets]
//! texture_root = ./assets/textures
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::info;
use raylib::prelude::Vector2;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_WINDOW_WIDTH: u32 = 1280;
const DEFAULT_WINDOW_HEIGHT: u32 = 720;
const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_PIXELS_PER_METER: f32 = 32.0;
const DEFAULT_GRAVITY_X: f32 = 0.0;
const DEFAULT_GRAVITY_Y: f32 = -9.8;
const DEFAULT_MAX_SUBSTEP: f32 = 1.0 / 60.0;
const DEFAULT_TEXTURE_ROOT: &str = "./assets/textures";
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Game configuration resource.
#[derive(Resource, Debug, Clone)]
pub struct GameConfig {
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Target frames per second.
    pub target_fps: u32,
    /// Screen pixels per world unit (meter).
    pub pixels_per_meter: f32,
    /// World gravity in meters per second squared, y up.
    pub gravity: Vector2,
    /// Longest physics sub-step in seconds.
    pub max_substep: f32,
    /// Directory texture paths are resolved against.
    pub texture_root: PathBuf,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl GameConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            window_width: DEFAULT_WINDOW_WIDTH,
            window_height: DEFAULT_WINDOW_HEIGHT,
            target_fps: DEFAULT_TARGET_FPS,
            pixels_per_meter: DEFAULT_PIXELS_PER_METER,
            gravity: Vector2 {
                x: DEFAULT_GRAVITY_X,
                y: DEFAULT_GRAVITY_Y,
            },
            max_substep: DEFAULT_MAX_SUBSTEP,
            texture_root: PathBuf::from(DEFAULT_TEXTURE_ROOT),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [window] section
        if let Some(width) = config.getuint("window", "width").ok().flatten() {
            self.window_width = width as u32;
        }
        if let Some(height) = config.getuint("window", "height").ok().flatten() {
            self.window_height = height as u32;
        }
        if let Some(fps) = config.getuint("window", "target_fps").ok().flatten() {
            self.target_fps = fps as u32;
        }

        // [world] section
        if let Some(ppm) = config.getfloat("world", "pixels_per_meter").ok().flatten() {
            self.pixels_per_meter = ppm as f32;
        }
        if let Some(gx) = config.getfloat("world", "gravity_x").ok().flatten() {
            self.gravity.x = gx as f32;
        }
        if let Some(gy) = config.getfloat("world", "gravity_y").ok().flatten() {
            self.gravity.y = gy as f32;
        }
        if let Some(step) = config.getfloat("world", "max_substep").ok().flatten() {
            self.max_substep = step as f32;
        }

        // [assets] section
        if let Some(root) = config.get("assets", "texture_root") {
            self.texture_root = PathBuf::from(root);
        }

        info!(
            "Loaded config: {}x{} window, fps={}, {} px/m, gravity=({}, {}), textures in {:?}",
            self.window_width,
            self.window_height,
            self.target_fps,
            self.pixels_per_meter,
            self.gravity.x,
            self.gravity.y,
            self.texture_root
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        // [window] section
        config.set("window", "width", Some(self.window_width.to_string()));
        config.set("window", "height", Some(self.window_height.to_string()));
        config.set("window", "target_fps", Some(self.target_fps.to_string()));

        // [world] section
        config.set(
            "world",
            "pixels_per_meter",
            Some(self.pixels_per_meter.to_string()),
        );
        config.set("world", "gravity_x", Some(self.gravity.x.to_string()));
        config.set("world", "gravity_y", Some(self.gravity.y.to_string()));
        config.set("world", "max_substep", Some(self.max_substep.to_string()));

        // [assets] section
        config.set(
            "assets",
            "texture_root",
            Some(self.texture_root.display().to_string()),
        );

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved config to {:?}", self.config_path);

        Ok(())
    }

    /// Get the window size.
    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}
