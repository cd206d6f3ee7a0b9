//! Configuration system
//!
//! Startup settings for the tabletop viewer. Every field has a default that
//! reproduces the authored scene, so a missing config file is not an error;
//! a present but malformed one is.

use std::path::{Path, PathBuf};

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::texture::{FilterMode, TextureParams, WrapMode};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file, picking the format by extension
    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension_of(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to file
    fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension_of(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value is outside its allowed range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Display surface settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Window title
    pub title: String,
    /// Surface width in pixels, fixed for the session
    pub width: u32,
    /// Surface height in pixels, fixed for the session
    pub height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            title: "Tabletop Still Life".to_string(),
            width: 1000,
            height: 800,
        }
    }
}

impl DisplayConfig {
    /// Width over height
    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Initial camera state and input tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting eye position
    pub position: [f32; 3],
    /// Starting view direction, need not be normalized
    pub front: [f32; 3],
    /// World up vector
    pub up: [f32; 3],
    /// Vertical field of view in degrees
    pub zoom: f32,
    /// Starting movement speed in units per second
    pub movement_speed: f32,
    /// Floor for movement speed
    pub min_movement_speed: f32,
    /// Speed change per scroll tick
    pub speed_step: f32,
    /// Degrees of rotation per pixel of pointer motion
    pub mouse_sensitivity: f32,
    /// Pitch clamp in degrees
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 5.0, 12.0],
            front: [0.0, -0.5, -2.0],
            up: [0.0, 1.0, 0.0],
            zoom: 80.0,
            movement_speed: 5.0,
            min_movement_speed: 1.0,
            speed_step: 2.0,
            mouse_sensitivity: 0.1,
            pitch_limit: 89.0,
        }
    }
}

impl CameraConfig {
    /// Starting eye position as a vector
    #[must_use]
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from(self.position)
    }

    /// Starting view direction as a vector
    #[must_use]
    pub fn front_vec(&self) -> Vec3 {
        Vec3::from(self.front)
    }

    /// World up as a vector
    #[must_use]
    pub fn up_vec(&self) -> Vec3 {
        Vec3::from(self.up)
    }
}

/// Projection volume settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Half extent of the orthographic box on both axes
    pub ortho_half_extent: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            ortho_half_extent: 10.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Texture loading settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Directory that scene texture paths are resolved against
    pub directory: PathBuf,
    /// Minification and magnification filter
    pub filter: FilterMode,
    /// Coordinate wrapping outside [0, 1]
    pub wrap: WrapMode,
    /// Build a mip chain on upload
    pub generate_mipmaps: bool,
}

impl Default for TextureConfig {
    fn default() -> Self {
        let params = TextureParams::default();
        Self {
            directory: PathBuf::from("textures"),
            filter: params.filter_mode,
            wrap: params.wrap_mode,
            generate_mipmaps: params.generate_mipmaps,
        }
    }
}

impl TextureConfig {
    /// Sampler parameters applied to every upload
    #[must_use]
    pub const fn params(&self) -> TextureParams {
        TextureParams {
            filter_mode: self.filter,
            wrap_mode: self.wrap,
            generate_mipmaps: self.generate_mipmaps,
        }
    }
}

/// Frame pacing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    /// Largest frame delta applied to movement, in seconds
    pub max_frame_delta: f32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { max_frame_delta: 0.25 }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Optional RON scene description replacing the built-in still life
    pub scene_file: Option<PathBuf>,
    /// Window settings
    pub display: DisplayConfig,
    /// Camera settings
    pub camera: CameraConfig,
    /// Projection settings
    pub projection: ProjectionConfig,
    /// Texture settings
    pub textures: TextureConfig,
    /// Frame pacing
    pub frame: FrameConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            scene_file: None,
            display: DisplayConfig::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            textures: TextureConfig::default(),
            frame: FrameConfig::default(),
        }
    }
}

impl Config for AppConfig {}

impl AppConfig {
    /// Check ranges that would otherwise produce degenerate matrices or frozen movement
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "display size must be non-zero, got {}x{}",
                self.display.width, self.display.height
            )));
        }
        let camera = &self.camera;
        if camera.min_movement_speed < 1.0 {
            return Err(ConfigError::Invalid(format!(
                "min_movement_speed must be at least 1.0, got {}",
                camera.min_movement_speed
            )));
        }
        if camera.movement_speed < camera.min_movement_speed {
            return Err(ConfigError::Invalid(format!(
                "movement_speed {} is below min_movement_speed {}",
                camera.movement_speed, camera.min_movement_speed
            )));
        }
        if camera.speed_step <= 0.0 {
            return Err(ConfigError::Invalid("speed_step must be positive".to_string()));
        }
        if !(0.0..90.0).contains(&camera.pitch_limit) {
            return Err(ConfigError::Invalid(format!(
                "pitch_limit must be within [0, 90), got {}",
                camera.pitch_limit
            )));
        }
        if camera.front_vec().norm() <= f32::EPSILON || camera.up_vec().norm() <= f32::EPSILON {
            return Err(ConfigError::Invalid("camera front and up must be non-zero".to_string()));
        }
        if !(0.0 < camera.zoom && camera.zoom < 180.0) {
            return Err(ConfigError::Invalid(format!("zoom must be within (0, 180), got {}", camera.zoom)));
        }
        let projection = &self.projection;
        if projection.near <= 0.0 || projection.far <= projection.near {
            return Err(ConfigError::Invalid(format!(
                "clip planes must satisfy 0 < near < far, got near {} far {}",
                projection.near, projection.far
            )));
        }
        if projection.ortho_half_extent <= 0.0 {
            return Err(ConfigError::Invalid("ortho_half_extent must be positive".to_string()));
        }
        if self.frame.max_frame_delta <= 0.0 {
            return Err(ConfigError::Invalid("max_frame_delta must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tabletop_config_{}_{}", std::process::id(), name))
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_relative_eq!(config.display.aspect_ratio(), 1.25);
    }

    #[test]
    fn test_toml_round_trip() {
        let path = temp_path("round_trip.toml");
        let mut config = AppConfig::default();
        config.camera.zoom = 60.0;
        config.scene_file = Some(PathBuf::from("scenes/still_life.ron"));

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_ron_round_trip() {
        let path = temp_path("round_trip.ron");
        let mut config = AppConfig::default();
        config.display.width = 640;

        config.save_to_file(&path).unwrap();
        let loaded = AppConfig::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.display.width, 640);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: AppConfig = toml::from_str("[camera]\nzoom = 45.0\n").unwrap();
        assert_relative_eq!(config.camera.zoom, 45.0);
        assert_eq!(config.display, DisplayConfig::default());
        assert_relative_eq!(config.camera.movement_speed, 5.0);
    }

    #[test]
    fn test_unsupported_extension() {
        let path = temp_path("settings.yaml");
        std::fs::write(&path, "zoom: 1").unwrap();
        let result = AppConfig::load_from_file(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_texture_sampler_settings_from_toml() {
        let config: AppConfig =
            toml::from_str("[textures]\nfilter = \"Nearest\"\nwrap = \"ClampToEdge\"\ngenerate_mipmaps = false\n")
                .unwrap();
        assert_eq!(config.textures.directory, PathBuf::from("textures"));
        assert_eq!(
            config.textures.params(),
            TextureParams {
                filter_mode: FilterMode::Nearest,
                wrap_mode: WrapMode::ClampToEdge,
                generate_mipmaps: false,
            }
        );
    }

    #[test]
    fn test_validate_rejects_low_speed_floor() {
        let mut config = AppConfig::default();
        config.camera.min_movement_speed = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_inverted_clip_planes() {
        let mut config = AppConfig::default();
        config.projection.far = 0.05;
        assert!(config.validate().is_err());
    }
}
