//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`TRISPIN_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env, Serialized}};
use serde::{Serialize, Deserialize};
use std::path::Path;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Shader source locations
    #[serde(default)]
    pub shaders: ShaderConfig,
    /// Rotation configuration
    #[serde(default)]
    pub animation: AnimationConfig,
    /// Frame pacing configuration
    #[serde(default)]
    pub timing: TimingConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`TRISPIN_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    ///
    /// Missing files are skipped; anything not set falls back to the
    /// built-in defaults.
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // TRISPIN_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("TRISPIN_").split("__"));

        let config: AppConfig = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the demo unable to run
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        if self.timing.target_fps == 0 {
            return Err(ConfigError::invalid("timing.target_fps must be at least 1"));
        }
        let speed = self.animation.degrees_per_second;
        if !speed.is_finite() || speed < 0.0 {
            return Err(ConfigError::invalid(format!(
                "animation.degrees_per_second must be finite and non-negative, got {}",
                speed
            )));
        }
        if !self.animation.initial_angle.is_finite() {
            return Err(ConfigError::invalid("animation.initial_angle must be finite"));
        }
        if self.animation.axis.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::invalid(format!(
                "animation.axis must be finite, got {:?}",
                self.animation.axis
            )));
        }
        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Simple example".to_string(),
            width: 640,
            height: 480,
            fullscreen: false,
            vsync: false,
        }
    }
}

/// Shader source locations, relative to the working directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShaderConfig {
    /// Vertex stage WGSL file
    pub vertex_path: String,
    /// Fragment stage WGSL file
    pub fragment_path: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            vertex_path: "shaders/vertex.wgsl".to_string(),
            fragment_path: "shaders/fragment.wgsl".to_string(),
        }
    }
}

/// Rotation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Rotation speed in degrees per second
    pub degrees_per_second: f64,
    /// Angle in degrees at startup and after a reset
    pub initial_angle: f64,
    /// Rotation axis [x, y, z]
    pub axis: [f32; 3],
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            degrees_per_second: 50.0,
            initial_angle: 0.0,
            axis: [0.0, 0.0, 1.0],
        }
    }
}

/// Frame pacing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Frames per second the loop aims for by sleeping between frames
    pub target_fps: u32,
}

impl TimingConfig {
    /// Time to sleep after each frame, in whole milliseconds
    pub fn frame_sleep(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.target_fps.max(1)))
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self { target_fps: 60 }
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderingConfig {
    /// Background color [r, g, b, a]
    pub background_color: [f32; 4],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            background_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace), overridden by `RUST_LOG`
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        ConfigError {
            message: message.into(),
        }
    }
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
