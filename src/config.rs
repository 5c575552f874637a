//! # Configuration
//!
//! Sketchy reads a single TOML file. Every section and every field has a
//! default, so a partial file (or no file at all) still yields a complete
//! configuration. The defaults reproduce the feel of the classic toy: a
//! 0.2 stick deadzone, slow pointer, fast joystick and a 30 Hz tick.
//!
//! ```toml
//! [input]
//! deadzone = 0.2
//! pointer_speed_mult = 0.5
//! joystick_speed_mult = 2.0
//!
//! [joystick]
//! x_axis = "LeftStickX"
//! y_axis = "LeftStickY"
//! shake_button = "North"
//! invert_y = true
//!
//! [canvas]
//! background_grey = 170
//! background_variance = 10
//! shake_alpha = 45
//! line_colour = [65, 65, 65, 255]
//! line_width = 2
//!
//! [display]
//! tick_rate_hz = 30
//! fullscreen = true
//! window_size = [800, 600]
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::controller::arbiter::ArbiterSettings;

/// Errors raised while loading or validating the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct SketchyConfig {
    pub input: InputConfig,
    pub joystick: JoystickConfig,
    pub canvas: CanvasConfig,
    pub display: DisplayConfig,
}

/// Deadzone and per-device speed multipliers
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Minimum stick deflection, as a fraction of full travel
    pub deadzone: f32,
    /// Pointer deltas are raw counts, so they are slowed down
    pub pointer_speed_mult: f32,
    /// Stick values are at most 1.0 per frame, so they are sped up
    pub joystick_speed_mult: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.2,
            pointer_speed_mult: 0.5,
            joystick_speed_mult: 2.0,
        }
    }
}

impl From<&InputConfig> for ArbiterSettings {
    fn from(input: &InputConfig) -> Self {
        ArbiterSettings {
            deadzone: input.deadzone,
            pointer_speed_mult: input.pointer_speed_mult,
            joystick_speed_mult: input.joystick_speed_mult,
        }
    }
}

/// Stick axes that can drive the cursor
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum StickAxis {
    LeftStickX,
    LeftStickY,
    RightStickX,
    RightStickY,
}

/// Gamepad buttons that can trigger a shake
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PadButton {
    South,
    East,
    North,
    West,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Select,
    Start,
    LeftStick,
    RightStick,
}

/// Which gamepad inputs move the cursor and shake the canvas
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct JoystickConfig {
    pub x_axis: StickAxis,
    pub y_axis: StickAxis,
    pub shake_button: PadButton,
    /// Flip the Y axis so pushing the stick up moves the cursor up
    pub invert_y: bool,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            x_axis: StickAxis::LeftStickX,
            y_axis: StickAxis::LeftStickY,
            shake_button: PadButton::North,
            invert_y: true,
        }
    }
}

/// Background texture and pen appearance
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    pub background_grey: u8,
    pub background_variance: u8,
    /// Opacity of the fresh background laid over the drawing on a shake
    pub shake_alpha: u8,
    /// RGBA
    pub line_colour: [u8; 4],
    pub line_width: u32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            background_grey: 170,
            background_variance: 10,
            shake_alpha: 45,
            line_colour: [65, 65, 65, 255],
            line_width: 2,
        }
    }
}

/// Window and pacing
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub tick_rate_hz: u32,
    pub fullscreen: bool,
    /// Used when not fullscreen
    pub window_size: [u32; 2],
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 30,
            fullscreen: true,
            window_size: [800, 600],
        }
    }
}

impl DisplayConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_rate_hz.max(1)))
    }
}

impl SketchyConfig {
    /// Default location, `<config dir>/sketchy/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sketchy").join("config.toml"))
    }

    /// Loads the configuration.
    ///
    /// An explicit `path` must exist. Without one the default location is
    /// tried and a missing file falls back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    info!("No config file at {}, using defaults", path.display());
                    Self::default()
                }
                None => {
                    info!("No config directory available, using defaults");
                    Self::default()
                }
            },
        };
        config.validate()?;
        debug!("Effective configuration: {:?}", config);
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!("Loading config from {}", path.display());
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let input = &self.input;
        if !(0.0..1.0).contains(&input.deadzone) {
            return Err(ConfigError::Invalid(format!(
                "deadzone must be within [0, 1), got {}",
                input.deadzone
            )));
        }
        if !(input.pointer_speed_mult > 0.0 && input.joystick_speed_mult > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "speed multipliers must be positive, got pointer={} joystick={}",
                input.pointer_speed_mult, input.joystick_speed_mult
            )));
        }
        if self.display.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be at least 1".to_string()));
        }
        if self.canvas.line_width == 0 {
            return Err(ConfigError::Invalid("line_width must be at least 1".to_string()));
        }
        if self.canvas.background_variance > self.canvas.background_grey
            || u16::from(self.canvas.background_grey) + u16::from(self.canvas.background_variance)
                > 255
        {
            return Err(ConfigError::Invalid(format!(
                "background grey {} +/- {} leaves the 0-255 range",
                self.canvas.background_grey, self.canvas.background_variance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_classic_toy() {
        let config = SketchyConfig::default();
        assert_eq!(config.input.deadzone, 0.2);
        assert_eq!(config.input.pointer_speed_mult, 0.5);
        assert_eq!(config.input.joystick_speed_mult, 2.0);
        assert_eq!(config.display.tick_rate_hz, 30);
        assert_eq!(config.joystick.shake_button, PadButton::North);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = SketchyConfig::from_toml(
            r#"
            [input]
            deadzone = 0.1

            [joystick]
            shake_button = "South"
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.input.deadzone, 0.1);
        assert_eq!(config.input.joystick_speed_mult, 2.0);
        assert_eq!(config.joystick.shake_button, PadButton::South);
        assert_eq!(config.joystick.x_axis, StickAxis::LeftStickX);
        assert_eq!(config.canvas, CanvasConfig::default());
    }

    #[test]
    fn unknown_button_is_a_parse_error() {
        let result = SketchyConfig::from_toml("[joystick]\nshake_button = \"Turbo\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn validation_rejects_out_of_range_values() {
        let mut config = SketchyConfig::default();
        config.input.deadzone = 1.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = SketchyConfig::default();
        config.input.pointer_speed_mult = 0.0;
        assert!(config.validate().is_err());

        let mut config = SketchyConfig::default();
        config.display.tick_rate_hz = 0;
        assert!(config.validate().is_err());

        let mut config = SketchyConfig::default();
        config.canvas.background_grey = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_an_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[display]\ntick_rate_hz = 60\nfullscreen = false").expect("write");

        let config = SketchyConfig::load(Some(file.path())).expect("loads");
        assert_eq!(config.display.tick_rate_hz, 60);
        assert!(!config.display.fullscreen);
        assert_eq!(config.display.tick_interval(), Duration::from_secs_f64(1.0 / 60.0));
    }

    #[test]
    fn load_fails_for_missing_explicit_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = SketchyConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn input_section_converts_to_arbiter_settings() {
        let settings = ArbiterSettings::from(&InputConfig::default());
        assert_eq!(settings, ArbiterSettings::default());
    }
}
