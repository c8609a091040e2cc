//! TOML configuration for the agent.
//!
//! Reads `AgentConfig` from an explicit path or from the platform config
//! file:
//! - Windows:  `%APPDATA%\TouchBridge\config.toml`
//! - Linux:    `$XDG_CONFIG_HOME/touchbridge/config.toml` (or `~/.config/...`)
//! - macOS:    `~/Library/Application Support/TouchBridge/config.toml`
//!
//! Every field has a default taken from the named constants in
//! [`crate::application::tuning`], so an empty or partial file is valid and a
//! missing file means "all defaults".  Example:
//!
//! ```toml
//! [agent]
//! log_level = "debug"
//! display_scale = 2
//!
//! [gesture]
//! long_press_timeout_ms = 800
//!
//! [wheel]
//! step = 200
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::application::tuning::{
    GestureTuning, WheelTuning, DOUBLE_CLICK_GUARD, FLING_DURATION_MULTIPLIER,
    LONG_PRESS_TIMEOUT, MOVE_THRESHOLD, RECENTS_DELAY, TAP_WINDOW, WHEEL_DURATION,
    WHEEL_SETTLE_MARGIN, WHEEL_STEP,
};
use crate::infrastructure::session::SessionSettings;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level agent configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentConfig {
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub gesture: GestureSection,
    #[serde(default)]
    pub wheel: WheelSection,
}

/// General agent settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentSection {
    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Multiplier applied to inbound pointer coordinates.
    #[serde(default = "default_display_scale")]
    pub display_scale: i32,
}

/// Press, drag and navigation timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GestureSection {
    #[serde(default = "default_tap_window_ms")]
    pub tap_window_ms: u64,
    #[serde(default = "default_long_press_timeout_ms")]
    pub long_press_timeout_ms: u64,
    #[serde(default = "default_double_click_guard_ms")]
    pub double_click_guard_ms: u64,
    #[serde(default = "default_move_threshold")]
    pub move_threshold: i32,
    #[serde(default = "default_fling_duration_multiplier")]
    pub fling_duration_multiplier: u32,
    #[serde(default = "default_recents_delay_ms")]
    pub recents_delay_ms: u64,
}

/// Scroll swipe geometry and pacing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WheelSection {
    #[serde(default = "default_wheel_step")]
    pub step: i32,
    #[serde(default = "default_wheel_duration_ms")]
    pub duration_ms: u64,
    #[serde(default = "default_wheel_settle_margin_ms")]
    pub settle_margin_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_display_scale() -> i32 {
    1
}
fn default_tap_window_ms() -> u64 {
    millis(TAP_WINDOW)
}
fn default_long_press_timeout_ms() -> u64 {
    millis(LONG_PRESS_TIMEOUT)
}
fn default_double_click_guard_ms() -> u64 {
    millis(DOUBLE_CLICK_GUARD)
}
fn default_move_threshold() -> i32 {
    MOVE_THRESHOLD
}
fn default_fling_duration_multiplier() -> u32 {
    FLING_DURATION_MULTIPLIER
}
fn default_recents_delay_ms() -> u64 {
    millis(RECENTS_DELAY)
}
fn default_wheel_step() -> i32 {
    WHEEL_STEP
}
fn default_wheel_duration_ms() -> u64 {
    millis(WHEEL_DURATION)
}
fn default_wheel_settle_margin_ms() -> u64 {
    millis(WHEEL_SETTLE_MARGIN)
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            display_scale: default_display_scale(),
        }
    }
}

impl Default for GestureSection {
    fn default() -> Self {
        Self {
            tap_window_ms: default_tap_window_ms(),
            long_press_timeout_ms: default_long_press_timeout_ms(),
            double_click_guard_ms: default_double_click_guard_ms(),
            move_threshold: default_move_threshold(),
            fling_duration_multiplier: default_fling_duration_multiplier(),
            recents_delay_ms: default_recents_delay_ms(),
        }
    }
}

impl Default for WheelSection {
    fn default() -> Self {
        Self {
            step: default_wheel_step(),
            duration_ms: default_wheel_duration_ms(),
            settle_margin_ms: default_wheel_settle_margin_ms(),
        }
    }
}

// ── Conversion ────────────────────────────────────────────────────────────────

impl From<&GestureSection> for GestureTuning {
    fn from(section: &GestureSection) -> Self {
        Self {
            double_click_guard: Duration::from_millis(section.double_click_guard_ms),
            tap_window: Duration::from_millis(section.tap_window_ms),
            long_press_timeout: Duration::from_millis(section.long_press_timeout_ms),
            move_threshold: section.move_threshold.max(0),
            fling_duration_multiplier: section.fling_duration_multiplier.max(1),
            recents_delay: Duration::from_millis(section.recents_delay_ms),
        }
    }
}

impl From<&WheelSection> for WheelTuning {
    fn from(section: &WheelSection) -> Self {
        Self {
            step: section.step.max(1),
            duration: Duration::from_millis(section.duration_ms),
            settle_margin: Duration::from_millis(section.settle_margin_ms),
        }
    }
}

impl AgentConfig {
    /// The session parameters described by this configuration.
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            display_scale: self.agent.display_scale.max(1),
            gesture: GestureTuning::from(&self.gesture),
            wheel: WheelTuning::from(&self.wheel),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Resolves the full path to the platform config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if the base directory cannot be
/// determined.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    platform_config_dir()
        .map(|dir| dir.join("config.toml"))
        .ok_or(ConfigError::NoPlatformConfigDir)
}

/// Loads `AgentConfig` from `path`, or from [`config_file_path`] when `path`
/// is `None`.  A missing file yields `AgentConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AgentConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => config_file_path()?,
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            debug!(path = %path.display(), "loading config");
            Ok(toml::from_str(&content)?)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(AgentConfig::default())
        }
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Resolves the platform config base directory including the `TouchBridge`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("TouchBridge"))
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("touchbridge"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("TouchBridge")
        })
    }

    #[cfg(not(any(
        target_os = "windows",
        target_os = "linux",
        target_os = "android",
        target_os = "macos"
    )))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_path() -> PathBuf {
        std::env::temp_dir().join(format!("touchbridge-config-{}.toml", Uuid::new_v4()))
    }

    #[test]
    fn test_defaults_match_tuning_constants() {
        // Arrange / Act
        let settings = AgentConfig::default().session_settings();

        // Assert
        assert_eq!(settings.display_scale, 1);
        assert_eq!(settings.gesture, GestureTuning::default());
        assert_eq!(settings.wheel, WheelTuning::default());
    }

    #[test]
    fn test_empty_toml_is_all_defaults() {
        let cfg: AgentConfig = toml::from_str("").expect("parse");
        assert_eq!(cfg, AgentConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        // Arrange
        let text = r#"
            [agent]
            display_scale = 2

            [gesture]
            long_press_timeout_ms = 800
        "#;

        // Act
        let cfg: AgentConfig = toml::from_str(text).expect("parse");
        let settings = cfg.session_settings();

        // Assert
        assert_eq!(cfg.agent.log_level, "info");
        assert_eq!(settings.display_scale, 2);
        assert_eq!(settings.gesture.long_press_timeout, Duration::from_millis(800));
        assert_eq!(settings.gesture.tap_window, TAP_WINDOW);
        assert_eq!(settings.wheel.step, WHEEL_STEP);
    }

    #[test]
    fn test_nonsensical_values_are_clamped() {
        let text = r#"
            [agent]
            display_scale = 0
            [gesture]
            fling_duration_multiplier = 0
            [wheel]
            step = -5
        "#;
        let settings = toml::from_str::<AgentConfig>(text).expect("parse").session_settings();

        assert_eq!(settings.display_scale, 1);
        assert_eq!(settings.gesture.fling_duration_multiplier, 1);
        assert_eq!(settings.wheel.step, 1);
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let cfg = load_config(Some(&scratch_path())).expect("missing file is not an error");
        assert_eq!(cfg, AgentConfig::default());
    }

    #[test]
    fn test_load_reads_file_from_explicit_path() {
        // Arrange
        let path = scratch_path();
        std::fs::write(&path, "[wheel]\nstep = 200\n").expect("write");

        // Act
        let cfg = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        // Assert
        assert_eq!(cfg.expect("load").wheel.step, 200);
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        // Arrange
        let path = scratch_path();
        std::fs::write(&path, "[wheel\nstep = ").expect("write");

        // Act
        let result = load_config(Some(&path));
        let _ = std::fs::remove_file(&path);

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
