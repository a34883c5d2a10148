//! Configuration loading for the lucky-draw engine
//!
//! Bootstrap configuration comes from a TOML file resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `LIXI_CONFIG` environment variable
//! 3. Platform config directory (`<config_dir>/lixi/config.toml`)
//! 4. Built-in defaults (no file at all)
//!
//! A missing file falls back to defaults with a log line; an unparseable file
//! or invalid values are a hard [`Error::Config`] so misconfiguration never
//! silently changes round behavior.

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Environment variable naming the config file
pub const CONFIG_ENV_VAR: &str = "LIXI_CONFIG";

/// Bootstrap configuration loaded from TOML
///
/// These settings cannot change during a running session.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    /// Round timing and animation settings
    #[serde(default)]
    pub round: RoundConfig,

    /// Audio output settings
    #[serde(default)]
    pub audio: AudioConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Round timing and animation settings
#[derive(Debug, Clone, Deserialize)]
pub struct RoundConfig {
    /// Wheel spin duration in milliseconds
    #[serde(default = "default_spin_duration_ms")]
    pub spin_duration_ms: u64,

    /// Envelope re-deal shuffle duration in milliseconds
    #[serde(default = "default_shuffle_duration_ms")]
    pub shuffle_duration_ms: u64,

    /// Anticipation delay between pick and reveal in milliseconds
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,

    /// Animation frame interval in milliseconds (16 ≈ 60 Hz)
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Minimum cosmetic full turns added to a spin
    #[serde(default = "default_extra_turns_min")]
    pub extra_turns_min: u32,

    /// Maximum cosmetic full turns added to a spin
    #[serde(default = "default_extra_turns_max")]
    pub extra_turns_max: u32,

    /// Number of envelope slots on the board
    #[serde(default = "default_envelope_count")]
    pub envelope_count: usize,

    /// Easing curve for the wheel spin
    #[serde(default = "default_easing")]
    pub easing: String,

    /// Event bus channel capacity
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            spin_duration_ms: default_spin_duration_ms(),
            shuffle_duration_ms: default_shuffle_duration_ms(),
            reveal_delay_ms: default_reveal_delay_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            extra_turns_min: default_extra_turns_min(),
            extra_turns_max: default_extra_turns_max(),
            envelope_count: default_envelope_count(),
            easing: default_easing(),
            event_capacity: default_event_capacity(),
        }
    }
}

impl RoundConfig {
    pub fn spin_duration(&self) -> Duration {
        Duration::from_millis(self.spin_duration_ms)
    }

    pub fn shuffle_duration(&self) -> Duration {
        Duration::from_millis(self.shuffle_duration_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Audio output settings
#[derive(Debug, Clone, Deserialize)]
pub struct AudioConfig {
    /// Master enable: false runs the engine silent
    #[serde(default = "default_audio_enabled")]
    pub enabled: bool,

    /// Master volume 0.0..=1.0
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,

    /// Output device name (None = default device)
    #[serde(default)]
    pub device: Option<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: default_audio_enabled(),
            master_volume: default_master_volume(),
            device: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "lixi_engine=debug")
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_spin_duration_ms() -> u64 {
    7000
}

fn default_shuffle_duration_ms() -> u64 {
    800
}

fn default_reveal_delay_ms() -> u64 {
    2000
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_extra_turns_min() -> u32 {
    8
}

fn default_extra_turns_max() -> u32 {
    13
}

fn default_envelope_count() -> usize {
    8
}

fn default_easing() -> String {
    "quint_out".to_string()
}

fn default_event_capacity() -> usize {
    256
}

fn default_audio_enabled() -> bool {
    true
}

fn default_master_volume() -> f32 {
    0.8
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Load configuration following the priority order
    ///
    /// `cli_path` is the `--config` argument if given. A missing file is not
    /// an error; a file that exists but fails to parse or validate is.
    pub fn load(cli_path: Option<&PathBuf>) -> Result<Self> {
        let path = resolve_config_path(cli_path);

        let config = match path {
            Some(path) if path.exists() => {
                let content = std::fs::read_to_string(&path)?;
                let config: TomlConfig = toml::from_str(&content)
                    .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
                info!("Loaded configuration from {}", path.display());
                config
            }
            Some(path) => {
                warn!(
                    "Config file {} not found, using built-in defaults",
                    path.display()
                );
                TomlConfig::default()
            }
            None => {
                info!("No config path resolvable, using built-in defaults");
                TomlConfig::default()
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate loaded values
    pub fn validate(&self) -> Result<()> {
        if self.round.spin_duration_ms == 0 {
            return Err(Error::Config("spin_duration_ms must be > 0".into()));
        }
        if self.round.frame_interval_ms == 0 {
            return Err(Error::Config("frame_interval_ms must be > 0".into()));
        }
        if self.round.extra_turns_min > self.round.extra_turns_max {
            return Err(Error::Config(format!(
                "extra_turns_min ({}) exceeds extra_turns_max ({})",
                self.round.extra_turns_min, self.round.extra_turns_max
            )));
        }
        if self.round.envelope_count < 2 {
            return Err(Error::Config("envelope_count must be at least 2".into()));
        }
        if crate::easing::Easing::from_str(&self.round.easing).is_none() {
            return Err(Error::Config(format!(
                "unknown easing curve '{}'",
                self.round.easing
            )));
        }
        if !(0.0..=1.0).contains(&self.audio.master_volume) {
            return Err(Error::Config(format!(
                "master_volume must be within 0.0..=1.0, got {}",
                self.audio.master_volume
            )));
        }
        Ok(())
    }
}

/// Resolve the config file path: CLI arg → environment → platform config dir
fn resolve_config_path(cli_path: Option<&PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    dirs::config_dir().map(|d| d.join("lixi").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.round.spin_duration_ms, 7000);
        assert_eq!(config.round.shuffle_duration_ms, 800);
        assert_eq!(config.round.reveal_delay_ms, 2000);
        assert_eq!(config.round.extra_turns_min, 8);
        assert_eq!(config.round.extra_turns_max, 13);
        assert_eq!(config.round.envelope_count, 8);
        assert!(config.audio.enabled);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_toml_uses_field_defaults() {
        let config: TomlConfig = toml::from_str(
            r#"
            [round]
            spin_duration_ms = 3000

            [audio]
            enabled = false
            "#,
        )
        .unwrap();

        assert_eq!(config.round.spin_duration_ms, 3000);
        assert_eq!(config.round.reveal_delay_ms, 2000);
        assert!(!config.audio.enabled);
        assert_eq!(config.audio.master_volume, 0.8);
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let path = PathBuf::from("/nonexistent/lixi-config.toml");
        let config = TomlConfig::load(Some(&path)).unwrap();
        assert_eq!(config.round.spin_duration_ms, 7000);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[round]\nspin_duration_ms = 1234\nextra_turns_min = 2\nextra_turns_max = 4\n"
        )
        .unwrap();

        let path = file.path().to_path_buf();
        let config = TomlConfig::load(Some(&path)).unwrap();
        assert_eq!(config.round.spin_duration_ms, 1234);
        assert_eq!(config.round.extra_turns_min, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = TomlConfig::default();
        config.round.spin_duration_ms = 0;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.round.extra_turns_min = 20;
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.round.easing = "bounce".into();
        assert!(config.validate().is_err());

        let mut config = TomlConfig::default();
        config.audio.master_volume = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not toml {{").unwrap();

        let path = file.path().to_path_buf();
        assert!(TomlConfig::load(Some(&path)).is_err());
    }
}
