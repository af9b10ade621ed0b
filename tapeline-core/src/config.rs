use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::audio::MutePolicy;
use tapeline_types::geometry::DEFAULT_MIN_CLIP_WIDTH_PX;
use tapeline_types::{DEFAULT_DURATION_SECS, DEFAULT_ZOOM};

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

const DEFAULT_TICK_INTERVAL_MS: u64 = 16;

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    project: ProjectConfig,
    #[serde(default)]
    editing: EditingConfig,
    #[serde(default)]
    playback: PlaybackConfig,
}

#[derive(Deserialize, Default)]
struct ProjectConfig {
    duration_secs: Option<f64>,
    zoom: Option<f64>,
}

#[derive(Deserialize, Default)]
struct EditingConfig {
    min_clip_width_px: Option<f64>,
}

#[derive(Deserialize, Default)]
struct PlaybackConfig {
    mute_policy: Option<String>,
    tick_interval_ms: Option<u64>,
}

pub struct Config {
    project: ProjectConfig,
    editing: EditingConfig,
    playback: PlaybackConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::embedded()
    }
}

impl Config {
    /// Embedded defaults merged with `<config_dir>/tapeline/config.toml`.
    pub fn load() -> Self {
        let mut config = Self::embedded();

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                        Ok(user) => config.merge(user),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        config
    }

    /// Embedded defaults merged with the given TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        let user: ConfigFile = toml::from_str(contents)?;
        let mut config = Self::embedded();
        config.merge(user);
        Ok(config)
    }

    fn embedded() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            project: base.project,
            editing: base.editing,
            playback: base.playback,
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_project(&mut self.project, user.project);
        merge_editing(&mut self.editing, user.editing);
        merge_playback(&mut self.playback, user.playback);
    }

    /// Project length for new projects, seconds.
    pub fn duration_secs(&self) -> f64 {
        positive(self.project.duration_secs).unwrap_or(DEFAULT_DURATION_SECS)
    }

    /// Pixels per second for new projects.
    pub fn zoom(&self) -> f64 {
        positive(self.project.zoom).unwrap_or(DEFAULT_ZOOM)
    }

    pub fn min_clip_width_px(&self) -> f64 {
        positive(self.editing.min_clip_width_px).unwrap_or(DEFAULT_MIN_CLIP_WIDTH_PX)
    }

    pub fn mute_policy(&self) -> MutePolicy {
        self.playback
            .mute_policy
            .as_deref()
            .and_then(parse_mute_policy)
            .unwrap_or_default()
    }

    /// Refresh-loop tick interval (clamped to 1..1000 ms).
    pub fn tick_interval(&self) -> Duration {
        let ms = self
            .playback
            .tick_interval_ms
            .unwrap_or(DEFAULT_TICK_INTERVAL_MS)
            .clamp(1, 1000);
        Duration::from_millis(ms)
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tapeline").join("config.toml"))
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn merge_project(base: &mut ProjectConfig, user: ProjectConfig) {
    if user.duration_secs.is_some() {
        base.duration_secs = user.duration_secs;
    }
    if user.zoom.is_some() {
        base.zoom = user.zoom;
    }
}

fn merge_editing(base: &mut EditingConfig, user: EditingConfig) {
    if user.min_clip_width_px.is_some() {
        base.min_clip_width_px = user.min_clip_width_px;
    }
}

fn merge_playback(base: &mut PlaybackConfig, user: PlaybackConfig) {
    if user.mute_policy.is_some() {
        base.mute_policy = user.mute_policy;
    }
    if user.tick_interval_ms.is_some() {
        base.tick_interval_ms = user.tick_interval_ms;
    }
}

fn parse_mute_policy(s: &str) -> Option<MutePolicy> {
    match s.to_lowercase().as_str() {
        "at_play" | "atplay" => Some(MutePolicy::AtPlay),
        "live" => Some(MutePolicy::Live),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults() {
        let config = Config::default();
        assert_eq!(config.duration_secs(), 60.0);
        assert_eq!(config.zoom(), 50.0);
        assert_eq!(config.min_clip_width_px(), 10.0);
        assert_eq!(config.mute_policy(), MutePolicy::AtPlay);
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_user_values_override_field_by_field() {
        let config = Config::from_toml_str(
            "[playback]\nmute_policy = \"live\"\n\n[project]\nzoom = 120.0\n",
        )
        .unwrap();
        assert_eq!(config.mute_policy(), MutePolicy::Live);
        assert_eq!(config.zoom(), 120.0);
        assert_eq!(config.duration_secs(), 60.0);
        assert_eq!(config.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_toml_str(
            "[project]\nduration_secs = -4.0\n[editing]\nmin_clip_width_px = 0.0\n[playback]\nmute_policy = \"sometimes\"\ntick_interval_ms = 0\n",
        )
        .unwrap();
        assert_eq!(config.duration_secs(), 60.0);
        assert_eq!(config.min_clip_width_px(), 10.0);
        assert_eq!(config.mute_policy(), MutePolicy::AtPlay);
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(Config::from_toml_str("[project\nzoom = ").is_err());
    }

    #[test]
    fn test_parse_mute_policy() {
        assert_eq!(parse_mute_policy("LIVE"), Some(MutePolicy::Live));
        assert_eq!(parse_mute_policy("at_play"), Some(MutePolicy::AtPlay));
        assert_eq!(parse_mute_policy("never"), None);
    }
}
