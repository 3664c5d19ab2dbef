//! Settings persistence using TOML
//!
//! Stores presentation preferences in ~/.config/combotris/settings.toml (or
//! platform equivalent). Gameplay constants are not configurable here.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// User settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub visual: VisualSettings,
    pub input: InputSettings,
    pub audio: AudioSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_left: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub move_right: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub soft_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub hard_drop: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub confirm: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub quit: Vec<String>,
}

/// Deserialize keys as either a single string or array of strings
fn deserialize_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct KeysVisitor;

    impl<'de> Visitor<'de> for KeysVisitor {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut keys = Vec::new();
            while let Some(key) = seq.next_element::<String>()? {
                keys.push(key);
            }
            Ok(keys)
        }
    }

    deserializer.deserialize_any(KeysVisitor)
}

/// Serialize keys: single key as string, multiple as array
fn serialize_keys<S>(keys: &[String], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Visual settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Ghost piece visibility
    pub show_ghost: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
    /// Line-clear particles
    pub particles: bool,
}

/// Held-key repeat timing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputSettings {
    /// Delayed Auto Shift in milliseconds
    pub das_ms: u64,
    /// Auto Repeat Rate in milliseconds
    pub arr_ms: u64,
}

/// Audio settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// SFX volume (0-100)
    pub sfx_volume: u32,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate: vec!["Up".to_string()],
            confirm: vec!["Space".to_string(), "Enter".to_string()],
            quit: vec!["Esc".to_string(), "q".to_string()],
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_ghost: true,
            block_style: "solid".to_string(),
            particles: true,
        }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            das_ms: 170,
            arr_ms: 50,
        }
    }
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self { sfx_volume: 50 }
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "combotris", "combotris")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, or fall back to defaults
    pub fn load() -> Self {
        match Self::try_load() {
            Ok(settings) => settings,
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no settings file, writing defaults");
                let settings = Self::default();
                if let Err(e) = settings.save() {
                    tracing::warn!(error = %e, "could not write default settings");
                }
                settings
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not load settings, using defaults");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, SettingsError> {
        let path = Self::settings_path().ok_or(SettingsError::NoConfigDir)?;
        let contents = fs::read_to_string(&path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), SettingsError> {
        let dir = Self::config_dir().ok_or(SettingsError::NoConfigDir)?;
        fs::create_dir_all(&dir)?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(dir.join("settings.toml"), contents)?;
        Ok(())
    }

    /// SFX volume as a 0.0-1.0 gain
    pub fn sfx_gain(&self) -> f32 {
        self.audio.sfx_volume.min(100) as f32 / 100.0
    }
}

impl VisualSettings {
    /// Get the block characters based on style
    pub fn block_chars(&self) -> (&'static str, &'static str) {
        match self.block_style.as_str() {
            "bracket" => ("[]", ".."),
            "round" => ("()", ".."),
            _ => ("██", "░░"), // "solid" or default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert!(settings.visual.show_ghost);
        assert_eq!(settings.keys.hard_drop, vec!["Space".to_string()]);
        assert_eq!(settings.audio.sfx_volume, 50);
    }

    #[test]
    fn test_keys_accept_string_or_array() {
        let settings = Settings::from_toml(
            r#"
            [keys]
            rotate = "x"
            move_left = ["Left", "h"]
            "#,
        )
        .unwrap();
        assert_eq!(settings.keys.rotate, vec!["x".to_string()]);
        assert_eq!(settings.keys.move_left, vec!["Left".to_string(), "h".to_string()]);
        // untouched keys keep their defaults
        assert_eq!(settings.keys.soft_drop, vec!["Down".to_string()]);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let mut settings = Settings::default();
        settings.visual.block_style = "round".to_string();
        settings.audio.sfx_volume = 80;
        let text = toml::to_string_pretty(&settings).unwrap();
        let parsed = Settings::from_toml(&text).unwrap();
        assert_eq!(parsed.visual.block_style, "round");
        assert_eq!(parsed.audio.sfx_volume, 80);
        assert_eq!(parsed.keys.confirm, settings.keys.confirm);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        assert!(Settings::from_toml("[visual]\nshow_ghost = \"maybe\"").is_err());
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars(), ("██", "░░"));
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars(), ("[]", ".."));
    }

    #[test]
    fn test_sfx_gain_is_clamped() {
        let mut settings = Settings::default();
        settings.audio.sfx_volume = 250;
        assert_eq!(settings.sfx_gain(), 1.0);
    }
}
