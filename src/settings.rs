//! Settings persistence using TOML
//!
//! Stores settings in ~/.config/blocktris/settings.toml (or platform equivalent)

use crate::game::GameConfig;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Smallest board that still fits every piece in every orientation
pub const MIN_BOARD_SIDE: usize = 4;

/// Problems with a settings file or the values in it
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {width}x{height}")]
    BoardTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    #[error("tick interval must be greater than zero")]
    ZeroTick,
    #[error("spawn column {column} does not fit a 4-wide piece on a board {width} wide")]
    SpawnOutOfRange { column: i32, width: usize },
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("failed to write settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Keybindings
    pub keys: KeyBindings,
    /// Board and timing
    pub game: GameSettings,
    /// Visual settings
    pub visual: VisualSettings,
}

/// Key bindings (stored as strings for easy editing)
/// Each action can have one or more keys bound to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
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
    pub rotate_cw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub rotate_ccw: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub start: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub pause: Vec<String>,
    #[serde(deserialize_with = "deserialize_keys", serialize_with = "serialize_keys")]
    pub reset: Vec<String>,
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
#[allow(clippy::ptr_arg)]
fn serialize_keys<S>(keys: &Vec<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeSeq;

    if let [key] = keys.as_slice() {
        serializer.serialize_str(key)
    } else {
        let mut seq = serializer.serialize_seq(Some(keys.len()))?;
        for key in keys {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

/// Board size, gravity and piece sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub board_width: usize,
    pub board_height: usize,
    /// Milliseconds between gravity ticks
    pub tick_ms: u64,
    /// Column of a new piece's grid; defaults to the board center minus 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spawn_column: Option<i32>,
    /// Fixed seed for a reproducible piece sequence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

/// Visual settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualSettings {
    /// Show where the active piece would land
    pub show_outline: bool,
    /// Block style: "solid", "bracket", "round"
    pub block_style: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            move_left: vec!["Left".to_string()],
            move_right: vec!["Right".to_string()],
            soft_drop: vec!["Down".to_string()],
            hard_drop: vec!["Space".to_string()],
            rotate_cw: vec!["Up".to_string(), "x".to_string()],
            rotate_ccw: vec!["z".to_string()],
            start: vec!["s".to_string(), "Enter".to_string()],
            pause: vec!["p".to_string(), "Esc".to_string()],
            reset: vec!["r".to_string()],
            quit: vec!["q".to_string()],
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            board_width: 10,
            board_height: 20,
            tick_ms: 500,
            spawn_column: None,
            seed: None,
        }
    }
}

impl Default for VisualSettings {
    fn default() -> Self {
        Self {
            show_outline: true,
            block_style: "solid".to_string(),
        }
    }
}

impl GameSettings {
    /// Validate and convert into the session configuration
    pub fn to_config(&self) -> Result<GameConfig, ConfigError> {
        GameConfig::new(
            self.board_width,
            self.board_height,
            Duration::from_millis(self.tick_ms),
            self.spawn_column,
        )
    }

    /// Like `to_config`, but an invalid `[game]` section is logged and replaced by defaults
    pub fn to_config_or_default(&self) -> GameConfig {
        self.to_config().unwrap_or_else(|e| {
            warn!("ignoring invalid [game] settings: {}", e);
            GameConfig::default()
        })
    }
}

impl Settings {
    /// Get the config directory path
    fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "blocktris", "blocktris")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("settings.toml"))
    }

    /// Load settings from file, writing the defaults on first run
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("no config directory, using default settings");
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                warn!("ignoring invalid settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                warn!("could not read {}: {}", path.display(), e);
                Self::default()
            }
            Err(_) => {
                let settings = Self::default();
                match settings.save() {
                    Ok(()) => info!("wrote default settings to {}", path.display()),
                    Err(e) => warn!("could not write default settings: {}", e),
                }
                settings
            }
        }
    }

    /// Parse settings from TOML text
    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Save settings to file
    pub fn save(&self) -> Result<(), ConfigError> {
        let dir = Self::config_dir().ok_or(ConfigError::NoConfigDir)?;
        fs::create_dir_all(&dir)?;
        let contents = toml::to_string_pretty(self)?;
        fs::write(dir.join("settings.toml"), contents)?;
        Ok(())
    }
}

impl VisualSettings {
    /// Get the block and outline characters based on style
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
    fn test_default_round_trip() {
        let settings = Settings::default();
        let text = toml::to_string_pretty(&settings).unwrap();
        assert_eq!(Settings::parse(&text).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings = Settings::parse("[game]\ntick_ms = 250\n").unwrap();
        assert_eq!(settings.game.tick_ms, 250);
        assert_eq!(settings.game.board_width, 10);
        assert_eq!(settings.keys, KeyBindings::default());
        assert!(settings.visual.show_outline);
    }

    #[test]
    fn test_single_key_or_list() {
        let settings =
            Settings::parse("[keys]\nmove_left = \"a\"\nrotate_cw = [\"w\", \"Up\"]\n").unwrap();
        assert_eq!(settings.keys.move_left, vec!["a"]);
        assert_eq!(settings.keys.rotate_cw, vec!["w", "Up"]);
    }

    #[test]
    fn test_single_key_serializes_as_string() {
        let text = toml::to_string_pretty(&Settings::default()).unwrap();
        assert!(text.contains("move_left = \"Left\""));
        assert!(text.contains("rotate_cw = ["));
    }

    #[test]
    fn test_default_config() {
        let config = GameSettings::default().to_config().unwrap();
        assert_eq!((config.width(), config.height()), (10, 20));
        assert_eq!(config.tick_interval(), Duration::from_millis(500));
        assert_eq!(config.spawn_x(), 3);
        assert_eq!(config, GameConfig::default());
    }

    #[test]
    fn test_invalid_configs() {
        let small = GameSettings {
            board_width: 3,
            ..GameSettings::default()
        };
        assert!(matches!(
            small.to_config(),
            Err(ConfigError::BoardTooSmall { .. })
        ));

        let still = GameSettings {
            tick_ms: 0,
            ..GameSettings::default()
        };
        assert!(matches!(still.to_config(), Err(ConfigError::ZeroTick)));

        let off_edge = GameSettings {
            spawn_column: Some(7),
            ..GameSettings::default()
        };
        assert!(matches!(
            off_edge.to_config(),
            Err(ConfigError::SpawnOutOfRange { column: 7, .. })
        ));
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let settings = Settings::parse("[game]\nboard_width = 3\ntick_ms = 0\n").unwrap();
        assert!(settings.game.to_config().is_err());
        assert_eq!(settings.game.to_config_or_default(), GameConfig::default());

        let custom = GameSettings {
            board_width: 12,
            ..GameSettings::default()
        };
        assert_eq!(custom.to_config_or_default().width(), 12);
    }

    #[test]
    fn test_block_chars() {
        let mut visual = VisualSettings::default();
        assert_eq!(visual.block_chars().0, "██");
        visual.block_style = "bracket".to_string();
        assert_eq!(visual.block_chars(), ("[]", ".."));
    }
}
