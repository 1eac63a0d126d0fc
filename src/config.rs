use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use crate::error::ConfigError;

/// Location key of the combination safe.
pub const SAFE_KEY: &str = "safe";
/// Location key of the exit door.
pub const DOOR_KEY: &str = "door";

pub const MAX_SAFE_ATTEMPTS: u32 = 3;
pub const DEFAULT_UNLOCK_CODE: &str = "1858";
pub const DEFAULT_SAFE_HINT: &str = "A year of beginning.";

/// Interactable objects in the default office room.
pub const OFFICE_LOCATIONS: [&str; 28] = [
    "computer",
    "filing_cabinet_1",
    "filing_cabinet_2",
    "filing_cabinet_3",
    "papers",
    "briefcase",
    "mug",
    "hat",
    "lamp",
    "globe",
    "radio",
    "typewriter",
    "plant",
    "trophy",
    "clock",
    "trash",
    "lunchbox",
    "picture",
    "desk_lamp",
    "cardboard_box",
    "fire_extinguisher",
    "book_cluster_1",
    "book_cluster_2",
    "book_cluster_3",
    "book_cluster_4",
    "keyboard",
    "mouse",
    "open_book",
];

/// Puzzle topology, chosen once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Free-order clue collection, safe holds the key, key opens the door.
    #[default]
    #[serde(alias = "classic")]
    ClueHunt,
    /// Clues must be visited in slot order; any slip resets the chain.
    Trail,
    /// Free-order clues, but the code is typed straight into the door.
    CodeDoor,
}

impl Mode {
    pub fn is_ordered(self) -> bool {
        matches!(self, Mode::Trail)
    }

    pub fn code_opens_door(self) -> bool {
        matches!(self, Mode::CodeDoor)
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::ClueHunt => "Clue Hunt",
            Mode::Trail => "Trail",
            Mode::CodeDoor => "Code Door",
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "clue_hunt" | "classic" => Ok(Mode::ClueHunt),
            "trail" => Ok(Mode::Trail),
            "code_door" => Ok(Mode::CodeDoor),
            other => Err(format!(
                "unknown mode {other:?} (expected clue_hunt, trail or code_door)"
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub mode: Mode,
    /// Digits of the combination. Its length is the number of clues.
    pub unlock_code: String,
    pub locations: Vec<String>,
    pub safe_hint: Option<String>,
    /// Front-end policy: move a clue elsewhere after a wrong answer.
    pub relocate_on_wrong_answer: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            mode: Mode::default(),
            unlock_code: DEFAULT_UNLOCK_CODE.to_string(),
            locations: OFFICE_LOCATIONS.iter().map(|s| s.to_string()).collect(),
            safe_hint: Some(DEFAULT_SAFE_HINT.to_string()),
            relocate_on_wrong_answer: true,
        }
    }
}

impl GameConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: GameConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn clue_count(&self) -> usize {
        self.unlock_code.chars().count()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.unlock_code.is_empty() {
            return Err(ConfigError::EmptyCode);
        }
        if !self.unlock_code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConfigError::NonDigitCode(self.unlock_code.clone()));
        }

        let mut seen = HashSet::new();
        for key in &self.locations {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyLocation);
            }
            if key == SAFE_KEY || key == DOOR_KEY {
                return Err(ConfigError::ReservedLocation(key.clone()));
            }
            if !seen.insert(key.as_str()) {
                return Err(ConfigError::DuplicateLocation(key.clone()));
            }
        }

        if self.locations.len() < self.clue_count() {
            return Err(ConfigError::TooFewLocations {
                clues: self.clue_count(),
                locations: self.locations.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.clue_count(), 4);
        assert_eq!(config.mode, Mode::ClueHunt);
    }

    #[test]
    fn rejects_bad_codes() {
        let mut config = GameConfig::default();
        config.unlock_code = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyCode));

        config.unlock_code = "18a8".to_string();
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonDigitCode("18a8".to_string()))
        );
    }

    #[test]
    fn rejects_gate_keys_as_clue_locations() {
        let mut config = GameConfig::default();
        config.locations.push("safe".to_string());
        assert_eq!(
            config.validate(),
            Err(ConfigError::ReservedLocation("safe".to_string()))
        );
    }

    #[test]
    fn rejects_duplicates_and_short_lists() {
        let mut config = GameConfig::default();
        config.locations = vec!["mug".into(), "mug".into(), "hat".into(), "lamp".into()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateLocation("mug".to_string()))
        );

        config.locations = vec!["mug".into(), "hat".into()];
        assert_eq!(
            config.validate(),
            Err(ConfigError::TooFewLocations {
                clues: 4,
                locations: 2
            })
        );
    }

    #[test]
    fn mode_parses_from_cli_and_toml_spellings() {
        assert_eq!("trail".parse::<Mode>(), Ok(Mode::Trail));
        assert_eq!("code-door".parse::<Mode>(), Ok(Mode::CodeDoor));
        assert_eq!("classic".parse::<Mode>(), Ok(Mode::ClueHunt));
        assert!("maze".parse::<Mode>().is_err());
    }

    #[test]
    fn loads_partial_toml_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("room.toml");
        std::fs::write(
            &path,
            "mode = \"trail\"\nunlock_code = \"42\"\nlocations = [\"desk\", \"shelf\", \"rug\"]\n",
        )
        .unwrap();

        let config = GameConfig::load(&path).unwrap();
        assert_eq!(config.mode, Mode::Trail);
        assert_eq!(config.clue_count(), 2);
        assert!(config.relocate_on_wrong_answer);
        assert_eq!(config.safe_hint.as_deref(), Some(DEFAULT_SAFE_HINT));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("room.toml");
        std::fs::write(&path, "max_attempts = 9\n").unwrap();
        assert!(GameConfig::load(&path).is_err());
    }
}
