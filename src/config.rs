//! Game configuration consumed at creation time.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Smallest allowed grid side.
pub const MIN_GRID_SIDE: u16 = 4;
/// Largest allowed grid side.
pub const MAX_GRID_SIDE: u16 = 64;
/// Largest allowed neutral edge budget.
pub const MAX_NEUTRAL_EDGES: u8 = 20;
/// Longest allowed turn, in seconds.
pub const MAX_TURN_TIME_SECS: u32 = 3600;

/// Options for a single game.
///
/// Loaded from JSON with every field optional; missing fields take the
/// defaults below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    /// Grid width in cells (4-64).
    pub width: u16,
    /// Grid height in cells (4-64).
    pub height: u16,
    /// Percentage of cells turned into rocks at setup (0-90).
    pub rock_density: u8,
    /// Advisory turn time budget in seconds.
    pub turn_time_limit_secs: u32,
    /// How many off-grid steps a region may take and still be captured (0-20).
    pub max_neutral_edges: u8,
    /// Seed for rock placement. Chosen at random when the game starts if unset.
    pub seed: Option<u64>,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
            rock_density: 10,
            turn_time_limit_secs: 30,
            max_neutral_edges: 6,
            seed: None,
        }
    }
}

fn check_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

impl GameOptions {
    /// Check every option against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns the first option that is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = (u64::from(MIN_GRID_SIDE), u64::from(MAX_GRID_SIDE));
        check_range("width", u64::from(self.width), side.0, side.1)?;
        check_range("height", u64::from(self.height), side.0, side.1)?;
        check_range(
            "rock_density",
            u64::from(self.rock_density),
            0,
            u64::from(crate::game::MAX_ROCK_DENSITY),
        )?;
        check_range(
            "turn_time_limit_secs",
            u64::from(self.turn_time_limit_secs),
            1,
            u64::from(MAX_TURN_TIME_SECS),
        )?;
        check_range(
            "max_neutral_edges",
            u64::from(self.max_neutral_edges),
            0,
            u64::from(MAX_NEUTRAL_EDGES),
        )?;
        Ok(())
    }

    /// Parse and validate options from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or an option is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load and validate options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is malformed, or holds
    /// an out-of-range option.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let options = GameOptions::default();
        assert!(options.validate().is_ok());
        assert_eq!(options.max_neutral_edges, 6);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let options = GameOptions {
            width: 3,
            ..GameOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(ConfigError::OutOfRange { field: "width", .. })
        ));

        let options = GameOptions {
            rock_density: 91,
            ..GameOptions::default()
        };
        assert!(options.validate().is_err());

        let options = GameOptions {
            max_neutral_edges: 21,
            ..GameOptions::default()
        };
        assert!(options.validate().is_err());

        let options = GameOptions {
            height: 65,
            ..GameOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let options = GameOptions::from_json(r#"{"width": 8, "seed": 42}"#).unwrap();
        assert_eq!(options.width, 8);
        assert_eq!(options.height, 16);
        assert_eq!(options.seed, Some(42));
    }

    #[test]
    fn test_json_out_of_range() {
        assert!(GameOptions::from_json(r#"{"max_neutral_edges": 40}"#).is_err());
        assert!(GameOptions::from_json("not json").is_err());
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{"rock_density": 20}"#).unwrap();
        let options = GameOptions::from_json_file(&path).unwrap();
        assert_eq!(options.rock_density, 20);
    }
}
