//! Generation configuration and boundary validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dv_rng::GameRng;

/// Seed source for the generation RNG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Seed {
    /// Fixed text seed; the same text always produces the same dungeon
    Text(String),
    /// Fresh entropy on every generation
    Entropy,
}

impl Seed {
    /// Build the generation RNG from this seed
    pub fn rng(&self) -> GameRng {
        match self {
            Seed::Text(text) => GameRng::from_text(text),
            Seed::Entropy => GameRng::from_entropy(),
        }
    }
}

/// Invalid configuration, reported before any generation work starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid must be at least 8x8, got {width}x{height}")]
    GridTooSmall { width: i32, height: i32 },

    #[error("room sizes must be positive and min <= max, got {min}..{max}")]
    BadRoomSizeRange { min: i32, max: i32 },

    #[error("max room size {size} does not fit a {width}x{height} grid with its wall margin")]
    RoomTooLarge { size: i32, width: i32, height: i32 },

    #[error("room counts must be positive and min <= max, got {min}..{max}")]
    BadRoomCountRange { min: i32, max: i32 },

    #[error("hallway width must be non-negative, got {0}")]
    NegativeHallwayWidth(i32),

    #[error("border size must be non-negative, got {0}")]
    NegativeBorder(i32),

    #[error("cell size must be positive, got {0}")]
    BadCellSize(f32),

    #[error("wall height must be positive, got {0}")]
    BadWallHeight(f32),
}

/// All knobs for one generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Grid width in tiles, before the border is added
    pub width: i32,
    /// Grid height in tiles, before the border is added
    pub height: i32,
    /// Room rectangle side length, sampled in min..max (min when equal)
    pub min_room_size: i32,
    pub max_room_size: i32,
    /// Number of room rectangles drawn, sampled in min..max (min when equal)
    pub min_room_count: i32,
    pub max_room_count: i32,
    /// Corridor brush radius; 1 gives a 3-wide hallway
    pub hallway_width: i32,
    /// Wall padding added on all sides before meshing
    pub border_size: i32,
    /// Wall extrusion depth in world units
    pub wall_height: f32,
    /// World size of one grid cell
    pub cell_size: f32,
    /// RNG seed source
    pub seed: Seed,
    /// Upper bound on forced-connectivity repair passes
    pub connect_retry_budget: u32,
    /// Door prefab identifiers; opaque here, placement records an index
    pub door_prefabs: Vec<String>,
    /// Wall-prop prefab identifiers; opaque here, placement records an index
    pub prop_prefabs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 96,
            height: 64,
            min_room_size: 5,
            max_room_size: 12,
            min_room_count: 6,
            max_room_count: 12,
            hallway_width: 1,
            border_size: 5,
            wall_height: 5.0,
            cell_size: 1.0,
            seed: Seed::Entropy,
            connect_retry_budget: 64,
            door_prefabs: vec!["door".into()],
            prop_prefabs: vec!["sconce".into()],
        }
    }
}

impl Config {
    /// Validate every field the generator relies on.
    ///
    /// Room placement samples start coordinates in [1, dim - 1 - size), so a
    /// room must leave at least the 1-cell margin on each side; everything
    /// else is simple range checking.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < 8 || self.height < 8 {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_room_size <= 0 || self.min_room_size > self.max_room_size {
            return Err(ConfigError::BadRoomSizeRange {
                min: self.min_room_size,
                max: self.max_room_size,
            });
        }
        let max_fit = self.width.min(self.height) - 2;
        if self.max_room_size > max_fit {
            return Err(ConfigError::RoomTooLarge {
                size: self.max_room_size,
                width: self.width,
                height: self.height,
            });
        }
        if self.min_room_count <= 0 || self.min_room_count > self.max_room_count {
            return Err(ConfigError::BadRoomCountRange {
                min: self.min_room_count,
                max: self.max_room_count,
            });
        }
        if self.hallway_width < 0 {
            return Err(ConfigError::NegativeHallwayWidth(self.hallway_width));
        }
        if self.border_size < 0 {
            return Err(ConfigError::NegativeBorder(self.border_size));
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::BadCellSize(self.cell_size));
        }
        if !(self.wall_height > 0.0) {
            return Err(ConfigError::BadWallHeight(self.wall_height));
        }
        Ok(())
    }
}
