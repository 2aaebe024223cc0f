//! Dungeon layout generation.
//!
//! Tile grid, rooms, flood fill, corridor routing, and the generation
//! orchestration that ties them together.

mod coord;
mod corridor;
mod generator;
mod regions;
mod room;
mod tile;

pub use coord::Coord;
pub use corridor::{carve_corridor, corridor_path};
pub use generator::{generate, Dungeon, GenerationError};
pub use regions::regions_of;
pub use room::{connect_rooms, set_accessible_from_main, Bounds, Room, RoomId};
pub use tile::{Tile, TileGrid};
