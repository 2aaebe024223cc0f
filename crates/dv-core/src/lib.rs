//! dv-core: dungeon generation logic for delve.
//!
//! This crate contains all generation logic with no I/O dependencies.
//! It is designed to be pure and testable: a seeded configuration goes in,
//! a tile grid with rooms, meshes, and placements comes out, and the same
//! seed always produces the same dungeon.

pub mod config;
pub mod dungeon;
pub mod mesh;
pub mod props;

pub use config::{Config, ConfigError, Seed};
pub use dungeon::{generate, Dungeon, GenerationError};
pub use mesh::{build_colliders_2d, build_mesh, DungeonMesh, MeshData};
pub use props::{place_props, Placement, PropKind};
