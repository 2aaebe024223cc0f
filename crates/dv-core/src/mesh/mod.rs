//! Grid-to-mesh conversion.
//!
//! Marching-squares triangulation of the tile grid, outline extraction for
//! wall geometry and colliders, and sub-mesh assembly.

mod outline;
mod square_grid;
mod triangulate;
mod walls;

pub use square_grid::{Node, NodeId, Square, SquareGrid};
pub use triangulate::{MeshData, Triangle, Triangulator, TILE_REPEAT};
pub use walls::{build_colliders_2d, build_mesh, DungeonMesh};
