//! Door and wall-prop placement.
//!
//! A secondary pass over the finished grid: every Door or WallProp marker
//! becomes a placement record with a world position, a wall-facing yaw, and
//! an RNG-picked prefab class. Prefabs are opaque to the core; placements
//! carry an index into whatever list the caller maintains. The grid and
//! mesh are never mutated here.

use std::f32::consts::{FRAC_PI_2, PI};

use serde::{Deserialize, Serialize};

use dv_rng::GameRng;

use crate::dungeon::{Coord, Tile, TileGrid};

/// What kind of decoration a placement positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    Door,
    WallProp,
}

/// One placed decoration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: PropKind,
    /// Index into the caller's prefab list for this kind
    pub prefab: usize,
    /// World position on the floor plane, grid-centered like the mesh
    pub position: [f32; 3],
    /// Rotation around the up axis, radians; 0 faces +Z
    pub yaw: f32,
}

/// Scan the grid and place every Door and WallProp marker.
///
/// Prefab identifiers are opaque; only their count matters here, and each
/// placement records an index into the caller's list. Scan order is
/// row-major and every prefab pick draws from the passed RNG, so placement
/// is as deterministic as the grid itself. An empty prefab list suppresses
/// that marker kind entirely.
pub fn place_props(
    grid: &TileGrid,
    cell_size: f32,
    door_prefabs: &[String],
    prop_prefabs: &[String],
    rng: &mut GameRng,
) -> Vec<Placement> {
    let mut placements = Vec::new();

    for c in grid.coords() {
        match grid.get(c) {
            Tile::Door if !door_prefabs.is_empty() => {
                placements.push(Placement {
                    kind: PropKind::Door,
                    prefab: rng.rn2(door_prefabs.len() as u32) as usize,
                    position: world_pos(grid, c, cell_size),
                    yaw: door_yaw(grid, c),
                });
            }
            Tile::WallProp if !prop_prefabs.is_empty() => {
                placements.push(Placement {
                    kind: PropKind::WallProp,
                    prefab: rng.rn2(prop_prefabs.len() as u32) as usize,
                    position: world_pos(grid, c, cell_size),
                    yaw: prop_yaw(grid, c),
                });
            }
            _ => {}
        }
    }

    placements
}

/// World position of a tile center, in the grid-centered mesh frame.
fn world_pos(grid: &TileGrid, c: Coord, cell_size: f32) -> [f32; 3] {
    let half_w = grid.width() as f32 * cell_size / 2.0;
    let half_h = grid.height() as f32 * cell_size / 2.0;
    [
        -half_w + c.x as f32 * cell_size + cell_size / 2.0,
        0.0,
        -half_h + c.y as f32 * cell_size + cell_size / 2.0,
    ]
}

/// Distance (1..=3) to the nearest wall along a direction, if any.
///
/// The probe reaches past the immediate neighbor so doors centered in wide
/// hallways still see their jambs.
fn wall_probe(grid: &TileGrid, c: Coord, dx: i32, dy: i32) -> Option<i32> {
    (1..=3).find(|&d| grid.get(Coord::new(c.x + dx * d, c.y + dy * d)).is_wall())
}

/// Doors span the axis their jambs sit on: walls to the east/west mean the
/// passage runs north-south and the door slab faces along X.
fn door_yaw(grid: &TileGrid, c: Coord) -> f32 {
    let x_dist = wall_probe(grid, c, 1, 0)
        .into_iter()
        .chain(wall_probe(grid, c, -1, 0))
        .min();
    let y_dist = wall_probe(grid, c, 0, 1)
        .into_iter()
        .chain(wall_probe(grid, c, 0, -1))
        .min();

    match (x_dist, y_dist) {
        (Some(x), Some(y)) if x <= y => FRAC_PI_2,
        (Some(_), None) => FRAC_PI_2,
        _ => 0.0,
    }
}

/// Wall props face away from the wall they hang on.
fn prop_yaw(grid: &TileGrid, c: Coord) -> f32 {
    // neighbors4 order: E, W, N, S
    let walls: Vec<bool> = c
        .neighbors4()
        .iter()
        .map(|n| grid.get(*n).is_wall())
        .collect();
    if walls[0] {
        -FRAC_PI_2 // wall east, face west
    } else if walls[1] {
        FRAC_PI_2 // wall west, face east
    } else if walls[2] {
        PI // wall north, face south
    } else {
        0.0 // wall south (or free-standing), face north
    }
}
