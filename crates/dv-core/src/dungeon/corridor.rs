//! Corridor routing and carving.

use super::{Coord, Tile, TileGrid};

/// Cells of an axis-aligned stepped path between two tiles.
///
/// Closes the Y gap one cell at a time, then the X gap, producing an
/// L-shaped path. The destination cell itself is not included; endpoints
/// are room edge tiles and already open.
pub fn corridor_path(from: Coord, to: Coord) -> Vec<Coord> {
    let mut path = Vec::new();
    let mut current = from;

    let v_step = step_toward(from.y, to.y);
    let h_step = step_toward(from.x, to.x);

    while current.y != to.y {
        path.push(current);
        current = Coord::new(current.x, current.y + v_step);
    }
    while current.x != to.x {
        path.push(current);
        current = Coord::new(current.x + h_step, current.y);
    }

    path
}

fn step_toward(from: i32, to: i32) -> i32 {
    if to > from { 1 } else { -1 }
}

/// Stamp a corridor along a path with a square brush of the given radius.
///
/// A radius of 1 yields a 3-wide hallway. Only Wall tiles are overwritten:
/// room interiors the path crosses keep their Room tiles, so carving never
/// shrinks a room.
pub fn carve_corridor(grid: &mut TileGrid, path: &[Coord], radius: i32) {
    for cell in path {
        for dx in -radius..=radius {
            for dy in -radius..=radius {
                let c = Coord::new(cell.x + dx, cell.y + dy);
                if grid.in_bounds(c) && grid.get(c).is_wall() {
                    grid.set(c, Tile::Corridor);
                }
            }
        }
    }
}
