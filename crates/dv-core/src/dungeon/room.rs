//! Room entities and the room connectivity graph.
//!
//! Rooms are created once from flood-fill regions and live in a flat table;
//! connectivity is stored as table indices rather than references, so the
//! graph has no ownership cycles.

use serde::{Deserialize, Serialize};

use super::{Coord, TileGrid};

/// Index of a room in the generation result's room table.
pub type RoomId = usize;

/// Axis-aligned room bounds in grid-centered tile units.
///
/// A tile at grid (x, y) maps to (x - width/2, y - height/2), so bounds line
/// up with the world-space mesh, whose origin is the grid center.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl Bounds {
    /// Width in tiles (inclusive of both edge columns)
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x + 1.0
    }

    /// Height in tiles (inclusive of both edge rows)
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y + 1.0
    }

    /// Center point
    pub fn center(&self) -> (f32, f32) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// One connected room region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// All cells of the region
    pub tiles: Vec<Coord>,
    /// Cells with at least one cardinal Wall neighbor; corridor endpoints
    /// are picked from these
    pub edge_tiles: Vec<Coord>,
    /// Bounding rectangle in grid-centered units
    pub bounds: Bounds,
    /// Rooms this one is directly corridor-connected to
    pub connections: Vec<RoomId>,
    /// Exactly one room per dungeon, the largest
    pub is_main_room: bool,
    /// Transitively reachable from the main room
    pub is_accessible_from_main_room: bool,
}

impl Room {
    /// Build a room from a flood-fill region against the pre-corridor grid.
    pub fn from_region(tiles: Vec<Coord>, grid: &TileGrid) -> Self {
        let mut edge_tiles = Vec::new();
        for tile in &tiles {
            let on_edge = tile.neighbors4().iter().any(|n| grid.get(*n).is_wall());
            if on_edge {
                edge_tiles.push(*tile);
            }
        }

        let half_w = grid.width() as f32 / 2.0;
        let half_h = grid.height() as f32 / 2.0;
        let mut min_x = i32::MAX;
        let mut min_y = i32::MAX;
        let mut max_x = i32::MIN;
        let mut max_y = i32::MIN;
        for c in &edge_tiles {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            max_x = max_x.max(c.x);
            max_y = max_y.max(c.y);
        }
        let bounds = Bounds {
            min_x: min_x as f32 - half_w,
            min_y: min_y as f32 - half_h,
            max_x: max_x as f32 - half_w,
            max_y: max_y as f32 - half_h,
        };

        Self {
            tiles,
            edge_tiles,
            bounds,
            connections: Vec::new(),
            is_main_room: false,
            is_accessible_from_main_room: false,
        }
    }

    /// Number of tiles in the room
    pub fn size(&self) -> usize {
        self.tiles.len()
    }

    /// Check for a direct corridor connection to another room
    pub fn is_connected(&self, other: RoomId) -> bool {
        self.connections.contains(&other)
    }
}

/// Mark a room and everything reachable from it as accessible.
///
/// Explicit stack instead of recursion; corridor-dense dungeons can chain
/// hundreds of rooms.
pub fn set_accessible_from_main(rooms: &mut [Room], start: RoomId) {
    let mut stack = vec![start];
    while let Some(id) = stack.pop() {
        if rooms[id].is_accessible_from_main_room {
            continue;
        }
        rooms[id].is_accessible_from_main_room = true;
        stack.extend(rooms[id].connections.iter().copied());
    }
}

/// Record a corridor connection between two rooms, propagating main-room
/// accessibility across the new link.
pub fn connect_rooms(rooms: &mut [Room], a: RoomId, b: RoomId) {
    if rooms[a].is_accessible_from_main_room {
        set_accessible_from_main(rooms, b);
    } else if rooms[b].is_accessible_from_main_room {
        set_accessible_from_main(rooms, a);
    }
    rooms[a].connections.push(b);
    rooms[b].connections.push(a);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Tile;

    fn room_on_grid(x0: i32, y0: i32, w: i32, h: i32, grid_dim: i32) -> (Room, TileGrid) {
        let mut grid = TileGrid::new(grid_dim, grid_dim);
        let mut tiles = Vec::new();
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                grid.set(Coord::new(x, y), Tile::Room);
                tiles.push(Coord::new(x, y));
            }
        }
        let room = Room::from_region(tiles, &grid);
        (room, grid)
    }

    #[test]
    fn test_edge_tiles_of_rectangle() {
        let (room, _) = room_on_grid(5, 5, 4, 4, 20);
        assert_eq!(room.size(), 16);
        // Perimeter of a 4x4 block
        assert_eq!(room.edge_tiles.len(), 12);
        // Interior tile is not an edge tile
        assert!(!room.edge_tiles.contains(&Coord::new(6, 6)));
    }

    #[test]
    fn test_bounds_match_rectangle() {
        let (room, grid) = room_on_grid(10, 12, 5, 3, 30);
        assert_eq!(room.bounds.width(), 5.0);
        assert_eq!(room.bounds.height(), 3.0);

        let (cx, cy) = room.bounds.center();
        let half = grid.width() as f32 / 2.0;
        assert_eq!(cx, 12.0 - half);
        assert_eq!(cy, 13.0 - half);
    }

    #[test]
    fn test_accessibility_propagates_through_chain() {
        let (r, _) = room_on_grid(2, 2, 3, 3, 40);
        let mut rooms = vec![r.clone(), r.clone(), r.clone(), r];
        rooms[0].is_main_room = true;
        rooms[0].is_accessible_from_main_room = true;

        // 1-2 connected first, neither accessible yet
        connect_rooms(&mut rooms, 1, 2);
        assert!(!rooms[1].is_accessible_from_main_room);
        assert!(!rooms[2].is_accessible_from_main_room);

        // Linking 0-1 floods the whole component
        connect_rooms(&mut rooms, 0, 1);
        assert!(rooms[1].is_accessible_from_main_room);
        assert!(rooms[2].is_accessible_from_main_room);
        assert!(!rooms[3].is_accessible_from_main_room);
    }

    #[test]
    fn test_is_connected() {
        let (r, _) = room_on_grid(2, 2, 3, 3, 40);
        let mut rooms = vec![r.clone(), r];
        connect_rooms(&mut rooms, 0, 1);
        assert!(rooms[0].is_connected(1));
        assert!(rooms[1].is_connected(0));
    }
}
