//! Tile types and the dungeon grid.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::Coord;

/// Per-cell tile type.
///
/// The grid starts all-Wall; generation carves Room and Corridor tiles into
/// it, then decoration stamps Door and WallProp markers on open tiles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Tile {
    #[default]
    Wall = 0,
    Room = 1,
    Corridor = 2,
    Door = 3,
    WallProp = 4,
}

impl Tile {
    /// Check if this is solid wall
    pub const fn is_wall(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Check if this is open floor (anything carved out of the wall mass)
    pub const fn is_open(&self) -> bool {
        !self.is_wall()
    }

    /// Get the display character for this tile
    pub const fn symbol(&self) -> char {
        match self {
            Tile::Wall => '#',
            Tile::Room => '.',
            Tile::Corridor => ',',
            Tile::Door => '+',
            Tile::WallProp => '*',
        }
    }
}

/// A fixed-size 2D tile grid.
///
/// Shape is immutable once allocated; cells are mutated in place during
/// generation. Row-major storage, (0, 0) at the bottom-left of the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// Create a grid filled with Wall
    pub fn new(width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "grid dimensions must be positive");
        Self {
            width,
            height,
            tiles: vec![Tile::Wall; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Check whether a coordinate lies inside the grid
    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width && c.y >= 0 && c.y < self.height
    }

    /// Tile at a coordinate; out-of-bounds reads as Wall, matching the
    /// all-Wall margin the generator guarantees anyway.
    pub fn get(&self, c: Coord) -> Tile {
        if self.in_bounds(c) {
            self.tiles[self.index(c)]
        } else {
            Tile::Wall
        }
    }

    /// Set the tile at a coordinate. Out-of-bounds writes are ignored.
    pub fn set(&mut self, c: Coord, tile: Tile) {
        if self.in_bounds(c) {
            let idx = self.index(c);
            self.tiles[idx] = tile;
        }
    }

    fn index(&self, c: Coord) -> usize {
        (c.y as usize) * (self.width as usize) + (c.x as usize)
    }

    /// Iterate all coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| Coord::new(x, y)))
    }

    /// Count tiles of a given type
    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// Copy this grid into a larger one padded with a Wall border of the
    /// given thickness on all sides.
    pub fn bordered(&self, border: i32) -> TileGrid {
        assert!(border >= 0, "border must be non-negative");
        let mut out = TileGrid::new(self.width + border * 2, self.height + border * 2);
        for c in self.coords() {
            out.set(Coord::new(c.x + border, c.y + border), self.get(c));
        }
        out
    }

    /// Render the grid as ASCII art, top row first
    pub fn to_ascii(&self) -> String {
        let mut s = String::with_capacity((self.width as usize + 1) * self.height as usize);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                s.push(self.get(Coord::new(x, y)).symbol());
            }
            s.push('\n');
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_all_wall() {
        let grid = TileGrid::new(4, 3);
        assert_eq!(grid.count(Tile::Wall), 12);
        for c in grid.coords() {
            assert_eq!(grid.get(c), Tile::Wall);
        }
    }

    #[test]
    fn test_get_set() {
        let mut grid = TileGrid::new(8, 8);
        grid.set(Coord::new(3, 4), Tile::Room);
        assert_eq!(grid.get(Coord::new(3, 4)), Tile::Room);
        assert_eq!(grid.get(Coord::new(4, 3)), Tile::Wall);
    }

    #[test]
    fn test_out_of_bounds_reads_wall() {
        let grid = TileGrid::new(4, 4);
        assert_eq!(grid.get(Coord::new(-1, 0)), Tile::Wall);
        assert_eq!(grid.get(Coord::new(4, 0)), Tile::Wall);
        assert_eq!(grid.get(Coord::new(0, 100)), Tile::Wall);
    }

    #[test]
    fn test_bordered() {
        let mut grid = TileGrid::new(3, 3);
        grid.set(Coord::new(1, 1), Tile::Room);
        let padded = grid.bordered(2);

        assert_eq!(padded.width(), 7);
        assert_eq!(padded.height(), 7);
        assert_eq!(padded.get(Coord::new(3, 3)), Tile::Room);
        assert_eq!(padded.count(Tile::Room), 1);
        // Border ring stays wall
        for x in 0..7 {
            assert_eq!(padded.get(Coord::new(x, 0)), Tile::Wall);
            assert_eq!(padded.get(Coord::new(x, 6)), Tile::Wall);
        }
    }

    #[test]
    fn test_tile_predicates() {
        assert!(Tile::Wall.is_wall());
        assert!(!Tile::Wall.is_open());
        for t in [Tile::Room, Tile::Corridor, Tile::Door, Tile::WallProp] {
            assert!(t.is_open());
        }
    }

    #[test]
    fn test_ascii_orientation() {
        let mut grid = TileGrid::new(2, 2);
        grid.set(Coord::new(0, 1), Tile::Room);
        // Top row is rendered first
        assert_eq!(grid.to_ascii(), ".#\n##\n");
    }
}
