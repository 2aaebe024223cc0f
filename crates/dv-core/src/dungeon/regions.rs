//! Connected-region flood fill.

use std::collections::VecDeque;

use super::{Coord, Tile, TileGrid};

/// Find all connected regions of the given tile type.
///
/// Adjacency is 4-directional: a neighbor must share a row or column within
/// the 3x3 window around a cell. Regions are returned in scan order (first
/// cell of each region encountered row-major from the origin).
pub fn regions_of(grid: &TileGrid, tile: Tile) -> Vec<Vec<Coord>> {
    let mut regions = Vec::new();
    let mut visited = vec![false; (grid.width() as usize) * (grid.height() as usize)];
    let idx = |c: Coord| (c.y as usize) * (grid.width() as usize) + (c.x as usize);

    for start in grid.coords() {
        if visited[idx(start)] || grid.get(start) != tile {
            continue;
        }
        let region = fill_from(grid, start, &mut visited);
        regions.push(region);
    }

    regions
}

/// Breadth-first fill of the region containing `start`, over cells that
/// match `start`'s tile type. Marks cells in `visited` as they are consumed.
fn fill_from(grid: &TileGrid, start: Coord, visited: &mut [bool]) -> Vec<Coord> {
    let tile = grid.get(start);
    let idx = |c: Coord| (c.y as usize) * (grid.width() as usize) + (c.x as usize);

    let mut tiles = Vec::new();
    let mut queue = VecDeque::new();
    queue.push_back(start);
    visited[idx(start)] = true;

    while let Some(cell) = queue.pop_front() {
        tiles.push(cell);
        for n in cell.neighbors4() {
            if grid.in_bounds(n) && !visited[idx(n)] && grid.get(n) == tile {
                visited[idx(n)] = true;
                queue.push_back(n);
            }
        }
    }

    tiles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stamp(grid: &mut TileGrid, x0: i32, y0: i32, w: i32, h: i32) {
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                grid.set(Coord::new(x, y), Tile::Room);
            }
        }
    }

    #[test]
    fn test_single_region() {
        let mut grid = TileGrid::new(20, 20);
        stamp(&mut grid, 5, 5, 4, 4);

        let regions = regions_of(&grid, Tile::Room);
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].len(), 16);
    }

    #[test]
    fn test_disjoint_regions() {
        let mut grid = TileGrid::new(30, 30);
        stamp(&mut grid, 2, 2, 3, 3);
        stamp(&mut grid, 20, 20, 4, 4);

        let regions = regions_of(&grid, Tile::Room);
        assert_eq!(regions.len(), 2);
        let mut sizes: Vec<usize> = regions.iter().map(Vec::len).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![9, 16]);
    }

    #[test]
    fn test_overlapping_rectangles_merge() {
        let mut grid = TileGrid::new(30, 30);
        stamp(&mut grid, 5, 5, 5, 5);
        stamp(&mut grid, 8, 8, 5, 5);

        let regions = regions_of(&grid, Tile::Room);
        assert_eq!(regions.len(), 1);
        // Union of two 25-cell rectangles overlapping in a 2x2 block
        assert_eq!(regions[0].len(), 46);
    }

    #[test]
    fn test_diagonal_touch_does_not_connect() {
        let mut grid = TileGrid::new(10, 10);
        grid.set(Coord::new(2, 2), Tile::Room);
        grid.set(Coord::new(3, 3), Tile::Room);

        let regions = regions_of(&grid, Tile::Room);
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_region_count_matches_components() {
        let mut grid = TileGrid::new(40, 40);
        for i in 0..5 {
            stamp(&mut grid, i * 8, i * 8, 3, 3);
        }
        assert_eq!(regions_of(&grid, Tile::Room).len(), 5);
    }
}
