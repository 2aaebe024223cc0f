//! Mesh outline extraction.
//!
//! An edge is a boundary edge iff exactly one triangle references both of
//! its endpoints; interior edges are shared by two. Walking boundary
//! neighbors from any unvisited boundary vertex traces one closed loop of
//! the mesh perimeter.

use glam::Vec3;

use super::triangulate::Triangulator;

impl Triangulator {
    /// Trace every boundary loop of the current mesh.
    ///
    /// Loops are cyclic vertex-index sequences (no duplicated closing
    /// vertex) and come out simplified: colinear runs are collapsed so only
    /// direction-change vertices remain.
    pub fn calculate_outlines(&mut self) {
        self.outlines.clear();

        for vertex in 0..self.vertices.len() as u32 {
            if self.checked.contains(&vertex) {
                continue;
            }
            if let Some(next) = self.connected_outline_vertex(vertex) {
                self.checked.insert(vertex);
                let mut outline = vec![vertex];
                self.follow_outline(next, &mut outline);
                self.outlines.push(outline);
            }
        }

        self.simplify_outlines();
    }

    /// Walk the loop vertex by vertex. Each step has at most one unvisited
    /// boundary neighbor, so a plain loop replaces the recursion the naive
    /// formulation would use (and cannot overflow on large dungeons).
    fn follow_outline(&mut self, start: u32, outline: &mut Vec<u32>) {
        let mut vertex = start;
        loop {
            outline.push(vertex);
            self.checked.insert(vertex);
            match self.connected_outline_vertex(vertex) {
                Some(next) => vertex = next,
                None => break,
            }
        }
    }

    /// Find an unvisited vertex that shares a boundary edge with this one.
    fn connected_outline_vertex(&self, vertex: u32) -> Option<u32> {
        let triangles = self.lookup.get(&vertex)?;
        for triangle in triangles {
            for other in triangle.vertices() {
                if other != vertex
                    && !self.checked.contains(&other)
                    && self.is_outline_edge(vertex, other)
                {
                    return Some(other);
                }
            }
        }
        None
    }

    /// Boundary test: the edge (a, b) lies on the outline iff exactly one
    /// triangle contains both endpoints.
    fn is_outline_edge(&self, a: u32, b: u32) -> bool {
        let Some(triangles) = self.lookup.get(&a) else {
            return false;
        };
        let mut shared = 0;
        for triangle in triangles {
            if triangle.contains(b) {
                shared += 1;
                if shared > 1 {
                    break;
                }
            }
        }
        shared == 1
    }

    /// Collapse colinear runs, keeping only vertices where the outline
    /// changes direction.
    fn simplify_outlines(&mut self) {
        let vertices = &self.vertices;
        for outline in &mut self.outlines {
            let n = outline.len();
            if n < 3 {
                continue;
            }
            let dir = |from: u32, to: u32| -> Vec3 {
                (vertices[to as usize] - vertices[from as usize]).normalize_or_zero()
            };

            let mut simplified = Vec::new();
            for i in 0..n {
                let prev = outline[(i + n - 1) % n];
                let here = outline[i];
                let next = outline[(i + 1) % n];
                if !dir(prev, here).abs_diff_eq(dir(here, next), 1e-4) {
                    simplified.push(here);
                }
            }
            *outline = simplified;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Coord, Tile, TileGrid};

    fn open_block(grid: &mut TileGrid, x0: i32, y0: i32, w: i32, h: i32) {
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                grid.set(Coord::new(x, y), Tile::Room);
            }
        }
    }

    fn outlines_for(grid: &TileGrid) -> (Triangulator, usize) {
        let mut tri = Triangulator::new();
        tri.triangulate(grid, 1.0);
        tri.calculate_outlines();
        let count = tri.outlines().len();
        (tri, count)
    }

    #[test]
    fn test_rectangle_room_single_chamfered_loop() {
        let mut grid = TileGrid::new(20, 20);
        open_block(&mut grid, 5, 5, 6, 4);
        let (tri, count) = outlines_for(&grid);

        assert_eq!(count, 1);
        // Four straight runs plus the diagonal chamfer marching squares
        // puts on each 90-degree corner: two direction changes per corner
        assert_eq!(tri.outlines()[0].len(), 8);
    }

    #[test]
    fn test_two_rooms_two_loops() {
        let mut grid = TileGrid::new(30, 30);
        open_block(&mut grid, 2, 2, 5, 5);
        open_block(&mut grid, 15, 15, 6, 6);
        let (_, count) = outlines_for(&grid);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_l_shaped_room_single_loop() {
        let mut grid = TileGrid::new(20, 20);
        open_block(&mut grid, 4, 4, 8, 4);
        open_block(&mut grid, 4, 4, 4, 8);
        let (tri, count) = outlines_for(&grid);

        assert_eq!(count, 1);
        // Six right-angle corners, each chamfered into two direction changes
        assert_eq!(tri.outlines()[0].len(), 12);
    }

    #[test]
    fn test_outline_vertices_lie_on_boundary_edges() {
        let mut grid = TileGrid::new(20, 20);
        open_block(&mut grid, 5, 5, 5, 5);
        let (tri, _) = outlines_for(&grid);

        for outline in tri.outlines() {
            let n = outline.len();
            for i in 0..n {
                let a = outline[i];
                let b = outline[(i + 1) % n];
                // Consecutive simplified vertices stay colinear along a
                // boundary run; both endpoints must be real vertices
                assert!((a as usize) < tri.vertices().len());
                assert!((b as usize) < tri.vertices().len());
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_all_wall_no_outlines() {
        let grid = TileGrid::new(10, 10);
        let (_, count) = outlines_for(&grid);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_simplified_loop_keeps_only_direction_changes() {
        let mut grid = TileGrid::new(20, 20);
        open_block(&mut grid, 6, 6, 5, 7);
        let (tri, _) = outlines_for(&grid);

        let outline = &tri.outlines()[0];
        let n = outline.len();
        let dir = |from: u32, to: u32| {
            (tri.vertices()[to as usize] - tri.vertices()[from as usize]).normalize_or_zero()
        };
        // Every kept vertex is a turn, including across the loop seam
        for i in 0..n {
            let prev = outline[(i + n - 1) % n];
            let here = outline[i];
            let next = outline[(i + 1) % n];
            assert!(
                !dir(prev, here).abs_diff_eq(dir(here, next), 1e-4),
                "vertex {here} is colinear with its neighbors"
            );
        }
    }
}
