//! Grid-to-mesh triangulation.
//!
//! Classic 16-case marching squares: each square's corner-occupancy
//! configuration selects a fixed fan of triangles over its corner and
//! midpoint nodes. Vertices are deduplicated by assigning a node its buffer
//! index the first time any square emits it.

use glam::{Vec2, Vec3};
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::dungeon::TileGrid;

use super::square_grid::{Node, NodeId, Square, SquareGrid};

/// World-space texture repeats across the grid extent.
pub const TILE_REPEAT: f32 = 10.0;

/// Three vertex indices. Only used as a lookup key for boundary-edge
/// classification, never rendered directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Triangle {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    pub fn vertices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }

    pub fn contains(&self, v: u32) -> bool {
        self.a == v || self.b == v || self.c == v
    }
}

/// A triangle mesh with the attribute buffers external consumers need.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub triangles: Vec<u32>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
}

impl MeshData {
    /// Recompute normals from geometry: area-weighted face-normal
    /// accumulation per vertex, then normalized.
    pub fn recalculate_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.triangles.chunks_exact(3) {
            let a = Vec3::from(self.positions[tri[0] as usize]);
            let b = Vec3::from(self.positions[tri[1] as usize]);
            let c = Vec3::from(self.positions[tri[2] as usize]);
            let face = (b - a).cross(c - a);
            for &i in tri {
                acc[i as usize] += face;
            }
        }
        self.normals = acc
            .into_iter()
            .map(|n| n.normalize_or_zero().to_array())
            .collect();
    }
}

/// Marching-squares triangulator.
///
/// Owns the scratch working set (vertex buffer, triangle buffer, per-vertex
/// triangle lookup, checked-vertex set, outlines); everything is cleared at
/// the start of each `triangulate` call, so one value can be reused across
/// dungeons without leaking state.
#[derive(Debug, Default)]
pub struct Triangulator {
    pub(super) vertices: Vec<Vec3>,
    pub(super) triangles: Vec<u32>,
    pub(super) lookup: HashMap<u32, Vec<Triangle>>,
    pub(super) checked: HashSet<u32>,
    pub(super) outlines: Vec<Vec<u32>>,
    half_extent: Vec2,
}

impl Triangulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triangulate the open area of a tile grid.
    pub fn triangulate(&mut self, grid: &TileGrid, cell_size: f32) {
        self.vertices.clear();
        self.triangles.clear();
        self.lookup.clear();
        self.checked.clear();
        self.outlines.clear();
        self.half_extent = Vec2::new(
            grid.width() as f32 * cell_size / 2.0,
            grid.height() as f32 * cell_size / 2.0,
        );

        let mut square_grid = SquareGrid::new(grid, cell_size);
        for i in 0..square_grid.squares.len() {
            let square = square_grid.squares[i];
            self.triangulate_square(&square, &mut square_grid.nodes);
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn outlines(&self) -> &[Vec<u32>] {
        &self.outlines
    }

    /// Texture coordinates: world X/Z normalized into [0, 1] over each
    /// axis's extent, scaled by the tile repeat factor.
    pub fn uvs(&self) -> Vec<[f32; 2]> {
        self.vertices
            .iter()
            .map(|v| {
                let u = inverse_lerp(-self.half_extent.x, self.half_extent.x, v.x) * TILE_REPEAT;
                let w = inverse_lerp(-self.half_extent.y, self.half_extent.y, v.z) * TILE_REPEAT;
                [u, w]
            })
            .collect()
    }

    /// One of the 16 corner-occupancy patterns per square.
    ///
    /// Case 15 (fully interior) also marks its corners as checked: a corner
    /// whose four surrounding cells are all open can never lie on an
    /// outline, so the outline walk skips it outright.
    fn triangulate_square(&mut self, sq: &Square, nodes: &mut [Node]) {
        match sq.configuration {
            0 => {}

            // 1 corner
            1 => self.mesh_from_points(nodes, &[sq.centre_left, sq.centre_bottom, sq.bottom_left]),
            2 => self.mesh_from_points(nodes, &[sq.bottom_right, sq.centre_bottom, sq.centre_right]),
            4 => self.mesh_from_points(nodes, &[sq.top_right, sq.centre_right, sq.centre_top]),
            8 => self.mesh_from_points(nodes, &[sq.top_left, sq.centre_top, sq.centre_left]),

            // 2 corners
            3 => self.mesh_from_points(
                nodes,
                &[sq.centre_right, sq.bottom_right, sq.bottom_left, sq.centre_left],
            ),
            6 => self.mesh_from_points(
                nodes,
                &[sq.centre_top, sq.top_right, sq.bottom_right, sq.centre_bottom],
            ),
            9 => self.mesh_from_points(
                nodes,
                &[sq.top_left, sq.centre_top, sq.centre_bottom, sq.bottom_left],
            ),
            12 => self.mesh_from_points(
                nodes,
                &[sq.top_left, sq.top_right, sq.centre_right, sq.centre_left],
            ),
            5 => self.mesh_from_points(
                nodes,
                &[
                    sq.centre_top,
                    sq.top_right,
                    sq.centre_right,
                    sq.centre_bottom,
                    sq.bottom_left,
                    sq.centre_left,
                ],
            ),
            10 => self.mesh_from_points(
                nodes,
                &[
                    sq.top_left,
                    sq.centre_top,
                    sq.centre_right,
                    sq.bottom_right,
                    sq.centre_bottom,
                    sq.centre_left,
                ],
            ),

            // 3 corners
            7 => self.mesh_from_points(
                nodes,
                &[sq.centre_top, sq.top_right, sq.bottom_right, sq.bottom_left, sq.centre_left],
            ),
            11 => self.mesh_from_points(
                nodes,
                &[sq.top_left, sq.centre_top, sq.centre_right, sq.bottom_right, sq.bottom_left],
            ),
            13 => self.mesh_from_points(
                nodes,
                &[sq.top_left, sq.top_right, sq.centre_right, sq.centre_bottom, sq.bottom_left],
            ),
            14 => self.mesh_from_points(
                nodes,
                &[sq.top_left, sq.top_right, sq.bottom_right, sq.centre_bottom, sq.centre_left],
            ),

            // 4 corners: fully interior
            15 => {
                self.mesh_from_points(
                    nodes,
                    &[sq.top_left, sq.top_right, sq.bottom_right, sq.bottom_left],
                );
                for id in [sq.top_left, sq.top_right, sq.bottom_right, sq.bottom_left] {
                    if let Some(v) = nodes[id].vertex {
                        self.checked.insert(v);
                    }
                }
            }

            _ => unreachable!("configuration is 4 bits"),
        }
    }

    /// Assign vertices and fan-triangulate an ordered point loop.
    fn mesh_from_points(&mut self, nodes: &mut [Node], points: &[NodeId]) {
        let indices = self.assign_vertices(nodes, points);

        for i in 2..indices.len() {
            self.create_triangle(indices[0], indices[i - 1], indices[i]);
        }
    }

    /// Lazy vertex index assignment: first use appends the node's position
    /// to the buffer, later uses reuse the same index.
    fn assign_vertices(&mut self, nodes: &mut [Node], points: &[NodeId]) -> Vec<u32> {
        points
            .iter()
            .map(|&id| match nodes[id].vertex {
                Some(v) => v,
                None => {
                    let v = self.vertices.len() as u32;
                    nodes[id].vertex = Some(v);
                    self.vertices.push(nodes[id].position);
                    v
                }
            })
            .collect()
    }

    fn create_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.extend([a, b, c]);

        let triangle = Triangle::new(a, b, c);
        for v in triangle.vertices() {
            self.lookup.entry(v).or_default().push(triangle);
        }
    }
}

fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if (b - a).abs() < f32::EPSILON {
        0.0
    } else {
        (v - a) / (b - a)
    }
}
