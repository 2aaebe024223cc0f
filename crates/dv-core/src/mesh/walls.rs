//! Sub-mesh assembly: floor, ceiling, extruded walls, and 2D colliders.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::dungeon::TileGrid;

use super::triangulate::{MeshData, Triangulator};

/// The renderable/collidable output of one meshing run.
///
/// The wall mesh doubles as the 3D collider; 2D consumers take
/// [`build_colliders_2d`] edge loops instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DungeonMesh {
    pub floor: MeshData,
    pub ceiling: MeshData,
    pub walls: MeshData,
}

/// Triangulate a grid and assemble the three sub-meshes.
///
/// The open area becomes an up-facing floor at y = 0 and a down-facing
/// ceiling at y = `wall_height`; the boundary outlines extrude into wall
/// strips between the two.
pub fn build_mesh(grid: &TileGrid, cell_size: f32, wall_height: f32) -> DungeonMesh {
    let mut triangulator = Triangulator::new();
    triangulator.triangulate(grid, cell_size);
    triangulator.calculate_outlines();

    DungeonMesh {
        floor: flat_mesh(&triangulator, 0.0, false),
        ceiling: flat_mesh(&triangulator, wall_height, true),
        walls: wall_mesh(&triangulator, wall_height),
    }
}

/// 2D edge-loop colliders: one closed (x, z) polygon per boundary outline.
pub fn build_colliders_2d(grid: &TileGrid, cell_size: f32) -> Vec<Vec<[f32; 2]>> {
    let mut triangulator = Triangulator::new();
    triangulator.triangulate(grid, cell_size);
    triangulator.calculate_outlines();

    triangulator
        .outlines()
        .iter()
        .map(|outline| {
            outline
                .iter()
                .map(|&v| {
                    let p = triangulator.vertices()[v as usize];
                    [p.x, p.z]
                })
                .collect()
        })
        .collect()
}

/// The triangulated open area lifted to a height. `flip` reverses winding
/// so the ceiling faces down while the floor faces up.
fn flat_mesh(triangulator: &Triangulator, y: f32, flip: bool) -> MeshData {
    let positions: Vec<[f32; 3]> = triangulator
        .vertices()
        .iter()
        .map(|v| [v.x, y, v.z])
        .collect();

    let triangles: Vec<u32> = if flip {
        triangulator
            .triangles()
            .chunks_exact(3)
            .flat_map(|t| [t[0], t[2], t[1]])
            .collect()
    } else {
        triangulator.triangles().to_vec()
    };

    let mut mesh = MeshData {
        positions,
        triangles,
        uvs: triangulator.uvs(),
        normals: Vec::new(),
    };
    mesh.recalculate_normals();
    mesh
}

/// Extrude each simplified outline downward into a quad strip.
///
/// UV.x is the cumulative arc length along the loop and UV.y the vertical
/// position (0 at the floor, 1 at the top), so a wall texture tiles
/// seamlessly around corners.
fn wall_mesh(triangulator: &Triangulator, wall_height: f32) -> MeshData {
    let up = Vec3::Y * wall_height;
    let mut mesh = MeshData::default();

    for outline in triangulator.outlines() {
        let n = outline.len();
        if n < 2 {
            continue;
        }
        let mut arc = 0.0f32;
        for i in 0..n {
            let left = triangulator.vertices()[outline[i] as usize];
            let right = triangulator.vertices()[outline[(i + 1) % n] as usize];
            let segment = left.distance(right);
            let start = mesh.positions.len() as u32;

            mesh.positions.push((left + up).to_array());
            mesh.positions.push((right + up).to_array());
            mesh.positions.push(left.to_array());
            mesh.positions.push(right.to_array());

            mesh.uvs.push([arc, 1.0]);
            mesh.uvs.push([arc + segment, 1.0]);
            mesh.uvs.push([arc, 0.0]);
            mesh.uvs.push([arc + segment, 0.0]);

            mesh.triangles.extend([start, start + 2, start + 3]);
            mesh.triangles.extend([start + 3, start + 1, start]);

            arc += segment;
        }
    }

    mesh.recalculate_normals();
    mesh
}
