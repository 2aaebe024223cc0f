//! Marching-squares sampling grid.
//!
//! Every grid cell contributes a control node (its corner sample) plus two
//! half-step midpoint nodes; adjacent squares share nodes through the arena,
//! which is what lets the triangulator deduplicate vertices.

use glam::Vec3;

use crate::dungeon::{Coord, TileGrid};

/// Index into the node arena.
pub type NodeId = usize;

/// A geometry point with a lazily assigned vertex index.
///
/// `vertex` is None until the triangulator first emits this node into the
/// vertex buffer; afterwards every square touching the node reuses the index.
#[derive(Debug, Clone, Copy)]
pub struct Node {
    pub position: Vec3,
    pub vertex: Option<u32>,
}

impl Node {
    fn new(position: Vec3) -> Self {
        Self {
            position,
            vertex: None,
        }
    }
}

/// One cell of the marching-squares grid: four corner nodes, four edge
/// midpoints, and the 4-bit corner-occupancy configuration.
///
/// Configuration bits: top-left 8, top-right 4, bottom-right 2,
/// bottom-left 1. A corner is set when its tile is open (not Wall).
#[derive(Debug, Clone, Copy)]
pub struct Square {
    pub top_left: NodeId,
    pub top_right: NodeId,
    pub bottom_right: NodeId,
    pub bottom_left: NodeId,
    pub centre_top: NodeId,
    pub centre_right: NodeId,
    pub centre_bottom: NodeId,
    pub centre_left: NodeId,
    pub configuration: u8,
}

/// The node arena plus one square per interior cell corner quad.
#[derive(Debug, Clone)]
pub struct SquareGrid {
    pub nodes: Vec<Node>,
    pub squares: Vec<Square>,
}

// Arena slots per grid cell: the control node and its two midpoints.
const CONTROL: usize = 0;
const ABOVE: usize = 1;
const RIGHT: usize = 2;

impl SquareGrid {
    /// Sample a tile grid into squares. The mesh is centered on the world
    /// origin: node (x, y) of a w*h grid sits at
    /// (-w*s/2 + x*s + s/2, 0, -h*s/2 + y*s + s/2).
    pub fn new(grid: &TileGrid, cell_size: f32) -> Self {
        let w = grid.width() as usize;
        let h = grid.height() as usize;
        let half_w = grid.width() as f32 * cell_size / 2.0;
        let half_h = grid.height() as f32 * cell_size / 2.0;

        let slot = |x: usize, y: usize, kind: usize| (y * w + x) * 3 + kind;

        let mut nodes = Vec::with_capacity(w * h * 3);
        for y in 0..h {
            for x in 0..w {
                let pos = Vec3::new(
                    -half_w + x as f32 * cell_size + cell_size / 2.0,
                    0.0,
                    -half_h + y as f32 * cell_size + cell_size / 2.0,
                );
                nodes.push(Node::new(pos));
                nodes.push(Node::new(pos + Vec3::new(0.0, 0.0, cell_size / 2.0)));
                nodes.push(Node::new(pos + Vec3::new(cell_size / 2.0, 0.0, 0.0)));
            }
        }

        let open = |x: usize, y: usize| grid.get(Coord::new(x as i32, y as i32)).is_open();

        let mut squares = Vec::with_capacity((w - 1) * (h - 1));
        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let mut configuration = 0u8;
                if open(x, y + 1) {
                    configuration |= 8;
                }
                if open(x + 1, y + 1) {
                    configuration |= 4;
                }
                if open(x + 1, y) {
                    configuration |= 2;
                }
                if open(x, y) {
                    configuration |= 1;
                }

                squares.push(Square {
                    top_left: slot(x, y + 1, CONTROL),
                    top_right: slot(x + 1, y + 1, CONTROL),
                    bottom_right: slot(x + 1, y, CONTROL),
                    bottom_left: slot(x, y, CONTROL),
                    centre_top: slot(x, y + 1, RIGHT),
                    centre_right: slot(x + 1, y, ABOVE),
                    centre_bottom: slot(x, y, RIGHT),
                    centre_left: slot(x, y, ABOVE),
                    configuration,
                });
            }
        }

        Self { nodes, squares }
    }
}
