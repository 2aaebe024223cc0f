//! Dungeon generation.
//!
//! Carves rooms and corridors into a tile grid: stamp random rectangles,
//! flood-fill the overlap unions into rooms, connect each room to its
//! nearest neighbor, then force-connect anything still unreachable from the
//! main room. Decoration stamps door and wall-prop markers afterward.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use dv_rng::GameRng;

use crate::config::{Config, ConfigError};

use super::corridor::{carve_corridor, corridor_path};
use super::regions::regions_of;
use super::room::{connect_rooms, Room, RoomId};
use super::{Coord, Tile, TileGrid};

/// Generation failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),

    #[error("room graph still disconnected after {attempts} repair passes")]
    ConnectivityRetriesExhausted { attempts: u32 },
}

/// A finished dungeon.
///
/// `grid` carries the wall border and decoration markers and is what the
/// mesher and prop placement consume. Room tile coordinates stay in the
/// unbordered frame; because both frames share the same center, room bounds
/// line up with mesh world space as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dungeon {
    pub grid: TileGrid,
    pub rooms: Vec<Room>,
    /// Border thickness baked into `grid`
    pub border: i32,
    /// Seed that produced this dungeon
    pub seed: u64,
    /// Room the player starts in
    pub spawn_room: RoomId,
    /// Room picked for the initial enemy; None for a single-room dungeon
    pub enemy_room: Option<RoomId>,
}

impl Dungeon {
    /// World-space center of a room, on the floor plane.
    pub fn room_center(&self, room: RoomId, cell_size: f32) -> [f32; 3] {
        let (cx, cy) = self.rooms[room].bounds.center();
        [(cx + 0.5) * cell_size, 0.0, (cy + 0.5) * cell_size]
    }
}

/// Generate a dungeon from a validated configuration.
pub fn generate(config: &Config) -> Result<Dungeon, GenerationError> {
    config.validate()?;

    let mut rng = config.seed.rng();
    let seed = rng.seed();
    let mut grid = TileGrid::new(config.width, config.height);

    stamp_room_rects(&mut grid, config, &mut rng);

    let mut rooms = collect_rooms(&grid);
    debug!("flood fill found {} rooms on seed {seed:#x}", rooms.len());

    if let Some(main) = rooms.first_mut() {
        main.is_main_room = true;
        main.is_accessible_from_main_room = true;
    }

    connect_nearest(&mut grid, &mut rooms, config.hallway_width);
    let attempts = repair_connectivity(
        &mut grid,
        &mut rooms,
        config.hallway_width,
        config.connect_retry_budget,
    )?;
    if attempts > 0 {
        debug!("connectivity repair carved {attempts} extra corridors");
    }

    decorate(&mut grid, &mut rng);

    let spawn_room = rng.rn2(rooms.len() as u32) as usize;
    let enemy_room = pick_enemy_room(&rooms, &mut rng);

    Ok(Dungeon {
        grid: grid.bordered(config.border_size),
        rooms,
        border: config.border_size,
        seed,
        spawn_room,
        enemy_room,
    })
}

/// Draw N random rectangles as Room tiles. Overlaps are allowed; the flood
/// fill afterward resolves them into merged regions.
///
/// Start coordinates are sampled in [1, dim - 1 - size) so a rectangle can
/// never leave the grid or touch its outermost ring.
fn stamp_room_rects(grid: &mut TileGrid, config: &Config, rng: &mut GameRng) {
    let count = rng.range(config.min_room_count, config.max_room_count);
    for _ in 0..count {
        let w = rng.range(config.min_room_size, config.max_room_size);
        let h = rng.range(config.min_room_size, config.max_room_size);
        let x0 = rng.range(1, grid.width() - 1 - w);
        let y0 = rng.range(1, grid.height() - 1 - h);

        for x in x0..x0 + w {
            for y in y0..y0 + h {
                grid.set(Coord::new(x, y), Tile::Room);
            }
        }
    }
}

/// Flood-fill Room regions into Room entities, largest first.
fn collect_rooms(grid: &TileGrid) -> Vec<Room> {
    let mut rooms: Vec<Room> = regions_of(grid, Tile::Room)
        .into_iter()
        .map(|region| Room::from_region(region, grid))
        .collect();
    // Stable sort keeps scan order among equal-sized rooms, so ties stay
    // deterministic
    rooms.sort_by(|a, b| b.size().cmp(&a.size()));
    rooms
}

/// Closest edge-tile pair between two rooms, with its squared distance.
fn closest_edge_pair(a: &Room, b: &Room) -> (i64, Coord, Coord) {
    let mut best = (i64::MAX, Coord::default(), Coord::default());
    for ta in &a.edge_tiles {
        for tb in &b.edge_tiles {
            let d = ta.dist_sq(*tb);
            if d < best.0 {
                best = (d, *ta, *tb);
            }
        }
    }
    best
}

/// Greedy pass: every room with no connections yet gets a corridor to the
/// room whose edge tiles come closest. First-found wins on ties.
fn connect_nearest(grid: &mut TileGrid, rooms: &mut [Room], hallway: i32) {
    for a in 0..rooms.len() {
        if !rooms[a].connections.is_empty() {
            continue;
        }

        let mut best: Option<(i64, Coord, Coord, RoomId)> = None;
        for b in 0..rooms.len() {
            if a == b || rooms[a].is_connected(b) {
                continue;
            }
            let (d, ta, tb) = closest_edge_pair(&rooms[a], &rooms[b]);
            if best.map_or(true, |(bd, ..)| d < bd) {
                best = Some((d, ta, tb, b));
            }
        }

        if let Some((_, ta, tb, b)) = best {
            carve_corridor(grid, &corridor_path(ta, tb), hallway);
            connect_rooms(rooms, a, b);
        }
    }
}

/// Forced pass: while any room is unreachable from the main room, join the
/// globally closest (stranded, reachable) pair. Each pass merges one
/// stranded component, so the retry budget bounds total repair work.
fn repair_connectivity(
    grid: &mut TileGrid,
    rooms: &mut [Room],
    hallway: i32,
    budget: u32,
) -> Result<u32, GenerationError> {
    let mut attempts = 0u32;

    loop {
        let stranded: Vec<RoomId> = (0..rooms.len())
            .filter(|&r| !rooms[r].is_accessible_from_main_room)
            .collect();
        if stranded.is_empty() {
            return Ok(attempts);
        }
        if attempts >= budget {
            warn!("abandoning connectivity repair after {attempts} passes");
            return Err(GenerationError::ConnectivityRetriesExhausted { attempts });
        }

        let mut best: Option<(i64, Coord, Coord, RoomId, RoomId)> = None;
        for &a in &stranded {
            for b in 0..rooms.len() {
                if !rooms[b].is_accessible_from_main_room {
                    continue;
                }
                let (d, ta, tb) = closest_edge_pair(&rooms[a], &rooms[b]);
                if best.map_or(true, |(bd, ..)| d < bd) {
                    best = Some((d, ta, tb, a, b));
                }
            }
        }

        // The main room is always reachable, so a best pair exists whenever
        // anything is stranded
        let Some((_, ta, tb, a, b)) = best else {
            return Err(GenerationError::ConnectivityRetriesExhausted { attempts });
        };
        carve_corridor(grid, &corridor_path(ta, tb), hallway);
        connect_rooms(rooms, a, b);
        attempts += 1;
    }
}

/// Check for a Door in the 4 cardinal neighbors.
fn by_door(grid: &TileGrid, c: Coord) -> bool {
    c.neighbors4().iter().any(|n| grid.get(*n) == Tile::Door)
}

/// Stamp Door markers at room mouths and sparse WallProp markers along room
/// walls. Both are gated by the shared RNG stream, so decoration is as
/// reproducible as the layout itself.
fn decorate(grid: &mut TileGrid, rng: &mut GameRng) {
    // Doors: corridor tiles that touch both a room and a wall sit at the
    // jamb of a room mouth
    let coords: Vec<Coord> = grid.coords().collect();
    for c in &coords {
        if grid.get(*c) != Tile::Corridor {
            continue;
        }
        let touches_room = c.neighbors4().iter().any(|n| grid.get(*n) == Tile::Room);
        let touches_wall = c.neighbors4().iter().any(|n| grid.get(*n).is_wall());
        if touches_room && touches_wall && !by_door(grid, *c) && rng.rn2(4) < 3 {
            grid.set(*c, Tile::Door);
        }
    }

    // Wall props: sparse markers on wall-adjacent room tiles, away from
    // doors
    for c in &coords {
        if grid.get(*c) != Tile::Room {
            continue;
        }
        let touches_wall = c.neighbors4().iter().any(|n| grid.get(*n).is_wall());
        if touches_wall && !by_door(grid, *c) && rng.rn2(12) == 0 {
            grid.set(*c, Tile::WallProp);
        }
    }
}

/// Enemy spawns in a random non-main room, if there is one.
fn pick_enemy_room(rooms: &[Room], rng: &mut GameRng) -> Option<RoomId> {
    let candidates: Vec<RoomId> = (0..rooms.len())
        .filter(|&r| !rooms[r].is_main_room)
        .collect();
    rng.choose(&candidates).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Seed;

    fn test_config() -> Config {
        Config {
            width: 64,
            height: 48,
            seed: Seed::Text("test".into()),
            ..Config::default()
        }
    }

    #[test]
    fn test_generate_connects_all_rooms() {
        let dungeon = generate(&test_config()).unwrap();
        assert!(!dungeon.rooms.is_empty());
        assert!(dungeon.rooms[0].is_main_room);
        for (i, room) in dungeon.rooms.iter().enumerate() {
            assert!(
                room.is_accessible_from_main_room,
                "room {i} unreachable from main room"
            );
        }
    }

    #[test]
    fn test_exactly_one_main_room() {
        let dungeon = generate(&test_config()).unwrap();
        let mains = dungeon.rooms.iter().filter(|r| r.is_main_room).count();
        assert_eq!(mains, 1);
    }

    #[test]
    fn test_main_room_is_largest() {
        let dungeon = generate(&test_config()).unwrap();
        let main_size = dungeon.rooms[0].size();
        for room in &dungeon.rooms {
            assert!(room.size() <= main_size);
        }
    }

    #[test]
    fn test_same_seed_same_grid() {
        let config = test_config();
        let a = generate(&config).unwrap();
        let b = generate(&config).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.spawn_room, b.spawn_room);
        assert_eq!(a.enemy_room, b.enemy_room);
    }

    #[test]
    fn test_border_is_wall() {
        let config = test_config();
        let dungeon = generate(&config).unwrap();
        let grid = &dungeon.grid;
        assert_eq!(grid.width(), config.width + config.border_size * 2);
        for x in 0..grid.width() {
            for b in 0..config.border_size {
                assert!(grid.get(Coord::new(x, b)).is_wall());
                assert!(grid.get(Coord::new(x, grid.height() - 1 - b)).is_wall());
            }
        }
    }

    #[test]
    fn test_single_room_dungeon() {
        // 50x50, one 5x5 room, fixed seed: one region, no corridors
        let config = Config {
            width: 50,
            height: 50,
            min_room_size: 5,
            max_room_size: 5,
            min_room_count: 1,
            max_room_count: 1,
            seed: Seed::Text("test".into()),
            ..Config::default()
        };
        let dungeon = generate(&config).unwrap();

        assert_eq!(dungeon.rooms.len(), 1);
        let room = &dungeon.rooms[0];
        assert!(room.is_main_room);
        assert!(room.is_accessible_from_main_room);
        assert_eq!(room.size(), 25);
        assert_eq!(room.bounds.width(), 5.0);
        assert_eq!(room.bounds.height(), 5.0);
        assert_eq!(dungeon.grid.count(Tile::Corridor), 0);
        assert_eq!(dungeon.spawn_room, 0);
        assert!(dungeon.enemy_room.is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = Config {
            min_room_count: 0,
            ..test_config()
        };
        assert!(matches!(
            generate(&config),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_enemy_room_is_not_main() {
        let dungeon = generate(&test_config()).unwrap();
        if let Some(enemy) = dungeon.enemy_room {
            assert!(!dungeon.rooms[enemy].is_main_room);
        }
    }

    #[test]
    fn test_room_center_on_floor_plane() {
        let dungeon = generate(&test_config()).unwrap();
        let center = dungeon.room_center(dungeon.spawn_room, 2.0);
        assert_eq!(center[1], 0.0);
    }
}
