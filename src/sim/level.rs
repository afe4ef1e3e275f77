//! Procedural level layout
//!
//! Two stages build every floor:
//! 1. A constrained random walk over a GRID_SIZE x GRID_SIZE room grid,
//!    connecting a start column in row 0 to a terminal room in the last row.
//! 2. A deterministic per-archetype fill that carves corridors and shafts
//!    into otherwise solid rooms, then a decoration pass that seeds hazards,
//!    the exit door and enemies along the carved path.
//!
//! Everything is driven by an explicit `Pcg32` handle, so the same seed
//! always produces the same floor.

use std::fmt;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::enemy::Enemy;
use super::tile::{Facing, SensorTag, Tile, TileGrid};

/// Room archetype, determining which interior cells stay passable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomType {
    /// Unvisited room, fully solid
    #[default]
    None,
    /// Horizontal corridor
    Standard,
    /// Corridor plus an opening to the room below
    Down,
    /// Corridor plus an opening to the room above
    Up,
    /// Openings in all four directions
    Cross,
}

/// Contract violation in level construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// Room coordinates handed to the filler lie outside the room grid
    RoomOutOfBounds { x: usize, y: usize, bound: usize },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::RoomOutOfBounds { x, y, bound } => write!(
                f,
                "room coordinates ({x}, {y}) outside grid bound {bound}"
            ),
        }
    }
}

impl std::error::Error for LevelError {}

/// Room grid indexed `[x][y]` (column, row), row 0 at the top
pub type RoomGrid = [[RoomType; GRID_SIZE]; GRID_SIZE];

/// Output of the room walk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPlan {
    pub rooms: RoomGrid,
    /// Column of the start room in row 0
    pub start_col: usize,
    /// Terminal room in the last row
    pub terminal: (usize, usize),
}

/// A fully built floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub plan: RoomPlan,
    pub tiles: TileGrid,
    pub enemies: Vec<Enemy>,
    /// Player spawn (top-left corner of the player box)
    pub start_pos: Vec2,
}

/// Random-walk room generation.
///
/// The walk keeps a horizontal bias that only flips when it descends; a
/// direction draw disagreeing with the bias is reverted, so rooms in one row
/// always extend away from the drop that entered it. One in five draws (or
/// hitting a grid wall) forces a descent. Descents mark the current cell
/// `Down` and the cell below `Up`; the final descent's room becomes the
/// `Standard` terminal. Termination is structural: the row index never
/// decreases and is bounded by the grid size.
pub fn generate_rooms(rng: &mut Pcg32) -> RoomPlan {
    let start_col = rng.random_range(0..GRID_SIZE);
    walk_rooms(rng, start_col)
}

/// The walk itself, with an explicit start column (exposed for tests)
pub fn walk_rooms(rng: &mut Pcg32, start_col: usize) -> RoomPlan {
    let mut rooms = RoomGrid::default();
    let mut x = start_col as i32;
    let mut y = 0usize;
    let mut left = false;

    // The start room is part of the path even if the walk immediately
    // leaves it.
    rooms[start_col][0] = RoomType::Standard;

    let terminal;
    loop {
        let mut down = false;

        // Direction draw: 1-2 left, 3-4 right, 5 descend. A horizontal
        // draw that disagrees with the stored bias is reverted.
        let held = left;
        match rng.random_range(1..=5) {
            1 | 2 => left = true,
            3 | 4 => left = false,
            _ => down = true,
        }
        if !down && held != left {
            left = held;
        }

        // The walk always steps horizontally; running off the grid steps
        // back in bounds and forces a descent instead of wrapping.
        x += if left { -1 } else { 1 };
        if x >= GRID_SIZE as i32 {
            x -= 1;
            down = true;
        } else if x < 0 {
            x += 1;
            down = true;
        }
        let xu = x as usize;

        if down {
            rooms[xu][y] = RoomType::Down;
            y += 1;
            left = !left;
            if y >= GRID_SIZE {
                rooms[xu][y - 1] = RoomType::Standard;
                terminal = (xu, y - 1);
                break;
            }
            rooms[xu][y] = RoomType::Up;
        } else {
            rooms[xu][y] = RoomType::Standard;
        }
    }

    RoomPlan {
        rooms,
        start_col,
        terminal,
    }
}

/// Carve one room's tiles into the grid.
///
/// Fill predicates over local offsets (corridor row j = ROOM_HEIGHT/2,
/// shaft column i = ROOM_WIDTH/2):
/// - Standard: everything except the corridor row
/// - Down: solid above the corridor; below it, everything except the shaft
/// - Up: solid below the corridor; above it, everything except the shaft
/// - Cross: everything except corridor row and shaft column
/// - None: fully solid
pub fn carve_room(
    tiles: &mut TileGrid,
    room_x: usize,
    room_y: usize,
    ty: RoomType,
) -> Result<(), LevelError> {
    if room_x >= GRID_SIZE || room_y >= GRID_SIZE {
        return Err(LevelError::RoomOutOfBounds {
            x: room_x,
            y: room_y,
            bound: GRID_SIZE,
        });
    }

    let mid_i = ROOM_WIDTH / 2;
    let mid_j = ROOM_HEIGHT / 2;

    for i in 0..ROOM_WIDTH {
        for j in 0..ROOM_HEIGHT {
            let filled = match ty {
                RoomType::Standard => j != mid_j,
                RoomType::Down => j < mid_j || (j != mid_j && i != mid_i),
                RoomType::Up => j > mid_j || (j != mid_j && i != mid_i),
                RoomType::Cross => j != mid_j && i != mid_i,
                RoomType::None => true,
            };
            if filled {
                let col = room_x * ROOM_WIDTH + i;
                let row = room_y * ROOM_HEIGHT + j;
                tiles.set(Tile::block(col, row, 0));
            }
        }
    }
    Ok(())
}

/// Build the whole floor: carve every room, then decorate the path.
pub fn build_level(rng: &mut Pcg32, final_level: bool) -> Result<Level, LevelError> {
    let plan = generate_rooms(rng);
    let mut tiles = TileGrid::new();

    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            carve_room(&mut tiles, x, y, plan.rooms[x][y])?;
        }
    }

    let mut enemies = Vec::new();
    decorate(&mut tiles, &plan, rng, final_level, &mut enemies);

    let start_pos = start_position(plan.start_col);

    log::debug!(
        "built level: start col {}, terminal {:?}, {} enemies",
        plan.start_col,
        plan.terminal,
        enemies.len()
    );

    Ok(Level {
        plan,
        tiles,
        enemies,
        start_pos,
    })
}

/// Player spawn inside the start room's corridor, feet on the corridor floor
pub fn start_position(start_col: usize) -> Vec2 {
    let corridor_floor_row = ROOM_HEIGHT / 2 + 1;
    let x = start_col as f32 * ROOM_WIDTH as f32 * TILE_SIZE + TILE_SIZE;
    let y = corridor_floor_row as f32 * TILE_SIZE - 2.0 * PLAYER_HALF_HEIGHT;
    Vec2::new(x, y)
}

/// Hazard, exit and enemy placement along the carved path.
///
/// The terminal room gets the exit door (or the amulet on the final floor).
/// Other visited Standard rooms may each roll spikes, a sensed falling
/// block, a spear trap or a patrolling enemy with turnaround sensors.
fn decorate(
    tiles: &mut TileGrid,
    plan: &RoomPlan,
    rng: &mut Pcg32,
    final_level: bool,
    enemies: &mut Vec<Enemy>,
) {
    let mid_j = ROOM_HEIGHT / 2;

    for x in 0..GRID_SIZE {
        for y in 0..GRID_SIZE {
            if plan.rooms[x][y] == RoomType::None {
                continue;
            }

            let base_col = x * ROOM_WIDTH;
            let corridor_row = y * ROOM_HEIGHT + mid_j;

            if (x, y) == plan.terminal {
                let damage = if final_level { DAMAGE_FINISH } else { DAMAGE_EXIT };
                tiles.set(Tile::block(base_col + ROOM_WIDTH / 2, corridor_row, damage));
                continue;
            }

            // The start room stays safe
            if y == 0 && x == plan.start_col {
                continue;
            }
            if plan.rooms[x][y] != RoomType::Standard {
                continue;
            }

            // Spikes on the corridor floor
            if rng.random_range(0..3) == 0 {
                let col = base_col + rng.random_range(2..ROOM_WIDTH - 2);
                if tiles.get(col, corridor_row).is_none() {
                    tiles.set(Tile::block(col, corridor_row, 1));
                }
            }

            // Falling block in the ceiling, woken by a sensor one cell ahead
            if rng.random_range(0..4) == 0 {
                let col = base_col + rng.random_range(2..ROOM_WIDTH - 2);
                tiles.set(Tile::falling(col, corridor_row - 1));
                if tiles.get(col - 1, corridor_row).is_none() {
                    tiles.set(Tile::sensor(col - 1, corridor_row, SensorTag::Activate));
                }
            }

            // Spear trap in the corridor
            if rng.random_range(0..4) == 0 {
                let col = base_col + rng.random_range(2..ROOM_WIDTH - 2);
                if tiles.get(col, corridor_row).is_none() {
                    let facing = if rng.random_bool(0.5) {
                        Facing::Left
                    } else {
                        Facing::Right
                    };
                    tiles.set(Tile::spear(col, corridor_row, facing));
                }
            }

            // Patrolling enemy with turnaround sensors at the corridor ends
            if rng.random_range(0..3) == 0 {
                let col = base_col + rng.random_range(3..ROOM_WIDTH - 3);
                let pos = Vec2::new(
                    col as f32 * TILE_SIZE,
                    (corridor_row + 1) as f32 * TILE_SIZE - 2.0 * PLAYER_HALF_HEIGHT,
                );
                enemies.push(Enemy::new(pos));

                if tiles.get(base_col + 1, corridor_row).is_none() {
                    tiles.set(Tile::sensor(base_col + 1, corridor_row, SensorTag::EnemyRight));
                }
                if tiles.get(base_col + ROOM_WIDTH - 2, corridor_row).is_none() {
                    tiles.set(Tile::sensor(
                        base_col + ROOM_WIDTH - 2,
                        corridor_row,
                        SensorTag::EnemyLeft,
                    ));
                }
            }
        }
    }
}
