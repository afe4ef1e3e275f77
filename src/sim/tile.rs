//! Tile variants, hazard state machines and the tile grid
//!
//! A level is a dense grid of `Option<Tile>`; `None` means passable air.
//! Tiles are one tagged type so the collision pass dispatches with a single
//! match instead of chained downcasts. Hazards (falling blocks, spears) carry
//! their own small state machines and only per-tile flags ever mutate after
//! generation - the grid itself is rebuilt wholesale on level regeneration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::bounds::BoundingBox;

/// Trigger semantics of a sensor tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SensorTag {
    /// Wake the 3x3 neighborhood of hazard tiles around the sensor
    Activate,
    /// Turn an overlapping enemy's patrol heading left/right
    EnemyLeft,
    EnemyRight,
}

/// Horizontal facing of a spear block (the side its spears extend toward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

/// Lifecycle of a falling block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FallPhase {
    /// Dormant, waiting for a sensor to wake it
    #[default]
    Idle,
    /// Woken by a sensor, waiting for the player to pass underneath
    Triggered,
    /// In motion, moving down at a fixed speed
    Falling,
    /// Fell past its break distance; permanently gone until level reset
    Broken,
}

/// State carried by a falling-block tile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingBlock {
    pub phase: FallPhase,
    /// Downward speed, nonzero only while `Falling`
    pub velocity: f32,
    /// Resting y position, restored on reset
    pub origin_y: f32,
    /// Set while the block is bearing down on the player
    pub player_colliding: bool,
}

impl FallingBlock {
    pub fn new(origin_y: f32) -> Self {
        Self {
            phase: FallPhase::Idle,
            velocity: 0.0,
            origin_y,
            player_colliding: false,
        }
    }
}

/// Tile payload, one variant per behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TileKind {
    /// Plain geometry. damage 0 = wall, >0 = hazard (spikes),
    /// DAMAGE_EXIT / DAMAGE_FINISH = level-transition markers.
    Block { damage: i32 },
    /// Non-solid trigger
    Sensor { tag: SensorTag },
    /// Wall-mounted spear trap, always live
    Spear { facing: Facing },
    /// Ceiling block that drops once woken
    Falling(FallingBlock),
}

/// One cell of level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    pub aabb: BoundingBox,
    /// Hazard activation flag, toggled by sensors
    pub active: bool,
    pub col: usize,
    pub row: usize,
    pub kind: TileKind,
}

impl Tile {
    fn at(col: usize, row: usize, kind: TileKind) -> Self {
        let half = TILE_SIZE / 2.0;
        let pos = Vec2::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE);
        Self {
            aabb: BoundingBox::new(pos, Vec2::splat(half)),
            active: false,
            col,
            row,
            kind,
        }
    }

    pub fn block(col: usize, row: usize, damage: i32) -> Self {
        Self::at(col, row, TileKind::Block { damage })
    }

    pub fn sensor(col: usize, row: usize, tag: SensorTag) -> Self {
        Self::at(col, row, TileKind::Sensor { tag })
    }

    pub fn spear(col: usize, row: usize, facing: Facing) -> Self {
        Self::at(col, row, TileKind::Spear { facing })
    }

    pub fn falling(col: usize, row: usize) -> Self {
        let origin_y = row as f32 * TILE_SIZE;
        Self::at(col, row, TileKind::Falling(FallingBlock::new(origin_y)))
    }

    /// Whether the tile blocks movement and participates in contact
    /// classification. Sensors and transition markers are walk-through;
    /// damaging spikes are contact hazards rather than geometry.
    pub fn is_solid(&self) -> bool {
        match &self.kind {
            TileKind::Block { damage } => *damage == 0,
            TileKind::Sensor { .. } => false,
            TileKind::Spear { .. } => true,
            TileKind::Falling(fb) => fb.phase != FallPhase::Broken,
        }
    }

    /// Advance the tile's internal state machine by one timestep.
    /// Only falling blocks have per-tick motion.
    pub fn update(&mut self, dt: f32) {
        if let TileKind::Falling(fb) = &mut self.kind {
            // Activation gate: without the active flag the block never
            // carries velocity. A deactivated falling block freezes in
            // place; a deactivated triggered one goes back to sleep.
            if !self.active && fb.phase != FallPhase::Broken {
                if fb.phase == FallPhase::Triggered {
                    fb.phase = FallPhase::Idle;
                }
                fb.velocity = 0.0;
                fb.player_colliding = false;
                return;
            }

            match fb.phase {
                FallPhase::Idle => {
                    if self.active {
                        fb.phase = FallPhase::Triggered;
                    }
                }
                FallPhase::Falling => {
                    self.aabb.pos.y += fb.velocity * dt;
                    if self.aabb.pos.y - fb.origin_y >= FALLING_BLOCK_BREAK_DISTANCE
                        || self.aabb.pos.y >= WORLD_HEIGHT
                    {
                        fb.phase = FallPhase::Broken;
                        fb.velocity = 0.0;
                        fb.player_colliding = false;
                    }
                }
                FallPhase::Triggered | FallPhase::Broken => {}
            }
        }
    }

    /// Put a woken falling block into motion (proximity or direct overlap)
    pub fn drop_falling_block(&mut self) {
        if !self.active {
            return;
        }
        if let TileKind::Falling(fb) = &mut self.kind {
            if matches!(fb.phase, FallPhase::Triggered | FallPhase::Idle) {
                fb.phase = FallPhase::Falling;
                fb.velocity = FALLING_BLOCK_SPEED;
            }
            if fb.phase == FallPhase::Falling {
                fb.player_colliding = true;
            }
        }
    }

    /// Restore a falling block to its dormant state at its origin
    pub fn reset_falling_block(&mut self) {
        if let TileKind::Falling(fb) = &mut self.kind {
            fb.phase = FallPhase::Idle;
            fb.velocity = 0.0;
            fb.player_colliding = false;
            self.aabb.pos.y = fb.origin_y;
            self.active = false;
        }
    }
}

/// Dense tile grid with bounds-checked access.
///
/// All neighbor lookups go through here so boundary logic lives in exactly
/// one place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileGrid {
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    pub fn new() -> Self {
        Self {
            cells: vec![None; TILES_X * TILES_Y],
        }
    }

    #[inline]
    fn index(col: usize, row: usize) -> Option<usize> {
        if col < TILES_X && row < TILES_Y {
            Some(row * TILES_X + col)
        } else {
            None
        }
    }

    /// Out-of-bounds and empty cells both read as `None` - "no tile there"
    /// is a valid answer everywhere in the simulation.
    pub fn get(&self, col: usize, row: usize) -> Option<&Tile> {
        Self::index(col, row).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, col: usize, row: usize) -> Option<&mut Tile> {
        Self::index(col, row).and_then(|i| self.cells[i].as_mut())
    }

    /// Place a tile, overwriting whatever the cell held. Silently ignores
    /// out-of-bounds coordinates; generation validates its room coordinates
    /// before carving.
    pub fn set(&mut self, tile: Tile) {
        if let Some(i) = Self::index(tile.col, tile.row) {
            self.cells[i] = Some(tile);
        }
    }

    pub fn clear(&mut self, col: usize, row: usize) {
        if let Some(i) = Self::index(col, row) {
            self.cells[i] = None;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.cells.iter().filter_map(|c| c.as_ref())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tile> {
        self.cells.iter_mut().filter_map(|c| c.as_mut())
    }

    /// Wake the eight grid neighbors of a sensor. Neighbors outside the grid
    /// are skipped by the bounds-checked accessor.
    pub fn activate_neighbors(&mut self, col: usize, row: usize) {
        for dc in -1i32..=1 {
            for dr in -1i32..=1 {
                if dc == 0 && dr == 0 {
                    continue;
                }
                let (nc, nr) = (col as i32 + dc, row as i32 + dr);
                if nc < 0 || nr < 0 {
                    continue;
                }
                if let Some(tile) = self.get_mut(nc as usize, nr as usize) {
                    tile.active = true;
                }
            }
        }
    }

    /// Death-reset pass over falling blocks: broken blocks are restored to
    /// their origin, live ones merely lose their activation.
    pub fn reset_falling_blocks(&mut self) {
        for tile in self.iter_mut() {
            if let TileKind::Falling(fb) = &tile.kind {
                if fb.phase == FallPhase::Broken {
                    tile.reset_falling_block();
                } else {
                    tile.active = false;
                }
            }
        }
    }
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_bounds_are_guarded() {
        let mut grid = TileGrid::new();
        grid.set(Tile::block(0, 0, 0));
        assert!(grid.get(0, 0).is_some());
        assert!(grid.get(TILES_X, 0).is_none());
        assert!(grid.get(0, TILES_Y).is_none());
        assert!(grid.get(usize::MAX, usize::MAX).is_none());
    }

    #[test]
    fn test_sensor_activates_neighborhood() {
        let mut grid = TileGrid::new();
        for col in 9..=11 {
            for row in 9..=11 {
                grid.set(Tile::block(col, row, 0));
            }
        }
        grid.activate_neighbors(10, 10);

        // All eight neighbors woken, the center cell untouched
        assert!(!grid.get(10, 10).unwrap().active);
        let woken = grid.iter().filter(|t| t.active).count();
        assert_eq!(woken, 8);
    }

    #[test]
    fn test_sensor_activation_at_grid_corner() {
        let mut grid = TileGrid::new();
        grid.set(Tile::block(0, 1, 0));
        grid.set(Tile::block(1, 0, 0));
        grid.set(Tile::block(1, 1, 0));
        // Sensor in the corner: five of its eight neighbors are off-grid
        grid.activate_neighbors(0, 0);
        assert_eq!(grid.iter().filter(|t| t.active).count(), 3);
    }

    #[test]
    fn test_falling_block_inert_until_active() {
        let mut tile = Tile::falling(5, 5);
        let y0 = tile.aabb.pos.y;
        for _ in 0..120 {
            tile.update(1.0 / 60.0);
        }
        if let TileKind::Falling(fb) = &tile.kind {
            assert_eq!(fb.phase, FallPhase::Idle);
            assert_eq!(fb.velocity, 0.0);
        } else {
            unreachable!();
        }
        assert_eq!(tile.aabb.pos.y, y0);

        // drop_falling_block is a no-op while dormant
        tile.drop_falling_block();
        if let TileKind::Falling(fb) = &tile.kind {
            assert_eq!(fb.velocity, 0.0);
        }
    }

    #[test]
    fn test_falling_block_drops_and_breaks() {
        let mut tile = Tile::falling(5, 5);
        tile.active = true;
        tile.update(SIM_DT); // Idle -> Triggered
        tile.drop_falling_block();
        if let TileKind::Falling(fb) = &tile.kind {
            assert_eq!(fb.phase, FallPhase::Falling);
            assert_eq!(fb.velocity, FALLING_BLOCK_SPEED);
            assert!(fb.player_colliding);
        }

        // Let it fall past the break distance
        for _ in 0..600 {
            tile.update(SIM_DT);
        }
        if let TileKind::Falling(fb) = &tile.kind {
            assert_eq!(fb.phase, FallPhase::Broken);
            assert_eq!(fb.velocity, 0.0);
        }
        assert!(!tile.is_solid());
    }

    #[test]
    fn test_reset_restores_broken_and_deactivates_live() {
        let mut grid = TileGrid::new();
        let mut broken = Tile::falling(3, 3);
        broken.active = true;
        broken.update(SIM_DT);
        broken.drop_falling_block();
        for _ in 0..600 {
            broken.update(SIM_DT);
        }
        grid.set(broken);

        let mut live = Tile::falling(7, 3);
        live.active = true;
        live.update(SIM_DT);
        grid.set(live);

        grid.reset_falling_blocks();

        let restored = grid.get(3, 3).unwrap();
        if let TileKind::Falling(fb) = &restored.kind {
            assert_eq!(fb.phase, FallPhase::Idle);
            assert_eq!(restored.aabb.pos.y, fb.origin_y);
        }
        let deactivated = grid.get(7, 3).unwrap();
        assert!(!deactivated.active);
    }
}
