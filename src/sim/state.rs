//! Session state and level lifecycle
//!
//! `LevelState` exclusively owns the player, the enemy collection and the
//! tile grid. Level regeneration swaps the grid and enemies wholesale and is
//! never interleaved with a tick. All determinism flows from the run seed:
//! each floor derives its own `Pcg32` from (seed, level number), so a
//! regenerated floor is reproducible without replaying the ones before it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::enemy::Enemy;
use super::level::{self, LevelError, RoomPlan};
use super::player::Player;
use super::tile::TileGrid;

/// Sound/render trigger events produced during a tick, drained by the
/// audio/render layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump,
    Land,
    Attack,
    PlayerHit,
    EnemyKilled,
    LevelExit,
    GameFinished,
}

/// Level-transition signal emitted every frame for the outer state stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelSignal {
    #[default]
    Continue,
    EndOfLevel,
    Finish,
}

/// Complete session state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Current floor, 1-based
    pub level_number: u32,
    pub plan: RoomPlan,
    pub tiles: TileGrid,
    pub enemies: Vec<Enemy>,
    pub player: Player,
    /// Player spawn for this floor
    pub start_pos: Vec2,
    /// Where the player has died on this floor (for the overlay renderer)
    pub death_points: Vec<Vec2>,
    /// Kill count at the start of this floor; deaths roll back to it
    kills_checkpoint: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Seconds spent alive on this floor
    pub time_taken: f32,
    /// Seconds accumulated over completed floors
    pub total_time: f32,
    /// Events produced by the latest tick
    pub events: Vec<GameEvent>,
}

impl LevelState {
    /// Start a new run on floor 1
    pub fn new(seed: u64) -> Result<Self, LevelError> {
        let mut rng = Self::rng_for(seed, 1);
        let level = level::build_level(&mut rng, false)?;
        let player = Player::new(level.start_pos);

        log::info!("new run, seed {seed}");

        Ok(Self {
            seed,
            level_number: 1,
            plan: level.plan,
            tiles: level.tiles,
            enemies: level.enemies,
            player,
            start_pos: level.start_pos,
            death_points: Vec::new(),
            kills_checkpoint: 0,
            time_ticks: 0,
            time_taken: 0.0,
            total_time: 0.0,
            events: Vec::new(),
        })
    }

    /// Per-floor RNG handle derived from the run seed
    fn rng_for(seed: u64, level_number: u32) -> Pcg32 {
        let mixed = (level_number as u64)
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .wrapping_add(seed);
        Pcg32::seed_from_u64(mixed)
    }

    /// Whether the current floor carries the finish marker instead of an
    /// exit door
    pub fn is_final_level(&self) -> bool {
        self.level_number >= FINAL_LEVEL
    }

    /// Move to the next floor: atomic wholesale replacement of the room
    /// plan, tile grid and enemy collection.
    pub fn advance_level(&mut self) -> Result<(), LevelError> {
        self.total_time += self.time_taken;
        self.time_taken = 0.0;
        self.level_number += 1;

        let mut rng = Self::rng_for(self.seed, self.level_number);
        let level = level::build_level(&mut rng, self.is_final_level())?;

        self.plan = level.plan;
        self.tiles = level.tiles;
        self.enemies = level.enemies;
        self.start_pos = level.start_pos;
        self.death_points.clear();
        self.kills_checkpoint = self.player.enemies_killed;
        self.player.respawn(self.start_pos);

        log::info!("floor {}", self.level_number);
        Ok(())
    }

    /// Respawn after death: record the death point, roll kills back to the
    /// floor checkpoint, revive enemies and reset the hazard tiles.
    pub fn reset_player(&mut self) {
        self.player.deaths += 1;
        self.death_points.push(self.player.aabb.center());
        self.player.enemies_killed = self.kills_checkpoint;
        self.player.respawn(self.start_pos);

        for enemy in &mut self.enemies {
            if !enemy.alive {
                enemy.revive();
            }
        }
        self.tiles.reset_falling_blocks();

        log::debug!("respawn, deaths = {}", self.player.deaths);
    }

    /// Drain the events produced by the latest tick
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
