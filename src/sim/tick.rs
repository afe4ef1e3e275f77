//! Per-frame simulation step
//!
//! One `tick` call advances everything in a fixed order: hazard tile state
//! machines and proximity triggers, the collision & trigger pass over the
//! tile grid, player physics, enemy proximity steering and weapon
//! resolution, then the level-transition signal. Single-threaded, no
//! suspension points; the grid, player and enemies are only ever touched
//! here and in the explicit lifecycle calls on `LevelState`.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::bounds::Contact;
use super::state::{GameEvent, LevelSignal, LevelState};
use super::tile::{Facing, SensorTag, TileKind};

/// Input snapshot for a single tick.
///
/// Captured once per frame by the platform layer; the core never polls a
/// device. `*_pressed` fields are edge-triggered ("was pressed this frame"),
/// the rest are held state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub jump_pressed: bool,
    pub attack_pressed: bool,
    /// Respawn request while dead
    pub respawn_pressed: bool,
    pub pointer_down: bool,
    /// Pointer position in logical screen coordinates
    pub pointer_pos: Option<glam::Vec2>,
}

/// Player contact sides accumulated over all solid tile overlaps this frame
#[derive(Debug, Clone, Copy, Default)]
struct ContactSet {
    top: bool,
    bottom: bool,
    left: bool,
    right: bool,
}

/// Advance the session by one fixed timestep. Returns the level-transition
/// signal for the outer state controller.
pub fn tick(state: &mut LevelState, input: &TickInput, dt: f32) -> LevelSignal {
    state.events.clear();

    // A dead player freezes the floor until a respawn is requested
    if !state.player.alive {
        if input.respawn_pressed {
            state.reset_player();
        }
        return LevelSignal::Continue;
    }

    state.time_ticks += 1;
    state.time_taken += dt;

    // --- Contact classification ------------------------------------------
    // Scan solid geometry overlapping the player before anything moves.
    // The dominant contact (deepest overlap) drives the physics transition;
    // the side set feeds the spear and falling-block rules.
    let player_box = state.player.aabb;
    let mut contacts = ContactSet::default();
    let mut dominant = Contact::None;
    let mut dominant_depth = 0.0f32;

    for tile in state.tiles.iter() {
        if !tile.is_solid() || !tile.aabb.overlaps(&player_box) {
            continue;
        }
        let contact = player_box.classify(&tile.aabb);
        match contact {
            Contact::Top => contacts.top = true,
            Contact::Bottom => contacts.bottom = true,
            Contact::Left => contacts.left = true,
            Contact::Right => contacts.right = true,
            Contact::None => {}
        }
        let depth = player_box.overlap_depth(&tile.aabb);
        if depth > dominant_depth {
            dominant_depth = depth;
            dominant = contact;
        }
    }

    // --- Collision & trigger pass ----------------------------------------
    // Single scan of the full grid: tile state machines, falling-block
    // proximity triggers, player dispatch by tile kind, enemy sensors.
    // Sensor neighborhood activation is deferred to after the scan because
    // it touches cells other than the current one.
    let mut to_activate: Vec<(usize, usize)> = Vec::new();
    let mut player_hit = false;
    let mut signal = LevelSignal::Continue;
    let player_center = player_box.center();

    for tile in state.tiles.iter_mut() {
        tile.update(dt);

        // A woken falling block drops once the player is underneath it
        // within one tile-width
        if tile.active && matches!(tile.kind, TileKind::Falling(_)) {
            let below = player_box.pos.y > tile.aabb.max().y;
            let within = (player_box.pos.x - tile.aabb.pos.x).abs() < TILE_SIZE;
            if below && within {
                tile.drop_falling_block();
            }
        }

        if tile.aabb.overlaps(&player_box) {
            let mut drop_now = false;
            match &tile.kind {
                TileKind::Block { damage } => {
                    if *damage > 0 {
                        player_hit = true;
                    } else if *damage == DAMAGE_EXIT {
                        signal = LevelSignal::EndOfLevel;
                    } else if *damage == DAMAGE_FINISH {
                        signal = LevelSignal::Finish;
                    }
                }
                TileKind::Sensor {
                    tag: SensorTag::Activate,
                } => {
                    to_activate.push((tile.col, tile.row));
                }
                // Enemy-direction sensors ignore the player
                TileKind::Sensor { .. } => {}
                TileKind::Spear { facing } => {
                    let dx = (player_center.x - tile.aabb.center().x).abs();
                    let hit = match facing {
                        Facing::Left => dx < SPEAR_RANGE && contacts.left,
                        Facing::Right => dx > SPEAR_RANGE && contacts.right,
                    };
                    if hit {
                        player_hit = true;
                    }
                }
                TileKind::Falling(_) if tile.active => {
                    drop_now = true;
                    if contacts.bottom {
                        player_hit = true;
                    }
                }
                TileKind::Falling(_) => {}
            }
            if drop_now {
                tile.drop_falling_block();
            }
        }

        // Direction sensors steer overlapping enemies
        if let TileKind::Sensor { tag } = &tile.kind {
            let heading = match tag {
                SensorTag::EnemyLeft => Some(Facing::Left),
                SensorTag::EnemyRight => Some(Facing::Right),
                SensorTag::Activate => None,
            };
            if let Some(heading) = heading {
                for enemy in state.enemies.iter_mut() {
                    if enemy.alive && enemy.aabb.overlaps(&tile.aabb) {
                        enemy.set_heading(heading);
                    }
                }
            }
        }
    }

    for (col, row) in to_activate {
        state.tiles.activate_neighbors(col, row);
    }

    if player_hit {
        state.player.hit();
        state.events.push(GameEvent::PlayerHit);
    }

    // --- Player physics ---------------------------------------------------
    state
        .player
        .update(input, dominant, &mut state.events, dt);

    // --- Enemies ----------------------------------------------------------
    // One-dimensional proximity heuristic: inside sight radius an enemy
    // steers toward the player and attacks at close range, otherwise it
    // patrols.
    let player_center = state.player.aabb.center();
    for enemy in state.enemies.iter_mut() {
        if !enemy.alive {
            continue;
        }
        let delta = player_center - enemy.aabb.center();
        if delta.length_squared() < ENEMY_SIGHT_RADIUS * ENEMY_SIGHT_RADIUS {
            let dir = if delta.x == 0.0 { 0.0 } else { delta.x.signum() };
            enemy.set_player_direction(dir);
            enemy.attacking = delta.x.abs() < ENEMY_ATTACK_RANGE;
        } else {
            enemy.set_player_direction(0.0);
            enemy.attacking = false;
        }
        enemy.update(dt);
    }

    // Weapon overlap, resolved bidirectionally once per enemy
    let player_weapon = state.player.weapon();
    let player_attacking = state.player.attacking() && state.player.alive;
    for enemy in state.enemies.iter_mut() {
        if enemy.alive && enemy.attacking && enemy.weapon().overlaps(&state.player.aabb) {
            if state.player.alive {
                state.player.hit();
                state.events.push(GameEvent::PlayerHit);
            }
        }
        if player_attacking && player_weapon.overlaps(&enemy.aabb) {
            if enemy.alive {
                state.player.enemies_killed += 1;
                state.events.push(GameEvent::EnemyKilled);
            }
            enemy.hit();
        }
    }

    match signal {
        LevelSignal::EndOfLevel => state.events.push(GameEvent::LevelExit),
        LevelSignal::Finish => state.events.push(GameEvent::GameFinished),
        LevelSignal::Continue => {}
    }

    signal
}
