//! Patrolling enemies
//!
//! Enemies have no path-finding: they patrol their corridor, turn around at
//! direction sensors, and home in on the player with a one-dimensional
//! proximity heuristic driven by the collision pass.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::bounds::BoundingBox;
use super::tile::Facing;

/// Enemy half extents
const ENEMY_HALF: Vec2 = Vec2::new(16.0, 32.0);
/// Weapon box half extents (held out in front while attacking)
const WEAPON_HALF: Vec2 = Vec2::new(20.0, 8.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub aabb: BoundingBox,
    /// Proximity steer toward the player: -1, 0 or +1, set every frame
    pub player_dir: f32,
    /// Patrol heading while the player is out of range
    pub heading: Facing,
    pub attacking: bool,
    pub alive: bool,
    /// Spawn position, used when the level revives its enemies
    spawn: Vec2,
}

impl Enemy {
    pub fn new(pos: Vec2) -> Self {
        Self {
            aabb: BoundingBox::new(pos, ENEMY_HALF),
            player_dir: 0.0,
            heading: Facing::Left,
            attacking: false,
            alive: true,
            spawn: pos,
        }
    }

    /// Steering from the proximity pass: ±1 toward the player, 0 = neutral
    pub fn set_player_direction(&mut self, dir: f32) {
        self.player_dir = dir;
    }

    pub fn set_heading(&mut self, heading: Facing) {
        self.heading = heading;
    }

    pub fn hit(&mut self) {
        self.alive = false;
        self.attacking = false;
    }

    pub fn revive(&mut self) {
        self.alive = true;
        self.aabb.pos = self.spawn;
        self.player_dir = 0.0;
        self.attacking = false;
    }

    /// Advance one timestep. Chasing overrides patrolling; patrol speed is
    /// half chase speed.
    pub fn update(&mut self, dt: f32) {
        if !self.alive {
            return;
        }

        let vx = if self.player_dir != 0.0 {
            self.player_dir * ENEMY_SPEED
        } else {
            match self.heading {
                Facing::Left => -ENEMY_SPEED * 0.5,
                Facing::Right => ENEMY_SPEED * 0.5,
            }
        };
        self.aabb.pos.x += vx * dt;
        self.aabb.pos.x = self.aabb.pos.x.clamp(0.0, WORLD_WIDTH - self.aabb.width());
    }

    /// Weapon box held out on the side the enemy is moving toward
    pub fn weapon(&self) -> BoundingBox {
        let facing_right = if self.player_dir != 0.0 {
            self.player_dir > 0.0
        } else {
            self.heading == Facing::Right
        };
        let center = self.aabb.center();
        let dx = if facing_right {
            self.aabb.half.x + WEAPON_HALF.x
        } else {
            -(self.aabb.half.x + WEAPON_HALF.x)
        };
        let mut weapon = BoundingBox::new(Vec2::ZERO, WEAPON_HALF);
        weapon.set_center(Vec2::new(center.x + dx, center.y));
        weapon
    }

    /// Animation key for the render port
    pub fn animation_key(&self) -> &'static str {
        if !self.alive {
            "enemyDead"
        } else if self.attacking {
            "enemyAttack"
        } else if self.player_dir < 0.0 {
            "enemyMoveLeft"
        } else if self.player_dir > 0.0 {
            "enemyMoveRight"
        } else {
            match self.heading {
                Facing::Left => "enemyMoveLeft",
                Facing::Right => "enemyMoveRight",
            }
        }
    }
}
