//! Player physics and input response
//!
//! A velocity/position integrator with a two-state ground/air machine.
//! Update order per tick: contact transition, input, gravity, Euler
//! integration, world-bounds clamp. The player is created once per session
//! and only repositioned on respawn.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use super::bounds::{BoundingBox, Contact};
use super::state::GameEvent;
use super::tick::TickInput;
use super::tile::Facing;

/// Weapon box half extents
const WEAPON_HALF: Vec2 = Vec2::new(20.0, 8.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub aabb: BoundingBox,
    pub velocity: Vec2,
    pub on_ground: bool,
    pub facing: Facing,
    pub alive: bool,
    /// Seconds the attack box stays armed; attacking while > 0
    attack_timer: f32,
    /// True while a horizontal key is held, drives the animation key
    moving: bool,
    pub deaths: u32,
    pub enemies_killed: u32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            aabb: BoundingBox::new(pos, Vec2::new(PLAYER_HALF_WIDTH, PLAYER_HALF_HEIGHT)),
            velocity: Vec2::ZERO,
            on_ground: false,
            facing: Facing::Right,
            alive: true,
            attack_timer: 0.0,
            moving: false,
            deaths: 0,
            enemies_killed: 0,
        }
    }

    pub fn attacking(&self) -> bool {
        self.attack_timer > 0.0
    }

    pub fn hit(&mut self) {
        self.alive = false;
    }

    /// Reposition for a respawn or level start. Counters are owned by the
    /// session controller and adjusted there.
    pub fn respawn(&mut self, pos: Vec2) {
        self.aabb.pos = pos;
        self.velocity = Vec2::ZERO;
        self.on_ground = false;
        self.alive = true;
        self.attack_timer = 0.0;
        self.moving = false;
    }

    /// Attack box held out on the facing side, slightly below center
    pub fn weapon(&self) -> BoundingBox {
        let center = self.aabb.center();
        let dx = match self.facing {
            Facing::Right => self.aabb.half.x + WEAPON_HALF.x,
            Facing::Left => -(self.aabb.half.x + WEAPON_HALF.x),
        };
        let mut weapon = BoundingBox::new(Vec2::ZERO, WEAPON_HALF);
        weapon.set_center(Vec2::new(center.x + dx, center.y + 4.0));
        weapon
    }

    /// Animation key for the render port
    pub fn animation_key(&self) -> &'static str {
        if !self.alive {
            "dead"
        } else if self.attacking() {
            match self.facing {
                Facing::Left => "attackLeft",
                Facing::Right => "attackRight",
            }
        } else if self.moving {
            match self.facing {
                Facing::Left => "moveLeft",
                Facing::Right => "moveRight",
            }
        } else {
            "idle"
        }
    }

    /// One physics step. `contact` is this frame's dominant solid contact
    /// from the collision pass.
    pub fn update(
        &mut self,
        input: &TickInput,
        contact: Contact,
        events: &mut Vec<GameEvent>,
        dt: f32,
    ) {
        let was_grounded = self.on_ground;

        // 1. Ground/air transition implied by the contact classification
        match contact {
            Contact::Top => {
                self.on_ground = true;
                self.velocity.y = 0.0;
            }
            Contact::Bottom => {
                self.on_ground = false;
                self.velocity.y = 0.0;
            }
            Contact::Left | Contact::Right => {
                self.velocity.x = 0.0;
            }
            Contact::None => {
                // Grounded only when resting exactly on the world floor
                self.on_ground = self.aabb.max().y == WORLD_HEIGHT;
            }
        }

        // 2. Input
        if self.alive {
            self.handle_input(input, events);
        }

        // 3. Gravity, capped at terminal fall speed; grounded motion is flat
        if !self.on_ground {
            self.velocity.y = (self.velocity.y + GRAVITY * dt).min(TERMINAL_FALL_SPEED);
        } else {
            self.velocity.y = 0.0;
        }

        self.attack_timer = (self.attack_timer - dt).max(0.0);

        // 4. Explicit Euler
        let mut pos = self.aabb.pos + self.velocity * dt;

        // 5. World bounds clamp; the floor clamp grounds the player
        if pos.x < 0.0 {
            pos.x = 0.0;
            self.velocity.x = 0.0;
        } else if pos.x + self.aabb.width() > WORLD_WIDTH {
            pos.x = WORLD_WIDTH - self.aabb.width();
            self.velocity.x = 0.0;
        }

        if pos.y < 0.0 {
            pos.y = 0.0;
            self.velocity.y = 0.0;
        } else if pos.y + self.aabb.height() > WORLD_HEIGHT {
            pos.y = WORLD_HEIGHT - self.aabb.height();
            self.velocity.y = 0.0;
            self.on_ground = true;
        }

        self.aabb.pos = pos;

        if !was_grounded && self.on_ground {
            events.push(GameEvent::Land);
        }
    }

    fn handle_input(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) {
        self.moving = false;

        if self.on_ground && input.jump_pressed {
            self.velocity.y = PLAYER_JUMP_SPEED;
            self.on_ground = false;
            events.push(GameEvent::Jump);
        }

        if input.left {
            self.velocity.x = -PLAYER_RUN_SPEED;
            self.facing = Facing::Left;
            self.moving = true;
        } else if input.right {
            self.velocity.x = PLAYER_RUN_SPEED;
            self.facing = Facing::Right;
            self.moving = true;
        } else {
            self.velocity.x = 0.0;
        }

        // Touch controls: top half jumps, bottom half steers
        if input.pointer_down {
            if let Some(p) = input.pointer_pos {
                if p.y < SCREEN_HEIGHT / 2.0 && self.on_ground {
                    self.velocity.y = PLAYER_JUMP_SPEED;
                    self.on_ground = false;
                    events.push(GameEvent::Jump);
                } else if p.y > SCREEN_HEIGHT / 2.0 {
                    if p.x > SCREEN_WIDTH / 2.0 {
                        self.velocity.x = PLAYER_RUN_SPEED;
                        self.facing = Facing::Right;
                        self.moving = true;
                    } else {
                        self.velocity.x = -PLAYER_RUN_SPEED;
                        self.facing = Facing::Left;
                        self.moving = true;
                    }
                }
            }
        }

        if input.attack_pressed && !self.attacking() {
            self.attack_timer = PLAYER_ATTACK_TIME;
            events.push(GameEvent::Attack);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grounded_player() -> Player {
        // Resting exactly on the world floor
        let mut p = Player::new(Vec2::new(
            100.0,
            WORLD_HEIGHT - 2.0 * PLAYER_HALF_HEIGHT,
        ));
        p.on_ground = true;
        p
    }

    #[test]
    fn test_jump_from_rest() {
        let mut p = grounded_player();
        let mut events = Vec::new();
        let input = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);

        assert!(!p.on_ground);
        assert!(p.velocity.x == 0.0);
        // Jump impulse plus one frame of gravity
        let expected = PLAYER_JUMP_SPEED + GRAVITY * SIM_DT;
        assert!((p.velocity.y - expected).abs() < 0.001);
        assert!(events.contains(&GameEvent::Jump));
    }

    #[test]
    fn test_no_jump_while_airborne() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        let mut events = Vec::new();
        let input = TickInput {
            jump_pressed: true,
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);
        assert!(!events.contains(&GameEvent::Jump));
        assert!(p.velocity.y > PLAYER_JUMP_SPEED / 2.0);
    }

    #[test]
    fn test_jump_requires_edge_press() {
        let mut p = grounded_player();
        let mut events = Vec::new();
        // Held-but-not-pressed jump key does nothing
        let input = TickInput::default();
        p.update(&input, Contact::None, &mut events, SIM_DT);
        assert!(p.on_ground);
        assert_eq!(p.velocity.y, 0.0);
    }

    #[test]
    fn test_top_contact_grounds_and_zeroes_vy() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        p.velocity.y = 800.0;
        let mut events = Vec::new();
        p.update(&TickInput::default(), Contact::Top, &mut events, SIM_DT);
        assert!(p.on_ground);
        assert_eq!(p.velocity.y, 0.0);
        assert!(events.contains(&GameEvent::Land));
    }

    #[test]
    fn test_bottom_contact_zeroes_vy_and_unsets_ground() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        p.velocity.y = -500.0;
        let mut events = Vec::new();
        p.update(&TickInput::default(), Contact::Bottom, &mut events, SIM_DT);
        assert!(!p.on_ground);
        // Zeroed by the contact, then one frame of gravity
        assert!((p.velocity.y - GRAVITY * SIM_DT).abs() < 0.001);
    }

    #[test]
    fn test_side_contact_zeroes_vx_only() {
        let mut p = grounded_player();
        p.velocity.x = 500.0;
        let mut events = Vec::new();
        p.update(&TickInput::default(), Contact::Left, &mut events, SIM_DT);
        assert_eq!(p.velocity.x, 0.0);
        assert!(p.on_ground);
    }

    #[test]
    fn test_right_world_boundary_clamp() {
        let mut p = grounded_player();
        p.aabb.pos.x = WORLD_WIDTH - p.aabb.width() - 1.0;
        let mut events = Vec::new();
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);
        assert_eq!(p.aabb.pos.x, WORLD_WIDTH - p.aabb.width());
        assert_eq!(p.velocity.x, 0.0);
    }

    #[test]
    fn test_floor_clamp_grounds() {
        let mut p = Player::new(Vec2::new(100.0, WORLD_HEIGHT - 70.0));
        p.velocity.y = 2000.0;
        let mut events = Vec::new();
        p.update(&TickInput::default(), Contact::None, &mut events, SIM_DT);
        assert!(p.on_ground);
        assert_eq!(p.velocity.y, 0.0);
        assert_eq!(p.aabb.max().y, WORLD_HEIGHT);
        assert!(events.contains(&GameEvent::Land));
    }

    #[test]
    fn test_terminal_fall_speed_cap() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        let mut events = Vec::new();
        for _ in 0..120 {
            p.update(&TickInput::default(), Contact::None, &mut events, SIM_DT);
            if p.on_ground {
                break;
            }
            assert!(p.velocity.y <= TERMINAL_FALL_SPEED);
        }
    }

    #[test]
    fn test_dead_player_ignores_input() {
        let mut p = grounded_player();
        p.hit();
        let mut events = Vec::new();
        let input = TickInput {
            right: true,
            jump_pressed: true,
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);
        assert_eq!(p.velocity.x, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_pointer_top_half_jumps_when_grounded() {
        let mut p = grounded_player();
        let mut events = Vec::new();
        let input = TickInput {
            pointer_down: true,
            pointer_pos: Some(Vec2::new(640.0, 100.0)),
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);

        assert!(!p.on_ground);
        let expected = PLAYER_JUMP_SPEED + GRAVITY * SIM_DT;
        assert!((p.velocity.y - expected).abs() < 0.001);
        assert!(events.contains(&GameEvent::Jump));
    }

    #[test]
    fn test_pointer_top_half_airborne_no_jump() {
        let mut p = Player::new(Vec2::new(100.0, 100.0));
        let mut events = Vec::new();
        let input = TickInput {
            pointer_down: true,
            pointer_pos: Some(Vec2::new(640.0, 100.0)),
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);
        assert!(!events.contains(&GameEvent::Jump));
        assert!(p.velocity.y > PLAYER_JUMP_SPEED / 2.0);
    }

    #[test]
    fn test_pointer_bottom_halves_steer() {
        let mut p = grounded_player();
        let mut events = Vec::new();
        let right = TickInput {
            pointer_down: true,
            pointer_pos: Some(Vec2::new(SCREEN_WIDTH - 10.0, SCREEN_HEIGHT - 10.0)),
            ..Default::default()
        };
        p.update(&right, Contact::None, &mut events, SIM_DT);
        assert_eq!(p.velocity.x, PLAYER_RUN_SPEED);
        assert_eq!(p.facing, Facing::Right);

        let left = TickInput {
            pointer_down: true,
            pointer_pos: Some(Vec2::new(10.0, SCREEN_HEIGHT - 10.0)),
            ..Default::default()
        };
        p.update(&left, Contact::None, &mut events, SIM_DT);
        assert_eq!(p.velocity.x, -PLAYER_RUN_SPEED);
        assert_eq!(p.facing, Facing::Left);
    }

    #[test]
    fn test_pointer_on_midline_is_dead() {
        // Exactly half screen height falls between the jump and steer zones
        let mut p = grounded_player();
        let mut events = Vec::new();
        let input = TickInput {
            pointer_down: true,
            pointer_pos: Some(Vec2::new(1000.0, SCREEN_HEIGHT / 2.0)),
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);
        assert!(p.on_ground);
        assert_eq!(p.velocity.x, 0.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_attack_arms_weapon_on_facing_side() {
        let mut p = grounded_player();
        let mut events = Vec::new();
        let input = TickInput {
            left: true,
            attack_pressed: true,
            ..Default::default()
        };
        p.update(&input, Contact::None, &mut events, SIM_DT);
        assert!(p.attacking());
        assert!(p.weapon().center().x < p.aabb.center().x);
        assert!(events.contains(&GameEvent::Attack));
    }
}
