//! Oubliette - a procedurally generated descent platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (level generation, physics, collisions)
//! - `settings`: Audio/visual preferences
//! - `records`: Best-run tracking
//!
//! Rendering, audio playback and raw input devices live outside this crate.
//! The simulation consumes an input snapshot per tick and produces positions,
//! animation keys, sound-trigger events and a level-transition signal.

pub mod records;
pub mod settings;
pub mod sim;

pub use records::RunRecords;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Room grid is GRID_SIZE x GRID_SIZE rooms
    pub const GRID_SIZE: usize = 5;
    /// Each room is ROOM_WIDTH x ROOM_HEIGHT tiles
    pub const ROOM_WIDTH: usize = 10;
    pub const ROOM_HEIGHT: usize = 8;
    /// Tile edge length in world units
    pub const TILE_SIZE: f32 = 80.0;

    /// Tile grid dimensions
    pub const TILES_X: usize = GRID_SIZE * ROOM_WIDTH;
    pub const TILES_Y: usize = GRID_SIZE * ROOM_HEIGHT;

    /// World extent in world units (y grows downward)
    pub const WORLD_WIDTH: f32 = TILES_X as f32 * TILE_SIZE;
    pub const WORLD_HEIGHT: f32 = TILES_Y as f32 * TILE_SIZE;

    /// Logical screen size used to interpret pointer coordinates
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Player box half extents
    pub const PLAYER_HALF_WIDTH: f32 = 16.0;
    pub const PLAYER_HALF_HEIGHT: f32 = 32.0;
    /// Horizontal run speed (units/s)
    pub const PLAYER_RUN_SPEED: f32 = 500.0;
    /// Jump impulse (negative = up, y grows downward)
    pub const PLAYER_JUMP_SPEED: f32 = -940.0;
    /// Gravity acceleration and terminal fall speed
    pub const GRAVITY: f32 = 2300.0;
    pub const TERMINAL_FALL_SPEED: f32 = 2500.0;
    /// Seconds the attack weapon box stays armed after an attack input
    pub const PLAYER_ATTACK_TIME: f32 = 0.25;

    /// Enemy walk speed and proximity radius for player tracking
    pub const ENEMY_SPEED: f32 = 180.0;
    pub const ENEMY_SIGHT_RADIUS: f32 = 300.0;
    /// Horizontal distance at which a tracking enemy starts attacking
    pub const ENEMY_ATTACK_RANGE: f32 = 80.0;

    /// Spear block horizontal damage threshold
    pub const SPEAR_RANGE: f32 = 80.0;
    /// Downward speed of a triggered falling block
    pub const FALLING_BLOCK_SPEED: f32 = 450.0;
    /// Fall distance after which a falling block breaks permanently
    pub const FALLING_BLOCK_BREAK_DISTANCE: f32 = 6.0 * TILE_SIZE;

    /// Standard-tile damage markers for level transitions
    pub const DAMAGE_EXIT: i32 = -4;
    pub const DAMAGE_FINISH: i32 = -100;

    /// The run ends after clearing this many levels
    pub const FINAL_LEVEL: u32 = 7;
}
