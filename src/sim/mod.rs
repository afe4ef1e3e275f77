//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, passed as an explicit handle
//! - No rendering, audio or platform dependencies
//!
//! The platform layer feeds a `TickInput` snapshot into `tick` once per
//! frame and drains `GameEvent`s / reads entity positions afterwards.

pub mod bounds;
pub mod enemy;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile;

pub use bounds::{BoundingBox, Contact};
pub use enemy::Enemy;
pub use level::{Level, LevelError, RoomPlan, RoomType, build_level, generate_rooms};
pub use player::Player;
pub use state::{GameEvent, LevelSignal, LevelState};
pub use tick::{TickInput, tick};
pub use tile::{FallPhase, Facing, SensorTag, Tile, TileGrid, TileKind};
