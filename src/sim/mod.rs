//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or storage dependencies (events only)

pub mod collision;
pub mod rect;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Body, Contact, detect_contacts};
pub use rect::Rect;
pub use score::{Medal, ScoreState};
pub use spawner::{ObstacleLayout, Spawner, roll_layout};
pub use state::{
    GameEvent, GamePhase, GameState, Obstacle, Player, ScrollLayer, Segment, TriggerZone,
};
pub use tick::{TickInput, handle_tap, tick};
