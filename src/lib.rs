//! Tap Run Bat - A single-screen obstacle dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, obstacle generation, game state)
//! - `session`: Host-facing driver wiring the simulation to its collaborators
//! - `persistence`: Best-score key/value storage
//! - `audio`: Sound cue dispatch (fire-and-forget)
//! - `settings`: Player preferences (volumes, mute)
//! - `store`: In-app purchase boundary types (entitlements, purchase errors)
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod store;
pub mod tuning;

pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// World dimensions (portrait phone screen, in points)
    pub const WORLD_WIDTH: f32 = 375.0;
    pub const WORLD_HEIGHT: f32 = 667.0;
    pub const FLOOR_HEIGHT: f32 = 110.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 40.0;
    pub const PLAYER_HEIGHT: f32 = 28.0;
    /// Downward acceleration while airborne (units/s²)
    pub const GRAVITY: f32 = 900.0;
    /// Upward velocity added on each flap after zeroing (units/s)
    pub const FLAP_IMPULSE: f32 = 220.0;

    /// Horizontal scroll per tick
    pub const SCROLL_SPEED: f32 = 1.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const MIN_SEGMENT_HEIGHT: f32 = 80.0;
    pub const TRIGGER_ZONE_WIDTH: f32 = 2.0;
    /// Gap bounds as multiples of player height
    pub const GAP_MIN_MULTIPLIER: f32 = 2.5;
    pub const GAP_MAX_MULTIPLIER: f32 = 3.5;

    /// Spawn interval (seconds): mean ± jitter
    pub const SPAWN_INTERVAL_MEAN: f32 = 3.5;
    pub const SPAWN_INTERVAL_JITTER: f32 = 0.5;

    /// Input lock after game over while the summary is presented (seconds)
    pub const GAME_OVER_INPUT_DELAY: f32 = 0.2;
}

/// Convert a duration in seconds to whole simulation ticks (rounded, at least 0)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs / consts::SIM_DT).round().max(0.0) as u32
}
