//! Data-driven game balance
//!
//! Every gameplay constant lives in one record so variants of the game are
//! just different `Tuning` values. Loaded from JSON, validated before use.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::secs_to_ticks;

/// Errors produced while loading or validating tuning data
#[derive(Error, Debug)]
pub enum TuningError {
    #[error("failed to read tuning file")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("malformed tuning json")]
    Json {
        #[from]
        source: serde_json::Error,
    },
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f32 },
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },
    #[error("gap multipliers out of order: min {min} > max {max}")]
    GapRange { min: f32, max: f32 },
    #[error(
        "world too short: {available} units above the floor cannot fit a {max_gap} gap and two {min_segment} segments"
    )]
    WorldTooShort {
        available: f32,
        max_gap: f32,
        min_segment: f32,
    },
}

/// Fixed screen geometry, read-only input to obstacle placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
    pub floor_height: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,
            floor_height: FLOOR_HEIGHT,
        }
    }
}

impl WorldBounds {
    /// Vertical space between the floor and the top of the screen
    #[inline]
    pub fn available_height(&self) -> f32 {
        self.height - self.floor_height
    }

    /// Where the player rests before a run starts
    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub world: WorldBounds,
    /// Player bounding box (width, height)
    pub player_size: Vec2,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward velocity applied after zeroing vy on each flap (units/s)
    pub flap_impulse: f32,
    /// Leftward scroll per tick
    pub scroll_speed: f32,
    /// Gap lower bound, multiple of player height
    pub gap_min_multiplier: f32,
    /// Gap upper bound, multiple of player height
    pub gap_max_multiplier: f32,
    /// Neither obstacle segment may be shorter than this
    pub min_segment_height: f32,
    pub obstacle_width: f32,
    pub trigger_zone_width: f32,
    /// Mean seconds between obstacle spawns
    pub spawn_interval_mean: f32,
    /// Uniform jitter (±seconds) around the mean
    pub spawn_interval_jitter: f32,
    /// Seconds input stays locked after game over
    pub game_over_input_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            world: WorldBounds::default(),
            player_size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            gravity: GRAVITY,
            flap_impulse: FLAP_IMPULSE,
            scroll_speed: SCROLL_SPEED,
            gap_min_multiplier: GAP_MIN_MULTIPLIER,
            gap_max_multiplier: GAP_MAX_MULTIPLIER,
            min_segment_height: MIN_SEGMENT_HEIGHT,
            obstacle_width: OBSTACLE_WIDTH,
            trigger_zone_width: TRIGGER_ZONE_WIDTH,
            spawn_interval_mean: SPAWN_INTERVAL_MEAN,
            spawn_interval_jitter: SPAWN_INTERVAL_JITTER,
            game_over_input_delay: GAME_OVER_INPUT_DELAY,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from a JSON string (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Smallest gap the generator may draw
    #[inline]
    pub fn min_gap(&self) -> f32 {
        self.player_size.y * self.gap_min_multiplier
    }

    /// Exclusive upper bound of the gap draw
    #[inline]
    pub fn max_gap(&self) -> f32 {
        self.player_size.y * self.gap_max_multiplier
    }

    /// Input lock after game over, in ticks
    pub fn game_over_lock_ticks(&self) -> u32 {
        secs_to_ticks(self.game_over_input_delay)
    }

    /// Check that the generator can always satisfy its constraints
    pub fn validate(&self) -> Result<(), TuningError> {
        let all = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("world.floor_height", self.world.floor_height),
            ("player_size.x", self.player_size.x),
            ("player_size.y", self.player_size.y),
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("scroll_speed", self.scroll_speed),
            ("gap_min_multiplier", self.gap_min_multiplier),
            ("gap_max_multiplier", self.gap_max_multiplier),
            ("min_segment_height", self.min_segment_height),
            ("obstacle_width", self.obstacle_width),
            ("trigger_zone_width", self.trigger_zone_width),
            ("spawn_interval_mean", self.spawn_interval_mean),
            ("spawn_interval_jitter", self.spawn_interval_jitter),
            ("game_over_input_delay", self.game_over_input_delay),
        ];
        for (field, value) in all {
            if !value.is_finite() {
                return Err(TuningError::NonFinite { field, value });
            }
        }

        let positive = [
            ("world.width", self.world.width),
            ("world.height", self.world.height),
            ("world.floor_height", self.world.floor_height),
            ("player_size.x", self.player_size.x),
            ("player_size.y", self.player_size.y),
            ("gap_min_multiplier", self.gap_min_multiplier),
            ("obstacle_width", self.obstacle_width),
            ("trigger_zone_width", self.trigger_zone_width),
            ("spawn_interval_mean", self.spawn_interval_mean),
        ];
        for (field, value) in positive {
            // NaN fails this too
            if !(value > 0.0) {
                return Err(TuningError::NonPositive { field, value });
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("flap_impulse", self.flap_impulse),
            ("scroll_speed", self.scroll_speed),
            ("min_segment_height", self.min_segment_height),
            ("spawn_interval_jitter", self.spawn_interval_jitter),
            ("game_over_input_delay", self.game_over_input_delay),
        ];
        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(TuningError::Negative { field, value });
            }
        }

        if self.gap_max_multiplier < self.gap_min_multiplier {
            return Err(TuningError::GapRange {
                min: self.gap_min_multiplier,
                max: self.gap_max_multiplier,
            });
        }

        // Gaps are drawn in whole units, so the widest possible gap rounds up
        let available = self.world.available_height();
        if available - self.max_gap().ceil() < 2.0 * self.min_segment_height {
            return Err(TuningError::WorldTooShort {
                available,
                max_gap: self.max_gap(),
                min_segment: self.min_segment_height,
            });
        }

        Ok(())
    }
}
