//! Obstacle generator
//!
//! Spawning runs on an explicit schedule ("next spawn at tick T") checked by
//! the frame driver, so nothing fires outside a tick. Gap and segment
//! heights are drawn in whole units: with whole-unit world bounds the
//! segments and gap always sum to the available height exactly.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use crate::secs_to_ticks;
use crate::tuning::Tuning;

/// Spawn schedule; disarmed when `next_spawn_tick` is `None`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawner {
    pub next_spawn_tick: Option<u64>,
}

impl Spawner {
    /// Schedule the next spawn one randomized interval after `now`
    pub fn arm<R: Rng>(&mut self, now: u64, tuning: &Tuning, rng: &mut R) {
        self.next_spawn_tick = Some(now + next_interval_ticks(tuning, rng));
    }

    pub fn disarm(&mut self) {
        self.next_spawn_tick = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_spawn_tick.is_some()
    }

    pub fn is_due(&self, now: u64) -> bool {
        self.next_spawn_tick.is_some_and(|t| now >= t)
    }
}

/// Draw an inter-arrival time: uniform in mean ± jitter, at least one tick
pub fn next_interval_ticks<R: Rng>(tuning: &Tuning, rng: &mut R) -> u64 {
    let jitter = tuning.spawn_interval_jitter;
    let secs = if jitter > 0.0 {
        tuning.spawn_interval_mean + rng.random_range(-jitter..=jitter)
    } else {
        tuning.spawn_interval_mean
    };
    u64::from(secs_to_ticks(secs).max(1))
}

/// Vertical layout of one obstacle pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleLayout {
    pub top_height: f32,
    pub gap: f32,
    pub bottom_height: f32,
}

/// Roll a random gap and split the remaining height between the segments.
///
/// Neither segment ends up shorter than `min_segment_height`: a short top
/// segment is raised at the bottom's expense, and a short bottom segment
/// takes its shortfall back from the top.
pub fn roll_layout<R: Rng>(tuning: &Tuning, rng: &mut R) -> ObstacleLayout {
    let available = tuning.world.available_height();
    let min_segment = tuning.min_segment_height;

    let gap_lo = tuning.min_gap().ceil();
    let gap_hi = tuning.max_gap().floor();
    let gap = if gap_hi > gap_lo {
        rng.random_range(gap_lo..gap_hi).floor()
    } else {
        gap_lo
    };

    let span = available - gap;
    let mut top_height = if span > 0.0 {
        rng.random_range(0.0..span).floor()
    } else {
        0.0
    };

    top_height = top_height.max(min_segment);
    let mut bottom_height = available - gap - top_height;
    if bottom_height < min_segment {
        let shortfall = min_segment - bottom_height;
        bottom_height = min_segment;
        top_height -= shortfall;
    }

    ObstacleLayout {
        top_height,
        gap,
        bottom_height,
    }
}

/// Create one obstacle just beyond the right edge of the screen
pub fn spawn(state: &mut GameState) -> u32 {
    let layout = roll_layout(&state.tuning, &mut state.rng);
    let x = state.tuning.world.width + state.tuning.obstacle_width * 0.5;
    let id = state.push_obstacle(x, layout.top_height, layout.gap, layout.bottom_height);

    log::debug!(
        "Spawned obstacle {}: top={} gap={} bottom={}",
        id,
        layout.top_height,
        layout.gap,
        layout.bottom_height
    );
    state.emit(GameEvent::ObstacleSpawned {
        id,
        top_height: layout.top_height,
        bottom_height: layout.bottom_height,
        x,
    });
    id
}

/// Fire the generator if its schedule is due, then re-arm it
pub fn update(state: &mut GameState) {
    if !state.spawner.is_due(state.time_ticks) {
        return;
    }
    // A schedule left over from a finished run must not spawn
    if state.phase != GamePhase::Running {
        state.spawner.disarm();
        return;
    }
    spawn(state);
    state.spawner.arm(state.time_ticks, &state.tuning, &mut state.rng);
}
