//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in `GameState`. Entities are flat
//! structs in id-sorted collections; nothing holds references into them.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::score::{Medal, ScoreState};
use super::spawner::Spawner;
use crate::tuning::{Tuning, WorldBounds};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Player pinned in the ready pose, waiting for the first tap
    Ready,
    /// Active gameplay
    Running,
    /// Run ended, summary presented until a tap resets
    Over,
}

/// Abstract events for the presentation layer (animation, sound, HUD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Ready -> Running
    Started,
    /// Upward impulse applied
    Flap,
    /// An obstacle was passed
    ScoreChanged { score: u32 },
    /// Best score grew and should be persisted
    NewBest { best: u32 },
    ObstacleSpawned {
        id: u32,
        top_height: f32,
        bottom_height: f32,
        x: f32,
    },
    /// Running -> Over (fired once per run)
    GameOver { score: u32, best: u32, medal: Medal },
    /// Over -> Ready
    Reset,
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the bounding box
    pub pos: Vec2,
    /// Vertical velocity (units/s, positive = up)
    pub vy: f32,
    pub size: Vec2,
    /// Physics simulated when true; pinned in the ready pose otherwise
    pub airborne: bool,
    /// Wing loop playing (stopped on game over)
    pub animating: bool,
}

impl Player {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            vy: 0.0,
            size,
            airborne: false,
            animating: true,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Put the player back in the ready pose
    pub fn pin(&mut self, pos: Vec2) {
        self.pos = pos;
        self.vy = 0.0;
        self.airborne = false;
        self.animating = true;
    }

    /// Zero vertical velocity, then add the impulse
    pub fn flap(&mut self, impulse: f32) {
        self.vy = 0.0;
        self.vy += impulse;
    }

    /// Stop physics and animation where the player stands
    pub fn freeze(&mut self) {
        self.vy = 0.0;
        self.airborne = false;
        self.animating = false;
    }

    /// Integrate gravity for one step; the ceiling is a solid edge
    pub fn integrate(&mut self, gravity: f32, dt: f32, ceiling: f32) {
        if !self.airborne {
            return;
        }
        self.vy -= gravity * dt;
        self.pos.y += self.vy * dt;

        let half_h = self.size.y * 0.5;
        if self.pos.y + half_h > ceiling {
            self.pos.y = ceiling - half_h;
            self.vy = self.vy.min(0.0);
        }
    }
}

/// Which half of an obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Top,
    Bottom,
}

/// Invisible scoring region spanning an obstacle's gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerZone {
    pub width: f32,
    /// Set once the zone has scored; never scores again
    pub consumed: bool,
}

/// A top/bottom obstacle pair scrolling leftward
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Horizontal center shared by both segments and the trigger zone
    pub x: f32,
    pub width: f32,
    /// Top of the floor (bottom segment's base)
    pub floor_y: f32,
    /// Top of the screen (top segment's base)
    pub ceiling_y: f32,
    pub top_height: f32,
    pub gap: f32,
    pub bottom_height: f32,
    pub zone: TriggerZone,
}

impl Obstacle {
    /// Lower edge of the gap
    #[inline]
    pub fn gap_bottom(&self) -> f32 {
        self.floor_y + self.bottom_height
    }

    /// Upper edge of the gap
    #[inline]
    pub fn gap_top(&self) -> f32 {
        self.ceiling_y - self.top_height
    }

    #[inline]
    pub fn gap_center_y(&self) -> f32 {
        (self.gap_bottom() + self.gap_top()) * 0.5
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width * 0.5
    }

    pub fn segment_rect(&self, segment: Segment) -> Rect {
        let half_w = self.width * 0.5;
        match segment {
            Segment::Top => {
                Rect::from_edges(self.x - half_w, self.gap_top(), self.x + half_w, self.ceiling_y)
            }
            Segment::Bottom => {
                Rect::from_edges(self.x - half_w, self.floor_y, self.x + half_w, self.gap_bottom())
            }
        }
    }

    pub fn zone_rect(&self) -> Rect {
        let half_w = self.zone.width * 0.5;
        Rect::from_edges(
            self.x - half_w,
            self.gap_bottom(),
            self.x + half_w,
            self.gap_top(),
        )
    }

    /// Scrolled past the left edge of the screen
    #[inline]
    pub fn is_offscreen(&self) -> bool {
        self.x < -self.width * 0.5
    }
}

/// A repeating background strip (floor or sky) made of two screen-wide tiles
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollLayer {
    /// Left edge of the first tile, in (-tile_width, 0]
    pub offset: f32,
    pub tile_width: f32,
}

impl ScrollLayer {
    pub fn new(tile_width: f32) -> Self {
        Self {
            offset: 0.0,
            tile_width,
        }
    }

    /// Scroll left, wrapping the first tile behind the second
    pub fn advance(&mut self, speed: f32) {
        self.offset -= speed;
        if self.offset <= -self.tile_width {
            self.offset += self.tile_width;
        }
    }
}

/// Complete game state for one scene
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter (world clock)
    pub time_ticks: u64,
    pub player: Player,
    /// Live obstacles (sorted by id for determinism)
    pub obstacles: Vec<Obstacle>,
    pub score: ScoreState,
    pub spawner: Spawner,
    pub floor_layer: ScrollLayer,
    pub sky_layer: ScrollLayer,
    /// Ticks before a tap in `Over` is accepted
    pub input_lock_ticks: u32,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new scene in the `Ready` phase
    pub fn new(tuning: Tuning, seed: u64, best: u32) -> Self {
        let world = tuning.world;
        let player = Player::new(world.center(), tuning.player_size);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            time_ticks: 0,
            player,
            obstacles: Vec::new(),
            score: ScoreState::with_best(best),
            spawner: Spawner::default(),
            floor_layer: ScrollLayer::new(world.width),
            sky_layer: ScrollLayer::new(world.width),
            input_lock_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        }
    }

    #[inline]
    pub fn world(&self) -> &WorldBounds {
        &self.tuning.world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an obstacle pair centered at `x`. Heights are taken as given.
    pub fn push_obstacle(&mut self, x: f32, top_height: f32, gap: f32, bottom_height: f32) -> u32 {
        let id = self.next_entity_id();
        let world = self.tuning.world;
        self.obstacles.push(Obstacle {
            id,
            x,
            width: self.tuning.obstacle_width,
            floor_y: world.floor_height,
            ceiling_y: world.height,
            top_height,
            gap,
            bottom_height,
            zone: TriggerZone {
                width: self.tuning.trigger_zone_width,
                consumed: false,
            },
        });
        id
    }

    /// The floor as a collidable body
    pub fn floor_rect(&self) -> Rect {
        let world = self.world();
        Rect::from_edges(0.0, 0.0, world.width, world.floor_height)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure obstacles are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.obstacles.sort_by_key(|o| o.id);
    }
}
