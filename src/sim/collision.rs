//! Contact detection between the player and the world
//!
//! Every body is an axis-aligned rectangle tagged with a category bit. A
//! contact stores its pair with the lower category first, and a tick's
//! contacts are dispatched in ascending category order, then by entity id,
//! so resolution never depends on iteration order.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::state::{Obstacle, Segment};

/// Category bits (lower value dispatches first)
pub mod category {
    pub const PLAYER: u32 = 0x1 << 0;
    pub const OBSTACLE: u32 = 0x1 << 1;
    pub const FLOOR: u32 = 0x1 << 2;
    pub const SCORE_ZONE: u32 = 0x1 << 3;
}

/// A collidable body, referenced by stable entity id where it has one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Body {
    Player,
    Obstacle { id: u32, segment: Segment },
    Floor,
    ScoreZone { id: u32 },
}

impl Body {
    pub fn category(&self) -> u32 {
        match self {
            Body::Player => category::PLAYER,
            Body::Obstacle { .. } => category::OBSTACLE,
            Body::Floor => category::FLOOR,
            Body::ScoreZone { .. } => category::SCORE_ZONE,
        }
    }

    /// Entity id for ordering (0 for singletons)
    pub fn entity_id(&self) -> u32 {
        match self {
            Body::Obstacle { id, .. } | Body::ScoreZone { id } => *id,
            Body::Player | Body::Floor => 0,
        }
    }

    /// Touching this body ends the run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Body::Obstacle { .. } | Body::Floor)
    }
}

/// Two bodies in contact, `a` having the lower category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub a: Body,
    pub b: Body,
}

impl Contact {
    pub fn new(first: Body, second: Body) -> Self {
        if first.category() <= second.category() {
            Self { a: first, b: second }
        } else {
            Self { a: second, b: first }
        }
    }

    /// Sort key: category of the higher body, then its entity id
    fn order_key(&self) -> (u32, u32) {
        (self.b.category(), self.b.entity_id())
    }
}

/// Collect every contact of the player this tick, in dispatch order.
///
/// Consumed trigger zones are not reported. Everything below the floor's top
/// edge counts as floor, so a fast fall cannot tunnel through it.
pub fn detect_contacts(player: &Rect, floor: &Rect, obstacles: &[Obstacle]) -> Vec<Contact> {
    let mut contacts = Vec::new();

    if player.overlaps(floor) || player.bottom() < floor.top() {
        contacts.push(Contact::new(Body::Floor, Body::Player));
    }

    for obstacle in obstacles {
        for segment in [Segment::Top, Segment::Bottom] {
            if player.overlaps(&obstacle.segment_rect(segment)) {
                contacts.push(Contact::new(
                    Body::Player,
                    Body::Obstacle {
                        id: obstacle.id,
                        segment,
                    },
                ));
            }
        }
        if !obstacle.zone.consumed && player.overlaps(&obstacle.zone_rect()) {
            contacts.push(Contact::new(Body::Player, Body::ScoreZone { id: obstacle.id }));
        }
    }

    // Stable: top before bottom within one obstacle
    contacts.sort_by_key(Contact::order_key);
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GameState;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state_with_obstacle(x: f32) -> GameState {
        let mut state = GameState::new(Tuning::default(), 1, 0);
        // gap spans 290..380
        state.push_obstacle(x, 287.0, 90.0, 180.0);
        state
    }

    #[test]
    fn test_contact_orders_by_category() {
        let c = Contact::new(Body::Floor, Body::Player);
        assert_eq!(c.a, Body::Player);
        assert_eq!(c.b, Body::Floor);

        let c = Contact::new(Body::ScoreZone { id: 3 }, Body::Player);
        assert_eq!(c.a, Body::Player);
    }

    #[test]
    fn test_categories_ascend() {
        assert!(category::PLAYER < category::OBSTACLE);
        assert!(category::OBSTACLE < category::FLOOR);
        assert!(category::FLOOR < category::SCORE_ZONE);
    }

    #[test]
    fn test_player_in_gap_hits_only_zone() {
        let state = state_with_obstacle(187.5);
        let player = Rect::new(Vec2::new(187.5, 335.0), Vec2::new(40.0, 28.0));
        let contacts = detect_contacts(&player, &state.floor_rect(), &state.obstacles);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].b, Body::ScoreZone { id: 1 });
        assert!(!contacts[0].b.is_terminal());
    }

    #[test]
    fn test_player_hitting_bottom_segment() {
        let state = state_with_obstacle(187.5);
        let player = Rect::new(Vec2::new(187.5, 280.0), Vec2::new(40.0, 28.0));
        let contacts = detect_contacts(&player, &state.floor_rect(), &state.obstacles);
        assert_eq!(
            contacts[0].b,
            Body::Obstacle {
                id: 1,
                segment: Segment::Bottom
            }
        );
        assert!(contacts[0].b.is_terminal());
        // Straddles the gap's lower edge, so the zone is touched as well, but later
        assert_eq!(contacts.last().unwrap().b, Body::ScoreZone { id: 1 });
    }

    #[test]
    fn test_floor_contact() {
        let state = GameState::new(Tuning::default(), 1, 0);
        let player = Rect::new(Vec2::new(187.5, 120.0), Vec2::new(40.0, 28.0));
        let contacts = detect_contacts(&player, &state.floor_rect(), &state.obstacles);
        assert_eq!(contacts, vec![Contact::new(Body::Player, Body::Floor)]);
    }

    #[test]
    fn test_obstacles_dispatch_before_floor() {
        let state = state_with_obstacle(187.5);
        // Low enough to touch the floor and the bottom segment at once
        let player = Rect::new(Vec2::new(187.5, 115.0), Vec2::new(40.0, 28.0));
        let contacts = detect_contacts(&player, &state.floor_rect(), &state.obstacles);
        assert_eq!(contacts.len(), 2);
        assert!(matches!(contacts[0].b, Body::Obstacle { .. }));
        assert_eq!(contacts[1].b, Body::Floor);
    }

    #[test]
    fn test_player_below_floor_still_touches_it() {
        let state = GameState::new(Tuning::default(), 1, 0);
        let player = Rect::new(Vec2::new(187.5, -5000.0), Vec2::new(40.0, 28.0));
        let contacts = detect_contacts(&player, &state.floor_rect(), &state.obstacles);
        assert_eq!(contacts, vec![Contact::new(Body::Player, Body::Floor)]);
    }

    #[test]
    fn test_consumed_zone_not_reported() {
        let mut state = state_with_obstacle(187.5);
        state.obstacles[0].zone.consumed = true;
        let player = Rect::new(Vec2::new(187.5, 335.0), Vec2::new(40.0, 28.0));
        let contacts = detect_contacts(&player, &state.floor_rect(), &state.obstacles);
        assert!(contacts.is_empty());
    }

    #[test]
    fn test_clear_air() {
        let state = state_with_obstacle(400.0);
        let player = Rect::new(Vec2::new(187.5, 335.0), Vec2::new(40.0, 28.0));
        let contacts = detect_contacts(&player, &state.floor_rect(), &state.obstacles);
        assert!(contacts.is_empty());
    }
}
