//! Axis-aligned rectangle geometry for every collidable body
//!
//! World space is y-up with the origin at the bottom-left of the screen.
//! A rectangle is stored as a center plus half extents:
//! - left/right = center.x ∓ half.x
//! - bottom/top = center.y ∓ half.y

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    /// Build from edges (left, bottom, right, top)
    pub fn from_edges(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        let min = Vec2::new(left, bottom);
        let max = Vec2::new(right, top);
        Self {
            center: (min + max) * 0.5,
            half: (max - min) * 0.5,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.center.x - self.half.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.center.x + self.half.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.center.y - self.half.y
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.center.y + self.half.y
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.half * 2.0
    }

    /// Strict overlap test; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && self.right() > other.left()
            && self.bottom() < other.top()
            && self.top() > other.bottom()
    }

    /// True if the rectangle has no area
    pub fn is_empty(&self) -> bool {
        self.half.x <= 0.0 || self.half.y <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges() {
        let r = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0));
        assert_eq!(r.left(), 8.0);
        assert_eq!(r.right(), 12.0);
        assert_eq!(r.bottom(), 17.0);
        assert_eq!(r.top(), 23.0);
        assert_eq!(r.size(), Vec2::new(4.0, 6.0));
    }

    #[test]
    fn test_from_edges_matches_new() {
        let a = Rect::from_edges(0.0, 0.0, 10.0, 4.0);
        let b = Rect::new(Vec2::new(5.0, 2.0), Vec2::new(10.0, 4.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_overlap() {
        let a = Rect::from_edges(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_edges(5.0, 5.0, 15.0, 15.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::from_edges(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_edges(10.0, 0.0, 20.0, 10.0);
        assert!(!a.overlaps(&b));
    }

    #[test]
    fn test_empty_rect_never_overlaps() {
        let a = Rect::from_edges(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::from_edges(5.0, 5.0, 5.0, 8.0);
        assert!(empty.is_empty());
        assert!(!a.overlaps(&empty));
    }
}
