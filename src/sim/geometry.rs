//! Axis-aligned rectangle geometry
//!
//! Level pixel space: origin top-left, y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Inclusive overlap test: touching edges count as intersecting
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !(other.x > self.right()
            || other.right() < self.x
            || other.y > self.bottom()
            || other.bottom() < self.y)
    }

    /// Center-to-center distance
    #[inline]
    pub fn distance_to(&self, other: &Rect) -> f32 {
        self.center().distance(other.center())
    }
}

/// Free-function form of [`Rect::intersects`]
#[inline]
pub fn intersects(a: &Rect, b: &Rect) -> bool {
    a.intersects(b)
}

/// Free-function form of [`Rect::distance_to`]
#[inline]
pub fn distance(a: &Rect, b: &Rect) -> f32 {
    a.distance_to(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_rects_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(intersects(&a, &b));
        assert!(intersects(&b, &a));
    }

    #[test]
    fn test_touching_edges_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_separated_rects_miss() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&Rect::new(10.5, 0.0, 5.0, 5.0)));
        assert!(!a.intersects(&Rect::new(0.0, -6.0, 5.0, 5.0)));
    }

    #[test]
    fn test_distance_between_centers() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(30.0, 40.0, 10.0, 10.0);
        assert!((distance(&a, &b) - 50.0).abs() < 0.001);
        assert_eq!(a.distance_to(&a), 0.0);
    }
}
