//! Planar geometry for the battlefield.
//!
//! The map is a continuous 800x400 plane. Everything that moves (enemies,
//! soldiers, the hero, projectiles) does so by stepping a fixed distance
//! toward a target point each tick.

use serde::{Deserialize, Serialize};

/// A point or displacement on the battlefield plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal coordinate (0 = left edge).
    pub x: f64,
    /// Vertical coordinate (0 = top edge).
    pub y: f64,
}

impl Vec2 {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Return this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Move up to `speed` units toward `target`.
    ///
    /// Snaps onto the target and returns `true` when the remaining distance
    /// is at most `speed`.
    pub fn step_toward(&mut self, target: Self, speed: f64) -> bool {
        let dist = self.distance(target);
        if dist <= speed {
            *self = target;
            return true;
        }
        self.x += (target.x - self.x) / dist * speed;
        self.y += (target.y - self.y) / dist * speed;
        false
    }

    /// The point `radius` units from `anchor` along the ray from `anchor`
    /// through `self`.
    ///
    /// Coincident points resolve to angle zero, i.e. directly right of the
    /// anchor.
    #[must_use]
    pub fn stand_off_from(self, anchor: Self, radius: f64) -> Self {
        let angle = (self.y - anchor.y).atan2(self.x - anchor.x);
        Self::new(
            anchor.x + angle.cos() * radius,
            anchor.y + angle.sin() * radius,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_distance() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(3.0, 4.0);
        assert!(approx(a.distance(b), 5.0));
        assert!(approx(b.distance(a), 5.0));
    }

    #[test]
    fn test_step_toward_partial() {
        let mut p = Vec2::new(0.0, 0.0);
        let arrived = p.step_toward(Vec2::new(10.0, 0.0), 3.0);
        assert!(!arrived);
        assert!(approx(p.x, 3.0));
        assert!(approx(p.y, 0.0));
    }

    #[test]
    fn test_step_toward_snaps_on_arrival() {
        let mut p = Vec2::new(0.0, 0.0);
        let target = Vec2::new(2.0, 2.0);
        assert!(p.step_toward(target, 3.0));
        assert_eq!(p, target);
    }

    #[test]
    fn test_stand_off_keeps_direction() {
        let anchor = Vec2::new(100.0, 100.0);
        let enemy = Vec2::new(100.0, 105.0);
        let snapped = enemy.stand_off_from(anchor, 12.0);
        assert!(approx(snapped.x, 100.0));
        assert!(approx(snapped.y, 112.0));
        assert!(approx(snapped.distance(anchor), 12.0));
    }

    #[test]
    fn test_stand_off_coincident_points() {
        let anchor = Vec2::new(50.0, 50.0);
        let snapped = anchor.stand_off_from(anchor, 12.0);
        assert!(approx(snapped.x, 62.0));
        assert!(approx(snapped.y, 50.0));
    }
}
