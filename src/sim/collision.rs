//! Collision detection for axis-aligned rectangles
//!
//! The player collides with a shrunk hitbox so near misses feel fair. Road
//! edges are static colliders that only ever constrain horizontal movement.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::road::Road;
use super::state::Obstacle;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Same center, size multiplied by `factor`
    pub fn scaled(&self, factor: f32) -> Self {
        Self::from_center(self.center(), self.size() * factor)
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Strict overlap: rectangles that only share an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }
}

/// Update contact flags and report the first obstacle that newly overlaps
/// the player's hitbox
///
/// An obstacle that was already in contact on the previous check does not
/// signal again, so a single overlap yields a single collision.
pub fn detect_collision(hitbox: &Rect, obstacles: &mut [Obstacle]) -> Option<u32> {
    let mut hit = None;
    for obstacle in obstacles.iter_mut() {
        let overlapping = hitbox.overlaps(&obstacle.rect());
        if overlapping && !obstacle.in_contact && hit.is_none() {
            hit = Some(obstacle.id);
        }
        obstacle.in_contact = overlapping;
    }
    hit
}

/// Whether the hitbox touches either road edge collider
///
/// Pass the area swept during a frame to catch a hitbox that jumped clean
/// over an edge.
pub fn hits_road_edge(hitbox: &Rect, road: &Road) -> bool {
    hitbox.overlaps(&road.left_edge) || hitbox.overlaps(&road.right_edge)
}

/// Clamp a center x so a hitbox of `half_width` stays clear of both edges
pub fn clamp_to_road(x: f32, half_width: f32, road: &Road) -> f32 {
    let min_x = road.left_edge.max.x + half_width;
    let max_x = road.right_edge.min.x - half_width;
    x.clamp(min_x, max_x)
}
