//! Fight arena geometry: collision rectangles, world bounds, spawn points.

use eduquest_common::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box for collision detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum X coordinate
    pub min_x: f32,
    /// Minimum Y coordinate
    pub min_y: f32,
    /// Maximum X coordinate
    pub max_x: f32,
    /// Maximum Y coordinate
    pub max_y: f32,
}

impl Aabb {
    /// Creates a new AABB.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates an AABB from center and half-extents.
    #[must_use]
    pub fn from_center(center: Vec2, half_width: f32, half_height: f32) -> Self {
        Self {
            min_x: center.x - half_width,
            min_y: center.y - half_height,
            max_x: center.x + half_width,
            max_y: center.y + half_height,
        }
    }

    /// Returns the center of the AABB.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Returns the width of the AABB.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the AABB.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// Checks if this AABB overlaps with another.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Checks if the AABB contains a point.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Returns the AABB translated by a vector.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }
}

/// Spawn points for one boss-fight map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnPoints {
    /// Player start position.
    pub player: Vec2,
    /// Boss start position.
    pub boss: Vec2,
}

/// Flat-ground fight arena.
///
/// Boss maps are single rooms: a ground plane actors stand on and outer
/// bounds used by the projectile cleanup sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// World bounds; anything outside is despawned.
    pub bounds: Aabb,
    /// Y coordinate of the ground plane.
    pub ground_y: f32,
    /// Spawn points for this map.
    pub spawns: SpawnPoints,
}

impl Arena {
    /// Creates an arena from bounds, ground height, and spawn points.
    #[must_use]
    pub const fn new(bounds: Aabb, ground_y: f32, spawns: SpawnPoints) -> Self {
        Self {
            bounds,
            ground_y,
            spawns,
        }
    }

    /// Checks whether a point is inside the world bounds.
    #[must_use]
    pub fn in_bounds(&self, point: Vec2) -> bool {
        self.bounds.contains(point)
    }

    /// Clamps a feet position onto the ground plane.
    ///
    /// Returns the corrected Y and whether the position was at or below
    /// ground (i.e. the body is grounded).
    #[must_use]
    pub fn settle(&self, y: f32) -> (f32, bool) {
        if y >= self.ground_y {
            (self.ground_y, true)
        } else {
            (y, false)
        }
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            bounds: Aabb::new(-1000.0, -600.0, 1000.0, 600.0),
            ground_y: 0.0,
            spawns: SpawnPoints {
                player: Vec2::new(-200.0, 0.0),
                boss: Vec2::new(200.0, 0.0),
            },
        }
    }
}
