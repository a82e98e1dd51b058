//! Physics bodies and category masks
//!
//! Bodies carry three masks:
//! - `category`: what the body is
//! - `contact_test`: categories whose overlap should be reported
//! - `collision`: categories that physically block this body

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Category bits
pub mod category {
    pub const NONE: u32 = 0;
    pub const PROJECTILE: u32 = 0b001;
    pub const BLOCK: u32 = 0b010;
    pub const WALL: u32 = 0b100;
    pub const ALL: u32 = u32::MAX;
}

/// Collision geometry, centred on the owning node's position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyShape {
    /// Solid axis-aligned rectangle
    Rect { size: Vec2 },
    /// Closed loop of edges around a rectangle (hollow, no interior)
    EdgeLoop { size: Vec2 },
}

impl BodyShape {
    pub fn size(&self) -> Vec2 {
        match *self {
            BodyShape::Rect { size } | BodyShape::EdgeLoop { size } => size,
        }
    }
}

/// A physics body attached to a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub shape: BodyShape,
    pub category: u32,
    pub collision: u32,
    pub contact_test: u32,
    /// Moved by the simulation (and pushed by collisions)
    pub dynamic: bool,
    pub affected_by_gravity: bool,
    /// Sweep the path travelled since the last step instead of testing only the end position
    pub precise_collision: bool,
}

impl PhysicsBody {
    /// Dynamic rectangle with engine defaults (member of every category,
    /// collides with everything, reports nothing)
    pub fn rect(size: Vec2) -> Self {
        Self {
            shape: BodyShape::Rect { size },
            category: category::ALL,
            collision: category::ALL,
            contact_test: category::NONE,
            dynamic: true,
            affected_by_gravity: true,
            precise_collision: false,
        }
    }

    /// Static edge loop around a frame of the given size
    pub fn edge_loop(size: Vec2) -> Self {
        Self {
            shape: BodyShape::EdgeLoop { size },
            category: category::ALL,
            collision: category::ALL,
            contact_test: category::NONE,
            dynamic: false,
            affected_by_gravity: false,
            precise_collision: false,
        }
    }

    /// Whether an overlap between the two bodies is reported
    #[inline]
    pub fn reports_contact_with(&self, other: &PhysicsBody) -> bool {
        self.category & other.contact_test != 0 || other.category & self.contact_test != 0
    }

    /// Whether `other` physically blocks this body
    #[inline]
    pub fn collides_with(&self, other: &PhysicsBody) -> bool {
        self.collision & other.category != 0
    }
}
