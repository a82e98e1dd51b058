//! Scene entities
//!
//! Nodes are plain data; the scene graph owns them and hands out ids.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{Action, ActionRunner};
use super::physics::PhysicsBody;
use crate::names;

/// Scene-unique node handle, never reused after removal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Static boundary loop around the scene
    Wall,
    /// Static, destructible grid block
    Block,
    /// Fired by the player, moves along a timed path
    Projectile,
    /// Visual anchor the projectiles start from
    Player,
}

impl EntityKind {
    /// Default name tag for nodes of this kind
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Wall => names::WALL,
            EntityKind::Block => names::BLOCK,
            EntityKind::Projectile => names::PROJECTILE,
            EntityKind::Player => names::PLAYER,
        }
    }
}

/// A renderable/physical object in the scene
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: EntityKind,
    /// Name tag used by contact resolution
    pub name: String,
    pub position: Vec2,
    pub size: Vec2,
    /// Rounded-corner radius (visual only)
    pub corner_radius: f32,
    pub body: Option<PhysicsBody>,
    pub action: Option<ActionRunner>,
}

impl Node {
    pub fn new(kind: EntityKind, position: Vec2, size: Vec2) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            position,
            size,
            corner_radius: 0.0,
            body: None,
            action: None,
        }
    }

    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = radius;
        self
    }

    /// Start an action, replacing any running one
    pub fn run(&mut self, action: Action) {
        self.action = Some(ActionRunner::new(action));
    }

    pub fn has_running_action(&self) -> bool {
        self.action.as_ref().is_some_and(|a| !a.is_finished())
    }
}

/// Serializable view of one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub kind: EntityKind,
    pub name: String,
    pub position: Vec2,
    pub size: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<PhysicsBody>,
}

/// Serializable view of the whole scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    /// Contacts still waiting for resolution
    pub pending_contacts: usize,
}

impl SceneSnapshot {
    pub fn count(&self, kind: EntityKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }
}
