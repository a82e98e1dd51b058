//! Simulation module
//!
//! Everything that runs per tick lives here. It must stay deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by node id)
//! - No rendering or platform dependencies

pub mod action;
pub mod collision;
pub mod contact;
pub mod controller;
pub mod physics;
pub mod scene;
pub mod state;
pub mod tick;
pub mod world;

pub use action::{Action, ActionRunner, ActionStatus};
pub use contact::{Contact, ContactDelegate, ContactQueue, QueuedContact};
pub use controller::{GameScene, Resolution, ResolveReport, Shot, aim, block_grid, resolve_contact};
pub use physics::{BodyShape, PhysicsBody, category};
pub use scene::{Scene, SceneGraph};
pub use state::{EntityKind, Node, NodeId, NodeSnapshot, SceneSnapshot};
pub use tick::{Autoplay, Host, HostStats, TickInput, TickReport, tick};
pub use world::{OverlapWorld, PhysicsWorld};
