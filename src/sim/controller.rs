//! Scene controller
//!
//! Owns the scene: lays out the player, wall and block grid, turns touch
//! releases into projectiles, and resolves queued contacts once per frame.

use glam::Vec2;

use super::action::Action;
use super::contact::{Contact, ContactDelegate, ContactQueue};
use super::physics::{PhysicsBody, category};
use super::scene::{Scene, SceneGraph};
use super::state::{EntityKind, Node, NodeId, SceneSnapshot};
use super::world::{OverlapWorld, PhysicsWorld};
use crate::error::Result;
use crate::names;
use crate::settings::Settings;

/// What resolving one contact did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A side was already gone; nothing touched
    Stale,
    /// This block was removed
    Destroyed(NodeId),
    /// Both sides alive, neither is a block
    Ignored,
}

/// Summary of one resolution pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveReport {
    pub processed: usize,
    pub stale: usize,
    pub destroyed: usize,
}

/// Direction and end point of a shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Unit vector toward the touch (zero if the touch hit the origin exactly)
    pub direction: Vec2,
    pub destination: Vec2,
}

/// Aim from `origin` toward `touch`; touches below the origin are rejected
pub fn aim(origin: Vec2, touch: Vec2, range: f32) -> Option<Shot> {
    let offset = touch - origin;
    if offset.y < 0.0 {
        return None;
    }
    let direction = offset.normalize_or_zero();
    Some(Shot {
        direction,
        destination: origin + direction * range,
    })
}

/// Block centres, row by row from the bottom, left to right
pub fn block_grid(settings: &Settings) -> Vec<Vec2> {
    let mut positions = Vec::with_capacity((settings.grid_rows * settings.grid_cols) as usize);
    for row in 0..settings.grid_rows {
        let y = row as f32 * settings.row_step() + settings.grid_row_offset;
        let mut x = settings.grid_origin_x;
        for _ in 0..settings.grid_cols {
            positions.push(Vec2::new(x, y));
            x += settings.column_step();
        }
    }
    positions
}

/// Apply one contact: destroy the first side tagged as a block
///
/// Either side being detached makes the contact stale.
pub fn resolve_contact<G: SceneGraph + ?Sized>(graph: &mut G, contact: &Contact) -> Resolution {
    if !graph.is_attached(contact.body_a) || !graph.is_attached(contact.body_b) {
        return Resolution::Stale;
    }

    for id in [contact.body_a, contact.body_b] {
        if graph.name(id) == Some(names::BLOCK) {
            graph.remove_from_parent(id);
            return Resolution::Destroyed(id);
        }
    }

    Resolution::Ignored
}

/// The single gameplay scene
#[derive(Debug)]
pub struct GameScene {
    settings: Settings,
    scene: Scene,
    world: OverlapWorld,
    contacts: ContactQueue,
    player: Option<NodeId>,
    wall: Option<NodeId>,
}

impl GameScene {
    /// Create an empty scene; call [`GameScene::did_move`] to populate it
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            scene: Scene::new(),
            world: OverlapWorld::new(),
            contacts: ContactQueue::new(),
            player: None,
            wall: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn is_set_up(&self) -> bool {
        self.player.is_some()
    }

    pub fn player(&self) -> Option<NodeId> {
        self.player
    }

    pub fn wall(&self) -> Option<NodeId> {
        self.wall
    }

    /// Populate the scene: player marker, boundary wall, block grid
    pub fn did_move(&mut self) {
        if self.is_set_up() {
            log::warn!("Scene already set up, ignoring");
            return;
        }

        let player = Node::new(
            EntityKind::Player,
            self.settings.player_position,
            Vec2::splat(self.settings.player_size),
        )
        .with_corner_radius(self.settings.player_corner_radius());
        self.player = Some(self.scene.add_child(player));

        let frame = self.settings.scene_size;
        let wall_body = PhysicsBody {
            category: category::WALL,
            collision: category::NONE,
            contact_test: category::NONE,
            ..PhysicsBody::edge_loop(frame)
        };
        let wall = Node::new(EntityKind::Wall, Vec2::ZERO, frame).with_body(wall_body);
        self.wall = Some(self.scene.add_child(wall));

        self.setup_blocks();

        log::info!(
            "Scene ready: {}x{} frame, {} blocks, player at {}",
            frame.x,
            frame.y,
            self.block_count(),
            self.settings.player_position
        );
    }

    fn make_block(&self, position: Vec2) -> Node {
        let size = self.settings.block_size;
        let body = PhysicsBody {
            category: category::BLOCK,
            collision: category::NONE,
            contact_test: category::NONE,
            dynamic: false,
            ..PhysicsBody::rect(size)
        };
        Node::new(EntityKind::Block, position, size).with_body(body)
    }

    fn setup_blocks(&mut self) {
        for position in block_grid(&self.settings) {
            let block = self.make_block(position);
            self.scene.add_child(block);
        }
    }

    /// Where projectiles start
    pub fn player_position(&self) -> Vec2 {
        self.player
            .and_then(|id| self.scene.node(id))
            .map(|n| n.position)
            .unwrap_or(self.settings.player_position)
    }

    /// Handle a touch release; only the first touch counts
    ///
    /// Returns the spawned projectile, if any.
    pub fn touches_ended(&mut self, touches: &[Vec2]) -> Option<NodeId> {
        let &touch = touches.first()?;
        let origin = self.player_position();

        let Some(shot) = aim(origin, touch, self.settings.projectile_range) else {
            log::debug!("Ignoring touch at {} below the player", touch);
            return None;
        };

        let size = Vec2::splat(self.settings.projectile_size);
        let body = PhysicsBody {
            category: category::PROJECTILE,
            contact_test: category::BLOCK | category::WALL,
            collision: category::WALL,
            affected_by_gravity: false,
            precise_collision: true,
            ..PhysicsBody::rect(size)
        };
        let mut projectile = Node::new(EntityKind::Projectile, origin, size).with_body(body);
        projectile.run(Action::sequence([
            Action::move_to(shot.destination, self.settings.projectile_travel_time),
            Action::RemoveFromParent,
        ]));

        let id = self.scene.add_child(projectile);
        log::debug!(
            "Projectile {} fired toward {} (heading {})",
            id,
            shot.destination,
            shot.direction
        );
        Some(id)
    }

    /// Advance node actions; returns how many nodes removed themselves
    pub fn evaluate_actions(&mut self, dt: f32) -> usize {
        self.scene.evaluate_actions(dt).len()
    }

    /// Run one physics step; contacts land in the pending queue
    pub fn simulate_physics(&mut self, time: f64) {
        self.world.step(&mut self.scene, time, &mut self.contacts);
    }

    /// Per-frame hook
    pub fn update(&mut self, current_time: f64) -> ResolveReport {
        self.process_contacts(current_time)
    }

    /// Resolve every pending contact in arrival order and empty the queue
    pub fn process_contacts(&mut self, current_time: f64) -> ResolveReport {
        let mut report = ResolveReport::default();

        for entry in self.contacts.take() {
            report.processed += 1;
            match resolve_contact(&mut self.scene, &entry.contact) {
                Resolution::Stale => {
                    report.stale += 1;
                    log::debug!("Contact {} skipped: a side is gone", entry.seq);
                }
                Resolution::Destroyed(block) => {
                    report.destroyed += 1;
                    log::debug!("Contact {} destroyed block {}", entry.seq, block);
                }
                Resolution::Ignored => {}
            }
        }

        if report.destroyed > 0 {
            log::trace!(
                "{:.3}s: {} block(s) destroyed, {} left",
                current_time,
                report.destroyed,
                self.block_count()
            );
        }

        report
    }

    pub fn pending_contacts(&self) -> &ContactQueue {
        &self.contacts
    }

    pub fn block_count(&self) -> usize {
        self.scene.count(EntityKind::Block)
    }

    pub fn projectile_count(&self) -> usize {
        self.scene.count(EntityKind::Projectile)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            pending_contacts: self.contacts.len(),
            ..self.scene.snapshot()
        }
    }
}

impl ContactDelegate for GameScene {
    fn did_begin(&mut self, contact: Contact) {
        self.contacts.did_begin(contact);
    }
}
