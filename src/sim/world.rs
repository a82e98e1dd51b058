//! Physics world: collision response and contact detection
//!
//! The world never integrates velocity; nodes move through actions. Each
//! step it pushes dynamic bodies out of the static bodies they collide with,
//! then reports pairs that started touching.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;

use super::collision::{
    clamp_inside_loop, closest_point_on_loop, rect_edge_loop_contact, rect_overlap_point,
    separate_rects, swept_rect_contact,
};
use super::contact::{Contact, ContactDelegate};
use super::physics::{BodyShape, PhysicsBody};
use super::scene::SceneGraph;
use super::state::NodeId;
use crate::rects_overlap;

/// Steps physics over a scene graph and reports contacts
pub trait PhysicsWorld {
    /// Run one physics step. Contacts are delivered to `delegate` before
    /// this returns; the delegate must not touch the scene.
    fn step(&mut self, scene: &mut dyn SceneGraph, time: f64, delegate: &mut dyn ContactDelegate);
}

/// Body snapshot taken at the start of a step
#[derive(Debug, Clone)]
struct Collider {
    id: NodeId,
    position: Vec2,
    body: PhysicsBody,
}

/// Overlap-based world for axis-aligned rectangles and edge loops
#[derive(Debug, Clone, Default)]
pub struct OverlapWorld {
    /// Node positions at the end of the previous step (for swept tests)
    previous: BTreeMap<NodeId, Vec2>,
    /// Pairs touching at the end of the previous step
    active: BTreeSet<(NodeId, NodeId)>,
}

impl OverlapWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pairs currently in contact
    pub fn active_pairs(&self) -> usize {
        self.active.len()
    }

    fn colliders(scene: &dyn SceneGraph) -> Vec<Collider> {
        scene
            .children()
            .into_iter()
            .filter_map(|id| {
                let node = scene.node(id)?;
                let body = node.body.clone()?;
                Some(Collider {
                    id,
                    position: node.position,
                    body,
                })
            })
            .collect()
    }

    /// Push dynamic bodies out of the static bodies in their collision mask
    fn resolve_collisions(&self, scene: &mut dyn SceneGraph, colliders: &mut [Collider]) {
        let solids: Vec<Collider> = colliders
            .iter()
            .filter(|c| !c.body.dynamic)
            .cloned()
            .collect();

        for mover in colliders.iter_mut() {
            if !mover.body.dynamic || mover.body.collision == 0 {
                continue;
            }
            let BodyShape::Rect { size } = mover.body.shape else {
                continue;
            };
            let reference = self.previous.get(&mover.id).copied().unwrap_or(mover.position);

            let mut position = mover.position;
            for solid in &solids {
                if !mover.body.collides_with(&solid.body) {
                    continue;
                }
                match solid.body.shape {
                    BodyShape::EdgeLoop { size: loop_size } => {
                        // Edges only hold back bodies that started inside the frame
                        let delta = (reference - solid.position).abs();
                        if delta.x <= loop_size.x * 0.5 && delta.y <= loop_size.y * 0.5 {
                            position = clamp_inside_loop(position, size, solid.position, loop_size);
                        }
                    }
                    BodyShape::Rect { size: solid_size } => {
                        position += separate_rects(position, size, solid.position, solid_size);
                    }
                }
            }

            if position != mover.position {
                mover.position = position;
                if let Some(node) = scene.node_mut(mover.id) {
                    node.position = position;
                }
            }
        }
    }

    /// Contact point if the two bodies overlap at their current positions
    fn overlap(a: &Collider, b: &Collider) -> Option<Vec2> {
        match (a.body.shape, b.body.shape) {
            (BodyShape::Rect { size: sa }, BodyShape::Rect { size: sb }) => {
                rect_overlap_point(a.position, sa, b.position, sb)
            }
            (BodyShape::Rect { size }, BodyShape::EdgeLoop { size: loop_size }) => {
                rect_edge_loop_contact(a.position, size, b.position, loop_size)
            }
            (BodyShape::EdgeLoop { size: loop_size }, BodyShape::Rect { size }) => {
                rect_edge_loop_contact(b.position, size, a.position, loop_size)
            }
            (BodyShape::EdgeLoop { .. }, BodyShape::EdgeLoop { .. }) => None,
        }
    }

    /// Contact point if a precise body passed through the other one since
    /// the previous step without ending up overlapping it
    fn swept(&self, a: &Collider, b: &Collider) -> Option<Vec2> {
        for (mover, target) in [(a, b), (b, a)] {
            if !mover.body.precise_collision || !mover.body.dynamic {
                continue;
            }
            let BodyShape::Rect { size } = mover.body.shape else {
                continue;
            };
            let Some(&from) = self.previous.get(&mover.id) else {
                continue;
            };
            if from == mover.position {
                continue;
            }

            let hit = match target.body.shape {
                BodyShape::Rect { size: target_size } => {
                    swept_rect_contact(from, mover.position, size, target.position, target_size)
                }
                BodyShape::EdgeLoop { size: loop_size } => {
                    // Skipping every edge means leaving the frame entirely
                    let started_inside = rects_overlap(from, size, target.position, loop_size);
                    let ended_outside = !rects_overlap(mover.position, size, target.position, loop_size);
                    (started_inside && ended_outside)
                        .then(|| closest_point_on_loop(mover.position, target.position, loop_size))
                }
            };
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}

impl PhysicsWorld for OverlapWorld {
    fn step(&mut self, scene: &mut dyn SceneGraph, time: f64, delegate: &mut dyn ContactDelegate) {
        let mut colliders = Self::colliders(scene);
        self.resolve_collisions(scene, &mut colliders);

        let mut touching = BTreeSet::new();
        let mut reported = 0usize;

        for (i, a) in colliders.iter().enumerate() {
            for b in &colliders[i + 1..] {
                if !a.body.reports_contact_with(&b.body) {
                    continue;
                }
                let pair = (a.id, b.id);

                let point = match Self::overlap(a, b) {
                    Some(point) => {
                        touching.insert(pair);
                        if self.active.contains(&pair) {
                            continue;
                        }
                        point
                    }
                    // Separating pairs start inside each other; not a new contact
                    None if self.active.contains(&pair) => continue,
                    None => match self.swept(a, b) {
                        Some(point) => point,
                        None => continue,
                    },
                };

                delegate.did_begin(Contact {
                    body_a: a.id,
                    body_b: b.id,
                    point,
                    time,
                });
                reported += 1;
            }
        }

        if reported > 0 {
            log::trace!("Physics step at {:.3}s reported {} contact(s)", time, reported);
        }

        self.active = touching;
        self.previous = colliders.iter().map(|c| (c.id, c.position)).collect();
    }
}
