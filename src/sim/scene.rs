//! Scene graph
//!
//! A node is attached while the scene holds it. Removal destroys it: the id
//! stays unknown to the scene afterwards, so stale references are detectable.

use std::collections::BTreeMap;

use super::action::ActionStatus;
use super::state::{EntityKind, Node, NodeId, NodeSnapshot, SceneSnapshot};

/// Node hierarchy operations the simulation relies on
pub trait SceneGraph {
    /// Attach a node and return its new id
    fn add_child(&mut self, node: Node) -> NodeId;
    /// Detach a node; returns false if it was not attached
    fn remove_from_parent(&mut self, id: NodeId) -> bool;
    fn is_attached(&self, id: NodeId) -> bool;
    fn node(&self, id: NodeId) -> Option<&Node>;
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node>;
    /// Attached node ids in ascending order
    fn children(&self) -> Vec<NodeId>;

    fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.name.as_str())
    }
}

/// In-memory scene graph with deterministic (id-ordered) iteration
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: BTreeMap<NodeId, Node>,
    next_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            nodes: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, node)| (*id, node))
    }

    /// Number of attached nodes of a kind
    pub fn count(&self, kind: EntityKind) -> usize {
        self.nodes.values().filter(|n| n.kind == kind).count()
    }

    /// Ids of attached nodes of a kind
    pub fn ids_of(&self, kind: EntityKind) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, n)| n.kind == kind)
            .map(|(id, _)| id)
            .collect()
    }

    /// Advance every running action by `dt`; returns the ids of nodes that
    /// removed themselves
    pub fn evaluate_actions(&mut self, dt: f32) -> Vec<NodeId> {
        let mut removed = Vec::new();

        for (id, node) in self.nodes.iter_mut() {
            let Some(runner) = node.action.as_mut() else {
                continue;
            };
            match runner.advance(&mut node.position, dt) {
                ActionStatus::Running => {}
                ActionStatus::Finished => node.action = None,
                ActionStatus::RemoveFromParent => removed.push(*id),
            }
        }

        for id in &removed {
            self.nodes.remove(id);
            log::trace!("Node {} removed by its action", id);
        }

        removed
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            nodes: self
                .iter()
                .map(|(id, node)| NodeSnapshot {
                    id,
                    kind: node.kind,
                    name: node.name.clone(),
                    position: node.position,
                    size: node.size,
                    body: node.body.clone(),
                })
                .collect(),
            pending_contacts: 0,
        }
    }
}

impl SceneGraph for Scene {
    fn add_child(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    fn remove_from_parent(&mut self, id: NodeId) -> bool {
        self.nodes.remove(&id).is_some()
    }

    fn is_attached(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    fn children(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::action::Action;
    use glam::Vec2;

    fn block_at(x: f32) -> Node {
        Node::new(EntityKind::Block, Vec2::new(x, 0.0), Vec2::splat(50.0))
    }

    #[test]
    fn test_ids_are_never_reused() {
        let mut scene = Scene::new();
        let a = scene.add_child(block_at(0.0));
        assert!(scene.remove_from_parent(a));
        let b = scene.add_child(block_at(0.0));
        assert_ne!(a, b);
        assert!(!scene.is_attached(a));
        assert!(scene.is_attached(b));
    }

    #[test]
    fn test_double_remove_is_noop() {
        let mut scene = Scene::new();
        let a = scene.add_child(block_at(0.0));
        assert!(scene.remove_from_parent(a));
        assert!(!scene.remove_from_parent(a));
        assert!(scene.is_empty());
    }

    #[test]
    fn test_name_lookup() {
        let mut scene = Scene::new();
        let a = scene.add_child(block_at(0.0));
        assert_eq!(scene.name(a), Some("Block"));
        scene.remove_from_parent(a);
        assert_eq!(scene.name(a), None);
    }

    #[test]
    fn test_children_sorted() {
        let mut scene = Scene::new();
        let ids: Vec<_> = (0..4).map(|i| scene.add_child(block_at(i as f32))).collect();
        assert_eq!(scene.children(), ids);
        assert_eq!(scene.count(EntityKind::Block), 4);
    }

    #[test]
    fn test_evaluate_actions_removes_finished_sequences() {
        let mut scene = Scene::new();
        let mut node = Node::new(EntityKind::Projectile, Vec2::ZERO, Vec2::splat(25.0));
        node.run(Action::sequence([
            Action::move_to(Vec2::new(0.0, 100.0), 1.0),
            Action::RemoveFromParent,
        ]));
        let id = scene.add_child(node);

        assert!(scene.evaluate_actions(0.5).is_empty());
        let pos = scene.node(id).map(|n| n.position).unwrap_or_default();
        assert!((pos.y - 50.0).abs() < 1e-3);

        assert_eq!(scene.evaluate_actions(0.6), vec![id]);
        assert!(!scene.is_attached(id));
    }
}
