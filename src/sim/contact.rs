//! Contact events and the pending-contact queue
//!
//! The physics step reports contacts through [`ContactDelegate`] while it is
//! still walking the body list, so the delegate only records them. The
//! scene controller resolves the queue afterwards in its update hook.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::NodeId;

/// Two bodies started touching
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Lower node id of the pair
    pub body_a: NodeId,
    pub body_b: NodeId,
    /// Approximate world-space contact point
    pub point: Vec2,
    /// Simulation time of the step that found it
    pub time: f64,
}

impl Contact {
    pub fn involves(&self, id: NodeId) -> bool {
        self.body_a == id || self.body_b == id
    }

    /// The other side of the pair
    pub fn other(&self, id: NodeId) -> Option<NodeId> {
        if self.body_a == id {
            Some(self.body_b)
        } else if self.body_b == id {
            Some(self.body_a)
        } else {
            None
        }
    }
}

/// Receives contact-begin notifications from a physics step
pub trait ContactDelegate {
    fn did_begin(&mut self, contact: Contact);
}

/// A queued contact tagged with its enqueue order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueuedContact {
    pub seq: u64,
    pub contact: Contact,
}

/// Contacts awaiting resolution, in arrival order
#[derive(Debug, Clone, Default)]
pub struct ContactQueue {
    entries: Vec<QueuedContact>,
    next_seq: u64,
}

impl ContactQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a contact; returns its sequence id
    pub fn push(&mut self, contact: Contact) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(QueuedContact { seq, contact });
        seq
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedContact> {
        self.entries.iter()
    }

    pub fn contains(&self, seq: u64) -> bool {
        self.entries.iter().any(|e| e.seq == seq)
    }

    /// Whether any queued contact references the node
    pub fn references(&self, id: NodeId) -> bool {
        self.entries.iter().any(|e| e.contact.involves(id))
    }

    /// Take every queued contact, leaving the queue empty
    pub fn take(&mut self) -> Vec<QueuedContact> {
        std::mem::take(&mut self.entries)
    }
}

impl ContactDelegate for ContactQueue {
    fn did_begin(&mut self, contact: Contact) {
        self.push(contact);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(a: u32, b: u32) -> Contact {
        Contact {
            body_a: NodeId(a),
            body_b: NodeId(b),
            point: Vec2::ZERO,
            time: 0.0,
        }
    }

    #[test]
    fn test_sequence_ids_increase_across_takes() {
        let mut queue = ContactQueue::new();
        assert_eq!(queue.push(contact(1, 2)), 0);
        // Identical contacts still get distinct ids
        assert_eq!(queue.push(contact(1, 2)), 1);
        let taken = queue.take();
        assert_eq!(taken.len(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.push(contact(1, 2)), 2);
        assert!(queue.contains(2));
        assert!(!queue.contains(0));
    }

    #[test]
    fn test_delegate_appends_in_order() {
        let mut queue = ContactQueue::new();
        queue.did_begin(contact(1, 5));
        queue.did_begin(contact(2, 5));
        let seqs: Vec<_> = queue.iter().map(|e| e.contact.body_a.0).collect();
        assert_eq!(seqs, vec![1, 2]);
        assert!(queue.references(NodeId(5)));
        assert!(!queue.references(NodeId(9)));
    }

    #[test]
    fn test_other_side() {
        let c = contact(3, 7);
        assert_eq!(c.other(NodeId(3)), Some(NodeId(7)));
        assert_eq!(c.other(NodeId(7)), Some(NodeId(3)));
        assert_eq!(c.other(NodeId(1)), None);
    }
}
