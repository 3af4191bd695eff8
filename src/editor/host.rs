//! Host write-back.
//!
//! The host owns the document the editor works on. Rather than sharing the
//! session's maps, each dispatch returns a list of [`HostChange`]s and the
//! host applies them to its [`HostDocument`] in one call. Keys are replaced
//! in place, so the maps themselves keep their identity.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::model::{ConnectionDetails, Direction, IoId, NodeId, NodeInstance};

use super::connections::ConnectionGraph;

/// One key-level change to the host document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum HostChange {
    /// Insert or replace a node, keeping its position in the map if present.
    NodeUpserted { node: NodeInstance },
    NodeRemoved { node_id: NodeId },
    /// Move a node to the end of the map (top of the z-order).
    NodeRaised { node_id: NodeId },
    /// Replace one connection key; empty `wires` removes the key.
    WiresChanged {
        direction: Direction,
        io_id: IoId,
        wires: Vec<ConnectionDetails>,
    },
}

/// The host-owned node and connection dictionaries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostDocument {
    #[serde(default)]
    pub nodes: IndexMap<NodeId, NodeInstance>,
    #[serde(default)]
    pub connections: ConnectionGraph,
}

impl HostDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = NodeInstance>) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| (n.id.clone(), n)).collect(),
            connections: ConnectionGraph::new(),
        }
    }

    /// Apply a change list in order.
    pub fn apply(&mut self, changes: &[HostChange]) {
        for change in changes {
            match change {
                HostChange::NodeUpserted { node } => {
                    if let Some(existing) = self.nodes.get_mut(&node.id) {
                        *existing = node.clone();
                    } else {
                        self.nodes.insert(node.id.clone(), node.clone());
                    }
                }
                HostChange::NodeRemoved { node_id } => {
                    self.nodes.shift_remove(node_id);
                }
                HostChange::NodeRaised { node_id } => {
                    if let Some(index) = self.nodes.get_index_of(node_id) {
                        let last = self.nodes.len() - 1;
                        self.nodes.move_index(index, last);
                    }
                }
                HostChange::WiresChanged {
                    direction,
                    io_id,
                    wires,
                } => {
                    self.connections.set_wires(*direction, io_id, wires.clone());
                }
            }
        }
    }
}

/// Collects what a dispatch touched and renders it as [`HostChange`]s once
/// the dispatch is complete, so the host sees final values only.
#[derive(Debug, Default)]
pub(crate) struct ChangeTracker {
    removed: IndexSet<NodeId>,
    upserted: IndexSet<NodeId>,
    raised: IndexSet<NodeId>,
    ports: IndexSet<(Direction, IoId)>,
}

impl ChangeTracker {
    pub(crate) fn node_upserted(&mut self, node_id: &str) {
        self.upserted.insert(node_id.to_string());
    }

    pub(crate) fn node_removed(&mut self, node_id: &str) {
        self.upserted.shift_remove(node_id);
        self.raised.shift_remove(node_id);
        self.removed.insert(node_id.to_string());
    }

    pub(crate) fn node_raised(&mut self, node_id: &str) {
        self.raised.insert(node_id.to_string());
    }

    pub(crate) fn wire(&mut self, output: &ConnectionDetails, input: &ConnectionDetails) {
        self.ports.insert((Direction::Output, output.io_id.clone()));
        self.ports.insert((Direction::Input, input.io_id.clone()));
    }

    pub(crate) fn touches_wires(&self) -> bool {
        !self.ports.is_empty()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.removed.is_empty()
            && self.upserted.is_empty()
            && self.raised.is_empty()
            && self.ports.is_empty()
    }

    /// Render the tracked keys against the session's final state.
    pub(crate) fn finish(
        self,
        nodes: impl Fn(&str) -> Option<NodeInstance>,
        connections: &ConnectionGraph,
    ) -> Vec<HostChange> {
        let mut changes = Vec::new();
        for node_id in self.removed {
            changes.push(HostChange::NodeRemoved { node_id });
        }
        for node_id in &self.upserted {
            if let Some(node) = nodes(node_id) {
                changes.push(HostChange::NodeUpserted { node });
            }
        }
        for node_id in self.raised {
            changes.push(HostChange::NodeRaised { node_id });
        }
        for (direction, io_id) in self.ports {
            let wires = connections.wires_at(direction, &io_id).to_vec();
            changes.push(HostChange::WiresChanged {
                direction,
                io_id,
                wires,
            });
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NodeTemplate, Point};

    fn node(id: &str) -> NodeInstance {
        let mut n = NodeInstance::from_template(&NodeTemplate::new("t", "T"), Point::default());
        n.id = id.to_string();
        n
    }

    #[test]
    fn test_apply_upsert_keeps_position() {
        let mut doc = HostDocument::from_nodes([node("a"), node("b")]);
        let mut moved = node("a");
        moved.position = Point::new(3.0, 4.0);
        doc.apply(&[HostChange::NodeUpserted { node: moved }]);
        assert_eq!(doc.nodes.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(doc.nodes["a"].position, Point::new(3.0, 4.0));
    }

    #[test]
    fn test_apply_raise_and_remove() {
        let mut doc = HostDocument::from_nodes([node("a"), node("b"), node("c")]);
        doc.apply(&[
            HostChange::NodeRaised { node_id: "a".into() },
            HostChange::NodeRemoved { node_id: "b".into() },
        ]);
        assert_eq!(doc.nodes.keys().collect::<Vec<_>>(), vec!["c", "a"]);
    }

    #[test]
    fn test_apply_wires_changed() {
        let mut doc = HostDocument::new();
        let out = ConnectionDetails::output("a", 0);
        let inp = ConnectionDetails::input("b", 0);
        doc.apply(&[
            HostChange::WiresChanged {
                direction: Direction::Output,
                io_id: out.io_id.clone(),
                wires: vec![inp.clone()],
            },
            HostChange::WiresChanged {
                direction: Direction::Input,
                io_id: inp.io_id.clone(),
                wires: vec![out.clone()],
            },
        ]);
        assert!(doc.connections.contains(&out, &inp));
        doc.apply(&[HostChange::WiresChanged {
            direction: Direction::Input,
            io_id: inp.io_id.clone(),
            wires: vec![],
        }]);
        assert!(!doc.connections.input.contains_key("bIN0"));
    }

    #[test]
    fn test_tracker_reports_final_wire_lists() {
        let mut graph = ConnectionGraph::new();
        let out = ConnectionDetails::output("a", 0);
        let inp = ConnectionDetails::input("b", 0);
        let mut tracker = ChangeTracker::default();
        graph.connect(&out, &inp);
        tracker.wire(&out, &inp);
        graph.disconnect(&out, &inp);
        tracker.wire(&out, &inp);
        let changes = tracker.finish(|_| None, &graph);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().all(|c| matches!(
            c,
            HostChange::WiresChanged { wires, .. } if wires.is_empty()
        )));
    }

    #[test]
    fn test_tracker_removal_supersedes_upsert() {
        let mut tracker = ChangeTracker::default();
        tracker.node_upserted("a");
        tracker.node_raised("a");
        tracker.node_removed("a");
        let changes = tracker.finish(|id| Some(node(id)), &ConnectionGraph::new());
        assert_eq!(changes, vec![HostChange::NodeRemoved { node_id: "a".into() }]);
    }
}
