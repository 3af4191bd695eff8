//! Ordered list of placed nodes.
//!
//! List order is z-order: the last node is drawn on top.

use crate::model::{ConnectionDetails, Direction, NodeInstance, Point, Port};

use super::connections::ConnectionGraph;
use super::operations::Rejection;
use super::port_refs::PortReferenceRegistry;

/// What a successful delete removed.
#[derive(Debug, Clone, PartialEq)]
pub struct DeletedNode {
    pub node: NodeInstance,
    /// Severed wires as `(output, input)` pairs.
    pub severed: Vec<(ConnectionDetails, ConnectionDetails)>,
    /// Port references purged from the registry.
    pub purged_refs: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRegistry {
    nodes: Vec<NodeInstance>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_nodes(nodes: Vec<NodeInstance>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[NodeInstance] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, node_id: &str) -> Option<&NodeInstance> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn get_mut(&mut self, node_id: &str) -> Option<&mut NodeInstance> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    pub fn index_of(&self, node_id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == node_id)
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index_of(node_id).is_some()
    }

    /// Append a node; it becomes the topmost.
    pub fn add(&mut self, node: NodeInstance) {
        self.nodes.push(node);
    }

    /// Set a node's world position.
    pub fn move_to(&mut self, node_id: &str, position: Point) -> bool {
        match self.get_mut(node_id) {
            Some(node) => {
                node.position = position;
                true
            }
            None => false,
        }
    }

    /// Move the node at `index` to the end of the list, keeping the relative
    /// order of the others. Returns the raised node's id.
    pub fn reorder(&mut self, index: usize) -> Option<&str> {
        if index >= self.nodes.len() {
            return None;
        }
        let node = self.nodes.remove(index);
        self.nodes.push(node);
        self.nodes.last().map(|n| n.id.as_str())
    }

    /// Port behind a locator, or [`Port::missing`] when the node or slot is
    /// gone.
    pub fn port(&self, port: &ConnectionDetails) -> Port {
        self.get(&port.node_id)
            .and_then(|n| n.ports(port.direction).get(port.index))
            .cloned()
            .unwrap_or_else(Port::missing)
    }

    /// Replace one port's data payload.
    pub fn set_port_data(
        &mut self,
        node_id: &str,
        direction: Direction,
        index: usize,
        data: serde_json::Value,
    ) -> Result<(), Rejection> {
        let node = self
            .get_mut(node_id)
            .ok_or_else(|| Rejection::UnknownNode(node_id.to_string()))?;
        let port = node
            .ports_mut(direction)
            .get_mut(index)
            .ok_or_else(|| Rejection::UnknownPort(crate::model::io_id(node_id, direction, index)))?;
        port.data = data;
        Ok(())
    }

    /// Store a computed value on a port. Unknown ports are ignored.
    pub fn set_port_value(&mut self, port: &ConnectionDetails, value: serde_json::Value) -> bool {
        let slot = self
            .get_mut(&port.node_id)
            .and_then(|n| n.ports_mut(port.direction).get_mut(port.index));
        match slot {
            Some(slot) => {
                slot.value = value;
                true
            }
            None => false,
        }
    }

    /// Delete a node, severing its wires and purging its port references.
    ///
    /// Locked and unknown nodes are refused before anything is touched.
    pub fn delete(
        &mut self,
        node_id: &str,
        connections: &mut ConnectionGraph,
        port_refs: &mut PortReferenceRegistry,
    ) -> Result<DeletedNode, Rejection> {
        let index = self
            .index_of(node_id)
            .ok_or_else(|| Rejection::UnknownNode(node_id.to_string()))?;
        if self.nodes[index].locked {
            return Err(Rejection::NodeLocked(node_id.to_string()));
        }

        let node = self.nodes.remove(index);
        let (inputs, outputs) = node.extract_ports();

        let mut severed = Vec::new();
        for port in inputs.iter().chain(outputs.iter()) {
            severed.extend(connections.disconnect_all(port));
        }

        let purged_refs = inputs
            .iter()
            .chain(outputs.iter())
            .filter(|port| port_refs.remove(&port.io_id))
            .count();

        Ok(DeletedNode {
            node,
            severed,
            purged_refs,
        })
    }
}
