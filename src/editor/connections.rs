//! Bidirectional wire index.
//!
//! Every wire from output `o` to input `i` is stored twice: `i`'s entry in
//! `input` lists `o`, and `o`'s entry in `output` lists `i`. Both entries are
//! added and removed together. Keys with no remaining wires are dropped.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::{ConnectionDetails, Direction, IoId, io_id_belongs_to};

/// Wire registry, shaped `{ input: ioId → [..], output: ioId → [..] }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGraph {
    /// Wires terminating at each input, described by their source output.
    #[serde(default)]
    pub input: IndexMap<IoId, Vec<ConnectionDetails>>,
    /// Wires originating at each output, described by their target input.
    #[serde(default)]
    pub output: IndexMap<IoId, Vec<ConnectionDetails>>,
}

impl ConnectionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn side(&self, direction: Direction) -> &IndexMap<IoId, Vec<ConnectionDetails>> {
        match direction {
            Direction::Input => &self.input,
            Direction::Output => &self.output,
        }
    }

    fn side_mut(&mut self, direction: Direction) -> &mut IndexMap<IoId, Vec<ConnectionDetails>> {
        match direction {
            Direction::Input => &mut self.input,
            Direction::Output => &mut self.output,
        }
    }

    /// All wires touching `port`, in insertion order. For an input these are
    /// the source outputs; for an output, the target inputs.
    pub fn connections_at(&self, port: &ConnectionDetails) -> &[ConnectionDetails] {
        self.wires_at(port.direction, &port.io_id)
    }

    /// Same as [`ConnectionGraph::connections_at`], keyed by id alone.
    pub fn wires_at(&self, direction: Direction, io_id: &str) -> &[ConnectionDetails] {
        self.side(direction).get(io_id).map_or(&[], Vec::as_slice)
    }

    /// Whether a wire `output → input` exists.
    pub fn contains(&self, output: &ConnectionDetails, input: &ConnectionDetails) -> bool {
        self.connections_at(output)
            .iter()
            .any(|c| c.io_id == input.io_id)
    }

    /// Append a wire. Callers validate types and mappings beforehand.
    pub fn connect(&mut self, output: &ConnectionDetails, input: &ConnectionDetails) {
        self.output
            .entry(output.io_id.clone())
            .or_default()
            .push(input.clone());
        self.input
            .entry(input.io_id.clone())
            .or_default()
            .push(output.clone());
    }

    /// Remove the first wire `output → input` from both maps. Returns `false`
    /// when no such wire exists.
    pub fn disconnect(&mut self, output: &ConnectionDetails, input: &ConnectionDetails) -> bool {
        if !self.contains(output, input) {
            return false;
        }
        Self::remove_first(&mut self.output, &output.io_id, &input.io_id);
        Self::remove_first(&mut self.input, &input.io_id, &output.io_id);
        true
    }

    fn remove_first(
        map: &mut IndexMap<IoId, Vec<ConnectionDetails>>,
        key: &str,
        other: &str,
    ) {
        let Some(wires) = map.get_mut(key) else {
            return;
        };
        if let Some(pos) = wires.iter().position(|c| c.io_id == other) {
            wires.remove(pos);
        }
        if wires.is_empty() {
            map.shift_remove(key);
        }
    }

    /// Disconnect every wire touching `port`, returning the removed wires as
    /// `(output, input)` pairs.
    pub fn disconnect_all(
        &mut self,
        port: &ConnectionDetails,
    ) -> Vec<(ConnectionDetails, ConnectionDetails)> {
        let mut removed = Vec::new();
        while let Some(other) = self.connections_at(port).first().cloned() {
            let (output, input) = match port.direction {
                Direction::Input => (other, port.clone()),
                Direction::Output => (port.clone(), other),
            };
            if !self.disconnect(&output, &input) {
                break;
            }
            removed.push((output, input));
        }
        removed
    }

    /// Replace one key's wire list wholesale; an empty list removes the key.
    /// Used when mirroring change sets, not for editing.
    pub(crate) fn set_wires(
        &mut self,
        direction: Direction,
        io_id: &str,
        wires: Vec<ConnectionDetails>,
    ) {
        let side = self.side_mut(direction);
        if wires.is_empty() {
            side.shift_remove(io_id);
        } else if let Some(existing) = side.get_mut(io_id) {
            *existing = wires;
        } else {
            side.insert(io_id.to_string(), wires);
        }
    }

    /// Every wire as `(output, input)`, in output-map order.
    pub fn wires(&self) -> Vec<(ConnectionDetails, ConnectionDetails)> {
        let mut wires = Vec::with_capacity(self.wire_count());
        for (output_id, targets) in &self.output {
            for input in targets {
                // The source's full locator lives in the mirrored input entry.
                let source = self
                    .input
                    .get(&input.io_id)
                    .and_then(|sources| sources.iter().find(|o| &o.io_id == output_id));
                if let Some(output) = source {
                    wires.push((output.clone(), input.clone()));
                }
            }
        }
        wires
    }

    pub fn wire_count(&self) -> usize {
        self.output.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty() && self.output.is_empty()
    }

    /// Whether any key or stored endpoint refers to a port of `node_id`.
    pub fn mentions_node(&self, node_id: &str) -> bool {
        self.input
            .values()
            .chain(self.output.values())
            .flatten()
            .any(|c| c.node_id == node_id)
            || self
                .input
                .keys()
                .chain(self.output.keys())
                .any(|k| io_id_belongs_to(k, node_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn out(node: &str, i: usize) -> ConnectionDetails {
        ConnectionDetails::output(node, i)
    }

    fn inp(node: &str, i: usize) -> ConnectionDetails {
        ConnectionDetails::input(node, i)
    }

    #[test]
    fn test_connect_indexes_both_directions() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("a", 0), &inp("b", 1));
        assert_eq!(g.connections_at(&out("a", 0)), &[inp("b", 1)]);
        assert_eq!(g.connections_at(&inp("b", 1)), &[out("a", 0)]);
        assert!(g.contains(&out("a", 0), &inp("b", 1)));
        assert_eq!(g.wire_count(), 1);
    }

    #[test]
    fn test_disconnect_removes_both_entries() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("a", 0), &inp("b", 0));
        g.connect(&out("a", 0), &inp("c", 0));
        assert!(g.disconnect(&out("a", 0), &inp("b", 0)));
        assert!(g.connections_at(&inp("b", 0)).is_empty());
        assert!(!g.input.contains_key("bIN0"));
        assert_eq!(g.connections_at(&out("a", 0)), &[inp("c", 0)]);
        assert!(g.disconnect(&out("a", 0), &inp("c", 0)));
        assert!(g.is_empty());
    }

    #[test]
    fn test_disconnect_absent_is_noop() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("a", 0), &inp("b", 0));
        let before = g.clone();
        assert!(!g.disconnect(&out("a", 0), &inp("z", 0)));
        assert!(!g.disconnect(&out("q", 0), &inp("b", 0)));
        assert_eq!(g, before);
    }

    #[test]
    fn test_disconnect_acts_on_first_duplicate() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("a", 0), &inp("b", 0));
        g.connect(&out("a", 0), &inp("b", 0));
        assert_eq!(g.wire_count(), 2);
        g.disconnect(&out("a", 0), &inp("b", 0));
        assert_eq!(g.wire_count(), 1);
        assert_eq!(g.connections_at(&inp("b", 0)).len(), 1);
    }

    #[test]
    fn test_disconnect_all_on_input() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("a", 0), &inp("m", 0));
        g.connect(&out("b", 0), &inp("m", 0));
        g.connect(&out("b", 0), &inp("n", 0));
        let removed = g.disconnect_all(&inp("m", 0));
        assert_eq!(removed, vec![(out("a", 0), inp("m", 0)), (out("b", 0), inp("m", 0))]);
        assert_eq!(g.wire_count(), 1);
        assert!(!g.output.contains_key("aOUT0"));
    }

    #[test]
    fn test_wires_lists_every_edge() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("a", 0), &inp("b", 0));
        g.connect(&out("a", 1), &inp("b", 1));
        g.connect(&out("a", 0), &inp("c", 0));
        let wires = g.wires();
        assert_eq!(
            wires,
            vec![
                (out("a", 0), inp("b", 0)),
                (out("a", 0), inp("c", 0)),
                (out("a", 1), inp("b", 1)),
            ]
        );
    }

    #[test]
    fn test_mentions_node() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("ab", 0), &inp("c", 0));
        assert!(g.mentions_node("ab"));
        assert!(g.mentions_node("c"));
        assert!(!g.mentions_node("a"));
    }

    #[test]
    fn test_serialized_shape() {
        let mut g = ConnectionGraph::new();
        g.connect(&out("a", 0), &inp("b", 0));
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["input"]["bIN0"][0]["ioId"], "aOUT0");
        assert_eq!(json["output"]["aOUT0"][0]["type"], "INPUT");
    }
}
