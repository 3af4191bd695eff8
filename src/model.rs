use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque node instance identifier.
pub type NodeId = String;

/// Composite port identifier: node id + direction + index.
pub type IoId = String;

/// Template identifier (key into the [`TemplateCatalog`]).
pub type TemplateId = String;

/// Host-owned, read-only catalog of node templates. Iteration order is the
/// catalog order used by the command menu.
pub type TemplateCatalog = IndexMap<TemplateId, NodeTemplate>;

// ────────────────────────────────────────────────────────────────────────────
// Geometry primitives
// ────────────────────────────────────────────────────────────────────────────

/// A 2D point. Whether it lives in screen or world space depends on context.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ports
// ────────────────────────────────────────────────────────────────────────────

/// Which side of a node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Input,
    Output,
}

impl Direction {
    /// Tag used inside an [`IoId`].
    pub fn tag(self) -> &'static str {
        match self {
            Direction::Input => "IN",
            Direction::Output => "OUT",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Cardinality rule of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mapping {
    /// At most one wire.
    #[default]
    Single,
    /// Unbounded wires.
    Multi,
}

/// Runtime copy of a port on a placed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    /// Type tag. Ports only connect when tags are equal and non-empty.
    #[serde(rename = "type")]
    pub port_type: String,
    #[serde(default)]
    pub mapping: Mapping,
    /// Side-channel payload edited by the user.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Value computed by the execution engine.
    #[serde(default)]
    pub value: serde_json::Value,
    /// Wire colour for wires leaving this port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Port {
    pub fn new(port_type: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            port_type: port_type.into(),
            mapping,
            data: serde_json::Value::Null,
            value: serde_json::Value::Null,
            color: None,
        }
    }

    /// Port returned for lookups that do not resolve. Its empty type tag
    /// never matches anything.
    pub fn missing() -> Self {
        Self::new("", Mapping::Single)
    }

    pub fn is_missing(&self) -> bool {
        self.port_type.is_empty()
    }

    /// Whether a wire may run between `self` and `other` by type tag.
    pub fn type_matches(&self, other: &Port) -> bool {
        !self.port_type.is_empty() && self.port_type == other.port_type
    }
}

/// Stable locator for a port, independent of screen geometry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDetails {
    pub node_id: NodeId,
    #[serde(rename = "type")]
    pub direction: Direction,
    pub index: usize,
    pub io_id: IoId,
}

impl ConnectionDetails {
    pub fn new(node_id: impl Into<NodeId>, direction: Direction, index: usize) -> Self {
        let node_id = node_id.into();
        let io_id = io_id(&node_id, direction, index);
        Self {
            node_id,
            direction,
            index,
            io_id,
        }
    }

    pub fn input(node_id: impl Into<NodeId>, index: usize) -> Self {
        Self::new(node_id, Direction::Input, index)
    }

    pub fn output(node_id: impl Into<NodeId>, index: usize) -> Self {
        Self::new(node_id, Direction::Output, index)
    }

    /// Whether `io_id` is the id built from the other fields.
    pub fn is_consistent(&self) -> bool {
        self.io_id == io_id(&self.node_id, self.direction, self.index)
    }
}

/// Build the composite identifier of a port.
pub fn io_id(node_id: &str, direction: Direction, index: usize) -> IoId {
    format!("{}{}{}", node_id, direction.tag(), index)
}

/// Whether `io_id` names one of `node_id`'s ports.
pub fn io_id_belongs_to(io_id: &str, node_id: &str) -> bool {
    let Some(rest) = io_id.strip_prefix(node_id) else {
        return false;
    };
    [Direction::Input, Direction::Output].iter().any(|d| {
        rest.strip_prefix(d.tag())
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Templates
// ────────────────────────────────────────────────────────────────────────────

/// How the engine schedules re-evaluation of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UpdateType {
    #[default]
    Dynamic,
    Static,
}

/// Port slot declared by a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortTemplate {
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub port_type: String,
    #[serde(default)]
    pub mapping: Mapping,
    /// Default data copied into new instances.
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub value: serde_json::Value,
    /// Colour of the port and of wires leaving it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PortTemplate {
    pub fn new(label: impl Into<String>, port_type: impl Into<String>, mapping: Mapping) -> Self {
        Self {
            label: label.into(),
            port_type: port_type.into(),
            mapping,
            data: serde_json::Value::Null,
            value: serde_json::Value::Null,
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    fn instantiate(&self) -> Port {
        Port {
            port_type: self.port_type.clone(),
            mapping: self.mapping,
            data: self.data.clone(),
            value: self.value.clone(),
            color: self.color.clone(),
        }
    }
}

/// A kind of node the user can insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplate {
    pub id: TemplateId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Menu category; `None` lands in the catch-all category.
    #[serde(default)]
    pub category: Option<String>,
    /// Private templates are hidden from the command menu.
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub update_type: UpdateType,
    #[serde(default)]
    pub inputs: Vec<PortTemplate>,
    #[serde(default)]
    pub outputs: Vec<PortTemplate>,
}

impl NodeTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: None,
            private: false,
            update_type: UpdateType::Dynamic,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Case-insensitive substring match on the template name only.
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&query.to_lowercase())
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_input(mut self, port: PortTemplate) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn with_output(mut self, port: PortTemplate) -> Self {
        self.outputs.push(port);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Node instances
// ────────────────────────────────────────────────────────────────────────────

/// A node placed in the editing session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstance {
    pub id: NodeId,
    pub template_id: TemplateId,
    #[serde(default)]
    pub update_type: UpdateType,
    /// World-space position.
    pub position: Point,
    /// Locked nodes cannot be deleted.
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub inputs: Vec<Port>,
    #[serde(default)]
    pub outputs: Vec<Port>,
}

impl NodeInstance {
    /// Instantiate `template` at a world-space position with a fresh id.
    pub fn from_template(template: &NodeTemplate, position: Point) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            template_id: template.id.clone(),
            update_type: template.update_type,
            position,
            locked: false,
            inputs: template.inputs.iter().map(PortTemplate::instantiate).collect(),
            outputs: template.outputs.iter().map(PortTemplate::instantiate).collect(),
        }
    }

    pub fn ports(&self, direction: Direction) -> &[Port] {
        match direction {
            Direction::Input => &self.inputs,
            Direction::Output => &self.outputs,
        }
    }

    pub fn ports_mut(&mut self, direction: Direction) -> &mut Vec<Port> {
        match direction {
            Direction::Input => &mut self.inputs,
            Direction::Output => &mut self.outputs,
        }
    }

    /// Locators for every port of this node, `(inputs, outputs)`.
    pub fn extract_ports(&self) -> (Vec<ConnectionDetails>, Vec<ConnectionDetails>) {
        let inputs = (0..self.inputs.len())
            .map(|i| ConnectionDetails::input(self.id.clone(), i))
            .collect();
        let outputs = (0..self.outputs.len())
            .map(|i| ConnectionDetails::output(self.id.clone(), i))
            .collect();
        (inputs, outputs)
    }
}
