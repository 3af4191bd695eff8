//! Editing session state.
//!
//! [`EditorSession`] owns the working copy of the graph (nodes, wires, port
//! references), the viewport, the command menu and the in-progress pointer
//! interactions. All interaction goes through [`EditorSession::dispatch`],
//! which returns the host changes needed to keep the host document in
//! lockstep.

use std::rc::Rc;

use crate::config::EditorConfig;
use crate::model::{
    ConnectionDetails, Direction, Mapping, NodeId, NodeInstance, Point, TemplateCatalog,
};

use super::command_menu::CommandMenu;
use super::connections::ConnectionGraph;
use super::execution::{ExecutionEngine, ExecutionStatus, ExecutionTrigger};
use super::geometry::{Wire, WirePath};
use super::host::{ChangeTracker, HostDocument};
use super::nodes::NodeRegistry;
use super::operations::{DispatchOutcome, EditorCommand, Rejection};
use super::port_refs::{MISSING_COORDINATE, PortGeometry, PortReferenceRegistry};
use super::viewport::Viewport;

/// Result of handling one command: whether computed values may be stale.
type Handled = Result<bool, Rejection>;

// ────────────────────────────────────────────────────────────────────────────
// Drag state
// ────────────────────────────────────────────────────────────────────────────

/// The node currently following the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DragState {
    pub node_id: NodeId,
    /// Pointer position minus the node's screen position at drag start.
    pub offset: Point,
}

// ────────────────────────────────────────────────────────────────────────────
// EditorSession
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct EditorSession {
    config: EditorConfig,
    templates: TemplateCatalog,
    viewport: Viewport,
    nodes: NodeRegistry,
    connections: ConnectionGraph,
    port_refs: PortReferenceRegistry,
    menu: CommandMenu,
    execution: ExecutionTrigger,
    drag: Option<DragState>,
    /// Output selected as the source of the wire being drawn.
    armed: Option<ConnectionDetails>,
    preview: Option<WirePath>,
    /// Last known pointer position (screen space).
    pointer: Point,
}

impl EditorSession {
    /// Empty session.
    pub fn new(config: EditorConfig, templates: TemplateCatalog) -> Self {
        Self::check_out(config, templates, &HostDocument::new())
    }

    /// Session working on a copy of the host's document.
    pub fn check_out(
        config: EditorConfig,
        templates: TemplateCatalog,
        document: &HostDocument,
    ) -> Self {
        let menu = CommandMenu::new(&templates);
        let execution = ExecutionTrigger::new(config.entry_node.clone(), config.debug_execution);
        Self {
            viewport: Viewport::from_config(&config),
            nodes: NodeRegistry::from_nodes(document.nodes.values().cloned().collect()),
            connections: document.connections.clone(),
            port_refs: PortReferenceRegistry::new(),
            menu,
            execution,
            drag: None,
            armed: None,
            preview: None,
            pointer: Point::default(),
            config,
            templates,
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn ExecutionEngine>) -> Self {
        self.execution.set_engine(engine);
        self
    }

    pub fn set_engine(&mut self, engine: Box<dyn ExecutionEngine>) {
        self.execution.set_engine(engine);
    }

    pub fn set_entry_node(&mut self, entry_node: Option<NodeId>) {
        self.execution.set_entry_node(entry_node);
    }

    /// The session's graph in host document form.
    pub fn snapshot(&self) -> HostDocument {
        HostDocument {
            nodes: self
                .nodes
                .nodes()
                .iter()
                .map(|n| (n.id.clone(), n.clone()))
                .collect(),
            connections: self.connections.clone(),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn templates(&self) -> &TemplateCatalog {
        &self.templates
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Screen-space top-left of the editor surface, as laid out by the host.
    pub fn set_viewport_origin(&mut self, origin: Point) {
        self.viewport.set_origin(origin);
    }

    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    pub fn connections(&self) -> &ConnectionGraph {
        &self.connections
    }

    pub fn port_refs(&self) -> &PortReferenceRegistry {
        &self.port_refs
    }

    pub fn menu(&self) -> &CommandMenu {
        &self.menu
    }

    pub fn execution_status(&self) -> Option<ExecutionStatus> {
        self.execution.status()
    }

    pub fn drag(&self) -> Option<&DragState> {
        self.drag.as_ref()
    }

    pub fn armed_output(&self) -> Option<&ConnectionDetails> {
        self.armed.as_ref()
    }

    /// Wire following the pointer while an output is armed.
    pub fn preview(&self) -> Option<&WirePath> {
        self.preview.as_ref()
    }

    // ── Rendering support ────────────────────────────────────────────────

    /// Called by a rendered port on every render; only the first
    /// registration for a port is kept. Ports of nodes that are not placed
    /// are ignored, so a late frame cannot revive a deleted node's entry.
    pub fn register_port(
        &mut self,
        port: &ConnectionDetails,
        geometry: Rc<dyn PortGeometry>,
    ) -> bool {
        if self.check_port(port, port.direction).is_err() {
            return false;
        }
        self.port_refs.register(port.io_id.clone(), geometry)
    }

    /// Where to draw a node, relative to the editor surface.
    pub fn node_placement(&self, node_id: &str) -> Option<Point> {
        self.nodes
            .get(node_id)
            .map(|n| self.viewport.world_to_local(n.position))
    }

    /// Every wire with its curve and colour. The colour is the output port's
    /// own, falling back to what its renderer registered.
    pub fn wires(&self) -> Vec<Wire> {
        self.connections
            .wires()
            .into_iter()
            .map(|(output, input)| {
                let path = WirePath::between(
                    self.wire_point(&output.io_id),
                    self.wire_point(&input.io_id),
                    self.config.curve_divisor,
                );
                let color = self
                    .nodes
                    .port(&output)
                    .color
                    .unwrap_or_else(|| self.port_refs.color(&output.io_id).to_string());
                Wire {
                    output,
                    input,
                    path,
                    color,
                }
            })
            .collect()
    }

    fn wire_point(&self, io_id: &str) -> Point {
        if !self.port_refs.contains(io_id) {
            return Point::new(MISSING_COORDINATE, MISSING_COORDINATE);
        }
        self.viewport.to_wire_space(self.port_refs.position(io_id))
    }

    // ── Dispatch ─────────────────────────────────────────────────────────

    /// Apply one command. Rejected commands change nothing.
    pub fn dispatch(&mut self, command: EditorCommand) -> DispatchOutcome {
        let mut tracker = ChangeTracker::default();
        let rejection = match self.handle(command, &mut tracker) {
            Ok(stale) => {
                if stale || tracker.touches_wires() {
                    self.execute(&mut tracker);
                }
                None
            }
            Err(rejection) => {
                log::debug!("Command rejected: {rejection}");
                Some(rejection)
            }
        };

        let changes = if tracker.is_empty() {
            Vec::new()
        } else {
            let nodes = &self.nodes;
            tracker.finish(|id| nodes.get(id).cloned(), &self.connections)
        };
        DispatchOutcome { changes, rejection }
    }

    fn handle(&mut self, command: EditorCommand, tracker: &mut ChangeTracker) -> Handled {
        match command {
            EditorCommand::PointerDown { button, position } => {
                self.pointer = position;
                if button == self.config.pan_button {
                    self.viewport.set_panning(true);
                }
                Ok(false)
            }
            EditorCommand::PointerMove { position, movement } => {
                self.pointer_moved(position, movement, tracker);
                Ok(false)
            }
            EditorCommand::PointerUp => {
                self.drag = None;
                self.viewport.set_panning(false);
                Ok(false)
            }
            EditorCommand::Wheel { delta_y } => {
                let sign = if delta_y > 0.0 { 1.0 } else { -1.0 };
                if self.viewport.adjust_zoom(sign) {
                    self.update_preview();
                    Ok(false)
                } else {
                    Err(Rejection::ZoomOutOfRange)
                }
            }
            EditorCommand::CanvasClick => {
                self.menu.close();
                self.disarm();
                Ok(false)
            }

            EditorCommand::BeginDrag { node_id, pointer } => {
                self.begin_drag(node_id, pointer, tracker)
            }
            EditorCommand::InsertTemplate {
                template_id,
                position,
            } => self.insert(&template_id, position, tracker),
            EditorCommand::DeleteNode { node_id } => self.delete(&node_id, tracker),
            EditorCommand::SetPortData {
                node_id,
                direction,
                index,
                data,
            } => {
                self.nodes.set_port_data(&node_id, direction, index, data)?;
                tracker.node_upserted(&node_id);
                Ok(true)
            }

            EditorCommand::ArmOutput { port } => {
                self.check_port(&port, Direction::Output)?;
                self.armed = Some(port);
                self.update_preview();
                Ok(false)
            }
            EditorCommand::ClickInput { port } => self.click_input(port, tracker),
            EditorCommand::Disconnect { output, input } => {
                for port in [&output, &input] {
                    if !port.is_consistent() {
                        return Err(Rejection::UnknownPort(port.io_id.clone()));
                    }
                }
                if !self.connections.disconnect(&output, &input) {
                    return Err(Rejection::NoSuchWire {
                        output: output.io_id,
                        input: input.io_id,
                    });
                }
                tracker.wire(&output, &input);
                Ok(false)
            }

            EditorCommand::OpenMenu { position } => {
                self.menu.open_at(&self.templates, position);
                Ok(false)
            }
            EditorCommand::CloseMenu => {
                self.menu.close();
                Ok(false)
            }
            EditorCommand::MenuSearch { query } => {
                self.menu.search(&self.templates, &query);
                Ok(false)
            }
            EditorCommand::MenuUp => {
                self.menu.move_up();
                Ok(false)
            }
            EditorCommand::MenuDown => {
                self.menu.move_down();
                Ok(false)
            }
            EditorCommand::MenuHover { index } => {
                if self.menu.hover(index) {
                    Ok(false)
                } else {
                    Err(Rejection::NothingSelected)
                }
            }
            EditorCommand::MenuEnter => {
                let template_id = self
                    .menu
                    .selected_template()
                    .cloned()
                    .ok_or(Rejection::NothingSelected)?;
                let anchor = self.menu.anchor;
                self.insert(&template_id, anchor, tracker)?;
                self.menu.close();
                Ok(false)
            }
        }
    }

    /// Drag move first, then pan, then the preview wire.
    fn pointer_moved(&mut self, position: Point, movement: Point, tracker: &mut ChangeTracker) {
        self.pointer = position;
        if let Some(drag) = &self.drag {
            let world = self.viewport.screen_to_world(Point::new(
                position.x - drag.offset.x,
                position.y - drag.offset.y,
            ));
            if self.nodes.move_to(&drag.node_id, world) {
                tracker.node_upserted(&drag.node_id);
            }
        }
        self.viewport.accumulate_pan(movement.x, movement.y);
        self.update_preview();
    }

    fn begin_drag(
        &mut self,
        node_id: NodeId,
        pointer: Point,
        tracker: &mut ChangeTracker,
    ) -> Handled {
        let index = self
            .nodes
            .index_of(&node_id)
            .ok_or_else(|| Rejection::UnknownNode(node_id.clone()))?;
        let screen = self.viewport.world_to_screen(self.nodes.nodes()[index].position);
        if index + 1 != self.nodes.len() {
            self.nodes.reorder(index);
            tracker.node_raised(&node_id);
        }
        self.pointer = pointer;
        self.drag = Some(DragState {
            node_id,
            offset: Point::new(pointer.x - screen.x, pointer.y - screen.y),
        });
        Ok(false)
    }

    fn insert(
        &mut self,
        template_id: &str,
        position: Point,
        tracker: &mut ChangeTracker,
    ) -> Handled {
        let template = self
            .templates
            .get(template_id)
            .ok_or_else(|| Rejection::UnknownTemplate(template_id.to_string()))?;
        let node = NodeInstance::from_template(template, self.viewport.screen_to_world(position));
        log::debug!("Inserted {} as node {}", template_id, node.id);
        tracker.node_upserted(&node.id);
        self.nodes.add(node);
        Ok(false)
    }

    fn delete(&mut self, node_id: &str, tracker: &mut ChangeTracker) -> Handled {
        let deleted = self
            .nodes
            .delete(node_id, &mut self.connections, &mut self.port_refs)?;
        log::debug!(
            "Deleted {} node {} ({} wires, {} port refs)",
            deleted.node.template_id,
            node_id,
            deleted.severed.len(),
            deleted.purged_refs
        );
        tracker.node_removed(node_id);
        for (output, input) in &deleted.severed {
            tracker.wire(output, input);
        }
        if self.drag.as_ref().is_some_and(|d| d.node_id == node_id) {
            self.drag = None;
        }
        if self.armed.as_ref().is_some_and(|a| a.node_id == node_id) {
            self.disarm();
        }
        Ok(true)
    }

    /// Complete or pick up a wire at an input port.
    fn click_input(&mut self, input: ConnectionDetails, tracker: &mut ChangeTracker) -> Handled {
        if let Err(rejection) = self.check_port(&input, Direction::Input) {
            self.disarm();
            return Err(rejection);
        }

        let Some(output) = self.disarm() else {
            // Detach the first incoming wire and re-arm its source.
            let Some(source) = self.connections.connections_at(&input).first().cloned() else {
                return Err(Rejection::NothingArmed);
            };
            self.connections.disconnect(&source, &input);
            tracker.wire(&source, &input);
            self.armed = Some(source);
            self.update_preview();
            return Ok(false);
        };

        let output_port = self.nodes.port(&output);
        let input_port = self.nodes.port(&input);
        if !output_port.type_matches(&input_port) {
            return Err(Rejection::TypeMismatch {
                output: output_port.port_type,
                input: input_port.port_type,
            });
        }
        if self.connections.contains(&output, &input) {
            return Err(Rejection::DuplicateWire {
                output: output.io_id,
                input: input.io_id,
            });
        }

        if output_port.mapping == Mapping::Single {
            for (o, i) in self.connections.disconnect_all(&output) {
                tracker.wire(&o, &i);
            }
        }
        if input_port.mapping == Mapping::Single {
            for (o, i) in self.connections.disconnect_all(&input) {
                tracker.wire(&o, &i);
            }
        }
        self.connections.connect(&output, &input);
        tracker.wire(&output, &input);
        log::debug!("Connected {} -> {}", output.io_id, input.io_id);
        Ok(false)
    }

    /// Refuse locators whose id disagrees with their fields, or that point at
    /// no placed port on the expected side.
    fn check_port(&self, port: &ConnectionDetails, direction: Direction) -> Result<(), Rejection> {
        if port.direction != direction
            || !port.is_consistent()
            || self.nodes.port(port).is_missing()
        {
            return Err(Rejection::UnknownPort(port.io_id.clone()));
        }
        Ok(())
    }

    /// Clear the armed output and the preview wire, returning the output.
    fn disarm(&mut self) -> Option<ConnectionDetails> {
        self.preview = None;
        self.armed.take()
    }

    fn update_preview(&mut self) {
        if let Some(armed) = &self.armed {
            let start = self.wire_point(&armed.io_id);
            let end = self.viewport.to_wire_space(self.pointer);
            self.preview = Some(WirePath::between(start, end, self.config.curve_divisor));
        }
    }

    fn execute(&mut self, tracker: &mut ChangeTracker) {
        let Some(outcome) = self
            .execution
            .fire(&self.templates, &self.nodes, &self.connections)
        else {
            return;
        };
        for (port, value) in outcome.values {
            if self.nodes.set_port_value(&port, value) {
                tracker.node_upserted(&port.node_id);
            }
        }
    }
}
