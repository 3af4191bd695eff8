//! Editor commands and rejection diagnostics.
//!
//! Every interaction the renderer observes is turned into an
//! [`EditorCommand`] and handed to [`EditorSession::dispatch`]. Commands are
//! plain data, so an interaction sequence can be recorded and replayed.
//!
//! [`EditorSession::dispatch`]: super::state::EditorSession::dispatch

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PointerButton;
use crate::model::{ConnectionDetails, Direction, NodeId, Point, TemplateId};

use super::host::HostChange;

/// A single interaction, dispatched to the session reducer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EditorCommand {
    // ── Pointer ──────────────────────────────────────────────────────────
    /// A pointer button went down over the canvas.
    PointerDown {
        button: PointerButton,
        position: Point,
    },
    /// The pointer moved to `position` (screen space) by `movement`.
    PointerMove {
        position: Point,
        #[serde(default)]
        movement: Point,
    },
    /// Any pointer button was released, wherever the pointer is.
    PointerUp,
    /// Wheel scroll. Positive `delta_y` raises the zoom one step, anything
    /// else lowers it.
    Wheel { delta_y: f64 },
    /// Click on empty canvas.
    CanvasClick,

    // ── Nodes ────────────────────────────────────────────────────────────
    /// Pointer pressed on a node header.
    BeginDrag { node_id: NodeId, pointer: Point },
    /// Instantiate a template at a screen position.
    InsertTemplate {
        template_id: TemplateId,
        position: Point,
    },
    DeleteNode { node_id: NodeId },
    SetPortData {
        node_id: NodeId,
        direction: Direction,
        index: usize,
        data: serde_json::Value,
    },

    // ── Wires ────────────────────────────────────────────────────────────
    /// Select an output as the source of a new wire.
    ArmOutput { port: ConnectionDetails },
    /// Click on an input port: completes or picks up a wire.
    ClickInput { port: ConnectionDetails },
    Disconnect {
        output: ConnectionDetails,
        input: ConnectionDetails,
    },

    // ── Command menu ─────────────────────────────────────────────────────
    OpenMenu { position: Point },
    CloseMenu,
    MenuSearch { query: String },
    MenuUp,
    MenuDown,
    MenuHover { index: usize },
    MenuEnter,
}

/// Why a command did not change anything.
///
/// Rejections are diagnostics, not failures: the command is simply a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("zoom step would leave the allowed range")]
    ZoomOutOfRange,
    #[error("port types `{output}` and `{input}` do not match")]
    TypeMismatch { output: String, input: String },
    #[error("wire {output} -> {input} already exists")]
    DuplicateWire { output: String, input: String },
    #[error("node {0} is locked")]
    NodeLocked(NodeId),
    #[error("no node with id {0}")]
    UnknownNode(NodeId),
    #[error("no template with id {0}")]
    UnknownTemplate(TemplateId),
    #[error("no port {0}")]
    UnknownPort(String),
    #[error("no wire {output} -> {input}")]
    NoSuchWire { output: String, input: String },
    #[error("no output is armed and the input has no wire to pick up")]
    NothingArmed,
    #[error("no menu entry is selected")]
    NothingSelected,
}

/// Result of dispatching one command.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Changes the host must apply to stay in lockstep.
    pub changes: Vec<HostChange>,
    pub rejection: Option<Rejection>,
}

impl DispatchOutcome {
    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}
