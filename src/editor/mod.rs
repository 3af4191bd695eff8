//! Node-graph editing session core.
//!
//! The session keeps a working copy of a host-owned graph and mutates it in
//! response to [`EditorCommand`]s:
//!
//! - **Viewport**: zoom steps within a fixed range, pan by raw pointer
//!   movement, screen/world conversion
//! - **Wires**: a bidirectional index kept consistent on every connect and
//!   disconnect, plus the click-to-connect protocol with type checks and
//!   SINGLE/MULTI cardinality
//! - **Nodes**: insertion from templates, dragging, z-order, deletion that
//!   severs every wire and purges port geometry
//! - **Command menu**: categorized template search with keyboard navigation
//! - **Execution**: re-runs an external engine after value-affecting edits
//!
//! Every dispatch returns the [`HostChange`]s the host applies to its own
//! [`HostDocument`] so both stay identical.

pub mod command_menu;
pub mod connections;
pub mod execution;
pub mod geometry;
pub mod host;
pub mod nodes;
pub mod operations;
pub mod port_refs;
pub mod state;
pub mod viewport;

pub use command_menu::{CommandMenu, MenuCategory, MenuEntry, UNCATEGORIZED, build_categories};
pub use connections::ConnectionGraph;
pub use execution::{ExecutionEngine, ExecutionOutcome, ExecutionStatus, ExecutionTrigger};
pub use geometry::{Wire, WirePath};
pub use host::{HostChange, HostDocument};
pub use nodes::{DeletedNode, NodeRegistry};
pub use operations::{DispatchOutcome, EditorCommand, Rejection};
pub use port_refs::{MISSING_COORDINATE, PortGeometry, PortReferenceRegistry, TrackedPort};
pub use state::{DragState, EditorSession};
pub use viewport::Viewport;
