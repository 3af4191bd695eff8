//! Embeddable node-and-wire graph editor core.
//!
//! This crate provides an [`editor::EditorSession`] that tracks nodes, wires,
//! port geometry and the viewport of a visual graph editor. Rendering and
//! graph evaluation stay with the host.
//!
//! The binary `nodecanvas` replays a recorded command script against a
//! document and prints the result as JSON.

pub mod config;
pub mod editor;
pub mod model;
pub mod replay;
