//! Re-evaluation of the graph after edits that can change computed values.
//!
//! The engine itself lives outside this crate; the session only hands it the
//! current templates, nodes and wires and records how the run went.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{ConnectionDetails, NodeId, NodeInstance, TemplateCatalog};

use super::connections::ConnectionGraph;
use super::nodes::NodeRegistry;

/// Status of the most recent engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// Set immediately before the engine is invoked.
    Computing,
    Updated,
    Failed,
}

/// What the engine reports back.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionOutcome {
    pub valid: bool,
    /// Computed port values to store on the session's nodes.
    pub values: Vec<(ConnectionDetails, serde_json::Value)>,
}

/// External graph evaluator.
pub trait ExecutionEngine {
    /// Evaluate the graph starting from `entry_id`. Runs synchronously.
    fn execute(
        &mut self,
        templates: &TemplateCatalog,
        nodes: &[NodeInstance],
        connections: &ConnectionGraph,
        entry_id: &str,
        debug: bool,
    ) -> ExecutionOutcome;
}

/// Invokes the engine when an entry point is configured and present.
#[derive(Default)]
pub struct ExecutionTrigger {
    engine: Option<Box<dyn ExecutionEngine>>,
    entry_node: Option<NodeId>,
    debug: bool,
    status: Option<ExecutionStatus>,
}

impl fmt::Debug for ExecutionTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionTrigger")
            .field("engine", &self.engine.is_some())
            .field("entry_node", &self.entry_node)
            .field("debug", &self.debug)
            .field("status", &self.status)
            .finish()
    }
}

impl ExecutionTrigger {
    pub fn new(entry_node: Option<NodeId>, debug: bool) -> Self {
        Self {
            engine: None,
            entry_node,
            debug,
            status: None,
        }
    }

    pub fn set_engine(&mut self, engine: Box<dyn ExecutionEngine>) {
        self.engine = Some(engine);
    }

    pub fn set_entry_node(&mut self, entry_node: Option<NodeId>) {
        self.entry_node = entry_node;
    }

    /// `None` until the first run.
    pub fn status(&self) -> Option<ExecutionStatus> {
        self.status
    }

    /// Run the engine if it can run. Returns its outcome, or `None` when
    /// there is no engine, no entry point, or the entry node is not placed.
    pub fn fire(
        &mut self,
        templates: &TemplateCatalog,
        nodes: &NodeRegistry,
        connections: &ConnectionGraph,
    ) -> Option<ExecutionOutcome> {
        let engine = self.engine.as_mut()?;
        let entry_id = self.entry_node.as_deref()?;
        if !nodes.contains(entry_id) {
            log::debug!("Entry node {entry_id} is not placed; skipping execution");
            return None;
        }

        self.status = Some(ExecutionStatus::Computing);
        log::debug!("Executing graph from {entry_id}");
        let outcome = engine.execute(templates, nodes.nodes(), connections, entry_id, self.debug);
        let status = if outcome.valid {
            ExecutionStatus::Updated
        } else {
            log::info!("Graph execution from {entry_id} failed");
            ExecutionStatus::Failed
        };
        log::debug!("Execution status: {status:?}");
        self.status = Some(status);
        Some(outcome)
    }
}
