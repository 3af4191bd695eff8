//! Recorded command scripts.
//!
//! A script bundles a template catalog, a starting host document and a list
//! of commands. Replaying it checks out a session, dispatches every command
//! and applies the resulting changes to the document, exactly as a host
//! would.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::editor::{EditorCommand, EditorSession, HostDocument};
use crate::model::TemplateCatalog;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub templates: TemplateCatalog,
    #[serde(default)]
    pub document: HostDocument,
    #[serde(default)]
    pub commands: Vec<EditorCommand>,
}

/// A command that did not apply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedCommand {
    /// Position in the script.
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub document: HostDocument,
    pub rejected: Vec<RejectedCommand>,
}

impl ReplayScript {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Parse replay script")
    }

    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_context(|| format!("Read {}", path))?;
        Self::from_json_str(&text).with_context(|| format!("Failed to load {}", path))
    }

    /// Dispatch every command against a session checked out from
    /// `self.document`, mirroring each outcome into a copy of the document.
    pub fn run(self, config: EditorConfig) -> ReplayReport {
        let mut document = self.document;
        let mut session = EditorSession::check_out(config, self.templates, &document);
        let mut rejected = Vec::new();
        for (index, command) in self.commands.into_iter().enumerate() {
            let outcome = session.dispatch(command);
            document.apply(&outcome.changes);
            if let Some(rejection) = outcome.rejection {
                log::warn!("Command {index} rejected: {rejection}");
                rejected.push(RejectedCommand {
                    index,
                    reason: rejection.to_string(),
                });
            }
        }
        log::info!(
            "Replayed script: {} nodes, {} wires, {} rejected",
            document.nodes.len(),
            document.connections.wire_count(),
            rejected.len()
        );
        ReplayReport { document, rejected }
    }
}
