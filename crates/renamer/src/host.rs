//! Host collaborators: scene enumeration, rename execution and the naming
//! rule engine used by automatic renames.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::batch::RenameItem;
use crate::error::{RenameError, Result};
use crate::naming::NameUniverse;

/// Node enumeration side of a host scene.
pub trait SceneNodes {
    fn node_exists(&self, name: &str) -> bool;
    fn node_names(&self) -> Vec<String>;
}

/// Performs the host-side rename once a name has been resolved.
pub trait RenameExecutor {
    fn rename_node(&mut self, old: &str, new: &str) -> Result<()>;
}

/// Tokens handed to a [`RuleEngine`] for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTokens {
    pub description: String,
    pub side: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    pub id: Option<u32>,
}

/// Turns rule tokens into a name. `None` means the rule cannot name the node.
pub trait RuleEngine {
    fn solve(&self, tokens: &RuleTokens) -> Option<String>;
}

/// View of a scene as a name universe.
pub struct SceneUniverse<'a, S: ?Sized>(pub &'a S);

impl<S: SceneNodes + ?Sized> NameUniverse for SceneUniverse<'_, S> {
    fn contains(&self, name: &str) -> bool {
        self.0.node_exists(name)
    }
}

/// Scene held in memory; stands in for a host during dry runs and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    nodes: BTreeSet<String>,
}

impl MemoryScene {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nodes: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.nodes.insert(name.into())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SceneNodes for MemoryScene {
    fn node_exists(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    fn node_names(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }
}

impl RenameExecutor for MemoryScene {
    fn rename_node(&mut self, old: &str, new: &str) -> Result<()> {
        if !self.nodes.contains(old) {
            return Err(RenameError::NodeMissing(old.to_string()));
        }
        if self.nodes.contains(new) {
            return Err(RenameError::NameTaken(new.to_string()));
        }
        self.nodes.remove(old);
        self.nodes.insert(new.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameFailure {
    pub id: String,
    pub from: String,
    pub to: String,
    pub error: String,
}

/// Outcome of applying a batch of previews to a host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenameReport {
    pub renamed: usize,
    pub skipped: usize,
    pub failed: Vec<RenameFailure>,
}

/// Rename every item whose preview differs from its current name.
///
/// Failures are logged and collected; the remaining items are still renamed.
/// Renamed items take the preview as their new display name.
pub fn apply_plan<E: RenameExecutor + ?Sized>(
    items: &mut [RenameItem],
    host: &mut E,
) -> RenameReport {
    let mut report = RenameReport::default();
    for item in items.iter_mut() {
        if !item.needs_rename() {
            report.skipped += 1;
            continue;
        }
        let Some(new_name) = item.resolved_name.take() else {
            continue;
        };
        match host.rename_node(&item.display_name, &new_name) {
            Ok(()) => {
                tracing::debug!("renamed {} -> {}", item.display_name, new_name);
                item.display_name = new_name;
                report.renamed += 1;
            }
            Err(e) => {
                tracing::warn!(
                    "impossible to rename {} to {}: {}",
                    item.display_name,
                    new_name,
                    e
                );
                report.failed.push(RenameFailure {
                    id: item.canonical_id.clone(),
                    from: item.display_name.clone(),
                    to: new_name.clone(),
                    error: e.to_string(),
                });
                item.resolved_name = Some(new_name);
            }
        }
    }
    tracing::info!(
        "rename applied: {} renamed, {} skipped, {} failed",
        report.renamed,
        report.skipped,
        report.failed.len()
    );
    report
}
