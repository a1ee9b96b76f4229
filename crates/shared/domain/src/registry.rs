//! Entries held by the task definition and problem matcher registries.
//!
//! The schema core reads names only; the remaining fields belong to the
//! contributors and travel along untouched.

use serde::{Deserialize, Serialize};

/// A named problem matcher contributed to the local registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMatcherEntry {
    /// Registry name, with or without the leading sigil.
    pub name: String,
    /// Diagnostics owner (e.g. `typescript`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    /// Name of a matcher this one extends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

impl ProblemMatcherEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), owner: None, base: None }
    }

    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }
}

/// A task type contributed to the local task definition registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDefinitionEntry {
    /// The `type` value a task entry uses to target this backend.
    pub task_type: String,
    /// Property names a task of this type must define.
    #[serde(default)]
    pub required: Vec<String>,
    /// Property names a task of this type understands.
    #[serde(default)]
    pub properties: Vec<String>,
}

impl TaskDefinitionEntry {
    pub fn new(task_type: impl Into<String>) -> Self {
        Self { task_type: task_type.into(), required: Vec::new(), properties: Vec::new() }
    }

    #[must_use]
    pub fn with_required(mut self, required: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.required = required.into_iter().map(Into::into).collect();
        self
    }
}

/// A change notification published by either registry.
///
/// Listeners only learn *that* something changed and which name was involved;
/// recomputation always reads the registry's full current contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryChange {
    Added(String),
    Removed(String),
}

impl RegistryChange {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Added(name) | Self::Removed(name) => name,
        }
    }
}
