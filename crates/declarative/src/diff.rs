//! Lifecycle diff between two synthesized templates
//!
//! Predicts what the execution engine does when a deployed template is
//! replaced by a new one: which create, delete or replacement events each
//! custom resource receives.

use crate::Result;
use crate::template::{DeclaredResource, Template};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// What happens to one custom resource on redeployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Change {
    /// New resource: the create call runs
    Create { physical_id: Option<String> },
    /// Removed resource: the delete call runs
    Delete { physical_id: Option<String> },
    /// Physical ID changes: create call for the new one, then delete call for the old one
    Replace {
        from: Option<String>,
        to: Option<String>,
    },
    /// Same physical ID, different properties: the update call runs if declared
    Update { physical_id: Option<String> },
    /// Nothing runs
    NoChange,
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |id: &Option<String>| id.clone().unwrap_or_else(|| "<from response>".into());
        match self {
            Self::Create { physical_id } => write!(f, "create {}", show(physical_id)),
            Self::Delete { physical_id } => write!(f, "delete {}", show(physical_id)),
            Self::Replace { from, to } => write!(f, "replace {} -> {}", show(from), show(to)),
            Self::Update { physical_id } => write!(f, "update {}", show(physical_id)),
            Self::NoChange => write!(f, "no change"),
        }
    }
}

/// A diff for one custom resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDiff {
    pub logical_id: String,
    pub change: Change,
}

impl ResourceDiff {
    /// Classify the transition between a deployed and a desired declaration
    pub fn between(
        logical_id: &str,
        deployed: Option<&DeclaredResource>,
        desired: Option<&DeclaredResource>,
    ) -> Self {
        let owned = |id: Option<&str>| id.map(str::to_string);
        let change = match (deployed, desired) {
            (None, Some(new)) => Change::Create {
                physical_id: owned(new.physical_id()),
            },
            (Some(old), None) => Change::Delete {
                physical_id: owned(old.physical_id()),
            },
            (Some(old), Some(new)) if old.physical_id() != new.physical_id() => Change::Replace {
                from: owned(old.physical_id()),
                to: owned(new.physical_id()),
            },
            (Some(old), Some(new)) if old != new => Change::Update {
                physical_id: owned(new.physical_id()),
            },
            _ => Change::NoChange,
        };

        Self {
            logical_id: logical_id.to_string(),
            change,
        }
    }

    /// Check if anything runs for this resource
    pub fn has_change(&self) -> bool {
        self.change != Change::NoChange
    }
}

/// Compute diffs for every custom resource in either template
///
/// Results are ordered by logical ID.
pub fn compute_diffs(deployed: &Template, desired: &Template) -> Result<Vec<ResourceDiff>> {
    let before = deployed.declared_resources()?;
    let after = desired.declared_resources()?;

    let ids: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
    let diffs: Vec<ResourceDiff> = ids
        .into_iter()
        .map(|id| ResourceDiff::between(id, before.get(id), after.get(id)))
        .collect();

    log::debug!(
        "Computed {} diffs ({} with changes)",
        diffs.len(),
        diffs.iter().filter(|d| d.has_change()).count()
    );
    Ok(diffs)
}

/// Diff summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffSummary {
    pub creates: usize,
    pub deletes: usize,
    pub replacements: usize,
    pub updates: usize,
    pub unchanged: usize,
}

impl DiffSummary {
    /// Create a summary from a list of diffs
    pub fn from_diffs(diffs: &[ResourceDiff]) -> Self {
        let mut summary = Self::default();
        for diff in diffs {
            match diff.change {
                Change::Create { .. } => summary.creates += 1,
                Change::Delete { .. } => summary.deletes += 1,
                Change::Replace { .. } => summary.replacements += 1,
                Change::Update { .. } => summary.updates += 1,
                Change::NoChange => summary.unchanged += 1,
            }
        }
        summary
    }

    /// Total number of changes
    pub fn total(&self) -> usize {
        self.creates + self.deletes + self.replacements + self.updates
    }

    /// Check if there are any changes
    pub fn has_changes(&self) -> bool {
        self.total() > 0
    }
}

/// Group changed diffs by kind ("create", "delete", ...)
pub fn group_by_change(diffs: &[ResourceDiff]) -> BTreeMap<&'static str, Vec<&ResourceDiff>> {
    let mut groups: BTreeMap<&'static str, Vec<&ResourceDiff>> = BTreeMap::new();
    for diff in diffs {
        let kind = match diff.change {
            Change::Create { .. } => "create",
            Change::Delete { .. } => "delete",
            Change::Replace { .. } => "replace",
            Change::Update { .. } => "update",
            Change::NoChange => continue,
        };
        groups.entry(kind).or_default().push(diff);
    }
    groups
}
