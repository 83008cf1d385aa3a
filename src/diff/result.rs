//! Diff result structures.

use crate::model::{decode_keys, Dependency, DependencyChanges, KeySet};
use serde::{Deserialize, Serialize};

/// Added and removed component keys between two inventories.
///
/// The two sets are disjoint: a key present in both inventories is in neither.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[must_use]
pub struct InventoryDiff {
    pub added: KeySet,
    pub removed: KeySet,
}

impl InventoryDiff {
    /// Whether nothing changed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Added keys decoded into dependencies; malformed keys are dropped.
    #[must_use]
    pub fn added_dependencies(&self) -> Vec<Dependency> {
        decode_keys(&self.added)
    }

    /// Removed keys decoded into dependencies; malformed keys are dropped.
    #[must_use]
    pub fn removed_dependencies(&self) -> Vec<Dependency> {
        decode_keys(&self.removed)
    }

    /// Decode both sides into the dependency-change record
    #[must_use]
    pub fn to_changes(&self) -> DependencyChanges {
        DependencyChanges {
            added_components: self.added_dependencies(),
            removed_components: self.removed_dependencies(),
        }
    }

    /// Count summary
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            removed: self.removed.len(),
            total_changes: self.added.len() + self.removed.len(),
        }
    }
}

/// Summary statistics of a diff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub added: usize,
    pub removed: usize,
    pub total_changes: usize,
}
