//! Set-based diff engine implementation.

use super::InventoryDiff;
use crate::error::{ErrorContext, Result};
use crate::model::KeySet;
use crate::parsers::parse_inventory;
use std::path::Path;

/// Diff engine comparing two inventories by component key.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffEngine;

impl DiffEngine {
    /// Create a new diff engine
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compare two key sets.
    ///
    /// Without a previous inventory every current key counts as added.
    pub fn diff(&self, previous: Option<&KeySet>, current: &KeySet) -> InventoryDiff {
        let Some(previous) = previous else {
            tracing::debug!("No previous inventory, {} components added", current.len());
            return InventoryDiff {
                added: current.clone(),
                removed: KeySet::new(),
            };
        };

        let added: KeySet = current.difference(previous).cloned().collect();
        let removed: KeySet = previous.difference(current).cloned().collect();

        tracing::debug!(
            "Inventory diff: {} added, {} removed",
            added.len(),
            removed.len()
        );

        InventoryDiff { added, removed }
    }

    /// Parse two inventory files and compare them.
    ///
    /// A `previous` path that does not exist is treated as no previous
    /// inventory; any other read or parse failure is returned.
    pub fn diff_files(&self, previous: Option<&Path>, current: &Path) -> Result<InventoryDiff> {
        let previous_keys = match previous {
            Some(path) if path.exists() => Some(
                parse_inventory(path)
                    .with_context(|| format!("previous inventory {}", path.display()))?,
            ),
            Some(path) => {
                tracing::info!(
                    "Previous inventory {} not found, treating all components as added",
                    path.display()
                );
                None
            }
            None => None,
        };

        let current_keys = parse_inventory(current)
            .with_context(|| format!("current inventory {}", current.display()))?;

        Ok(self.diff(previous_keys.as_ref(), &current_keys))
    }
}
