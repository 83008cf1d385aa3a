//! Inventory diff stage.

use super::sbom_stage::InventoryPair;
use super::{PipelineError, DIFF_ARTIFACT_FILE};
use crate::diff::{DiffEngine, InventoryDiff};
use crate::model::DependencyChanges;
use std::path::Path;

/// Diff the inventory pair and decode the changed components.
pub fn compute_changes(pair: &InventoryPair) -> Result<DependencyChanges, PipelineError> {
    let diff: InventoryDiff = DiffEngine::new()
        .diff_files(pair.previous.as_deref(), &pair.current)
        .map_err(|source| PipelineError::InventoryParse { source })?;

    if diff.is_empty() {
        tracing::info!("No component changes detected");
    } else {
        for key in &diff.added {
            tracing::debug!("Added component: {}", key);
        }
        for key in &diff.removed {
            tracing::debug!("Removed component: {}", key);
        }
        let summary = diff.summary();
        tracing::info!(
            "Component changes: {} added, {} removed",
            summary.added,
            summary.removed
        );
    }

    Ok(diff.to_changes())
}

/// Write `dependency-diff.json` into the workspace.
///
/// Failures are logged and otherwise ignored; the artifact is informational.
pub fn write_diff_artifact(workspace: &Path, changes: &DependencyChanges) {
    let path = workspace.join(DIFF_ARTIFACT_FILE);
    let result = serde_json::to_string(changes)
        .map_err(|e| e.to_string())
        .and_then(|json| std::fs::write(&path, json).map_err(|e| e.to_string()));
    match result {
        Ok(()) => tracing::debug!("Dependency diff written to {}", path.display()),
        Err(err) => tracing::warn!("Error writing {}: {}", path.display(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dependency, License};

    #[test]
    fn test_write_diff_artifact_layout() {
        let dir = tempfile::tempdir().unwrap();
        let changes = DependencyChanges {
            added_components: vec![Dependency::new(
                "org.a",
                "lib",
                "1.0",
                vec![License::with_url("MIT", "https://opensource.org/licenses/MIT")],
            )],
            removed_components: vec![],
        };
        write_diff_artifact(dir.path(), &changes);

        let written: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join(DIFF_ARTIFACT_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(written["addedComponents"][0]["name"], "lib");
        assert_eq!(written["addedComponents"][0]["licenses"][0]["type"], "MIT");
        assert_eq!(written["removedComponents"], serde_json::json!([]));
    }

    #[test]
    fn test_write_diff_artifact_unwritable_is_ignored() {
        write_diff_artifact(Path::new("/nonexistent/dir"), &DependencyChanges::default());
    }

    #[test]
    fn test_compute_changes_unparseable_inventory() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("bom.xml");
        std::fs::write(&current, "<bom>").unwrap();
        let pair = InventoryPair {
            previous: None,
            current,
        };
        assert!(matches!(
            compute_changes(&pair),
            Err(PipelineError::InventoryParse { .. })
        ));
    }
}
