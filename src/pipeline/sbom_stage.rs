//! Inventory refresh stage.
//!
//! Backs up the current inventory, then asks the generator for a new one.

use super::collaborators::SbomGenerator;
use super::{PipelineError, INVENTORY_FILE, PREVIOUS_INVENTORY_FILE};
use std::path::{Path, PathBuf};

/// Previous and current inventory of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryPair {
    /// Backup of the inventory before regeneration; `None` on a first run
    pub previous: Option<PathBuf>,
    pub current: PathBuf,
}

/// Copy `bom.xml` over `bom-prev.xml` inside `workspace`, then regenerate `bom.xml`.
pub fn refresh_inventory(
    generator: &dyn SbomGenerator,
    project_root: &Path,
    workspace: &Path,
    manifest: &Path,
) -> Result<InventoryPair, PipelineError> {
    std::fs::create_dir_all(workspace).map_err(|e| PipelineError::SbomGeneration {
        reason: format!("cannot create {}: {e}", workspace.display()),
    })?;

    let current = workspace.join(INVENTORY_FILE);
    let backup = workspace.join(PREVIOUS_INVENTORY_FILE);

    let previous = if current.exists() {
        std::fs::copy(&current, &backup).map_err(|e| PipelineError::SbomGeneration {
            reason: format!("cannot back up {}: {e}", current.display()),
        })?;
        tracing::info!("Previous inventory backed up to {}", backup.display());
        Some(backup)
    } else {
        tracing::info!("No previous inventory found");
        None
    };

    let generated = generator
        .generate(project_root, workspace, manifest)
        .map_err(|e| PipelineError::SbomGeneration {
            reason: e.to_string(),
        })?;
    tracing::info!("New inventory generated at {}", generated.display());

    Ok(InventoryPair {
        previous,
        current: generated,
    })
}
