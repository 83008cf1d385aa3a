//! Pipeline orchestration for dependency-change audits.
//!
//! A run regenerates the inventory, diffs it against the previous one, checks
//! the added licenses against the compatibility matrix, triages the conflicts
//! with model sessions and hands a report to the notifier. Stages live in
//! their own modules so command handlers can reuse them piecemeal.

mod collaborators;
mod conflict_stage;
mod diff_stage;
mod orchestrator;
mod output;
mod report_stage;
mod sbom_stage;

pub use collaborators::{
    FileSbomGenerator, LicenseConfigSource, MavenSbomGenerator, Notifier, SbomGenerator,
    StaticLicenseSource, StdoutNotifier, SurveyLicenseSource,
};
pub use conflict_stage::{analyze_conflicts, load_matrix, AnalysisSessions, ConflictAnalysis};
pub use diff_stage::{compute_changes, write_diff_artifact};
pub use orchestrator::{AuditPipeline, PipelineSettings, RunOutcome};
pub use output::{write_output, OutputTarget};
pub use report_stage::{build_change_prompt, present_findings, render_plain_report, ReportContext};
pub use sbom_stage::{refresh_inventory, InventoryPair};

use crate::error::AuditError;

/// Current inventory inside the workspace
pub const INVENTORY_FILE: &str = "bom.xml";
/// Backup of the inventory from the previous run
pub const PREVIOUS_INVENTORY_FILE: &str = "bom-prev.xml";
/// Decoded added/removed components of the last run
pub const DIFF_ARTIFACT_FILE: &str = "dependency-diff.json";

/// Structured pipeline error types naming the failing stage.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The inventory could not be backed up or regenerated
    #[error("SBOM generation failed: {reason}")]
    SbomGeneration { reason: String },

    /// An inventory could not be read or parsed
    #[error("Inventory parse failed: {source}")]
    InventoryParse {
        #[source]
        source: AuditError,
    },

    /// The compatibility matrix could not be read
    #[error("Compatibility matrix load failed: {source}")]
    MatrixLoad {
        #[source]
        source: AuditError,
    },
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success - no changes detected (or no fail flag given)
    pub const SUCCESS: i32 = 0;
    /// Component changes were detected
    pub const CHANGES_DETECTED: i32 = 1;
    /// License conflicts were found
    pub const CONFLICTS_FOUND: i32 = 2;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_values() {
        assert_eq!(exit_codes::SUCCESS, 0);
        assert_eq!(exit_codes::CHANGES_DETECTED, 1);
        assert_eq!(exit_codes::CONFLICTS_FOUND, 2);
        assert_eq!(exit_codes::ERROR, 3);
    }

    #[test]
    fn test_pipeline_error_names_stage() {
        let err = PipelineError::SbomGeneration {
            reason: "mvn not found".to_string(),
        };
        assert_eq!(err.to_string(), "SBOM generation failed: mvn not found");
    }
}
