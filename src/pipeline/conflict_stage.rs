//! Conflict detection stage: matrix lookup, justification, triage.

use super::PipelineError;
use crate::conflicts::{ConflictCategorizer, ConflictReasoner};
use crate::matrix::CompatibilityMatrix;
use crate::model::{ConflictPartition, License, PotentialConflicts};
use crate::session::{PromptTemplates, SessionFactory};
use std::path::Path;

/// Everything the conflict stage found for one run
#[derive(Debug, Clone, Default)]
pub struct ConflictAnalysis {
    /// Raw matrix indicators for the candidate licenses
    pub potential: PotentialConflicts,
    pub partition: ConflictPartition,
}

impl ConflictAnalysis {
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.partition.is_empty()
    }
}

/// Load the compatibility matrix for a run.
pub fn load_matrix(path: &Path) -> Result<CompatibilityMatrix, PipelineError> {
    CompatibilityMatrix::load(path).map_err(|source| PipelineError::MatrixLoad { source })
}

/// Sessions and templates the conflict stage prompts with
pub struct AnalysisSessions<'a> {
    pub factory: &'a dyn SessionFactory,
    pub model: &'a str,
    pub templates: &'a PromptTemplates,
}

/// Check candidate licenses against the own license and triage the conflicts.
///
/// Reasoning and categorization each get a fresh session.
pub fn analyze_conflicts(
    own_license: &License,
    candidates: &[License],
    matrix: &CompatibilityMatrix,
    sessions: &AnalysisSessions<'_>,
) -> ConflictAnalysis {
    let potential = matrix.lookup(own_license, candidates);
    if potential.is_empty() {
        tracing::info!("No candidate license found in the compatibility matrix");
        return ConflictAnalysis::default();
    }

    let justified = ConflictReasoner::new(
        sessions.factory,
        sessions.model,
        sessions.templates.clone(),
    )
    .justify(own_license, &potential);

    if justified.is_empty() {
        return ConflictAnalysis {
            potential,
            partition: ConflictPartition::new(),
        };
    }

    let partition = ConflictCategorizer::new(
        sessions.factory,
        sessions.model,
        sessions.templates.clone(),
    )
    .categorize(own_license, &justified);

    ConflictAnalysis {
        potential,
        partition,
    }
}
