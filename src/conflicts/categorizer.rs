//! Conflict triage.

use super::TriageError;
use crate::model::{ConflictCategory, ConflictPartition, JustifiedConflicts, License};
use crate::session::{ModelSession, PromptTemplates, SessionFactory};

/// Reply meaning the assistant can suggest a remedy
const FIXABLE_REPLY: &str = "A";
/// Reply meaning a legal expert is needed
const NEEDS_LEGAL_REPLY: &str = "B";

/// Buckets justified conflicts with a dedicated session.
pub struct ConflictCategorizer {
    session: Box<dyn ModelSession>,
    templates: PromptTemplates,
}

impl ConflictCategorizer {
    /// Categorizer with a fresh session seeded with the categorization preamble
    pub fn new(factory: &dyn SessionFactory, model: &str, templates: PromptTemplates) -> Self {
        let session = factory.create(model, &templates.system_categorization);
        Self { session, templates }
    }

    /// Categorizer over an existing session
    pub fn with_session(session: Box<dyn ModelSession>, templates: PromptTemplates) -> Self {
        Self { session, templates }
    }

    /// Ask for the category of one conflict. The reply must be exactly `A` or `B`.
    pub fn categorize_one(
        &mut self,
        own_license: &License,
        license: &License,
        reason: &str,
    ) -> Result<ConflictCategory, TriageError> {
        let prompt = self.templates.categorization_prompt(
            own_license.license_type(),
            license.license_type(),
            reason,
        );
        let reply = self.session.submit_prompt(&prompt)?;
        match reply.as_str() {
            FIXABLE_REPLY => Ok(ConflictCategory::Fixable),
            NEEDS_LEGAL_REPLY => Ok(ConflictCategory::NeedsLegal),
            _ => Err(TriageError::UnexpectedReply(reply)),
        }
    }

    /// Partition every justified conflict. Failures land in the unknown bucket,
    /// so the buckets together always hold the whole input.
    pub fn categorize(
        &mut self,
        own_license: &License,
        justified: &JustifiedConflicts,
    ) -> ConflictPartition {
        let mut partition = ConflictPartition::new();

        for (license, reason) in justified {
            let category = match self.categorize_one(own_license, license, reason) {
                Ok(category) => category,
                Err(err) => {
                    tracing::warn!("Categorizing conflict with {} failed: {}", license, err);
                    ConflictCategory::Unknown
                }
            };
            tracing::debug!("{} categorized as {}", license, category);
            partition.insert(category, license.clone(), reason.clone());
        }

        tracing::info!(
            "Categorized conflicts: {} fixable, {} needs legal, {} unknown",
            partition.fixable.len(),
            partition.needs_legal.len(),
            partition.unknown.len()
        );
        partition
    }

    /// Session used for categorization
    #[must_use]
    pub fn session(&self) -> &dyn ModelSession {
        self.session.as_ref()
    }
}
