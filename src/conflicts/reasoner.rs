//! Conflict justification.

use crate::model::{Indicator, JustifiedConflicts, License, PotentialConflicts};
use crate::session::{ModelSession, PromptTemplates, SessionFactory};
use std::collections::HashSet;

/// Reason recorded for indicators outside the matrix vocabulary
pub const UNKNOWN_RELATIONSHIP_REASON: &str = "Unknown license relationship.";

/// Reason recorded when the model gives no answer
pub const ANALYSIS_FAILED_REASON: &str = "Chatbot failed to analyze license conflicts.";

/// Asks a dedicated session why each flagged license conflicts.
pub struct ConflictReasoner {
    session: Box<dyn ModelSession>,
    templates: PromptTemplates,
}

impl ConflictReasoner {
    /// Reasoner with a fresh session seeded with the reasoning preamble
    pub fn new(factory: &dyn SessionFactory, model: &str, templates: PromptTemplates) -> Self {
        let session = factory.create(model, &templates.system_reasons);
        Self { session, templates }
    }

    /// Reasoner over an existing session
    pub fn with_session(session: Box<dyn ModelSession>, templates: PromptTemplates) -> Self {
        Self { session, templates }
    }

    /// Justify every conflicting license.
    ///
    /// `Yes` and `Same` produce no entry. Licenses sharing a type are asked
    /// about once. The result holds exactly one reason per distinct
    /// conflicting license type.
    pub fn justify(
        &mut self,
        own_license: &License,
        potential: &PotentialConflicts,
    ) -> JustifiedConflicts {
        let mut checked: HashSet<&str> = HashSet::new();
        let mut justified = JustifiedConflicts::new();

        for (license, indicator) in potential {
            if !checked.insert(license.license_type()) {
                continue;
            }
            if indicator.is_compatible() {
                tracing::debug!("{} is compatible with {} ({})", license, own_license, indicator);
                continue;
            }

            let reason = if indicator.needs_justification() {
                self.ask(own_license, license, indicator)
            } else {
                tracing::debug!(
                    "Indicator {:?} for {} is outside the matrix vocabulary",
                    indicator.as_str(),
                    license
                );
                UNKNOWN_RELATIONSHIP_REASON.to_string()
            };
            justified.insert(license.clone(), reason);
        }

        tracing::info!(
            "Justified {} of {} potential conflicts",
            justified.len(),
            potential.len()
        );
        justified
    }

    fn ask(&mut self, own_license: &License, license: &License, indicator: &Indicator) -> String {
        let prompt = self
            .templates
            .reasons_prompt(own_license.license_type(), license.license_type());
        match self.session.submit_prompt(&prompt) {
            Ok(reason) if !reason.is_empty() => reason,
            Ok(_) => {
                tracing::warn!("Empty conflict reason for {} ({})", license, indicator);
                ANALYSIS_FAILED_REASON.to_string()
            }
            Err(err) => {
                tracing::warn!("Conflict reasoning for {} failed: {}", license, err);
                ANALYSIS_FAILED_REASON.to_string()
            }
        }
    }

    /// Session used for reasoning
    #[must_use]
    pub fn session(&self) -> &dyn ModelSession {
        self.session.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::testing::ScriptedSession;
    use crate::session::DisabledSession;

    fn potential(entries: &[(&str, &str)]) -> PotentialConflicts {
        entries
            .iter()
            .map(|(license, cell)| (License::new(*license), Indicator::parse(cell)))
            .collect()
    }

    fn reasoner(session: ScriptedSession) -> ConflictReasoner {
        ConflictReasoner::with_session(Box::new(session), PromptTemplates::builtin())
    }

    #[test]
    fn test_compatible_indicators_produce_nothing() {
        let (session, prompts) = ScriptedSession::answering(&[]);
        let result = reasoner(session).justify(
            &License::new("MIT"),
            &potential(&[("MIT", "Same"), ("Apache-2.0", "Yes")]),
        );
        assert!(result.is_empty());
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_conflicting_indicator_uses_model_reply() {
        let (session, prompts) = ScriptedSession::answering(&["GPL requires source disclosure."]);
        let result =
            reasoner(session).justify(&License::new("Apache-2.0"), &potential(&[("GPL-3.0", "No")]));
        assert_eq!(result[&License::new("GPL-3.0")], "GPL requires source disclosure.");
        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Apache-2.0"));
        assert!(prompts[0].contains("GPL-3.0"));
    }

    #[test]
    fn test_unknown_indicator_skips_model() {
        let (session, prompts) = ScriptedSession::answering(&[]);
        let result = reasoner(session).justify(&License::new("MIT"), &potential(&[("Custom", "Maybe")]));
        assert_eq!(result[&License::new("Custom")], UNKNOWN_RELATIONSHIP_REASON);
        assert!(prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_model_failure_uses_fallback_reason() {
        let mut reasoner = ConflictReasoner::with_session(
            Box::new(DisabledSession::new("gpt-4o")),
            PromptTemplates::builtin(),
        );
        let result = reasoner.justify(
            &License::new("MIT"),
            &potential(&[("GPL-3.0", "No"), ("LGPL-2.1", "Dep."), ("EPL-2.0", "?")]),
        );
        assert_eq!(result.len(), 3);
        assert!(result.values().all(|reason| reason == ANALYSIS_FAILED_REASON));
    }

    #[test]
    fn test_empty_reply_uses_fallback_reason() {
        let (session, _) = ScriptedSession::answering(&[""]);
        let result = reasoner(session).justify(
            &License::new("MIT"),
            &potential(&[("GPL-3.0", "Check dependency")]),
        );
        assert_eq!(result[&License::new("GPL-3.0")], ANALYSIS_FAILED_REASON);
    }

    #[test]
    fn test_one_model_call_per_conflicting_license() {
        let (session, prompts) = ScriptedSession::answering(&["a", "b"]);
        let mut reasoner = reasoner(session);
        let result = reasoner.justify(
            &License::new("MIT"),
            &potential(&[("GPL-3.0", "No"), ("MIT", "Same"), ("AGPL-3.0", "?")]),
        );
        assert_eq!(result.len(), 2);
        assert_eq!(prompts.lock().unwrap().len(), 2);
        assert_eq!(reasoner.session().history().len(), 4);
    }
}
