//! Report stage: turn the triage result into text for the notifier.

use super::collaborators::Notifier;
use crate::model::{render_bucket, ConflictCategory, ConflictPartition, DependencyChanges, License};
use crate::session::{ChangeReportFields, PromptTemplates, SessionRegistry};
use std::fmt::Write as _;

/// Inputs of the change report
pub struct ReportContext<'a> {
    pub own_license: &'a License,
    pub changes: &'a DependencyChanges,
    pub partition: &'a ConflictPartition,
    pub questionnaire: &'a serde_json::Value,
}

/// Fill the change-report template.
#[must_use]
pub fn build_change_prompt(templates: &PromptTemplates, context: &ReportContext<'_>) -> String {
    let libraries = serde_json::to_string(context.changes).unwrap_or_default();
    let questionnaire = context.questionnaire.to_string();
    let addressable = render_bucket(&context.partition.fixable);
    let lawyer = render_bucket(&context.partition.needs_legal);
    let unknown = render_bucket(&context.partition.unknown);

    templates.change_report_prompt(&ChangeReportFields {
        own_license: context.own_license.license_type(),
        libraries: &libraries,
        addressable: &addressable,
        lawyer: &lawyer,
        unknown: &unknown,
        questionnaire: &questionnaire,
    })
}

/// Plain-text rendering of the partition, used when the chat session fails.
#[must_use]
pub fn render_plain_report(own_license: &License, partition: &ConflictPartition) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "License conflicts for {} ({} total)",
        own_license,
        partition.total()
    );
    for category in [
        ConflictCategory::Fixable,
        ConflictCategory::NeedsLegal,
        ConflictCategory::Unknown,
    ] {
        let bucket = partition.bucket(category);
        if bucket.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{category}:");
        for (license, reason) in bucket {
            let _ = writeln!(out, "  - {license}: {reason}");
        }
    }
    out
}

/// Ask the chat session to summarize the findings and present the answer.
///
/// Returns the presented text.
pub fn present_findings(
    registry: &SessionRegistry,
    chat_model: &str,
    templates: &PromptTemplates,
    notifier: &dyn Notifier,
    context: &ReportContext<'_>,
) -> String {
    let prompt = build_change_prompt(templates, context);
    let session = registry.session_for(chat_model);
    let reply = {
        let mut guard = session
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.submit_prompt(&prompt)
    };

    let report = match reply {
        Ok(text) if !text.is_empty() => text,
        Ok(_) => {
            tracing::warn!("Chat session returned an empty change report");
            render_plain_report(context.own_license, context.partition)
        }
        Err(err) => {
            tracing::warn!("Chat session failed to summarize the change: {}", err);
            render_plain_report(context.own_license, context.partition)
        }
    };
    notifier.present(&report);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn partition() -> ConflictPartition {
        let mut partition = ConflictPartition::new();
        partition.insert(
            ConflictCategory::NeedsLegal,
            License::new("GPL-3.0"),
            "strong copyleft".into(),
        );
        partition
    }

    #[test]
    fn test_change_prompt_fills_placeholders() {
        let changes = DependencyChanges::default();
        let partition = partition();
        let questionnaire = serde_json::json!({"existingLicensesUsed": ["Apache-2.0"]});
        let prompt = build_change_prompt(
            &PromptTemplates::builtin(),
            &ReportContext {
                own_license: &License::new("Apache-2.0"),
                changes: &changes,
                partition: &partition,
                questionnaire: &questionnaire,
            },
        );
        assert!(prompt.contains("licensed under Apache-2.0"));
        assert!(prompt.contains(r#"{"addedComponents":[],"removedComponents":[]}"#));
        assert!(prompt.contains("lawyer: {GPL-3.0=strong copyleft}"));
        assert!(prompt.contains("resolve: {}"));
        assert!(prompt.contains(r#"["Apache-2.0"]"#));
        assert!(!prompt.contains("{myLicense}"));
    }

    #[test]
    fn test_plain_report_lists_nonempty_buckets() {
        let report = render_plain_report(&License::new("Apache-2.0"), &partition());
        assert!(report.contains("Needs legal review:"));
        assert!(report.contains("GPL-3.0: strong copyleft"));
        assert!(!report.contains("Fixable:"));
    }
}
