//! Prompt templates.
//!
//! Six named templates drive the model conversations. Each is read from the
//! prompts directory when one is configured, falling back to a built-in text.

use std::path::Path;

const SYSTEM: &str =
    "You are a friendly assistant built into in IDE to help with software licensing problems.";

const SYSTEM_REASONS: &str = "You are a component in an IDE designed to analyze software license \
conflicts, determining whether given licenses conflict, and, if so, why.";

const REASONS_INPUT: &str = "My software license, {myLicense}, may conflict with another license, \
{otherLicense}. If they conflict, please give me a concise, one-sentence description of why these \
two licenses may conflict with each other, including any conditions upon that conflict. Otherwise, \
say \"NO CONFLICT\" in capital letters and nothing else. If you do not know the answer, say \
\"UNSURE\" in capital letters and nothing else.";

const SYSTEM_CATEGORIZATION: &str = "You are a component in an IDE designed to analyze software \
license conflicts and determine whether yourself, an LLM, can safely and reasonably make \
recommendations to address the conflict, or if the conflict should not be answered by an LLM and \
instead requires the counsel of a legal expert.";

const CATEGORIZATION_INPUT: &str = "My software is licensed under {myLicense} and conflicts with \
the license {otherLicense} for the following reason: {reason}. If this is a conflict that you can \
safely address with what you know now, respond \"A\" and nothing else. If this is a conflict that \
would require analysis from a legal expert, respond \"B\" and nothing else.";

const CHANGE_REPORT: &str = "My software project is licensed under {myLicense}. The following \
libraries have been added or removed: {libraries}. I have determined that the following software \
licenses may cause conflicts in my project, and identified reasons for these conflicts, which you \
should be able to resolve: {addressableIssues}; These conflicts require analysis by a lawyer: \
{lawyerIssues}; And these are unknown: {unknownIssues}. Please present this information back to \
me and provide me with a summary of any licensing conflicts caused by this change, and provide \
suggestions on how to remedy them where appropriate. Use this licensing information about my \
repository as context: {licensingQuestionnaire}";

/// Template identifiers and their file names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateName {
    System,
    SystemReasons,
    ReasonsInput,
    SystemCategorization,
    CategorizationInput,
    ChangeReport,
}

impl TemplateName {
    pub const ALL: [Self; 6] = [
        Self::System,
        Self::SystemReasons,
        Self::ReasonsInput,
        Self::SystemCategorization,
        Self::CategorizationInput,
        Self::ChangeReport,
    ];

    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::System => "system.txt",
            Self::SystemReasons => "system-reasons.txt",
            Self::ReasonsInput => "reasons-input-template.txt",
            Self::SystemCategorization => "system-categorization.txt",
            Self::CategorizationInput => "categorization-input-template.txt",
            Self::ChangeReport => "change-report-template.txt",
        }
    }

    const fn builtin(self) -> &'static str {
        match self {
            Self::System => SYSTEM,
            Self::SystemReasons => SYSTEM_REASONS,
            Self::ReasonsInput => REASONS_INPUT,
            Self::SystemCategorization => SYSTEM_CATEGORIZATION,
            Self::CategorizationInput => CATEGORIZATION_INPUT,
            Self::ChangeReport => CHANGE_REPORT,
        }
    }
}

/// The full template set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub system: String,
    pub system_reasons: String,
    pub reasons_input: String,
    pub system_categorization: String,
    pub categorization_input: String,
    pub change_report: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptTemplates {
    /// Built-in texts only
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            system: SYSTEM.to_string(),
            system_reasons: SYSTEM_REASONS.to_string(),
            reasons_input: REASONS_INPUT.to_string(),
            system_categorization: SYSTEM_CATEGORIZATION.to_string(),
            categorization_input: CATEGORIZATION_INPUT.to_string(),
            change_report: CHANGE_REPORT.to_string(),
        }
    }

    /// Read every template from `dir`, keeping the built-in text for any
    /// file that is missing or unreadable.
    #[must_use]
    pub fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::builtin();
        };
        let read = |name: TemplateName| {
            let path = dir.join(name.file_name());
            match std::fs::read_to_string(&path) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(
                        "Unable to load prompt template {}: {}, using built-in text",
                        path.display(),
                        err
                    );
                    name.builtin().to_string()
                }
            }
        };
        Self {
            system: read(TemplateName::System),
            system_reasons: read(TemplateName::SystemReasons),
            reasons_input: read(TemplateName::ReasonsInput),
            system_categorization: read(TemplateName::SystemCategorization),
            categorization_input: read(TemplateName::CategorizationInput),
            change_report: read(TemplateName::ChangeReport),
        }
    }

    /// Template text by name
    #[must_use]
    pub fn get(&self, name: TemplateName) -> &str {
        match name {
            TemplateName::System => &self.system,
            TemplateName::SystemReasons => &self.system_reasons,
            TemplateName::ReasonsInput => &self.reasons_input,
            TemplateName::SystemCategorization => &self.system_categorization,
            TemplateName::CategorizationInput => &self.categorization_input,
            TemplateName::ChangeReport => &self.change_report,
        }
    }

    /// Prompt asking why two licenses conflict
    #[must_use]
    pub fn reasons_prompt(&self, own_license: &str, other_license: &str) -> String {
        self.reasons_input
            .replace("{myLicense}", own_license)
            .replace("{otherLicense}", other_license)
    }

    /// Prompt asking whether a conflict is fixable (`A`) or needs legal review (`B`)
    #[must_use]
    pub fn categorization_prompt(&self, own_license: &str, other_license: &str, reason: &str) -> String {
        self.categorization_input
            .replace("{myLicense}", own_license)
            .replace("{otherLicense}", other_license)
            .replace("{reason}", reason)
    }

    /// Prompt summarizing one dependency change for the chat session
    #[must_use]
    pub fn change_report_prompt(&self, fields: &ChangeReportFields<'_>) -> String {
        self.change_report
            .replace("{myLicense}", fields.own_license)
            .replace("{libraries}", fields.libraries)
            .replace("{addressableIssues}", fields.addressable)
            .replace("{lawyerIssues}", fields.lawyer)
            .replace("{unknownIssues}", fields.unknown)
            .replace("{licensingQuestionnaire}", fields.questionnaire)
    }
}

/// Values substituted into the change-report template
#[derive(Debug, Clone, Copy)]
pub struct ChangeReportFields<'a> {
    pub own_license: &'a str,
    pub libraries: &'a str,
    pub addressable: &'a str,
    pub lawyer: &'a str,
    pub unknown: &'a str,
    pub questionnaire: &'a str,
}
