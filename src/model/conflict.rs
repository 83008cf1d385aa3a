//! Conflict records and their lifecycle.
//!
//! A conflict starts as a matrix indicator (potential), gains a reason from the
//! reasoning session (justified) and is finally bucketed by the categorization
//! session (categorized).

use super::license::License;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cell value of the compatibility matrix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// `Yes`: compatible
    Yes,
    /// `No`: incompatible
    No,
    /// `Same`: the same license
    Same,
    /// `Dep.`: depends on how the code is combined
    Dependent,
    /// `Check dependency`
    CheckDependency,
    /// `?`: relationship not known
    Unclear,
    /// Anything outside the vocabulary
    Other(String),
}

impl Indicator {
    /// Parse a matrix cell. Matching is exact; unrecognised text is kept verbatim.
    #[must_use]
    pub fn parse(cell: &str) -> Self {
        match cell {
            "Yes" => Self::Yes,
            "No" => Self::No,
            "Same" => Self::Same,
            "Dep." => Self::Dependent,
            "Check dependency" => Self::CheckDependency,
            "?" => Self::Unclear,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the matrix declares the pair compatible
    #[must_use]
    pub const fn is_compatible(&self) -> bool {
        matches!(self, Self::Yes | Self::Same)
    }

    /// Whether the pair needs a justification from the reasoning session
    #[must_use]
    pub const fn needs_justification(&self) -> bool {
        matches!(
            self,
            Self::No | Self::Dependent | Self::CheckDependency | Self::Unclear
        )
    }

    /// Cell text as it appears in the matrix
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Same => "Same",
            Self::Dependent => "Dep.",
            Self::CheckDependency => "Check dependency",
            Self::Unclear => "?",
            Self::Other(text) => text,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw matrix indicators per candidate license, in discovery order.
pub type PotentialConflicts = IndexMap<License, Indicator>;

/// Justification text per conflicting license.
pub type JustifiedConflicts = IndexMap<License, String>;

/// Triage bucket of a justified conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictCategory {
    /// The assistant can suggest a remedy
    Fixable,
    /// Needs review by a legal expert
    NeedsLegal,
    /// The categorization failed or was not understood
    Unknown,
}

impl fmt::Display for ConflictCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixable => write!(f, "Fixable"),
            Self::NeedsLegal => write!(f, "Needs legal review"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Lifecycle state of a conflict record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum ConflictState {
    Potential { indicator: Indicator },
    Justified { reason: String },
    Categorized { reason: String, category: ConflictCategory },
}

/// A license paired with where it stands in the triage lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub license: License,
    #[serde(flatten)]
    pub state: ConflictState,
}

impl ConflictRecord {
    /// A fresh record straight from the matrix
    #[must_use]
    pub const fn potential(license: License, indicator: Indicator) -> Self {
        Self {
            license,
            state: ConflictState::Potential { indicator },
        }
    }

    /// Attach a reason, moving the record to the justified state
    #[must_use]
    pub fn justify(self, reason: impl Into<String>) -> Self {
        Self {
            license: self.license,
            state: ConflictState::Justified {
                reason: reason.into(),
            },
        }
    }

    /// Bucket a justified record. Records without a reason get an empty one.
    #[must_use]
    pub fn categorize(self, category: ConflictCategory) -> Self {
        let reason = match self.state {
            ConflictState::Justified { reason } | ConflictState::Categorized { reason, .. } => {
                reason
            }
            ConflictState::Potential { .. } => String::new(),
        };
        Self {
            license: self.license,
            state: ConflictState::Categorized { reason, category },
        }
    }

    /// Category, once categorized
    #[must_use]
    pub const fn category(&self) -> Option<ConflictCategory> {
        match self.state {
            ConflictState::Categorized { category, .. } => Some(category),
            _ => None,
        }
    }
}

/// Three-way triage result. The buckets are disjoint by construction.
///
/// Serialize through [`ConflictPartition::records`]; license keys are not
/// valid JSON object keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictPartition {
    pub fixable: JustifiedConflicts,
    pub needs_legal: JustifiedConflicts,
    pub unknown: JustifiedConflicts,
}

impl ConflictPartition {
    /// Create an empty partition
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a conflict in a bucket, removing it from any other bucket first.
    pub fn insert(&mut self, category: ConflictCategory, license: License, reason: String) {
        self.fixable.shift_remove(&license);
        self.needs_legal.shift_remove(&license);
        self.unknown.shift_remove(&license);
        self.bucket_mut(category).insert(license, reason);
    }

    /// Bucket for a category
    #[must_use]
    pub const fn bucket(&self, category: ConflictCategory) -> &JustifiedConflicts {
        match category {
            ConflictCategory::Fixable => &self.fixable,
            ConflictCategory::NeedsLegal => &self.needs_legal,
            ConflictCategory::Unknown => &self.unknown,
        }
    }

    fn bucket_mut(&mut self, category: ConflictCategory) -> &mut JustifiedConflicts {
        match category {
            ConflictCategory::Fixable => &mut self.fixable,
            ConflictCategory::NeedsLegal => &mut self.needs_legal,
            ConflictCategory::Unknown => &mut self.unknown,
        }
    }

    /// Total number of conflicts across all buckets
    #[must_use]
    pub fn total(&self) -> usize {
        self.fixable.len() + self.needs_legal.len() + self.unknown.len()
    }

    /// Whether no bucket holds anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// All conflicts as categorized records, bucket by bucket
    #[must_use]
    pub fn records(&self) -> Vec<ConflictRecord> {
        [
            ConflictCategory::Fixable,
            ConflictCategory::NeedsLegal,
            ConflictCategory::Unknown,
        ]
        .into_iter()
        .flat_map(|category| {
            self.bucket(category).iter().map(move |(license, reason)| ConflictRecord {
                license: license.clone(),
                state: ConflictState::Categorized {
                    reason: reason.clone(),
                    category,
                },
            })
        })
        .collect()
    }
}

/// Render a bucket as `{License=reason, License=reason}` for prompt templates.
#[must_use]
pub fn render_bucket(bucket: &JustifiedConflicts) -> String {
    let entries: Vec<String> = bucket
        .iter()
        .map(|(license, reason)| format!("{license}={reason}"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
