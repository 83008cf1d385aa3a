//! Dependency records built from inventory component keys.

use super::license::License;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// One dependency of the audited project.
///
/// Identity is `(group, name, version)`; licenses are carried in the order the
/// inventory listed them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    pub group: String,
    pub name: String,
    pub version: String,
    pub licenses: Vec<License>,
}

impl Dependency {
    /// Create a new dependency
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        licenses: Vec<License>,
    ) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            licenses,
        }
    }

    /// `group:name:version` coordinate used in log lines
    #[must_use]
    pub fn coordinate(&self) -> String {
        format!("{}:{}:{}", self.group, self.name, self.version)
    }
}

impl PartialEq for Dependency {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && self.name == other.name && self.version == other.version
    }
}

impl Eq for Dependency {}

impl Hash for Dependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.group.hash(state);
        self.name.hash(state);
        self.version.hash(state);
    }
}

/// Added and removed dependencies of one pipeline run.
///
/// Serializes to the `dependency-diff.json` layout:
/// `{"addedComponents": [...], "removedComponents": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyChanges {
    pub added_components: Vec<Dependency>,
    pub removed_components: Vec<Dependency>,
}

impl DependencyChanges {
    /// Whether nothing was added or removed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_components.is_empty() && self.removed_components.is_empty()
    }

    /// Every license carried by an added dependency, in order, duplicates kept.
    #[must_use]
    pub fn added_licenses(&self) -> Vec<License> {
        self.added_components
            .iter()
            .flat_map(|dep| dep.licenses.iter().cloned())
            .collect()
    }
}
