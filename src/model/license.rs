//! License records.
//!
//! A license is identified by its type string alone. The url travels along for
//! reporting but never takes part in hashing, so a `License` can key a map
//! without two differently-linked copies of the same license splitting apart.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Type string used when no target license is configured.
pub const UNKNOWN_LICENSE: &str = "unknown";

/// A license as declared by a component or configured for the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct License {
    /// License type, usually an SPDX identifier or a free-form name
    #[serde(rename = "type")]
    license_type: String,
    /// Optional link to the license text
    url: Option<String>,
}

impl License {
    /// Create a license without a url
    pub fn new(license_type: impl Into<String>) -> Self {
        Self {
            license_type: license_type.into(),
            url: None,
        }
    }

    /// Create a license with a url. An empty url is stored as absent.
    pub fn with_url(license_type: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            license_type: license_type.into(),
            url: if url.is_empty() { None } else { Some(url) },
        }
    }

    /// The `"unknown"` placeholder license
    #[must_use]
    pub fn unknown() -> Self {
        Self::new(UNKNOWN_LICENSE)
    }

    /// License type string
    #[must_use]
    pub fn license_type(&self) -> &str {
        &self.license_type
    }

    /// License url, if any
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Whether this is the `"unknown"` placeholder
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.license_type == UNKNOWN_LICENSE
    }

    /// Compare two licenses, optionally taking the url into account.
    ///
    /// `Eq` and `Hash` always ignore the url; this is the only place the
    /// url-aware comparison exists.
    #[must_use]
    pub fn same_as(&self, other: &Self, compare_url: bool) -> bool {
        self.license_type == other.license_type && (!compare_url || self.url == other.url)
    }
}

impl PartialEq for License {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other, false)
    }
}

impl Eq for License {}

impl Hash for License {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.license_type.hash(state);
    }
}

impl fmt::Display for License {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.license_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_url() {
        let a = License::with_url("MIT", "https://opensource.org/licenses/MIT");
        let b = License::new("MIT");
        assert_eq!(a, b);

        let set: HashSet<License> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_url_aware_comparison() {
        let a = License::with_url("MIT", "https://opensource.org/licenses/MIT");
        let b = License::with_url("MIT", "https://mit-license.org");
        assert!(a.same_as(&b, false));
        assert!(!a.same_as(&b, true));
        assert!(a.same_as(&a.clone(), true));
    }

    #[test]
    fn test_empty_url_is_absent() {
        let lic = License::with_url("Apache-2.0", "");
        assert_eq!(lic.url(), None);
    }

    #[test]
    fn test_type_is_case_sensitive() {
        assert_ne!(License::new("mit"), License::new("MIT"));
    }

    #[test]
    fn test_unknown_placeholder() {
        assert!(License::unknown().is_unknown());
        assert_eq!(License::unknown().to_string(), "unknown");
    }

    #[test]
    fn test_serializes_type_field() {
        let json = serde_json::to_value(License::with_url("MIT", "u")).unwrap();
        assert_eq!(json["type"], "MIT");
        assert_eq!(json["url"], "u");
    }
}
