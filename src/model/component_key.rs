//! Canonical component keys and their conversion to dependency records.
//!
//! A key has the shape `group:name:version[:licenses]`, where `licenses` is a
//! comma-separated list of license entries. An entry is the license type,
//! optionally followed by a newline and the license url, which is how the
//! text content of a CycloneDX `<license>` element (`<id>` then `<url>`) reads
//! once trimmed.

use super::dependency::Dependency;
use super::license::License;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Ordered set of component keys, the unit the diff engine works on.
pub type KeySet = BTreeSet<ComponentKey>;

/// Separator between the coordinate parts of a key
const PART_SEPARATOR: char = ':';
/// Separator between license entries
const LICENSE_SEPARATOR: char = ',';
/// Separator between a license type and its url inside one entry
const URL_SEPARATOR: char = '\n';

/// Canonical string identity of one inventory component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentKey(String);

impl ComponentKey {
    /// Wrap an already-encoded key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Build a key from raw inventory fields.
    ///
    /// License texts are trimmed; empty ones are skipped. When no license
    /// survives, the key has only three parts.
    #[must_use]
    pub fn from_parts<S: AsRef<str>>(
        group: &str,
        name: &str,
        version: &str,
        license_texts: &[S],
    ) -> Self {
        let licenses = license_texts
            .iter()
            .map(|text| text.as_ref().trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        let mut key = format!("{group}{PART_SEPARATOR}{name}{PART_SEPARATOR}{version}");
        if !licenses.is_empty() {
            key.push(PART_SEPARATOR);
            key.push_str(&licenses);
        }
        Self(key)
    }

    /// Encode a dependency back into its key form.
    #[must_use]
    pub fn encode(dependency: &Dependency) -> Self {
        let entries: Vec<String> = dependency
            .licenses
            .iter()
            .map(|license| match license.url() {
                Some(url) => format!("{}{URL_SEPARATOR}{url}", license.license_type()),
                None => license.license_type().to_string(),
            })
            .collect();
        Self::from_parts(
            &dependency.group,
            &dependency.name,
            &dependency.version,
            &entries,
        )
    }

    /// Decode this key into a dependency.
    ///
    /// Keys with fewer than three parts yield `None`; callers should not
    /// expect one dependency per key.
    #[must_use]
    pub fn decode(&self) -> Option<Dependency> {
        let mut parts = self.0.splitn(4, PART_SEPARATOR);
        let group = parts.next()?;
        let name = parts.next()?;
        let version = parts.next()?;

        let licenses = parts
            .next()
            .map(|licenses| {
                licenses
                    .split(LICENSE_SEPARATOR)
                    .filter(|entry| !entry.trim().is_empty())
                    .map(decode_license)
                    .collect()
            })
            .unwrap_or_default();

        Some(Dependency::new(group, name, version, licenses))
    }

    /// Key as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Split one license entry into type and url at the first newline.
fn decode_license(entry: &str) -> License {
    match entry.split_once(URL_SEPARATOR) {
        Some((license_type, url)) => License::with_url(license_type.trim(), url.trim()),
        None => License::new(entry.trim()),
    }
}

/// Decode a collection of keys, dropping the ones that are too short.
pub fn decode_keys<'a, I>(keys: I) -> Vec<Dependency>
where
    I: IntoIterator<Item = &'a ComponentKey>,
{
    keys.into_iter()
        .filter_map(|key| {
            let decoded = key.decode();
            if decoded.is_none() {
                tracing::debug!("Dropping malformed component key: {:?}", key.as_str());
            }
            decoded
        })
        .collect()
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ComponentKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl AsRef<str> for ComponentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
