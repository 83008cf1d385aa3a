//! Parser trait definitions.

use crate::error::{AuditError, ErrorContext, Result};
use crate::model::KeySet;
use std::path::Path;

/// Trait for inventory document parsers.
///
/// Implementors turn one inventory document into its set of component keys.
pub trait InventoryParser {
    /// Parse an inventory from a file path
    fn parse(&self, path: &Path) -> Result<KeySet> {
        let content = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
        self.parse_str(&content)
            .with_context(|| format!("inventory {}", path.display()))
    }

    /// Parse an inventory from string content
    fn parse_str(&self, content: &str) -> Result<KeySet>;
}
