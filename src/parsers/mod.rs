//! Inventory parsers.
//!
//! Inventories are CycloneDX XML documents. Parsing reduces one document to
//! the set of component keys the diff engine compares.
//!
//! ## Usage
//!
//! ```no_run
//! use sbom_license_audit::parsers::parse_inventory;
//! use std::path::Path;
//!
//! let keys = parse_inventory(Path::new(".license-tool/bom.xml")).unwrap();
//! println!("{} components", keys.len());
//! ```

mod cyclonedx;
mod traits;

pub use cyclonedx::CycloneDxXmlParser;
pub use traits::InventoryParser;

use crate::error::{AuditError, Result};
use crate::model::KeySet;
use std::path::Path;

/// Maximum inventory file size (256 MB)
const MAX_INVENTORY_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Parse an inventory file into its component keys.
///
/// Returns an error if the file is missing, unreadable, larger than
/// [`MAX_INVENTORY_FILE_SIZE`] or not a well-formed document.
pub fn parse_inventory(path: &Path) -> Result<KeySet> {
    let metadata = std::fs::metadata(path).map_err(|e| AuditError::io(path, e))?;
    if metadata.len() > MAX_INVENTORY_FILE_SIZE {
        return Err(AuditError::validation(format!(
            "inventory {} is {} MB, exceeding the {} MB limit",
            path.display(),
            metadata.len() / (1024 * 1024),
            MAX_INVENTORY_FILE_SIZE / (1024 * 1024),
        )));
    }
    CycloneDxXmlParser::new().parse(path)
}

/// Parse inventory content into its component keys.
pub fn parse_inventory_str(content: &str) -> Result<KeySet> {
    CycloneDxXmlParser::new().parse_str(content)
}
