//! Inventory diff engine.
//!
//! Two inventories are compared as plain sets of component keys. A version
//! bump of the same component therefore shows up as one removal plus one
//! unrelated addition.
//!
//! # Example
//!
//! ```ignore
//! use sbom_license_audit::diff::DiffEngine;
//!
//! let engine = DiffEngine::new();
//! let result = engine.diff(Some(&previous_keys), &current_keys);
//! for dep in result.added_dependencies() {
//!     println!("+ {}", dep.coordinate());
//! }
//! ```

mod engine;
mod result;

pub use engine::DiffEngine;
pub use result::{DiffSummary, InventoryDiff};
