//! **License-conflict auditing for dependency changes.**
//!
//! `sbom-license-audit` watches what a build's dependency inventory gains and
//! loses between two runs and checks every newly introduced license against a
//! compatibility matrix. Conflicts the matrix flags are explained and triaged
//! by a language model reached over a small line-based RPC protocol.
//!
//! ## Core Concepts & Modules
//!
//! - **[`parsers`]**: reads CycloneDX XML inventories into sets of
//!   [`ComponentKey`]s.
//! - **[`diff`]**: the [`DiffEngine`], a set difference over component keys.
//! - **[`model`]**: licenses, dependencies, the key codec and the conflict
//!   lifecycle records.
//! - **[`matrix`]**: the [`CompatibilityMatrix`] loaded from CSV.
//! - **[`conflicts`]**: the reasoning and categorization stages.
//! - **[`session`]** and **[`transport`]**: model conversations and the RPC
//!   wire protocol underneath them.
//! - **[`pipeline`]**: the stages wired together into one audit run.
//!
//! ## Diffing Two Inventories
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_license_audit::DiffEngine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let diff = DiffEngine::new()
//!         .diff_files(Some(Path::new("bom-prev.xml")), Path::new("bom.xml"))?;
//!
//!     for dependency in diff.added_dependencies() {
//!         println!("+ {}", dependency.coordinate());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Checking Licenses Against the Matrix
//!
//! ```no_run
//! use std::path::Path;
//! use sbom_license_audit::{CompatibilityMatrix, License};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let matrix = CompatibilityMatrix::load(Path::new("matrix.csv"))?;
//!     let conflicts = matrix.lookup(&License::new("Apache-2.0"), &[License::new("GPL-3.0")]);
//!     for (license, indicator) in &conflicts {
//!         println!("{license}: {indicator}");
//!     }
//!     Ok(())
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod config;
pub mod conflicts;
pub mod diff;
pub mod error;
pub mod matrix;
pub mod model;
pub mod parsers;
pub mod pipeline;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError, Validatable};
pub use conflicts::{ConflictCategorizer, ConflictReasoner, TriageError};
pub use diff::{DiffEngine, DiffSummary, InventoryDiff};
pub use error::{AuditError, ErrorContext, Result};
pub use matrix::CompatibilityMatrix;
pub use model::{
    ComponentKey, ConflictCategory, ConflictPartition, Dependency, DependencyChanges, Indicator,
    KeySet, License,
};
pub use parsers::{parse_inventory, parse_inventory_str, CycloneDxXmlParser, InventoryParser};
pub use pipeline::{AuditPipeline, PipelineError, PipelineSettings, RunOutcome};
pub use session::{ModelSession, SessionError, SessionFactory, SessionRegistry};
pub use transport::{SocketTransport, Transport, TransportConfig, TransportError};
