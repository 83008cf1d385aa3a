//! Model-assisted conflict analysis.
//!
//! The reasoner turns matrix indicators into one-sentence justifications; the
//! categorizer triages each justified conflict into fixable, needs-legal or
//! unknown. Neither ever fails: model trouble degrades to fallback reasons and
//! the unknown bucket.

mod categorizer;
mod reasoner;

pub use categorizer::ConflictCategorizer;
pub use reasoner::{ConflictReasoner, ANALYSIS_FAILED_REASON, UNKNOWN_RELATIONSHIP_REASON};

use crate::session::SessionError;
use thiserror::Error;

/// Why a conflict could not be categorized
#[derive(Error, Debug)]
pub enum TriageError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("Unknown conflict category: {0:?}")]
    UnexpectedReply(String),
}
