//! Data model shared by every pipeline stage.
//!
//! Component keys are the set elements the diff works on; dependencies and
//! licenses are what the keys decode into; conflict records carry a license
//! through matrix lookup, justification and triage.

mod component_key;
mod conflict;
mod dependency;
mod license;

pub use component_key::*;
pub use conflict::*;
pub use dependency::*;
pub use license::*;
