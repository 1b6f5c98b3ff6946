//! The narrow term interface the arithmetic theory consumes and produces.
//!
//! Terms are opaque to the engine apart from their [`Kind`] and children; the theory never
//! mutates a term, it only builds new ones (explanations, lemmas).
mod term;
mod validity;

pub use term::*;
pub use validity::*;
