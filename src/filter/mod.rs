//! Text filters: structural character-level cleanup and per-line
//! boilerplate classification.

pub mod boilerplate;
pub mod structural;

pub use boilerplate::{BoilerplateClassifier, BoilerplateConfig, LineVerdict, RemovalReason};
pub use structural::StructuralFilter;
