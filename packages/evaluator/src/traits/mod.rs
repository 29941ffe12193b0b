//! Trait abstractions at the collaborator seams.

pub mod discovery;
pub mod fallback;

pub use discovery::{DomainDiscovery, FamilyGuess};
pub use fallback::AttributeFallback;
