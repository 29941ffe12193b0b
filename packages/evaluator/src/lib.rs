//! Comparable-Group Valuation and Ranking Engine
//!
//! Evaluates second-hand marketplace listings for a search query:
//! extracts structured attributes from free text, groups listings into
//! comparable markets, computes robust price statistics with
//! progressive relaxation, and ranks candidates with a deterministic
//! three-factor score.
//!
//! # Design Philosophy
//!
//! **"Absence is not an error"**
//!
//! - Pattern misses yield missing attributes, never exceptions
//! - Thin comps degrade to neutral value scores, surfaced via `comps_n`
//! - Collaborator failures fail open: attributes stay absent, candidates
//!   stay included
//! - Identical input always produces identical ranked output
//!
//! # Usage
//!
//! ```rust,ignore
//! use evaluator::{Evaluator, EvaluationConfig, PreferenceConfig, ProductFamily};
//!
//! let prefs = PreferenceConfig::from_json(r#"{"min_condition": "good", "no_cracks": true}"#)?;
//! let engine = Evaluator::new(EvaluationConfig::default());
//! let report = engine
//!     .evaluate(Some("iphone 15 pro"), ProductFamily::Phone, listings, &prefs)
//!     .await?;
//! for entry in &report.ranked {
//!     println!("#{} {} -> {:.0}", entry.rank, entry.title, entry.scores.final_score);
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Listings, attributes, keys, scores, configuration
//! - [`extractors`] - Family-specific pattern extractors and the registry
//! - [`pipeline`] - Filter, comps, scoring, and ranking stages
//! - [`traits`] - Collaborator seams (LLM fallback, domain discovery)
//! - [`testing`] - Mock collaborators for testing

pub mod error;
pub mod extractors;
pub mod pipeline;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{EvaluatorError, Result};
pub use extractors::{ExtractorRegistry, FamilyExtractor};
pub use pipeline::Evaluator;
pub use traits::{AttributeFallback, DomainDiscovery, FamilyGuess};
pub use types::{
    CanonicalKey, Condition, EvaluationConfig, EvaluationReport, ExtractedAttributes,
    PreferenceConfig, ProductFamily, RankedListing, RawListing,
};
