//! LLM attribute-extraction fallback boundary.
//!
//! The pattern extractors resolve most attributes; this trait covers the
//! rest. It is treated as untrusted and fallible: the pipeline bounds
//! every call with a timeout, and any error leaves the attribute absent
//! rather than failing the run.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ExtractedAttribute, RawListing};

/// Collaborator that resolves attributes the pattern extractor missed.
///
/// Implementations wrap specific LLM providers and handle prompting and
/// response parsing. Returned attributes use the same shape as pattern
/// extractions, with `AttributeSource::Llm`.
#[async_trait]
pub trait AttributeFallback: Send + Sync {
    /// Attempt to resolve the named missing attributes for one listing.
    ///
    /// Attributes absent from the response simply stay unresolved.
    /// Implementations should not invent values they cannot ground in
    /// the listing text.
    async fn extract_missing(
        &self,
        listing: &RawListing,
        missing: &[String],
    ) -> Result<Vec<ExtractedAttribute>>;
}
