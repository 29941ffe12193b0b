//! Query understanding / domain discovery boundary.
//!
//! An upstream collaborator classifies the search query into a product
//! family and may propose a clarifying question. The core stays correct
//! without it: a failing collaborator degrades to `ProductFamily::Generic`.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ProductFamily, RawListing};

/// Result of classifying a search query.
#[derive(Debug, Clone)]
pub struct FamilyGuess {
    /// The inferred product family
    pub family: ProductFamily,

    /// Confidence in the classification (0.0 to 1.0)
    pub confidence: f64,

    /// Question to ask the buyer when the query is ambiguous
    pub clarifying_question: Option<String>,
}

impl FamilyGuess {
    pub fn new(family: ProductFamily, confidence: f64) -> Self {
        Self {
            family,
            confidence,
            clarifying_question: None,
        }
    }
}

/// Collaborator that infers the product family from the query plus a
/// probe sample of listings.
#[async_trait]
pub trait DomainDiscovery: Send + Sync {
    async fn infer_family(&self, query: &str, sample: &[RawListing]) -> Result<FamilyGuess>;
}
