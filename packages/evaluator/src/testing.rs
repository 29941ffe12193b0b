//! Testing utilities including mock collaborator implementations.
//!
//! These are useful for testing applications that use the evaluator
//! without making real LLM calls.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{EvaluatorError, Result};
use crate::traits::{AttributeFallback, DomainDiscovery, FamilyGuess};
use crate::types::{ExtractedAttribute, ProductFamily, RawListing};

/// A mock LLM attribute fallback for testing.
///
/// Returns predefined attributes per listing id, and can be configured
/// to fail or delay to exercise the fail-open paths.
#[derive(Default)]
pub struct MockFallback {
    /// Predefined attributes by listing id
    responses: Arc<RwLock<HashMap<String, Vec<ExtractedAttribute>>>>,

    /// When set, every call fails with this message
    fail_with: Option<String>,

    /// Artificial delay before responding (for timeout tests)
    delay: Option<Duration>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockFallbackCall>>>,
}

/// Record of a call made to the mock fallback.
#[derive(Debug, Clone)]
pub struct MockFallbackCall {
    pub listing_id: String,
    pub missing: Vec<String>,
}

impl MockFallback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined response for a listing id.
    pub fn with_response(
        self,
        listing_id: impl Into<String>,
        attributes: Vec<ExtractedAttribute>,
    ) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(listing_id.into(), attributes);
        self
    }

    /// Make every call fail.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    /// Delay every call (combine with a short configured timeout).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Calls recorded so far.
    pub fn calls(&self) -> Vec<MockFallbackCall> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl AttributeFallback for MockFallback {
    async fn extract_missing(
        &self,
        listing: &RawListing,
        missing: &[String],
    ) -> Result<Vec<ExtractedAttribute>> {
        self.calls.write().unwrap().push(MockFallbackCall {
            listing_id: listing.listing_id.clone(),
            missing: missing.to_vec(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.fail_with {
            return Err(EvaluatorError::Fallback(message.clone().into()));
        }
        Ok(self
            .responses
            .read()
            .unwrap()
            .get(&listing.listing_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// A mock domain-discovery collaborator for testing.
#[derive(Default)]
pub struct MockDiscovery {
    /// Predefined guesses by query
    guesses: Arc<RwLock<HashMap<String, FamilyGuess>>>,

    /// When set, every call fails with this message
    fail_with: Option<String>,
}

impl MockDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a predefined guess for a query.
    pub fn with_guess(self, query: impl Into<String>, guess: FamilyGuess) -> Self {
        self.guesses.write().unwrap().insert(query.into(), guess);
        self
    }

    /// Make every call fail.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }
}

#[async_trait]
impl DomainDiscovery for MockDiscovery {
    async fn infer_family(&self, query: &str, _sample: &[RawListing]) -> Result<FamilyGuess> {
        if let Some(message) = &self.fail_with {
            return Err(EvaluatorError::Discovery(message.clone().into()));
        }
        Ok(self
            .guesses
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| FamilyGuess::new(ProductFamily::Generic, 0.5)))
    }
}
