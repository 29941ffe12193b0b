//! The ranking orchestrator: a strictly sequential pipeline from raw
//! listings to a ranked report.
//!
//! Stage order is fixed: intake filter, extraction, canonicalization,
//! comps-index construction, scoring, sort, truncate. Comps
//! construction is a synchronization barrier; no listing is scored
//! against a partially built index.

use std::sync::Arc;

use chrono::Utc;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::extractors::ExtractorRegistry;
use crate::pipeline::comps::CompsIndex;
use crate::pipeline::filter::apply_intake_filter;
use crate::pipeline::preference::compute_preference_score;
use crate::pipeline::risk::assess_risk;
use crate::pipeline::valuation::compute_value_score;
use crate::traits::{AttributeFallback, DomainDiscovery, FamilyGuess};
use crate::types::{
    CanonicalKey, EvaluationConfig, EvaluationReport, ExtractedAttributes, ListingScores,
    PreferenceConfig, ProductFamily, RankedListing, RawListing, SellerQuestion,
};

/// Number of listings sampled for family inference.
const DISCOVERY_SAMPLE_SIZE: usize = 5;

/// Comparable-group valuation and ranking engine.
///
/// Owns the extractor registry, the run configuration, and the optional
/// LLM fallback. Stateless across runs; every [`evaluate`](Self::evaluate)
/// call builds its own attribute, key, and comps maps.
pub struct Evaluator {
    registry: ExtractorRegistry,
    config: EvaluationConfig,
    fallback: Option<Arc<dyn AttributeFallback>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvaluationConfig::default())
    }
}

impl Evaluator {
    /// Evaluator with the built-in extractor registry and no LLM
    /// fallback.
    pub fn new(config: EvaluationConfig) -> Self {
        Self {
            registry: ExtractorRegistry::default(),
            config,
            fallback: None,
        }
    }

    /// Replace the extractor registry.
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Attach an LLM attribute-extraction fallback.
    pub fn with_fallback(mut self, fallback: Arc<dyn AttributeFallback>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Resolve the product family for a query via the discovery
    /// collaborator, degrading to `Generic` on any failure.
    pub async fn resolve_family(
        &self,
        discovery: &dyn DomainDiscovery,
        query: &str,
        listings: &[RawListing],
    ) -> FamilyGuess {
        let sample = &listings[..listings.len().min(DISCOVERY_SAMPLE_SIZE)];
        match discovery.infer_family(query, sample).await {
            Ok(guess) => guess,
            Err(e) => {
                warn!("domain discovery failed, falling back to generic family: {e}");
                FamilyGuess::new(ProductFamily::Generic, 0.0)
            }
        }
    }

    /// Run the full pipeline for one search.
    pub async fn evaluate(
        &self,
        query: Option<&str>,
        family: ProductFamily,
        listings: Vec<RawListing>,
        prefs: &PreferenceConfig,
    ) -> Result<EvaluationReport> {
        prefs.validate()?;
        let started_at = Utc::now();
        let input_count = listings.len();
        info!(input_count, family = family.label(), "starting evaluation run");

        // Stage 0: intake constraints and price sanity.
        let (working_set, mut filtered_out) =
            apply_intake_filter(listings, prefs, self.config.intake_iqr_multiplier);

        // Stage 1: per-listing extraction, order preserved.
        let extractor = self.registry.get(family);
        let all_attrs: Vec<ExtractedAttributes> = stream::iter(working_set.iter())
            .map(|listing| self.extract_one(extractor.as_ref(), listing))
            .buffered(self.config.extraction_concurrency.max(1))
            .collect()
            .await;

        // Stage 2: canonicalization.
        let keys: Vec<CanonicalKey> = all_attrs
            .iter()
            .map(|attrs| extractor.create_canonical_key(attrs))
            .collect();

        // Stage 3: comps construction over the whole working set. This
        // is the barrier; the index is read-only from here on.
        let entries: Vec<(&RawListing, &CanonicalKey)> =
            working_set.iter().zip(keys.iter()).collect();
        let index = CompsIndex::build(&entries);

        // Stage 4: per-listing comps resolution and scoring.
        let total_evaluated = working_set.len();
        let mut survivors: Vec<(usize, RankedListing)> = Vec::new();
        for (idx, ((listing, attrs), key)) in working_set
            .iter()
            .zip(all_attrs.iter())
            .zip(keys.iter())
            .enumerate()
        {
            let group = index.find(key, self.config.min_comps_sample);
            let value = compute_value_score(listing.price, group.as_ref());
            let preference = compute_preference_score(attrs, prefs);
            let risk = assess_risk(listing, attrs, group.as_ref().and_then(|g| g.stats.as_ref()));

            if !preference.hard_filters_passed {
                debug!(
                    listing_id = %listing.listing_id,
                    failed = ?preference.failed_hard_filters,
                    "excluded by hard preference filter"
                );
                filtered_out += 1;
                continue;
            }

            let final_score = (self.config.value_weight * value.score
                + self.config.preference_weight * preference.score
                - self.config.risk_weight * risk.score)
                .clamp(0.0, 100.0);

            let checklist = seller_questions(&extractor.missing_key_attributes(attrs));
            survivors.push((
                idx,
                RankedListing {
                    rank: 0,
                    listing_id: listing.listing_id.clone(),
                    url: listing.url.clone(),
                    title: listing.title.clone(),
                    asking_price: listing.price,
                    location: listing.location.clone(),
                    attributes: attrs.clone(),
                    canonical_key: key.clone(),
                    scores: ListingScores {
                        listing_id: listing.listing_id.clone(),
                        value,
                        preference,
                        risk,
                        final_score,
                    },
                    checklist,
                },
            ));
        }

        // Stages 5-7: sort by score descending with the ingestion index
        // as the explicit tie-break, truncate, assign ranks.
        survivors.sort_by(|(a_idx, a), (b_idx, b)| {
            b.scores
                .final_score
                .total_cmp(&a.scores.final_score)
                .then(a_idx.cmp(b_idx))
        });
        let mut ranked: Vec<RankedListing> = survivors
            .into_iter()
            .take(self.config.top_k)
            .map(|(_, listing)| listing)
            .collect();
        for (i, entry) in ranked.iter_mut().enumerate() {
            entry.rank = i + 1;
        }

        let mut data_quality_notes: Vec<String> = Vec::new();
        if index.exact_group_count() == 0 {
            data_quality_notes
                .push("No comparable groups could be built; value scores are neutral".to_string());
        }
        if input_count > 0 && filtered_out * 2 > input_count {
            data_quality_notes.push(format!(
                "More than half of the input was filtered out ({filtered_out} of {input_count})"
            ));
        }

        let report = EvaluationReport {
            run_id: Uuid::new_v4().to_string(),
            query: query.map(|q| q.to_string()),
            started_at,
            completed_at: Utc::now(),
            ranked,
            total_evaluated,
            filtered_out,
            comps_group_count: index.exact_group_count(),
            data_quality_notes,
        };
        info!(
            run_id = %report.run_id,
            ranked = report.ranked.len(),
            filtered_out = report.filtered_out,
            "evaluation run complete"
        );
        Ok(report)
    }

    /// Extract one listing, invoking the LLM fallback for key
    /// attributes the patterns missed. Fallback failures and timeouts
    /// leave the attributes absent.
    async fn extract_one(
        &self,
        extractor: &dyn crate::extractors::FamilyExtractor,
        listing: &RawListing,
    ) -> ExtractedAttributes {
        let mut attrs = extractor.extract(listing);
        let Some(fallback) = &self.fallback else {
            return attrs;
        };
        let missing = extractor.missing_key_attributes(&attrs);
        if missing.is_empty() {
            return attrs;
        }

        match tokio::time::timeout(
            self.config.fallback_timeout,
            fallback.extract_missing(listing, &missing),
        )
        .await
        {
            Ok(Ok(resolved)) => {
                for attr in resolved {
                    attrs.absorb(attr);
                }
                attrs.recompute_confidence(extractor.key_attributes());
            }
            Ok(Err(e)) => {
                warn!(listing_id = %listing.listing_id, "attribute fallback failed: {e}");
            }
            Err(_) => {
                warn!(
                    listing_id = %listing.listing_id,
                    timeout_secs = self.config.fallback_timeout.as_secs(),
                    "attribute fallback timed out"
                );
            }
        }
        attrs
    }
}

/// Turn missing key attributes into ready-to-send seller questions.
fn seller_questions(missing: &[String]) -> Vec<SellerQuestion> {
    missing
        .iter()
        .map(|name| {
            let (question, reason) = match name.as_str() {
                "storage_gb" => (
                    "What is the storage capacity?",
                    "Storage strongly affects the market price",
                ),
                "condition" => (
                    "How would you describe the overall condition?",
                    "Condition is the main driver of second-hand value",
                ),
                "battery_health" => (
                    "What does the battery health show in settings?",
                    "Battery wear is a major cost factor for used devices",
                ),
                "has_cracks" => (
                    "Are there any cracks or scratches on the screen or body?",
                    "Physical damage is expensive to repair",
                ),
                "model_variant" => (
                    "What is the exact model name?",
                    "Comparable pricing needs the exact model",
                ),
                "is_locked" => (
                    "Is the device carrier-unlocked?",
                    "A locked device limits which networks you can use",
                ),
                "has_warranty" => (
                    "Is there any remaining warranty?",
                    "Warranty coverage reduces the risk of hidden faults",
                ),
                "has_receipt" => (
                    "Do you still have the original receipt?",
                    "A receipt proves ownership and purchase date",
                ),
                other => {
                    return SellerQuestion {
                        question: format!("Can you tell me more about {other}?"),
                        reason: "This detail was not stated in the advertisement".to_string(),
                        relates_to: other.to_string(),
                    }
                }
            };
            SellerQuestion {
                question: question.to_string(),
                reason: reason.to_string(),
                relates_to: name.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seller_questions_for_known_attributes() {
        let questions = seller_questions(&[
            "battery_health".to_string(),
            "mystery_attribute".to_string(),
        ]);
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].relates_to, "battery_health");
        assert!(questions[1].question.contains("mystery_attribute"));
    }
}
