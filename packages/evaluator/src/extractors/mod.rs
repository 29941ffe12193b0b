//! Family-specific attribute extractors.
//!
//! Each product family implements [`FamilyExtractor`]: an ordered list
//! of pattern recognizers per attribute, most-specific first, first
//! match wins. Extractors are registered in an [`ExtractorRegistry`]
//! that defaults to the generic extractor for unknown families.
//!
//! Shared recognizers (condition, storage, negated booleans) live here;
//! the per-family modules contribute their model tables and family
//! quirks.

pub mod camera;
pub mod generic;
pub mod laptop;
pub mod phone;
pub mod tablet;

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::pipeline::canonical::create_canonical_key;
use crate::types::{
    AttributeValue, CanonicalKey, Condition, ExtractedAttribute, ExtractedAttributes,
    ProductFamily, RawListing,
};

pub use camera::CameraExtractor;
pub use generic::GenericExtractor;
pub use laptop::LaptopExtractor;
pub use phone::PhoneExtractor;
pub use tablet::TabletExtractor;

/// Capability contract for one product family.
///
/// Implementations supply the family's recognizers; `extract`,
/// `create_canonical_key`, and `missing_key_attributes` are derived.
pub trait FamilyExtractor: Send + Sync {
    /// The family this extractor serves.
    fn family(&self) -> ProductFamily;

    /// Attributes critical for comparison within this family.
    fn key_attributes(&self) -> &'static [&'static str];

    /// Run the family's recognizers over the lowercased combined
    /// title + description.
    fn recognize(&self, text: &str) -> Vec<ExtractedAttribute>;

    /// Extract structured attributes from a listing.
    fn extract(&self, listing: &RawListing) -> ExtractedAttributes {
        let text = listing.search_text();
        ExtractedAttributes::from_attributes(
            listing.listing_id.clone(),
            self.family(),
            self.recognize(&text),
            self.key_attributes(),
        )
    }

    /// Derive the canonical grouping key for extracted attributes.
    fn create_canonical_key(&self, attrs: &ExtractedAttributes) -> CanonicalKey {
        create_canonical_key(attrs)
    }

    /// Key attributes whose typed field is still unresolved. Feeds the
    /// seller-question checklist.
    fn missing_key_attributes(&self, attrs: &ExtractedAttributes) -> Vec<String> {
        self.key_attributes()
            .iter()
            .filter(|name| !attrs.is_resolved(name))
            .map(|name| name.to_string())
            .collect()
    }
}

/// Registry of family extractors, dependency-injected into the
/// evaluator. Unregistered families fall back to the generic extractor.
pub struct ExtractorRegistry {
    extractors: HashMap<ProductFamily, Arc<dyn FamilyExtractor>>,
    fallback: Arc<dyn FamilyExtractor>,
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        let mut registry = Self {
            extractors: HashMap::new(),
            fallback: Arc::new(GenericExtractor),
        };
        registry.register(Arc::new(PhoneExtractor));
        registry.register(Arc::new(LaptopExtractor));
        registry.register(Arc::new(TabletExtractor));
        registry.register(Arc::new(CameraExtractor));
        registry.register(Arc::new(GenericExtractor));
        registry
    }
}

impl ExtractorRegistry {
    /// Registry with all built-in extractors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the extractor for its family.
    pub fn register(&mut self, extractor: Arc<dyn FamilyExtractor>) {
        self.extractors.insert(extractor.family(), extractor);
    }

    /// Look up the extractor for a family, falling back to generic.
    pub fn get(&self, family: ProductFamily) -> Arc<dyn FamilyExtractor> {
        self.extractors
            .get(&family)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}

// === Shared recognizers ===

lazy_static! {
    /// Ordered condition table, most specific first, Swedish + English.
    /// First match wins.
    static ref CONDITION_TABLE: Vec<(Regex, Condition)> = vec![
        (Regex::new(r"\bsom\s*ny\b").unwrap(), Condition::LikeNew),
        (Regex::new(r"\bnyskick\b").unwrap(), Condition::LikeNew),
        (Regex::new(r"\blike\s*new\b").unwrap(), Condition::LikeNew),
        (Regex::new(r"\bfelfri\b").unwrap(), Condition::LikeNew),
        (Regex::new(r"\bhelt\s*ny\b").unwrap(), Condition::New),
        (Regex::new(r"\bbrand\s*new\b").unwrap(), Condition::New),
        (Regex::new(r"\boanvänd\b").unwrap(), Condition::New),
        (Regex::new(r"\bny\b").unwrap(), Condition::New),
        (Regex::new(r"\bbra\s*skick\b").unwrap(), Condition::Good),
        (Regex::new(r"\bgott\s*skick\b").unwrap(), Condition::Good),
        (Regex::new(r"\bfint\s*skick\b").unwrap(), Condition::Good),
        (Regex::new(r"\bgood\s*condition\b").unwrap(), Condition::Good),
        (Regex::new(r"\bok\s*skick\b").unwrap(), Condition::Ok),
        (Regex::new(r"\bokej\s*skick\b").unwrap(), Condition::Ok),
        (Regex::new(r"\banvänd\b").unwrap(), Condition::Ok),
        (Regex::new(r"\bwell\s*used\b").unwrap(), Condition::Ok),
        (Regex::new(r"\bdefekt\b").unwrap(), Condition::Defect),
        (Regex::new(r"\btrasig\b").unwrap(), Condition::Defect),
        (Regex::new(r"\bsönder\b").unwrap(), Condition::Defect),
        (Regex::new(r"\bbroken\b").unwrap(), Condition::Defect),
        (Regex::new(r"\bdefect\b").unwrap(), Condition::Defect),
        (Regex::new(r"\bfor\s*parts\b").unwrap(), Condition::Defect),
    ];

    static ref STORAGE_GB: Regex = Regex::new(r"(\d+)\s*gb").unwrap();
    static ref STORAGE_TB: Regex = Regex::new(r"(\d+)\s*tb").unwrap();
}

/// Canonical storage sizes in GB. Non-canonical parses are kept at
/// lower confidence.
const CANONICAL_STORAGE_GB: [u32; 7] = [32, 64, 128, 256, 512, 1024, 2048];

/// Extract the condition attribute.
///
/// Condition is the only attribute always emitted: no match yields
/// `Unknown` at low confidence.
pub(crate) fn extract_condition(text: &str) -> ExtractedAttribute {
    for (pattern, condition) in CONDITION_TABLE.iter() {
        if let Some(m) = pattern.find(text) {
            return ExtractedAttribute::new(
                "condition",
                AttributeValue::Condition(*condition),
                0.8,
            )
            .with_evidence(m.as_str());
        }
    }
    ExtractedAttribute::new("condition", AttributeValue::Condition(Condition::Unknown), 0.3)
}

/// Extract storage size in GB. TB values are converted (×1024) and the
/// result validated against the canonical allow-list.
pub(crate) fn extract_storage(text: &str) -> Option<ExtractedAttribute> {
    for (pattern, multiplier) in [(&*STORAGE_GB, 1u32), (&*STORAGE_TB, 1024u32)] {
        if let Some(caps) = pattern.captures(text) {
            let Ok(parsed) = caps[1].parse::<u32>() else {
                continue;
            };
            let Some(gb) = parsed.checked_mul(multiplier) else {
                continue;
            };
            let evidence = caps.get(0).map(|m| m.as_str().to_string());
            let confidence = if CANONICAL_STORAGE_GB.contains(&gb) {
                0.95
            } else if gb < 2048 {
                0.7
            } else {
                continue;
            };
            let mut attr =
                ExtractedAttribute::new("storage_gb", AttributeValue::Integer(gb as i64), confidence);
            attr.evidence_span = evidence;
            return Some(attr);
        }
    }
    None
}

/// Extract a boolean attribute with a natural negation.
///
/// Negation patterns are evaluated before positive patterns so that
/// "no cracks" never reads as cracked.
pub(crate) fn extract_negated_bool(
    text: &str,
    name: &str,
    negative: &[Regex],
    positive: &[Regex],
    negative_confidence: f64,
    positive_confidence: f64,
) -> Option<ExtractedAttribute> {
    for pattern in negative {
        if let Some(m) = pattern.find(text) {
            return Some(
                ExtractedAttribute::new(name, AttributeValue::Bool(false), negative_confidence)
                    .with_evidence(m.as_str()),
            );
        }
    }
    for pattern in positive {
        if let Some(m) = pattern.find(text) {
            return Some(
                ExtractedAttribute::new(name, AttributeValue::Bool(true), positive_confidence)
                    .with_evidence(m.as_str()),
            );
        }
    }
    None
}

/// Extract a presence-only boolean (warranty, receipt).
pub(crate) fn extract_presence_bool(
    text: &str,
    name: &str,
    patterns: &[Regex],
    confidence: f64,
) -> Option<ExtractedAttribute> {
    for pattern in patterns {
        if let Some(m) = pattern.find(text) {
            return Some(
                ExtractedAttribute::new(name, AttributeValue::Bool(true), confidence)
                    .with_evidence(m.as_str()),
            );
        }
    }
    None
}

/// Try an ordered model table; the first (most specific) match wins.
pub(crate) fn extract_model(
    text: &str,
    tables: &[(&[(Regex, &'static str)], f64)],
) -> Option<ExtractedAttribute> {
    for (table, confidence) in tables {
        for (pattern, model_name) in table.iter() {
            if let Some(m) = pattern.find(text) {
                return Some(
                    ExtractedAttribute::new(
                        "model_variant",
                        AttributeValue::Text(model_name.to_string()),
                        *confidence,
                    )
                    .with_evidence(m.as_str()),
                );
            }
        }
    }
    None
}

/// Extract a bounded integer from capture group 1 of the first matching
/// pattern (battery percentages, shutter counts).
pub(crate) fn extract_bounded_int(
    text: &str,
    name: &str,
    patterns: &[Regex],
    range: std::ops::RangeInclusive<i64>,
    confidence: f64,
) -> Option<ExtractedAttribute> {
    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Ok(value) = caps[1].parse::<i64>() {
                if range.contains(&value) {
                    let mut attr =
                        ExtractedAttribute::new(name, AttributeValue::Integer(value), confidence);
                    attr.evidence_span = caps.get(0).map(|m| m.as_str().to_string());
                    return Some(attr);
                }
            }
        }
    }
    None
}

/// Extract the first matching color from a (pattern, canonical name)
/// table.
pub(crate) fn extract_color(
    text: &str,
    table: &[(Regex, &'static str)],
) -> Option<ExtractedAttribute> {
    for (pattern, color) in table {
        if let Some(m) = pattern.find(text) {
            return Some(
                ExtractedAttribute::new("color", AttributeValue::Text(color.to_string()), 0.85)
                    .with_evidence(m.as_str()),
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_always_emitted() {
        let attr = extract_condition("a phone with no condition words");
        assert_eq!(attr.value.as_condition(), Some(Condition::Unknown));
        assert!(attr.confidence < 0.5);
    }

    #[test]
    fn test_like_new_beats_new() {
        // "som ny" contains "ny"; the more specific pattern must win.
        let attr = extract_condition("iphone i som ny skick");
        assert_eq!(attr.value.as_condition(), Some(Condition::LikeNew));

        let attr = extract_condition("tablet, like new");
        assert_eq!(attr.value.as_condition(), Some(Condition::LikeNew));
    }

    #[test]
    fn test_storage_canonical_vs_odd() {
        let attr = extract_storage("iphone 256gb svart").unwrap();
        assert_eq!(attr.value.as_integer(), Some(256));
        assert!((attr.confidence - 0.95).abs() < 1e-9);

        let attr = extract_storage("lagring 200 gb").unwrap();
        assert_eq!(attr.value.as_integer(), Some(200));
        assert!((attr.confidence - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_storage_tb_converted() {
        let attr = extract_storage("macbook 1 tb ssd").unwrap();
        assert_eq!(attr.value.as_integer(), Some(1024));
        assert!((attr.confidence - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_registry_falls_back_to_generic() {
        let registry = ExtractorRegistry {
            extractors: HashMap::new(),
            fallback: Arc::new(GenericExtractor),
        };
        let extractor = registry.get(ProductFamily::Phone);
        assert_eq!(extractor.family(), ProductFamily::Generic);
    }

    #[test]
    fn test_default_registry_serves_all_families() {
        let registry = ExtractorRegistry::default();
        for family in [
            ProductFamily::Phone,
            ProductFamily::Laptop,
            ProductFamily::Tablet,
            ProductFamily::Camera,
            ProductFamily::Generic,
        ] {
            assert_eq!(registry.get(family).family(), family);
        }
    }
}
