//! Fallback extractor for unrecognized product families.
//!
//! Uses only the shared recognizers; the single key attribute is
//! condition, which every second-hand listing should state.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ExtractedAttribute, ProductFamily};

use super::{
    extract_color, extract_condition, extract_negated_bool, extract_presence_bool,
    extract_storage, FamilyExtractor,
};

lazy_static! {
    static ref DAMAGE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bspricka\b").unwrap(),
        Regex::new(r"\bsprucken\b").unwrap(),
        Regex::new(r"\brepor\b").unwrap(),
        Regex::new(r"\bcrack(?:ed|s)?\b").unwrap(),
        Regex::new(r"\bscratch(?:ed|es)?\b").unwrap(),
    ];

    static ref NO_DAMAGE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"inga\s*sprickor").unwrap(),
        Regex::new(r"inga\s*repor").unwrap(),
        Regex::new(r"utan\s*sprickor").unwrap(),
        Regex::new(r"no\s*cracks?").unwrap(),
        Regex::new(r"no\s*scratch(?:es)?").unwrap(),
    ];

    static ref WARRANTY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bgaranti\b").unwrap(),
        Regex::new(r"\bwarranty\b").unwrap(),
    ];

    static ref RECEIPT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bkvitto\b").unwrap(),
        Regex::new(r"\breceipt\b").unwrap(),
        Regex::new(r"\bfaktura\b").unwrap(),
    ];

    static ref COLOR_TABLE: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"\bsvart\b").unwrap(), "black"),
        (Regex::new(r"\bblack\b").unwrap(), "black"),
        (Regex::new(r"\bvit\b").unwrap(), "white"),
        (Regex::new(r"\bwhite\b").unwrap(), "white"),
        (Regex::new(r"\bblå\b").unwrap(), "blue"),
        (Regex::new(r"\bblue\b").unwrap(), "blue"),
        (Regex::new(r"\bröd\b").unwrap(), "red"),
        (Regex::new(r"\bred\b").unwrap(), "red"),
        (Regex::new(r"\bgrå\b").unwrap(), "gray"),
        (Regex::new(r"\bgray\b").unwrap(), "gray"),
        (Regex::new(r"\bsilver\b").unwrap(), "silver"),
    ];
}

/// Extractor used when no family-specific one applies.
pub struct GenericExtractor;

impl FamilyExtractor for GenericExtractor {
    fn family(&self) -> ProductFamily {
        ProductFamily::Generic
    }

    fn key_attributes(&self) -> &'static [&'static str] {
        &["condition"]
    }

    fn recognize(&self, text: &str) -> Vec<ExtractedAttribute> {
        let mut attrs: Vec<ExtractedAttribute> = Vec::new();

        attrs.push(extract_condition(text));

        if let Some(storage) = extract_storage(text) {
            attrs.push(storage);
        }

        if let Some(cracks) = extract_negated_bool(
            text,
            "has_cracks",
            &NO_DAMAGE_PATTERNS,
            &DAMAGE_PATTERNS,
            0.85,
            0.9,
        ) {
            attrs.push(cracks);
        }

        if let Some(warranty) = extract_presence_bool(text, "has_warranty", &WARRANTY_PATTERNS, 0.8)
        {
            attrs.push(warranty);
        }

        if let Some(receipt) = extract_presence_bool(text, "has_receipt", &RECEIPT_PATTERNS, 0.8) {
            attrs.push(receipt);
        }

        if let Some(color) = extract_color(text, &COLOR_TABLE) {
            attrs.push(color);
        }

        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Condition, RawListing};

    #[test]
    fn test_condition_only_key_attribute() {
        let listing = RawListing::new("g1", "Soffa i gott skick, grå");
        let attrs = GenericExtractor.extract(&listing);
        assert_eq!(attrs.condition, Condition::Good);
        assert_eq!(attrs.color.as_deref(), Some("gray"));
        assert!(GenericExtractor.missing_key_attributes(&attrs).is_empty());
    }

    #[test]
    fn test_unknown_condition_marks_missing() {
        let listing = RawListing::new("g2", "Soffa säljes");
        let attrs = GenericExtractor.extract(&listing);
        assert_eq!(attrs.condition, Condition::Unknown);
        assert_eq!(
            GenericExtractor.missing_key_attributes(&attrs),
            vec!["condition".to_string()]
        );
    }

    #[test]
    fn test_negation_checked_first() {
        let listing = RawListing::new("g3", "Telefon, inga sprickor");
        let attrs = GenericExtractor.extract(&listing);
        assert_eq!(attrs.has_cracks, Some(false));
    }
}
