//! Tablet attribute extractor.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ExtractedAttribute, ProductFamily};

use super::{
    extract_bounded_int, extract_condition, extract_model, extract_negated_bool,
    extract_presence_bool, extract_storage, FamilyExtractor,
};

lazy_static! {
    static ref IPAD_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"ipad\s*pro\s*12[.,]9").unwrap(), "iPad Pro 12.9"),
        (Regex::new(r"ipad\s*pro\s*11").unwrap(), "iPad Pro 11"),
        (Regex::new(r"ipad\s*pro").unwrap(), "iPad Pro"),
        (Regex::new(r"ipad\s*air\s*5").unwrap(), "iPad Air 5"),
        (Regex::new(r"ipad\s*air\s*4").unwrap(), "iPad Air 4"),
        (Regex::new(r"ipad\s*air").unwrap(), "iPad Air"),
        (Regex::new(r"ipad\s*mini\s*6").unwrap(), "iPad Mini 6"),
        (Regex::new(r"ipad\s*mini").unwrap(), "iPad Mini"),
        (Regex::new(r"ipad").unwrap(), "iPad"),
    ];

    static ref ANDROID_TABLET_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"galaxy\s*tab\s*s9\s*ultra").unwrap(), "Samsung Galaxy Tab S9 Ultra"),
        (Regex::new(r"galaxy\s*tab\s*s9").unwrap(), "Samsung Galaxy Tab S9"),
        (Regex::new(r"galaxy\s*tab\s*s8").unwrap(), "Samsung Galaxy Tab S8"),
        (Regex::new(r"galaxy\s*tab").unwrap(), "Samsung Galaxy Tab"),
        (Regex::new(r"lenovo\s*tab").unwrap(), "Lenovo Tab"),
    ];

    static ref CRACK_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"sprick").unwrap(),
        Regex::new(r"crack").unwrap(),
        Regex::new(r"sprucken").unwrap(),
        Regex::new(r"skärm\S*\s*skad").unwrap(),
        Regex::new(r"trasig\S*\s*glas").unwrap(),
    ];

    static ref NO_CRACK_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"inga?\s*sprick").unwrap(),
        Regex::new(r"utan\s*sprick").unwrap(),
        Regex::new(r"no\s*cracks?").unwrap(),
        Regex::new(r"felfri").unwrap(),
        Regex::new(r"perfekt\s*skärm").unwrap(),
    ];

    static ref BATTERY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"batteri\D*?(\d{1,3})\s*%").unwrap(),
        Regex::new(r"battery\D*?(\d{1,3})\s*%").unwrap(),
        Regex::new(r"batterihälsa\D*?(\d{1,3})").unwrap(),
    ];

    static ref WARRANTY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bgaranti\b").unwrap(),
        Regex::new(r"\bwarranty\b").unwrap(),
        Regex::new(r"\bapple\s*care\b").unwrap(),
    ];

    static ref RECEIPT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bkvitto\b").unwrap(),
        Regex::new(r"\breceipt\b").unwrap(),
        Regex::new(r"\bfaktura\b").unwrap(),
    ];
}

/// Extractor for tablets.
pub struct TabletExtractor;

impl FamilyExtractor for TabletExtractor {
    fn family(&self) -> ProductFamily {
        ProductFamily::Tablet
    }

    fn key_attributes(&self) -> &'static [&'static str] {
        &["model_variant", "storage_gb", "condition", "has_cracks"]
    }

    fn recognize(&self, text: &str) -> Vec<ExtractedAttribute> {
        let mut attrs: Vec<ExtractedAttribute> = Vec::new();

        if let Some(model) = extract_model(
            text,
            &[(IPAD_MODELS.as_slice(), 0.95), (ANDROID_TABLET_MODELS.as_slice(), 0.9)],
        ) {
            attrs.push(model);
        }

        if let Some(storage) = extract_storage(text) {
            attrs.push(storage);
        }

        attrs.push(extract_condition(text));

        if let Some(cracks) =
            extract_negated_bool(text, "has_cracks", &NO_CRACK_PATTERNS, &CRACK_PATTERNS, 0.9, 0.85)
        {
            attrs.push(cracks);
        }

        if let Some(battery) =
            extract_bounded_int(text, "battery_health", &BATTERY_PATTERNS, 0..=100, 0.95)
        {
            attrs.push(battery);
        }

        if let Some(warranty) = extract_presence_bool(text, "has_warranty", &WARRANTY_PATTERNS, 0.8)
        {
            attrs.push(warranty);
        }

        if let Some(receipt) = extract_presence_bool(text, "has_receipt", &RECEIPT_PATTERNS, 0.8) {
            attrs.push(receipt);
        }

        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Condition, RawListing};

    #[test]
    fn test_ipad_pro_size_specificity() {
        let listing = RawListing::new("t1", "iPad Pro 12,9 256GB nyskick");
        let attrs = TabletExtractor.extract(&listing);
        assert_eq!(attrs.model_variant.as_deref(), Some("iPad Pro 12.9"));
        assert_eq!(attrs.storage_gb, Some(256));
        assert_eq!(attrs.condition, Condition::LikeNew);
    }

    #[test]
    fn test_plain_ipad_fallback() {
        let listing = RawListing::new("t1", "iPad 64GB");
        let attrs = TabletExtractor.extract(&listing);
        assert_eq!(attrs.model_variant.as_deref(), Some("iPad"));
    }
}
