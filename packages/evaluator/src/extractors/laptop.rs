//! Laptop attribute extractor.
//!
//! MacBooks dominate the second-hand laptop market, with ThinkPad and
//! XPS lines as the usual Windows counterparts. RAM is emitted as a
//! plain attribute; it is not part of the canonical key.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ExtractedAttribute, ProductFamily};

use super::{
    extract_bounded_int, extract_condition, extract_model, extract_negated_bool,
    extract_presence_bool, extract_storage, FamilyExtractor,
};

lazy_static! {
    static ref MACBOOK_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"macbook\s*pro\s*16").unwrap(), "MacBook Pro 16"),
        (Regex::new(r"macbook\s*pro\s*14").unwrap(), "MacBook Pro 14"),
        (Regex::new(r"macbook\s*pro\s*13").unwrap(), "MacBook Pro 13"),
        (Regex::new(r"macbook\s*pro").unwrap(), "MacBook Pro"),
        (Regex::new(r"macbook\s*air\s*m3").unwrap(), "MacBook Air M3"),
        (Regex::new(r"macbook\s*air\s*m2").unwrap(), "MacBook Air M2"),
        (Regex::new(r"macbook\s*air\s*m1").unwrap(), "MacBook Air M1"),
        (Regex::new(r"macbook\s*air").unwrap(), "MacBook Air"),
        (Regex::new(r"macbook").unwrap(), "MacBook"),
    ];

    static ref PC_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"thinkpad\s*x1\s*carbon").unwrap(), "ThinkPad X1 Carbon"),
        (Regex::new(r"thinkpad\s*t14").unwrap(), "ThinkPad T14"),
        (Regex::new(r"thinkpad").unwrap(), "ThinkPad"),
        (Regex::new(r"dell\s*xps\s*15").unwrap(), "Dell XPS 15"),
        (Regex::new(r"dell\s*xps\s*13").unwrap(), "Dell XPS 13"),
        (Regex::new(r"dell\s*xps").unwrap(), "Dell XPS"),
        (Regex::new(r"surface\s*laptop").unwrap(), "Surface Laptop"),
        (Regex::new(r"elitebook").unwrap(), "HP EliteBook"),
        (Regex::new(r"zenbook").unwrap(), "Asus ZenBook"),
    ];

    static ref RAM_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(\d{1,3})\s*gb\s*ram").unwrap(),
        Regex::new(r"ram\D*?(\d{1,3})\s*gb").unwrap(),
    ];

    static ref SCREEN_DAMAGE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"sprick").unwrap(),
        Regex::new(r"crack").unwrap(),
        Regex::new(r"skärm\S*\s*skad").unwrap(),
        Regex::new(r"trasig\s*skärm").unwrap(),
        Regex::new(r"dead\s*pixel").unwrap(),
    ];

    static ref NO_SCREEN_DAMAGE_PATTERNS: Vec<Regex> = vec![
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

/// Extractor for laptops.
pub struct LaptopExtractor;

impl FamilyExtractor for LaptopExtractor {
    fn family(&self) -> ProductFamily {
        ProductFamily::Laptop
    }

    fn key_attributes(&self) -> &'static [&'static str] {
        &["model_variant", "storage_gb", "condition"]
    }

    fn recognize(&self, text: &str) -> Vec<ExtractedAttribute> {
        let mut attrs: Vec<ExtractedAttribute> = Vec::new();

        if let Some(model) =
            extract_model(text, &[(MACBOOK_MODELS.as_slice(), 0.95), (PC_MODELS.as_slice(), 0.9)])
        {
            attrs.push(model);
        }

        // Storage first so "16gb ram 512gb ssd" is not read as 16 GB
        // storage: the RAM capture is removed from the text before the
        // generic storage scan.
        let storage_text = RAM_PATTERNS
            .iter()
            .fold(text.to_string(), |t, p| p.replace(&t, " ").into_owned());
        if let Some(storage) = extract_storage(&storage_text) {
            attrs.push(storage);
        }

        if let Some(ram) = extract_bounded_int(text, "ram_gb", &RAM_PATTERNS, 2..=256, 0.9) {
            attrs.push(ram);
        }

        attrs.push(extract_condition(text));

        if let Some(cracks) = extract_negated_bool(
            text,
            "has_cracks",
            &NO_SCREEN_DAMAGE_PATTERNS,
            &SCREEN_DAMAGE_PATTERNS,
            0.9,
            0.85,
        ) {
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

    fn extract(title: &str, description: &str) -> crate::types::ExtractedAttributes {
        let listing = RawListing::new("test-1", title).with_description(description);
        LaptopExtractor.extract(&listing)
    }

    #[test]
    fn test_macbook_model_specificity() {
        let attrs = extract("MacBook Pro 14 M2", "");
        assert_eq!(attrs.model_variant.as_deref(), Some("MacBook Pro 14"));

        let attrs = extract("MacBook Air M2 2022", "");
        assert_eq!(attrs.model_variant.as_deref(), Some("MacBook Air M2"));
    }

    #[test]
    fn test_ram_not_mistaken_for_storage() {
        let attrs = extract("ThinkPad X1 Carbon", "16GB RAM, 512GB SSD, bra skick");
        assert_eq!(attrs.storage_gb, Some(512));
        assert_eq!(
            attrs.attributes["ram_gb"].value.as_integer(),
            Some(16)
        );
        assert_eq!(attrs.condition, Condition::Good);
    }

    #[test]
    fn test_tb_storage() {
        let attrs = extract("MacBook Pro 16", "1 TB SSD");
        assert_eq!(attrs.storage_gb, Some(1024));
    }
}
