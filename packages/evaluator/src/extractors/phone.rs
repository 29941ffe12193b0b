//! Phone attribute extractor.
//!
//! Tuned for iPhone and Samsung listings, which dominate the phone
//! market. Model patterns are ordered most specific first ("iphone 15
//! pro max" before "iphone 15") so the first match is the right one.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ExtractedAttribute, ProductFamily};

use super::{
    extract_bounded_int, extract_color, extract_condition, extract_model, extract_negated_bool,
    extract_presence_bool, extract_storage, FamilyExtractor,
};

lazy_static! {
    static ref IPHONE_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"iphone\s*16\s*pro\s*max").unwrap(), "iPhone 16 Pro Max"),
        (Regex::new(r"iphone\s*16\s*pro").unwrap(), "iPhone 16 Pro"),
        (Regex::new(r"iphone\s*16\s*plus").unwrap(), "iPhone 16 Plus"),
        (Regex::new(r"iphone\s*16").unwrap(), "iPhone 16"),
        (Regex::new(r"iphone\s*15\s*pro\s*max").unwrap(), "iPhone 15 Pro Max"),
        (Regex::new(r"iphone\s*15\s*pro").unwrap(), "iPhone 15 Pro"),
        (Regex::new(r"iphone\s*15\s*plus").unwrap(), "iPhone 15 Plus"),
        (Regex::new(r"iphone\s*15").unwrap(), "iPhone 15"),
        (Regex::new(r"iphone\s*14\s*pro\s*max").unwrap(), "iPhone 14 Pro Max"),
        (Regex::new(r"iphone\s*14\s*pro").unwrap(), "iPhone 14 Pro"),
        (Regex::new(r"iphone\s*14\s*plus").unwrap(), "iPhone 14 Plus"),
        (Regex::new(r"iphone\s*14").unwrap(), "iPhone 14"),
        (Regex::new(r"iphone\s*13\s*pro\s*max").unwrap(), "iPhone 13 Pro Max"),
        (Regex::new(r"iphone\s*13\s*pro").unwrap(), "iPhone 13 Pro"),
        (Regex::new(r"iphone\s*13\s*mini").unwrap(), "iPhone 13 Mini"),
        (Regex::new(r"iphone\s*13").unwrap(), "iPhone 13"),
        (Regex::new(r"iphone\s*12\s*pro\s*max").unwrap(), "iPhone 12 Pro Max"),
        (Regex::new(r"iphone\s*12\s*pro").unwrap(), "iPhone 12 Pro"),
        (Regex::new(r"iphone\s*12\s*mini").unwrap(), "iPhone 12 Mini"),
        (Regex::new(r"iphone\s*12").unwrap(), "iPhone 12"),
        (Regex::new(r"iphone\s*11\s*pro\s*max").unwrap(), "iPhone 11 Pro Max"),
        (Regex::new(r"iphone\s*11\s*pro").unwrap(), "iPhone 11 Pro"),
        (Regex::new(r"iphone\s*11").unwrap(), "iPhone 11"),
        (Regex::new(r"iphone\s*se\s*\(?2022\)?").unwrap(), "iPhone SE 3"),
        (Regex::new(r"iphone\s*se\s*\(?2020\)?").unwrap(), "iPhone SE 2"),
        (Regex::new(r"iphone\s*se\s*3").unwrap(), "iPhone SE 3"),
        (Regex::new(r"iphone\s*se\s*2").unwrap(), "iPhone SE 2"),
        (Regex::new(r"iphone\s*se").unwrap(), "iPhone SE"),
        (Regex::new(r"iphone\s*x[rs]").unwrap(), "iPhone XR/XS"),
        (Regex::new(r"iphone\s*x").unwrap(), "iPhone X"),
        (Regex::new(r"iphone\s*8\s*plus").unwrap(), "iPhone 8 Plus"),
        (Regex::new(r"iphone\s*8").unwrap(), "iPhone 8"),
    ];

    static ref SAMSUNG_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"galaxy\s*s24\s*ultra").unwrap(), "Samsung Galaxy S24 Ultra"),
        (Regex::new(r"galaxy\s*s24\s*(?:\+|plus)").unwrap(), "Samsung Galaxy S24+"),
        (Regex::new(r"galaxy\s*s24").unwrap(), "Samsung Galaxy S24"),
        (Regex::new(r"galaxy\s*s23\s*ultra").unwrap(), "Samsung Galaxy S23 Ultra"),
        (Regex::new(r"galaxy\s*s23").unwrap(), "Samsung Galaxy S23"),
        (Regex::new(r"galaxy\s*s22\s*ultra").unwrap(), "Samsung Galaxy S22 Ultra"),
        (Regex::new(r"galaxy\s*s22").unwrap(), "Samsung Galaxy S22"),
        (Regex::new(r"galaxy\s*s21").unwrap(), "Samsung Galaxy S21"),
        (Regex::new(r"galaxy\s*z\s*flip\s*5").unwrap(), "Samsung Galaxy Z Flip 5"),
        (Regex::new(r"galaxy\s*z\s*fold\s*5").unwrap(), "Samsung Galaxy Z Fold 5"),
    ];

    static ref PIXEL_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"pixel\s*8\s*pro").unwrap(), "Google Pixel 8 Pro"),
        (Regex::new(r"pixel\s*8").unwrap(), "Google Pixel 8"),
        (Regex::new(r"pixel\s*7\s*pro").unwrap(), "Google Pixel 7 Pro"),
        (Regex::new(r"pixel\s*7").unwrap(), "Google Pixel 7"),
        (Regex::new(r"pixel\s*6").unwrap(), "Google Pixel 6"),
    ];

    static ref CRACK_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"sprick").unwrap(),
        Regex::new(r"crack").unwrap(),
        Regex::new(r"sprucken").unwrap(),
        Regex::new(r"spräck").unwrap(),
        Regex::new(r"skärm\S*\s*skad").unwrap(),
        Regex::new(r"skad\S*\s*skärm").unwrap(),
        Regex::new(r"glas\S*\s*trasig").unwrap(),
        Regex::new(r"trasig\S*\s*glas").unwrap(),
        Regex::new(r"shattered").unwrap(),
    ];

    static ref NO_CRACK_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"inga?\s*sprick").unwrap(),
        Regex::new(r"utan\s*sprick").unwrap(),
        Regex::new(r"ej\s*sprick").unwrap(),
        Regex::new(r"inte\s*sprick").unwrap(),
        Regex::new(r"no\s*cracks?").unwrap(),
        Regex::new(r"crack\s*free").unwrap(),
        Regex::new(r"felfri").unwrap(),
        Regex::new(r"perfekt\s*skärm").unwrap(),
        Regex::new(r"fint\s*glas").unwrap(),
    ];

    static ref BATTERY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"batteri\D*?(\d{1,3})\s*%").unwrap(),
        Regex::new(r"battery\D*?(\d{1,3})\s*%").unwrap(),
        Regex::new(r"(\d{1,3})\s*%\s*batteri").unwrap(),
        Regex::new(r"batterihälsa\D*?(\d{1,3})").unwrap(),
        Regex::new(r"battery\s*health\D*?(\d{1,3})").unwrap(),
    ];

    static ref WARRANTY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bgaranti\b").unwrap(),
        Regex::new(r"\bwarranty\b").unwrap(),
        Regex::new(r"\bapple\s*care\b").unwrap(),
        Regex::new(r"\bapplecare\b").unwrap(),
    ];

    static ref RECEIPT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bkvitto\b").unwrap(),
        Regex::new(r"\breceipt\b").unwrap(),
        Regex::new(r"\bfaktura\b").unwrap(),
        Regex::new(r"\bköpehandling\b").unwrap(),
    ];

    static ref LOCKED_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\boperatörslåst\b").unwrap(),
        Regex::new(r"\blåst\b").unwrap(),
        Regex::new(r"\bcarrier\s*locked\b").unwrap(),
        Regex::new(r"\blocked\b").unwrap(),
    ];

    static ref UNLOCKED_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bolåst\b").unwrap(),
        Regex::new(r"\bunlocked\b").unwrap(),
        Regex::new(r"\bfabrikslåst\b").unwrap(),
        Regex::new(r"\bfri\s*från\s*operatör\b").unwrap(),
    ];

    static ref COLOR_TABLE: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"\bnatural\s*titanium\b").unwrap(), "natural titanium"),
        (Regex::new(r"\bblue\s*titanium\b").unwrap(), "blue titanium"),
        (Regex::new(r"\bwhite\s*titanium\b").unwrap(), "white titanium"),
        (Regex::new(r"\bblack\s*titanium\b").unwrap(), "black titanium"),
        (Regex::new(r"\b(?:svart|black)\b").unwrap(), "black"),
        (Regex::new(r"\b(?:vit|white)\b").unwrap(), "white"),
        (Regex::new(r"\b(?:blå|blue)\b").unwrap(), "blue"),
        (Regex::new(r"\b(?:guld|gold)\b").unwrap(), "gold"),
        (Regex::new(r"\bsilver\b").unwrap(), "silver"),
        (Regex::new(r"\b(?:rosa|pink)\b").unwrap(), "pink"),
        (Regex::new(r"\b(?:röd|red)\b").unwrap(), "red"),
        (Regex::new(r"\b(?:grön|green)\b").unwrap(), "green"),
        (Regex::new(r"\b(?:lila|purple)\b").unwrap(), "purple"),
        (Regex::new(r"\b(?:grå|gray|grey)\b").unwrap(), "gray"),
    ];
}

/// Extractor for mobile phones.
pub struct PhoneExtractor;

impl FamilyExtractor for PhoneExtractor {
    fn family(&self) -> ProductFamily {
        ProductFamily::Phone
    }

    fn key_attributes(&self) -> &'static [&'static str] {
        &[
            "model_variant",
            "storage_gb",
            "condition",
            "battery_health",
            "has_cracks",
        ]
    }

    fn recognize(&self, text: &str) -> Vec<ExtractedAttribute> {
        let mut attrs: Vec<ExtractedAttribute> = Vec::new();

        // Exact model matches get 0.95; other brand tables 0.9.
        if let Some(model) = extract_model(
            text,
            &[
                (IPHONE_MODELS.as_slice(), 0.95),
                (SAMSUNG_MODELS.as_slice(), 0.9),
                (PIXEL_MODELS.as_slice(), 0.9),
            ],
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

        if let Some(color) = extract_color(text, &COLOR_TABLE) {
            attrs.push(color);
        }

        if let Some(warranty) = extract_presence_bool(text, "has_warranty", &WARRANTY_PATTERNS, 0.8)
        {
            attrs.push(warranty);
        }

        if let Some(receipt) = extract_presence_bool(text, "has_receipt", &RECEIPT_PATTERNS, 0.8) {
            attrs.push(receipt);
        }

        // Unlocked statements are checked before locked ones: an
        // "olåst" listing must not match "\blåst\b".
        if let Some(locked) =
            extract_negated_bool(text, "is_locked", &UNLOCKED_PATTERNS, &LOCKED_PATTERNS, 0.85, 0.8)
        {
            attrs.push(locked);
        }

        attrs
    }
}
