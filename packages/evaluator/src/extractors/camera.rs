//! Camera attribute extractor.
//!
//! Storage cards are irrelevant to camera pricing; the differentiators
//! are body model, condition, and shutter count.

use lazy_static::lazy_static;
use regex::Regex;

use crate::types::{ExtractedAttribute, ProductFamily};

use super::{
    extract_bounded_int, extract_condition, extract_model, extract_presence_bool, FamilyExtractor,
};

lazy_static! {
    static ref CANON_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"canon\s*eos\s*r5").unwrap(), "Canon EOS R5"),
        (Regex::new(r"canon\s*eos\s*r6\s*mark\s*ii").unwrap(), "Canon EOS R6 Mark II"),
        (Regex::new(r"canon\s*eos\s*r6").unwrap(), "Canon EOS R6"),
        (Regex::new(r"canon\s*eos\s*r7").unwrap(), "Canon EOS R7"),
        (Regex::new(r"eos\s*5d\s*mark\s*iv").unwrap(), "Canon EOS 5D Mark IV"),
        (Regex::new(r"eos\s*5d\s*mark\s*iii").unwrap(), "Canon EOS 5D Mark III"),
        (Regex::new(r"eos\s*5d").unwrap(), "Canon EOS 5D"),
    ];

    static ref NIKON_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"nikon\s*z8").unwrap(), "Nikon Z8"),
        (Regex::new(r"nikon\s*z7\s*ii").unwrap(), "Nikon Z7 II"),
        (Regex::new(r"nikon\s*z7").unwrap(), "Nikon Z7"),
        (Regex::new(r"nikon\s*z6\s*ii").unwrap(), "Nikon Z6 II"),
        (Regex::new(r"nikon\s*z6").unwrap(), "Nikon Z6"),
        (Regex::new(r"nikon\s*d850").unwrap(), "Nikon D850"),
        (Regex::new(r"nikon\s*d750").unwrap(), "Nikon D750"),
    ];

    static ref SONY_FUJI_MODELS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"sony\s*a7\s*iv").unwrap(), "Sony A7 IV"),
        (Regex::new(r"sony\s*a7\s*iii").unwrap(), "Sony A7 III"),
        (Regex::new(r"sony\s*a7r\s*v").unwrap(), "Sony A7R V"),
        (Regex::new(r"sony\s*a7r").unwrap(), "Sony A7R"),
        (Regex::new(r"sony\s*a7").unwrap(), "Sony A7"),
        (Regex::new(r"sony\s*a6400").unwrap(), "Sony A6400"),
        (Regex::new(r"sony\s*a6000").unwrap(), "Sony A6000"),
        (Regex::new(r"fuji\S*\s*x-?t5").unwrap(), "Fujifilm X-T5"),
        (Regex::new(r"fuji\S*\s*x-?t4").unwrap(), "Fujifilm X-T4"),
    ];

    static ref SHUTTER_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"shutter\s*count\D*?(\d{1,7})").unwrap(),
        Regex::new(r"(\d{1,7})\s*(?:exponeringar|avtryck|shutter)").unwrap(),
        Regex::new(r"antal\s*bilder\D*?(\d{1,7})").unwrap(),
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
}

/// Extractor for cameras.
pub struct CameraExtractor;

impl FamilyExtractor for CameraExtractor {
    fn family(&self) -> ProductFamily {
        ProductFamily::Camera
    }

    fn key_attributes(&self) -> &'static [&'static str] {
        &["model_variant", "condition"]
    }

    fn recognize(&self, text: &str) -> Vec<ExtractedAttribute> {
        let mut attrs: Vec<ExtractedAttribute> = Vec::new();

        if let Some(model) = extract_model(
            text,
            &[
                (CANON_MODELS.as_slice(), 0.95),
                (NIKON_MODELS.as_slice(), 0.95),
                (SONY_FUJI_MODELS.as_slice(), 0.9),
            ],
        ) {
            attrs.push(model);
        }

        attrs.push(extract_condition(text));

        if let Some(shutter) =
            extract_bounded_int(text, "shutter_count", &SHUTTER_PATTERNS, 0..=2_000_000, 0.85)
        {
            attrs.push(shutter);
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
