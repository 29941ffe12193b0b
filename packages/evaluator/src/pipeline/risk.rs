//! Risk assessment: red-flag detection over listings and their prices.

use lazy_static::lazy_static;
use regex::Regex;

use crate::pipeline::valuation::is_suspiciously_low;
use crate::types::{
    CompsStats, Condition, ExtractedAttributes, RawListing, RiskAssessment, RiskExplanation,
    RiskFlag,
};

/// Text shorter than this (title + description) is a low-information
/// signal.
const MIN_TEXT_LENGTH: usize = 50;

lazy_static! {
    /// Urgency language, Swedish + English.
    static ref URGENCY_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bsnabb\s*(?:affär|försäljning)\b").unwrap(),
        Regex::new(r"\bsäljes\s*snabb(?:t|are)?\b").unwrap(),
        Regex::new(r"\bmåste\s*(?:bort|säljas)\b").unwrap(),
        Regex::new(r"\bakut\b").unwrap(),
        Regex::new(r"\bsista\s*chans\b").unwrap(),
        Regex::new(r"\benda\s*dag\b").unwrap(),
        Regex::new(r"\bquick\s*sale\b").unwrap(),
        Regex::new(r"\bmust\s*(?:go|sell)\b").unwrap(),
        Regex::new(r"\bfirst\s*come\b").unwrap(),
    ];

    /// Payment arrangements that should never be required up front.
    static ref SUSPICIOUS_PAYMENT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"\bswish\s*först\b").unwrap(),
        Regex::new(r"\bförskott(?:sbetalning)?\b").unwrap(),
        Regex::new(r"\bbetala\s*innan\b").unwrap(),
        Regex::new(r"\bpay\s*before\b").unwrap(),
        Regex::new(r"\bwestern\s*union\b").unwrap(),
        Regex::new(r"\bcrypto\b").unwrap(),
        Regex::new(r"\bbitcoin\b").unwrap(),
        Regex::new(r"\bgift\s*card\b").unwrap(),
    ];
}

/// Assess red flags for one listing.
///
/// Each detector is independent; flags are deduplicated and their
/// weights summed, capped at 100. `comps_stats` enables the
/// unusually-low-price check when the resolved group has prices.
pub fn assess_risk(
    listing: &RawListing,
    attrs: &ExtractedAttributes,
    comps_stats: Option<&CompsStats>,
) -> RiskAssessment {
    let mut flags: Vec<RiskFlag> = Vec::new();
    let mut explanations: Vec<RiskExplanation> = Vec::new();
    let text = listing.search_text();

    if let (Some(price), Some(stats)) = (listing.price.filter(|p| *p > 0.0), comps_stats) {
        if is_suspiciously_low(price, stats) {
            let pct = if stats.median > 0.0 {
                (stats.median - price) / stats.median * 100.0
            } else {
                0.0
            };
            flags.push(RiskFlag::UnusuallyLowPrice);
            explanations.push(RiskExplanation {
                flag: RiskFlag::UnusuallyLowPrice,
                message: format!(
                    "Price {price:.0} is {pct:.0}% below the market median ({:.0})",
                    stats.median
                ),
                evidence: None,
            });
        }
    }

    if let Some(m) = first_match(&URGENCY_PATTERNS, &text) {
        flags.push(RiskFlag::UrgencyDetected);
        explanations.push(RiskExplanation {
            flag: RiskFlag::UrgencyDetected,
            message: "Urgency language in the advertisement".to_string(),
            evidence: Some(m),
        });
    }

    if let Some(m) = first_match(&SUSPICIOUS_PAYMENT_PATTERNS, &text) {
        flags.push(RiskFlag::SuspiciousPayment);
        explanations.push(RiskExplanation {
            flag: RiskFlag::SuspiciousPayment,
            message: "Suspicious payment arrangement requested".to_string(),
            evidence: Some(m),
        });
    }

    let text_length = listing.text_length();
    if text_length < MIN_TEXT_LENGTH {
        flags.push(RiskFlag::LowInformation);
        explanations.push(RiskExplanation {
            flag: RiskFlag::LowInformation,
            message: format!("Very short description ({text_length} characters)"),
            evidence: None,
        });
    }

    if listing.image_count == 0 {
        flags.push(RiskFlag::NoImages);
        explanations.push(RiskExplanation {
            flag: RiskFlag::NoImages,
            message: "No images in the advertisement".to_string(),
            evidence: None,
        });
    }

    if attrs.has_cracks == Some(true)
        && matches!(attrs.condition, Condition::New | Condition::LikeNew)
    {
        flags.push(RiskFlag::ConflictingAttributes);
        explanations.push(RiskExplanation {
            flag: RiskFlag::ConflictingAttributes,
            message: format!(
                "Condition stated as {} but cracks are mentioned",
                attrs.condition.label()
            ),
            evidence: attrs
                .attributes
                .get("has_cracks")
                .and_then(|a| a.evidence_span.clone()),
        });
    }

    let mut deduped: Vec<RiskFlag> = Vec::new();
    for flag in flags {
        if !deduped.contains(&flag) {
            deduped.push(flag);
        }
    }
    let score = deduped.iter().map(|f| f.weight()).sum::<f64>().min(100.0);

    RiskAssessment {
        score,
        flags: deduped,
        explanations,
    }
}

fn first_match(patterns: &[Regex], text: &str) -> Option<String> {
    patterns
        .iter()
        .find_map(|p| p.find(text).map(|m| m.as_str().to_string()))
}
