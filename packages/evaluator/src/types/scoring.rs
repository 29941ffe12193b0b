//! Score breakdown types - the per-listing output of the scoring stage.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::attributes::ExtractedAttributes;
use super::comps::CanonicalKey;

/// Value component: asking price versus the comparable market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueScore {
    /// 0-100; 50 = at market, higher = below market
    pub score: f64,

    pub asking_price: Option<f64>,

    /// Median of the resolved comps group, when one exists
    pub expected_price: Option<f64>,

    /// (expected - asking) / expected; positive = below market
    pub deal_delta: Option<f64>,

    /// Label of the comps key the price was judged against
    pub comps_key: Option<String>,

    /// Number of priced comparables behind `expected_price`.
    /// Always surfaced, 0 when no usable comps were found.
    pub comps_n: usize,
}

impl ValueScore {
    /// Neutral score when no comparison is possible.
    pub fn neutral(asking_price: Option<f64>, comps_n: usize) -> Self {
        Self {
            score: 50.0,
            asking_price,
            expected_price: None,
            deal_delta: None,
            comps_key: None,
            comps_n,
        }
    }
}

/// Preference component: how well the listing matches the buyer's
/// configured preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferenceMatchScore {
    /// 0-100; forced to 0 when any hard filter fails
    pub score: f64,

    /// False when a hard filter failed (propagates to final score = 0)
    pub hard_filters_passed: bool,

    /// Per-preference soft scores, in evaluation order
    pub soft_scores: IndexMap<String, f64>,

    /// Missing-information items, each worth a 5-point penalty
    pub missing_info: Vec<String>,

    /// Human-readable descriptions of failed hard filters
    pub failed_hard_filters: Vec<String>,
}

/// Risk indicator flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFlag {
    UnusuallyLowPrice,
    UrgencyDetected,
    SuspiciousPayment,
    LowInformation,
    NoImages,
    ConflictingAttributes,
    NewSeller,
}

impl RiskFlag {
    /// Fixed contribution of this flag to the risk score.
    pub fn weight(&self) -> f64 {
        match self {
            RiskFlag::UnusuallyLowPrice => 35.0,
            RiskFlag::UrgencyDetected => 20.0,
            RiskFlag::SuspiciousPayment => 40.0,
            RiskFlag::LowInformation => 15.0,
            RiskFlag::NoImages => 20.0,
            RiskFlag::ConflictingAttributes => 25.0,
            RiskFlag::NewSeller => 10.0,
        }
    }
}

/// One explanation attached to a risk flag, with the matched evidence
/// snippet where applicable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskExplanation {
    pub flag: RiskFlag,
    pub message: String,
    #[serde(default)]
    pub evidence: Option<String>,
}

/// Coarse risk banding for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

/// Risk component: red flags detected on the listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// 0-100; higher = riskier. Sum of flag weights, capped at 100.
    pub score: f64,

    /// Deduplicated flags, in detection order
    pub flags: Vec<RiskFlag>,

    pub explanations: Vec<RiskExplanation>,
}

impl RiskAssessment {
    /// No flags, zero risk.
    pub fn clean() -> Self {
        Self {
            score: 0.0,
            flags: Vec::new(),
            explanations: Vec::new(),
        }
    }

    /// Band the risk score: < 25 low, < 50 moderate, otherwise high.
    pub fn level(&self) -> RiskLevel {
        if self.score >= 50.0 {
            RiskLevel::High
        } else if self.score >= 25.0 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// One-line human-readable summary.
    pub fn summary(&self) -> String {
        if self.flags.is_empty() {
            return "No obvious risk indicators".to_string();
        }
        let label = match self.level() {
            RiskLevel::High => "High risk",
            RiskLevel::Moderate => "Moderate risk",
            RiskLevel::Low => "Low risk",
        };
        let details: Vec<&str> = self
            .explanations
            .iter()
            .take(2)
            .map(|e| e.message.as_str())
            .collect();
        format!("{}: {}", label, details.join("; "))
    }
}

/// Full score breakdown for a single listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingScores {
    pub listing_id: String,
    pub value: ValueScore,
    pub preference: PreferenceMatchScore,
    pub risk: RiskAssessment,

    /// Weighted combination, 0-100; 0 whenever hard filters fail
    pub final_score: f64,
}

/// A question to ask the seller about missing information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerQuestion {
    /// Ready-to-send question text
    pub question: String,

    /// Why the answer matters
    pub reason: String,

    /// The missing attribute this addresses
    pub relates_to: String,
}

/// A scored listing with its final rank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedListing {
    /// Contiguous rank starting at 1
    pub rank: usize,

    pub listing_id: String,
    pub url: String,
    pub title: String,
    pub asking_price: Option<f64>,
    pub location: Option<String>,

    pub attributes: ExtractedAttributes,
    pub canonical_key: CanonicalKey,
    pub scores: ListingScores,

    /// Seller questions derived from missing key attributes
    pub checklist: Vec<SellerQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_levels() {
        let mut risk = RiskAssessment::clean();
        assert_eq!(risk.level(), RiskLevel::Low);
        risk.score = 30.0;
        assert_eq!(risk.level(), RiskLevel::Moderate);
        risk.score = 75.0;
        assert_eq!(risk.level(), RiskLevel::High);
    }

    #[test]
    fn test_neutral_value_score() {
        let v = ValueScore::neutral(Some(900.0), 0);
        assert_eq!(v.score, 50.0);
        assert_eq!(v.comps_n, 0);
        assert!(v.expected_price.is_none());
    }
}
