//! Data types flowing through the evaluation pipeline.

pub mod attributes;
pub mod comps;
pub mod config;
pub mod listing;
pub mod report;
pub mod scoring;

pub use attributes::{
    AttributeSource, AttributeValue, Condition, ExtractedAttribute, ExtractedAttributes,
    ProductFamily,
};
pub use comps::{CanonicalKey, CompsGroup, CompsStats, ConditionBucket, StorageBucket};
pub use config::{EvaluationConfig, PreferenceConfig};
pub use listing::RawListing;
pub use report::EvaluationReport;
pub use scoring::{
    ListingScores, PreferenceMatchScore, RankedListing, RiskAssessment, RiskExplanation, RiskFlag,
    RiskLevel, SellerQuestion, ValueScore,
};
