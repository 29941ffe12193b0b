//! The evaluation pipeline stages.

pub mod canonical;
pub mod comps;
pub mod filter;
pub mod preference;
pub mod rank;
pub mod risk;
pub mod valuation;

pub use canonical::create_canonical_key;
pub use comps::{compute_comps_stats, CompsIndex, MAX_RELAXATION_LEVEL};
pub use filter::apply_intake_filter;
pub use preference::compute_preference_score;
pub use rank::Evaluator;
pub use risk::assess_risk;
pub use valuation::{compute_value_score, is_price_outlier, is_suspiciously_low, price_percentile};
