//! Configuration types for the evaluation pipeline.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{EvaluatorError, Result};

use super::attributes::Condition;

/// Tuning knobs for a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Minimum priced sample for a comps group to count as sufficient.
    ///
    /// Default: 5. Values of 3-5 are sensible for thin markets.
    pub min_comps_sample: usize,

    /// Number of ranked results to return.
    pub top_k: usize,

    /// Weight of the value component in the final score.
    pub value_weight: f64,

    /// Weight of the preference component in the final score.
    pub preference_weight: f64,

    /// Weight of the risk component (subtracted) in the final score.
    pub risk_weight: f64,

    /// Concurrent extractions during the extraction stage.
    pub extraction_concurrency: usize,

    /// Time budget for one LLM-fallback call. A timed-out call leaves
    /// the attribute absent; it never stalls the batch.
    #[serde(with = "duration_secs")]
    pub fallback_timeout: Duration,

    /// IQR multiplier for the intake price-sanity filter.
    pub intake_iqr_multiplier: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            min_comps_sample: 5,
            top_k: 10,
            value_weight: 0.5,
            preference_weight: 0.35,
            risk_weight: 0.15,
            extraction_concurrency: 8,
            fallback_timeout: Duration::from_secs(10),
            intake_iqr_multiplier: 3.0,
        }
    }
}

impl EvaluationConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum comps sample size.
    pub fn with_min_comps_sample(mut self, n: usize) -> Self {
        self.min_comps_sample = n;
        self
    }

    /// Set the number of ranked results to return.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    /// Set extraction concurrency.
    pub fn with_extraction_concurrency(mut self, n: usize) -> Self {
        self.extraction_concurrency = n.max(1);
        self
    }

    /// Set the fallback time budget.
    pub fn with_fallback_timeout(mut self, timeout: Duration) -> Self {
        self.fallback_timeout = timeout;
        self
    }

    /// Override the score weights.
    pub fn with_weights(mut self, value: f64, preference: f64, risk: f64) -> Self {
        self.value_weight = value;
        self.preference_weight = preference;
        self.risk_weight = risk;
        self
    }
}

/// The buyer's preference configuration - a closed record.
///
/// Unknown keys are rejected at parse time (`deny_unknown_fields`), and
/// an unrecognized `min_condition` string fails enum deserialization
/// rather than being silently ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PreferenceConfig {
    /// Minimum acceptable condition. Listings strictly worse fail hard;
    /// unknown condition is penalized, not disqualified.
    #[serde(default)]
    pub min_condition: Option<Condition>,

    /// Hard filter: reject listings with confirmed cracks.
    #[serde(default)]
    pub no_cracks: bool,

    /// Soft threshold: battery health percentage.
    #[serde(default)]
    pub min_battery_health: Option<u8>,

    /// Soft preference: warranty present.
    #[serde(default)]
    pub has_warranty: bool,

    /// Soft preference: receipt present.
    #[serde(default)]
    pub has_receipt: bool,

    /// Soft preference: carrier-unlocked.
    #[serde(default)]
    pub unlocked: bool,

    // Intake constraints applied before the pipeline proper.
    /// Hard intake constraint: maximum asking price.
    #[serde(default)]
    pub max_price: Option<f64>,

    /// Hard intake constraint: minimum asking price.
    #[serde(default)]
    pub min_price: Option<f64>,

    /// Hard intake constraint: acceptable locations (substring match).
    /// Only applied to listings that state a location.
    #[serde(default)]
    pub locations: Vec<String>,

    /// Hard intake constraint: shipping must be offered.
    #[serde(default)]
    pub require_shipping: bool,
}

impl PreferenceConfig {
    /// Parse and validate from JSON. Unknown keys and unrecognized
    /// condition values are rejected here, not swallowed downstream.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PreferenceConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some(battery) = self.min_battery_health {
            if battery > 100 {
                return Err(EvaluatorError::Config {
                    reason: format!("min_battery_health must be 0-100, got {battery}"),
                });
            }
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            if min > max {
                return Err(EvaluatorError::Config {
                    reason: format!("min_price ({min}) exceeds max_price ({max})"),
                });
            }
        }
        Ok(())
    }

    /// Set the minimum acceptable condition.
    pub fn with_min_condition(mut self, condition: Condition) -> Self {
        self.min_condition = Some(condition);
        self
    }

    /// Require the listing to be free of cracks.
    pub fn with_no_cracks(mut self) -> Self {
        self.no_cracks = true;
        self
    }

    /// Set the soft battery threshold.
    pub fn with_min_battery_health(mut self, percent: u8) -> Self {
        self.min_battery_health = Some(percent);
        self
    }

    /// Prefer listings with warranty.
    pub fn preferring_warranty(mut self) -> Self {
        self.has_warranty = true;
        self
    }

    /// Prefer listings with a receipt.
    pub fn preferring_receipt(mut self) -> Self {
        self.has_receipt = true;
        self
    }

    /// Prefer carrier-unlocked listings.
    pub fn preferring_unlocked(mut self) -> Self {
        self.unlocked = true;
        self
    }

    /// Set the maximum asking price intake constraint.
    pub fn with_max_price(mut self, price: f64) -> Self {
        self.max_price = Some(price);
        self
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_preference_key_rejected() {
        let result = PreferenceConfig::from_json(r#"{"no_cracks": true, "wants_pony": true}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_unrecognized_condition_rejected() {
        let result = PreferenceConfig::from_json(r#"{"min_condition": "pristine"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_valid_preferences_parse() {
        let config = PreferenceConfig::from_json(
            r#"{"min_condition": "good", "no_cracks": true, "min_battery_health": 85}"#,
        )
        .unwrap();
        assert_eq!(config.min_condition, Some(Condition::Good));
        assert!(config.no_cracks);
        assert_eq!(config.min_battery_health, Some(85));
    }

    #[test]
    fn test_battery_out_of_range_rejected() {
        let result = PreferenceConfig::from_json(r#"{"min_battery_health": 130}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_price_bounds_rejected() {
        let result = PreferenceConfig::from_json(r#"{"min_price": 5000, "max_price": 1000}"#);
        assert!(result.is_err());
    }
}
