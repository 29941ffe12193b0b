//! Preference matching: hard filters and soft scores.

use indexmap::IndexMap;

use crate::types::{Condition, ExtractedAttributes, PreferenceConfig, PreferenceMatchScore};

/// Penalty per missing-information item, in points.
const MISSING_INFO_PENALTY: f64 = 5.0;

/// Soft score when no soft preference is configured at all.
const DEFAULT_SOFT_SCORE: f64 = 80.0;

/// Score a listing's attributes against the buyer's preferences.
///
/// Hard filters fail only on *confirmed* violations; an unresolved
/// attribute lands in `missing_info` and costs a flat penalty instead.
/// A failed hard filter forces the score to 0 and is reported in
/// `failed_hard_filters`.
pub fn compute_preference_score(
    attrs: &ExtractedAttributes,
    prefs: &PreferenceConfig,
) -> PreferenceMatchScore {
    let mut failed_hard_filters: Vec<String> = Vec::new();
    let mut missing_info: Vec<String> = Vec::new();
    let mut soft_scores: IndexMap<String, f64> = IndexMap::new();

    if prefs.no_cracks {
        match attrs.has_cracks {
            Some(true) => failed_hard_filters.push("has confirmed cracks".to_string()),
            Some(false) => {}
            None => missing_info.push("has_cracks".to_string()),
        }
    }

    if let Some(minimum) = prefs.min_condition {
        if attrs.condition == Condition::Unknown {
            missing_info.push("condition".to_string());
        } else if !attrs.condition.is_at_least(minimum) {
            failed_hard_filters.push(format!(
                "condition {} is below required minimum {}",
                attrs.condition.label(),
                minimum.label()
            ));
        }
    }

    if let Some(min_battery) = prefs.min_battery_health {
        let score = match attrs.battery_health {
            Some(actual) => {
                let ratio = actual as f64 / min_battery.max(1) as f64;
                (ratio * 100.0).min(100.0)
            }
            None => {
                missing_info.push("battery_health".to_string());
                50.0
            }
        };
        soft_scores.insert("battery_health".to_string(), score);
    }

    if prefs.has_warranty {
        let score = match attrs.has_warranty {
            Some(true) => 100.0,
            Some(false) => 30.0,
            None => {
                missing_info.push("has_warranty".to_string());
                50.0
            }
        };
        soft_scores.insert("has_warranty".to_string(), score);
    }

    if prefs.has_receipt {
        let score = match attrs.has_receipt {
            Some(true) => 100.0,
            Some(false) => 40.0,
            None => {
                missing_info.push("has_receipt".to_string());
                50.0
            }
        };
        soft_scores.insert("has_receipt".to_string(), score);
    }

    if prefs.unlocked {
        let score = match attrs.is_locked {
            Some(false) => 100.0,
            Some(true) => 20.0,
            None => {
                missing_info.push("is_locked".to_string());
                60.0
            }
        };
        soft_scores.insert("unlocked".to_string(), score);
    }

    if !failed_hard_filters.is_empty() {
        return PreferenceMatchScore {
            score: 0.0,
            hard_filters_passed: false,
            soft_scores,
            missing_info,
            failed_hard_filters,
        };
    }

    let base = if soft_scores.is_empty() {
        DEFAULT_SOFT_SCORE
    } else {
        soft_scores.values().sum::<f64>() / soft_scores.len() as f64
    };
    let score =
        (base - MISSING_INFO_PENALTY * missing_info.len() as f64).clamp(0.0, 100.0);

    PreferenceMatchScore {
        score,
        hard_filters_passed: true,
        soft_scores,
        missing_info,
        failed_hard_filters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AttributeValue, ExtractedAttribute, ProductFamily,
    };

    fn attrs_from(list: Vec<ExtractedAttribute>) -> ExtractedAttributes {
        ExtractedAttributes::from_attributes("l1", ProductFamily::Phone, list, &[])
    }

    #[test]
    fn test_confirmed_cracks_fail_hard() {
        let attrs = attrs_from(vec![ExtractedAttribute::new(
            "has_cracks",
            AttributeValue::Bool(true),
            0.9,
        )]);
        let prefs = PreferenceConfig::default().with_no_cracks();
        let score = compute_preference_score(&attrs, &prefs);
        assert!(!score.hard_filters_passed);
        assert_eq!(score.score, 0.0);
        assert_eq!(score.failed_hard_filters.len(), 1);
    }

    #[test]
    fn test_unknown_cracks_penalized_not_disqualified() {
        let attrs = attrs_from(vec![]);
        let prefs = PreferenceConfig::default().with_no_cracks();
        let score = compute_preference_score(&attrs, &prefs);
        assert!(score.hard_filters_passed);
        assert_eq!(score.missing_info, vec!["has_cracks".to_string()]);
        // Default 80 minus one missing-info penalty
        assert!((score.score - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_condition_below_minimum_fails_hard() {
        let attrs = attrs_from(vec![ExtractedAttribute::new(
            "condition",
            AttributeValue::Condition(Condition::Defect),
            0.8,
        )]);
        let prefs = PreferenceConfig::default().with_min_condition(Condition::Good);
        let score = compute_preference_score(&attrs, &prefs);
        assert!(!score.hard_filters_passed);
    }

    #[test]
    fn test_unknown_condition_penalized_not_disqualified() {
        let attrs = attrs_from(vec![]);
        let prefs = PreferenceConfig::default().with_min_condition(Condition::Good);
        let score = compute_preference_score(&attrs, &prefs);
        assert!(score.hard_filters_passed);
        assert_eq!(score.missing_info, vec!["condition".to_string()]);
    }

    #[test]
    fn test_battery_soft_score_capped() {
        let attrs = attrs_from(vec![ExtractedAttribute::new(
            "battery_health",
            AttributeValue::Integer(95),
            0.95,
        )]);
        let prefs = PreferenceConfig::default().with_min_battery_health(80);
        let score = compute_preference_score(&attrs, &prefs);
        assert_eq!(score.soft_scores["battery_health"], 100.0);
        assert_eq!(score.score, 100.0);
    }

    #[test]
    fn test_battery_below_threshold_scales() {
        let attrs = attrs_from(vec![ExtractedAttribute::new(
            "battery_health",
            AttributeValue::Integer(60),
            0.95,
        )]);
        let prefs = PreferenceConfig::default().with_min_battery_health(80);
        let score = compute_preference_score(&attrs, &prefs);
        assert!((score.soft_scores["battery_health"] - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_battery_scores_neutral_with_penalty() {
        let attrs = attrs_from(vec![]);
        let prefs = PreferenceConfig::default().with_min_battery_health(85);
        let score = compute_preference_score(&attrs, &prefs);
        assert!(score.hard_filters_passed);
        assert_eq!(score.soft_scores["battery_health"], 50.0);
        assert_eq!(score.missing_info, vec!["battery_health".to_string()]);
        // Neutral 50 minus one missing-info penalty
        assert!((score.score - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_battery_seventy_against_min_eighty_five() {
        let attrs = attrs_from(vec![ExtractedAttribute::new(
            "battery_health",
            AttributeValue::Integer(70),
            0.95,
        )]);
        let prefs = PreferenceConfig::default().with_min_battery_health(85);
        let score = compute_preference_score(&attrs, &prefs);
        assert!(score.hard_filters_passed);
        assert!((score.soft_scores["battery_health"] - 82.352941).abs() < 1e-4);
    }

    #[test]
    fn test_soft_scores_averaged_with_missing_penalty() {
        // Warranty confirmed absent (30), receipt unknown (50 + missing)
        let attrs = attrs_from(vec![ExtractedAttribute::new(
            "has_warranty",
            AttributeValue::Bool(false),
            0.8,
        )]);
        let prefs = PreferenceConfig::default()
            .preferring_warranty()
            .preferring_receipt();
        let score = compute_preference_score(&attrs, &prefs);
        // avg(30, 50) - 5 = 35
        assert!((score.score - 35.0).abs() < 1e-9);
        assert_eq!(score.missing_info, vec!["has_receipt".to_string()]);
    }

    #[test]
    fn test_no_soft_preferences_default() {
        let attrs = attrs_from(vec![]);
        let score = compute_preference_score(&attrs, &PreferenceConfig::default());
        assert!((score.score - DEFAULT_SOFT_SCORE).abs() < 1e-9);
        assert!(score.soft_scores.is_empty());
    }
}
