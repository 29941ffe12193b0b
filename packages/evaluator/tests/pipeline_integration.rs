//! Integration tests for the full evaluation pipeline.
//!
//! These tests run the whole loop: intake filter, extraction, comps
//! construction, scoring, and ranking, with mock collaborators where
//! the pipeline reaches outside the crate.

use std::sync::Arc;
use std::time::Duration;

use evaluator::testing::MockFallback;
use evaluator::types::{AttributeValue, ExtractedAttribute, RiskFlag};
use evaluator::{
    Condition, EvaluationConfig, Evaluator, PreferenceConfig, ProductFamily, RawListing,
};

/// A healthy phone market: same model and storage, spread of prices.
fn phone_market() -> Vec<RawListing> {
    vec![
        RawListing::new("l1", "iPhone 15 Pro Max 256GB säljes")
            .with_description("Mycket bra skick, inga sprickor, kvitto finns. Batteri 95%.")
            .with_price(8000.0)
            .with_images(5),
        RawListing::new("l2", "iPhone 15 Pro Max 256GB")
            .with_description("Bra skick, olåst, laddare ingår. Inga repor eller sprickor.")
            .with_price(9000.0)
            .with_images(3),
        RawListing::new("l3", "iPhone 15 Pro Max 256 GB i bra skick")
            .with_description("Använd ett år, fungerar perfekt. Batterihälsa 88%.")
            .with_price(10000.0)
            .with_images(2),
        RawListing::new("l4", "Säljer iPhone 15 Pro Max 256GB")
            .with_description("Gott skick. Inga sprickor, skärmskydd sedan köp.")
            .with_price(11000.0)
            .with_images(4),
        RawListing::new("l5", "iPhone 15 Pro Max 256GB, bra skick")
            .with_description("Allt fungerar som det ska, kvitto och garanti kvar.")
            .with_price(12000.0)
            .with_images(6),
    ]
}

#[tokio::test]
async fn test_below_market_listing_ranks_first() {
    let engine = Evaluator::new(EvaluationConfig::default());
    let report = engine
        .evaluate(
            Some("iphone 15 pro max"),
            ProductFamily::Phone,
            phone_market(),
            &PreferenceConfig::default(),
        )
        .await
        .unwrap();

    assert_eq!(report.total_evaluated, 5);
    assert_eq!(report.filtered_out, 0);
    assert_eq!(report.ranked.len(), 5);
    // Cheapest listing in an otherwise identical market wins.
    assert_eq!(report.ranked[0].listing_id, "l1");
    assert_eq!(report.ranked[0].rank, 1);

    let value = &report.ranked[0].scores.value;
    assert_eq!(value.expected_price, Some(10000.0));
    assert_eq!(value.comps_n, 5);
    assert!(value.deal_delta.unwrap() > 0.0);
}

#[tokio::test]
async fn test_determinism_across_runs() {
    let engine = Evaluator::new(EvaluationConfig::default());
    let prefs = PreferenceConfig::from_json(
        r#"{"min_condition": "good", "no_cracks": true, "min_battery_health": 85}"#,
    )
    .unwrap();

    let first = engine
        .evaluate(None, ProductFamily::Phone, phone_market(), &prefs)
        .await
        .unwrap();
    let second = engine
        .evaluate(None, ProductFamily::Phone, phone_market(), &prefs)
        .await
        .unwrap();

    let order = |r: &evaluator::EvaluationReport| {
        r.ranked
            .iter()
            .map(|e| (e.listing_id.clone(), e.scores.final_score))
            .collect::<Vec<_>>()
    };
    assert_eq!(order(&first), order(&second));
}

#[tokio::test]
async fn test_confirmed_cracks_excluded_by_hard_filter() {
    let mut listings = phone_market();
    listings.push(
        RawListing::new("cracked", "iPhone 15 Pro Max 256GB billigt")
            .with_description("Spricka i skärmen, annars bra skick.")
            .with_price(6000.0)
            .with_images(2),
    );

    let engine = Evaluator::new(EvaluationConfig::default());
    let prefs = PreferenceConfig::default().with_no_cracks();
    let report = engine
        .evaluate(None, ProductFamily::Phone, listings, &prefs)
        .await
        .unwrap();

    assert!(report.ranked.iter().all(|e| e.listing_id != "cracked"));
    assert_eq!(report.filtered_out, 1);
}

#[tokio::test]
async fn test_all_scores_within_bounds() {
    let mut listings = phone_market();
    listings.push(
        RawListing::new("risky", "iPhone billigt")
            .with_description("Akut! Måste bort idag. Swish först så skickar jag.")
            .with_price(2000.0),
    );

    let engine = Evaluator::new(EvaluationConfig::default());
    let report = engine
        .evaluate(None, ProductFamily::Phone, listings, &PreferenceConfig::default())
        .await
        .unwrap();

    for entry in &report.ranked {
        let scores = &entry.scores;
        assert!((0.0..=100.0).contains(&scores.value.score));
        assert!((0.0..=100.0).contains(&scores.preference.score));
        assert!((0.0..=100.0).contains(&scores.risk.score));
        assert!((0.0..=100.0).contains(&scores.final_score));
    }
}

#[tokio::test]
async fn test_urgent_suspicious_listing_flagged_and_ranked_low() {
    let mut listings = phone_market();
    listings.push(
        RawListing::new("risky", "iPhone 15 Pro Max 256GB superbilligt")
            .with_description("Måste säljas idag! Förskott via swish först krävs.")
            .with_price(3000.0)
            .with_images(1),
    );

    let engine = Evaluator::new(EvaluationConfig::default());
    let report = engine
        .evaluate(None, ProductFamily::Phone, listings, &PreferenceConfig::default())
        .await
        .unwrap();

    let risky = report
        .ranked
        .iter()
        .find(|e| e.listing_id == "risky")
        .unwrap();
    let flags = &risky.scores.risk.flags;
    assert!(flags.contains(&RiskFlag::UrgencyDetected));
    assert!(flags.contains(&RiskFlag::SuspiciousPayment));
    assert!(flags.contains(&RiskFlag::UnusuallyLowPrice));
}

#[tokio::test]
async fn test_unpriced_market_yields_neutral_values_and_note() {
    let listings: Vec<RawListing> = (0..4)
        .map(|i| RawListing::new(format!("l{i}"), "Okänd pryl säljes").with_images(1))
        .collect();

    let engine = Evaluator::new(EvaluationConfig::default());
    let report = engine
        .evaluate(None, ProductFamily::Generic, listings, &PreferenceConfig::default())
        .await
        .unwrap();

    for entry in &report.ranked {
        assert_eq!(entry.scores.value.score, 50.0);
        assert_eq!(entry.scores.value.comps_n, 0);
    }
}

#[tokio::test]
async fn test_more_than_half_filtered_produces_note() {
    let mut listings = vec![
        RawListing::new("keep", "iPhone 15 Pro Max 256GB bra skick")
            .with_price(9000.0)
            .with_images(2),
    ];
    for i in 0..3 {
        listings.push(
            RawListing::new(format!("expensive{i}"), "iPhone 15 Pro Max 256GB")
                .with_price(20000.0),
        );
    }

    let engine = Evaluator::new(EvaluationConfig::default());
    let prefs = PreferenceConfig::default().with_max_price(10000.0);
    let report = engine
        .evaluate(None, ProductFamily::Phone, listings, &prefs)
        .await
        .unwrap();

    assert_eq!(report.filtered_out, 3);
    assert!(report
        .data_quality_notes
        .iter()
        .any(|n| n.contains("filtered out")));
}

#[tokio::test]
async fn test_fallback_fills_missing_attributes() {
    let mut listings = phone_market();
    // No battery statement in text; the fallback provides it.
    listings.push(
        RawListing::new("vague", "iPhone till salu")
            .with_description("Hör av er vid frågor, priset kan diskuteras lite.")
            .with_price(9500.0)
            .with_images(2),
    );

    let fallback = Arc::new(MockFallback::new().with_response(
        "vague",
        vec![
            ExtractedAttribute::new(
                "model_variant",
                AttributeValue::Text("iPhone 15 Pro Max".to_string()),
                0.9,
            ),
            ExtractedAttribute::new("storage_gb", AttributeValue::Integer(256), 0.9),
            ExtractedAttribute::new(
                "condition",
                AttributeValue::Condition(Condition::Good),
                0.8,
            ),
        ],
    ));

    let engine =
        Evaluator::new(EvaluationConfig::default()).with_fallback(fallback.clone());
    let report = engine
        .evaluate(None, ProductFamily::Phone, listings, &PreferenceConfig::default())
        .await
        .unwrap();

    let vague = report
        .ranked
        .iter()
        .find(|e| e.listing_id == "vague")
        .unwrap();
    assert_eq!(vague.attributes.model_variant.as_deref(), Some("iPhone 15 Pro Max"));
    assert_eq!(vague.attributes.storage_gb, Some(256));
    assert!(vague.attributes.llm_fallback_used);
    assert!(!fallback.calls().is_empty());
}

#[tokio::test]
async fn test_failing_fallback_degrades_to_absent_attributes() {
    let mut listings = phone_market();
    listings.push(
        RawListing::new("vague", "Telefon till salu")
            .with_description("Ring för mer information om denna fina telefon.")
            .with_price(9500.0)
            .with_images(2),
    );

    let fallback = Arc::new(MockFallback::new().failing("provider unavailable"));
    let engine = Evaluator::new(EvaluationConfig::default()).with_fallback(fallback);
    let report = engine
        .evaluate(None, ProductFamily::Phone, listings, &PreferenceConfig::default())
        .await
        .unwrap();

    // The run completes; the vague listing is still ranked, just with
    // unresolved attributes and a seller-question checklist.
    let vague = report
        .ranked
        .iter()
        .find(|e| e.listing_id == "vague")
        .unwrap();
    assert!(vague.attributes.model_variant.is_none());
    assert!(!vague.checklist.is_empty());
}

#[tokio::test]
async fn test_slow_fallback_times_out_without_stalling() {
    let mut listings = phone_market();
    listings.push(
        RawListing::new("vague", "Telefon till salu")
            .with_description("Ring för mer information om denna fina telefon.")
            .with_price(9500.0)
            .with_images(2),
    );

    let fallback = Arc::new(MockFallback::new().with_delay(Duration::from_secs(5)));
    let config =
        EvaluationConfig::default().with_fallback_timeout(Duration::from_millis(50));
    let engine = Evaluator::new(config).with_fallback(fallback);
    let report = engine
        .evaluate(None, ProductFamily::Phone, listings, &PreferenceConfig::default())
        .await
        .unwrap();

    let vague = report
        .ranked
        .iter()
        .find(|e| e.listing_id == "vague")
        .unwrap();
    assert!(vague.attributes.model_variant.is_none());
}

#[tokio::test]
async fn test_top_k_truncation_and_contiguous_ranks() {
    let engine = Evaluator::new(EvaluationConfig::default().with_top_k(3));
    let report = engine
        .evaluate(None, ProductFamily::Phone, phone_market(), &PreferenceConfig::default())
        .await
        .unwrap();

    assert_eq!(report.ranked.len(), 3);
    let ranks: Vec<usize> = report.ranked.iter().map(|e| e.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
    assert_eq!(report.total_evaluated, 5);
}
