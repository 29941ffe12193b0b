//! Run report types - the serializable output of a pipeline run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scoring::RankedListing;

/// Complete result of one evaluation run.
///
/// Flat and serializable so the surrounding application can export it
/// as-is; file naming and storage are its concern, not ours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Unique run identifier
    pub run_id: String,

    /// The search query this run evaluated, when known
    pub query: Option<String>,

    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,

    /// Ranked survivors, best first, truncated to top-K
    pub ranked: Vec<RankedListing>,

    /// Listings that were extracted, resolved, and scored
    pub total_evaluated: usize,

    /// Listings excluded at intake or by hard preference filters
    pub filtered_out: usize,

    /// Number of exact-key comps groups built this run
    pub comps_group_count: usize,

    /// Human-readable notes about data quality
    pub data_quality_notes: Vec<String>,
}

impl EvaluationReport {
    /// Compact projection for quick display or piping: rank, title,
    /// price, url, score, seller questions.
    pub fn to_minimal(&self) -> serde_json::Value {
        serde_json::json!({
            "run_id": self.run_id,
            "query": self.query,
            "completed_at": self.completed_at.to_rfc3339(),
            "results": self.ranked.iter().map(|r| {
                serde_json::json!({
                    "rank": r.rank,
                    "title": r.title,
                    "price": r.asking_price,
                    "url": r.url,
                    "score": r.scores.final_score,
                    "seller_questions": r.checklist.iter()
                        .map(|q| q.question.clone())
                        .collect::<Vec<_>>(),
                })
            }).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_export_shape() {
        let report = EvaluationReport {
            run_id: "abc123".to_string(),
            query: Some("iphone 15".to_string()),
            started_at: Utc::now(),
            completed_at: Utc::now(),
            ranked: vec![],
            total_evaluated: 0,
            filtered_out: 0,
            comps_group_count: 0,
            data_quality_notes: vec![],
        };
        let minimal = report.to_minimal();
        assert_eq!(minimal["run_id"], "abc123");
        assert!(minimal["results"].as_array().unwrap().is_empty());
    }
}
