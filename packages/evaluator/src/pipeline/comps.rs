//! Comps grouping, robust statistics, and the relaxation index.

use indexmap::IndexMap;
use tracing::debug;

use crate::types::{CanonicalKey, CompsGroup, CompsStats, RawListing};

/// Highest relaxation level tried before giving up on comps.
pub const MAX_RELAXATION_LEVEL: u8 = 3;

/// Compute robust statistics over a set of asking prices.
///
/// Returns `None` for an empty slice. Quartiles use linear
/// interpolation at rank `(n - 1) * q` over the sorted prices, so
/// single-element samples collapse to that element.
pub fn compute_comps_stats(prices: &[f64]) -> Option<CompsStats> {
    if prices.is_empty() {
        return None;
    }
    let mut sorted: Vec<f64> = prices.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);

    Some(CompsStats {
        median,
        q1,
        q3,
        iqr: q3 - q1,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        n: sorted.len(),
    })
}

/// Linear-interpolation quantile over an already sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (n - 1) as f64 * q;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// One grouping bucket inside the relaxation index: member ids in
/// ingestion order plus the positive prices among them.
#[derive(Debug, Clone, Default)]
struct IndexEntry {
    listing_ids: Vec<String>,
    prices: Vec<f64>,
}

/// Pre-built comparable-group index across all relaxation levels.
///
/// Built once after the extraction barrier; lookups during scoring are
/// pure reads, so per-listing key resolution never recomputes group
/// statistics.
pub struct CompsIndex {
    /// One grouping map per relaxation level, level 0 first
    levels: Vec<IndexMap<CanonicalKey, IndexEntry>>,
}

impl CompsIndex {
    /// Build the index from listings and their unrelaxed canonical keys,
    /// paired in ingestion order.
    pub fn build(entries: &[(&RawListing, &CanonicalKey)]) -> Self {
        let mut levels: Vec<IndexMap<CanonicalKey, IndexEntry>> =
            (0..=MAX_RELAXATION_LEVEL).map(|_| IndexMap::new()).collect();

        for (listing, key) in entries {
            for (level, groups) in levels.iter_mut().enumerate() {
                let relaxed = key.relax(level as u8);
                let entry = groups.entry(relaxed).or_default();
                entry.listing_ids.push(listing.listing_id.clone());
                if let Some(price) = listing.price.filter(|p| *p > 0.0) {
                    entry.prices.push(price);
                }
            }
        }

        debug!(
            exact_groups = levels[0].len(),
            "built comps index across {} relaxation levels",
            levels.len()
        );
        Self { levels }
    }

    /// Resolve the comps group for a key by progressive relaxation.
    ///
    /// Tries level 0 (exact) through level 3 (family only) and returns
    /// the first group whose priced sample reaches `min_sample`. Returns
    /// `None` when even the family-only group is too thin.
    pub fn find(&self, key: &CanonicalKey, min_sample: usize) -> Option<CompsGroup> {
        for (level, groups) in self.levels.iter().enumerate() {
            let relaxed = key.relax(level as u8);
            let Some(entry) = groups.get(&relaxed) else {
                continue;
            };
            if entry.prices.len() >= min_sample {
                return Some(CompsGroup {
                    key: relaxed,
                    listing_ids: entry.listing_ids.clone(),
                    stats: compute_comps_stats(&entry.prices),
                    is_sufficient: true,
                    relaxation_level: level as u8,
                });
            }
        }
        None
    }

    /// Number of exact-key (level 0) groups.
    pub fn exact_group_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Materialize every exact-key group, for reporting.
    pub fn exact_groups(&self, min_sample: usize) -> Vec<CompsGroup> {
        self.levels[0]
            .iter()
            .map(|(key, entry)| CompsGroup {
                key: key.clone(),
                listing_ids: entry.listing_ids.clone(),
                stats: compute_comps_stats(&entry.prices),
                is_sufficient: entry.prices.len() >= min_sample,
                relaxation_level: 0,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ConditionBucket, ProductFamily, StorageBucket};
    use proptest::prelude::*;

    fn listing(id: &str, price: Option<f64>) -> RawListing {
        let l = RawListing::new(id, "iPhone 15 Pro 256GB");
        match price {
            Some(p) => l.with_price(p),
            None => l,
        }
    }

    fn key(condition: Option<ConditionBucket>) -> CanonicalKey {
        CanonicalKey {
            family: ProductFamily::Phone,
            model_variant: Some("iPhone 15 Pro".to_string()),
            storage_bucket: Some(StorageBucket::Gb256),
            condition_bucket: condition,
        }
    }

    #[test]
    fn test_stats_five_prices() {
        let stats =
            compute_comps_stats(&[8000.0, 9000.0, 10000.0, 11000.0, 12000.0]).unwrap();
        assert_eq!(stats.median, 10000.0);
        assert_eq!(stats.q1, 9000.0);
        assert_eq!(stats.q3, 11000.0);
        assert_eq!(stats.iqr, 2000.0);
        assert_eq!(stats.n, 5);
    }

    #[test]
    fn test_stats_even_count_interpolates() {
        let stats = compute_comps_stats(&[100.0, 200.0, 300.0, 400.0]).unwrap();
        assert_eq!(stats.median, 250.0);
        assert_eq!(stats.q1, 175.0);
        assert_eq!(stats.q3, 325.0);
    }

    #[test]
    fn test_stats_single_price() {
        let stats = compute_comps_stats(&[500.0]).unwrap();
        assert_eq!(stats.median, 500.0);
        assert_eq!(stats.iqr, 0.0);
    }

    #[test]
    fn test_stats_empty() {
        assert!(compute_comps_stats(&[]).is_none());
    }

    #[test]
    fn test_index_exact_match_when_sufficient() {
        let listings: Vec<RawListing> = (0..5)
            .map(|i| listing(&format!("l{i}"), Some(9000.0 + i as f64 * 500.0)))
            .collect();
        let k = key(Some(ConditionBucket::Good));
        let entries: Vec<(&RawListing, &CanonicalKey)> =
            listings.iter().map(|l| (l, &k)).collect();

        let index = CompsIndex::build(&entries);
        let group = index.find(&k, 5).unwrap();
        assert_eq!(group.relaxation_level, 0);
        assert_eq!(group.comps_n(), 5);
        assert!(group.is_sufficient);
    }

    #[test]
    fn test_index_relaxes_when_exact_too_thin() {
        // Two condition buckets of the same model/storage; neither has
        // five priced members alone, together they do at level 1.
        let listings: Vec<RawListing> = (0..6)
            .map(|i| listing(&format!("l{i}"), Some(8000.0 + i as f64 * 400.0)))
            .collect();
        let good = key(Some(ConditionBucket::Good));
        let fair = key(Some(ConditionBucket::Fair));
        let entries: Vec<(&RawListing, &CanonicalKey)> = listings
            .iter()
            .enumerate()
            .map(|(i, l)| (l, if i < 3 { &good } else { &fair }))
            .collect();

        let index = CompsIndex::build(&entries);
        let group = index.find(&good, 5).unwrap();
        assert_eq!(group.relaxation_level, 1);
        assert_eq!(group.comps_n(), 6);
        assert!(group.key.condition_bucket.is_none());
    }

    #[test]
    fn test_index_none_when_family_too_thin() {
        let l = listing("l0", Some(9000.0));
        let k = key(Some(ConditionBucket::Good));
        let index = CompsIndex::build(&[(&l, &k)]);
        assert!(index.find(&k, 5).is_none());
    }

    #[test]
    fn test_unpriced_members_counted_but_not_in_stats() {
        let mut listings: Vec<RawListing> = (0..5)
            .map(|i| listing(&format!("l{i}"), Some(10000.0)))
            .collect();
        listings.push(listing("l5", None));
        let k = key(Some(ConditionBucket::Good));
        let entries: Vec<(&RawListing, &CanonicalKey)> =
            listings.iter().map(|l| (l, &k)).collect();

        let index = CompsIndex::build(&entries);
        let group = index.find(&k, 5).unwrap();
        assert_eq!(group.listing_ids.len(), 6);
        assert_eq!(group.comps_n(), 5);
    }

    proptest! {
        #[test]
        fn prop_quartiles_ordered(prices in proptest::collection::vec(1.0f64..100_000.0, 1..50)) {
            let stats = compute_comps_stats(&prices).unwrap();
            prop_assert!(stats.q1 <= stats.median);
            prop_assert!(stats.median <= stats.q3);
            prop_assert!(stats.iqr >= 0.0);
            prop_assert!(stats.min <= stats.q1);
            prop_assert!(stats.q3 <= stats.max);
        }
    }
}
