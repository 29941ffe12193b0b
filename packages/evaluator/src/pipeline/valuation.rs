//! Value scoring: asking price against the comparable market.

use crate::types::{CompsGroup, CompsStats, ValueScore};

/// Score an asking price against its resolved comps group.
///
/// 50 means at market; each percent below the group median adds one
/// point, each percent above subtracts one, clamped to [0, 100]. With
/// no usable group or no asking price the score stays neutral at 50.
pub fn compute_value_score(asking_price: Option<f64>, group: Option<&CompsGroup>) -> ValueScore {
    let Some(group) = group else {
        return ValueScore::neutral(asking_price, 0);
    };
    let (Some(stats), Some(asking)) = (group.stats, asking_price) else {
        return ValueScore::neutral(asking_price, group.comps_n());
    };
    if stats.median <= 0.0 {
        return ValueScore::neutral(asking_price, group.comps_n());
    }

    let deal_delta = (stats.median - asking) / stats.median;
    let score = (50.0 + deal_delta * 100.0).clamp(0.0, 100.0);

    ValueScore {
        score,
        asking_price: Some(asking),
        expected_price: Some(stats.median),
        deal_delta: Some(deal_delta),
        comps_key: Some(group.key.label()),
        comps_n: group.comps_n(),
    }
}

/// Approximate percentile of a price within a comps distribution.
///
/// Piecewise-linear through the five-number summary. A degenerate
/// distribution (all prices equal) maps below/at/above to 25/50/75.
pub fn price_percentile(price: f64, stats: &CompsStats) -> f64 {
    if stats.iqr == 0.0 && stats.min == stats.max {
        return if price < stats.median {
            25.0
        } else if price > stats.median {
            75.0
        } else {
            50.0
        };
    }
    if price <= stats.min {
        return 0.0;
    }
    if price >= stats.max {
        return 100.0;
    }
    let segments = [
        (stats.min, stats.q1, 0.0, 25.0),
        (stats.q1, stats.median, 25.0, 50.0),
        (stats.median, stats.q3, 50.0, 75.0),
        (stats.q3, stats.max, 75.0, 100.0),
    ];
    for (lo, hi, p_lo, p_hi) in segments {
        if price <= hi {
            if hi == lo {
                return p_hi;
            }
            return p_lo + (price - lo) / (hi - lo) * (p_hi - p_lo);
        }
    }
    100.0
}

/// Whether a price falls outside the IQR fences at the given
/// multiplier.
pub fn is_price_outlier(price: f64, stats: &CompsStats, multiplier: f64) -> bool {
    price < stats.q1 - multiplier * stats.iqr || price > stats.q3 + multiplier * stats.iqr
}

/// Whether a price is suspiciously far below the market (below the
/// lower 1.5 IQR fence).
pub fn is_suspiciously_low(price: f64, stats: &CompsStats) -> bool {
    price < stats.q1 - 1.5 * stats.iqr
}
