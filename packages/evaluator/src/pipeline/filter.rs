//! Intake filtering: hard constraints and price sanity, applied before
//! extraction.

use tracing::debug;

use crate::pipeline::comps::compute_comps_stats;
use crate::types::{PreferenceConfig, RawListing};

/// Minimum priced sample before the IQR sanity filter activates.
const MIN_SANITY_SAMPLE: usize = 5;

/// Apply intake constraints and the price-sanity filter.
///
/// Constraint order: price bounds, location, shipping, then IQR price
/// sanity over the survivors. Unpriced listings pass the price checks;
/// they carry no price signal to reject on. Returns the kept listings
/// in their original order plus the number dropped.
pub fn apply_intake_filter(
    listings: Vec<RawListing>,
    prefs: &PreferenceConfig,
    iqr_multiplier: f64,
) -> (Vec<RawListing>, usize) {
    let total = listings.len();

    let kept: Vec<RawListing> = listings
        .into_iter()
        .filter(|l| passes_constraints(l, prefs))
        .collect();
    let kept = apply_price_sanity(kept, iqr_multiplier);

    let dropped = total - kept.len();
    if dropped > 0 {
        debug!(total, dropped, "intake filter dropped listings");
    }
    (kept, dropped)
}

fn passes_constraints(listing: &RawListing, prefs: &PreferenceConfig) -> bool {
    if let (Some(price), Some(max)) = (listing.price, prefs.max_price) {
        if price > max {
            return false;
        }
    }
    if let (Some(price), Some(min)) = (listing.price, prefs.min_price) {
        if price < min {
            return false;
        }
    }
    // An unstated location never rejects; only a stated location
    // outside the wanted set does.
    if !prefs.locations.is_empty() {
        if let Some(location) = listing.location.as_deref() {
            let location = location.to_lowercase();
            if !prefs
                .locations
                .iter()
                .any(|wanted| location.contains(&wanted.to_lowercase()))
            {
                return false;
            }
        }
    }
    if prefs.require_shipping && listing.shipping_available != Some(true) {
        return false;
    }
    true
}

/// Drop listings whose price falls outside wide IQR fences.
///
/// Skipped entirely when fewer than five priced listings remain; thin
/// samples make the fences meaningless. Unpriced listings are always
/// kept.
fn apply_price_sanity(listings: Vec<RawListing>, iqr_multiplier: f64) -> Vec<RawListing> {
    let prices: Vec<f64> = listings
        .iter()
        .filter_map(|l| l.price.filter(|p| *p > 0.0))
        .collect();
    if prices.len() < MIN_SANITY_SAMPLE {
        return listings;
    }
    let Some(stats) = compute_comps_stats(&prices) else {
        return listings;
    };
    let lower = stats.q1 - iqr_multiplier * stats.iqr;
    let upper = stats.q3 + iqr_multiplier * stats.iqr;

    listings
        .into_iter()
        .filter(|l| match l.price.filter(|p| *p > 0.0) {
            Some(price) => price >= lower && price <= upper,
            None => true,
        })
        .collect()
}
