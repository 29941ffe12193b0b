//! Canonicalization - extracted attributes to deterministic grouping keys.

use crate::types::{
    CanonicalKey, ConditionBucket, ExtractedAttributes, StorageBucket,
};

/// Derive the canonical grouping key for a listing's attributes.
///
/// Storage is bucketed into {≤64, ≤128, ≤256, ≤512, >512} GB, condition
/// into {new-like, good, fair}. Unknown condition and missing storage
/// leave those dimensions empty. The model variant passes through
/// verbatim.
pub fn create_canonical_key(attrs: &ExtractedAttributes) -> CanonicalKey {
    CanonicalKey {
        family: attrs.family,
        model_variant: attrs.model_variant.clone(),
        storage_bucket: attrs.storage_gb.map(StorageBucket::from_gb),
        condition_bucket: ConditionBucket::from_condition(attrs.condition),
    }
}
