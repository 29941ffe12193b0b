//! Canonical keys, relaxation, and comps-group types.

use serde::{Deserialize, Serialize};

use super::attributes::{Condition, ProductFamily};

/// Storage size bucket used in canonical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBucket {
    /// ≤ 64 GB
    Gb64,
    /// ≤ 128 GB
    Gb128,
    /// ≤ 256 GB
    Gb256,
    /// ≤ 512 GB
    Gb512,
    /// > 512 GB
    Tb1Plus,
}

impl StorageBucket {
    /// Bucket a storage size in GB.
    pub fn from_gb(gb: u32) -> Self {
        match gb {
            0..=64 => StorageBucket::Gb64,
            65..=128 => StorageBucket::Gb128,
            129..=256 => StorageBucket::Gb256,
            257..=512 => StorageBucket::Gb512,
            _ => StorageBucket::Tb1Plus,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageBucket::Gb64 => "64GB",
            StorageBucket::Gb128 => "128GB",
            StorageBucket::Gb256 => "256GB",
            StorageBucket::Gb512 => "512GB",
            StorageBucket::Tb1Plus => "1TB+",
        }
    }
}

/// Condition bucket used in canonical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionBucket {
    /// New or like-new
    NewLike,
    /// Good
    Good,
    /// Ok or defect
    Fair,
}

impl ConditionBucket {
    /// Bucket a condition. `Unknown` has no bucket.
    pub fn from_condition(condition: Condition) -> Option<Self> {
        match condition {
            Condition::New | Condition::LikeNew => Some(ConditionBucket::NewLike),
            Condition::Good => Some(ConditionBucket::Good),
            Condition::Ok | Condition::Defect => Some(ConditionBucket::Fair),
            Condition::Unknown => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConditionBucket::NewLike => "new",
            ConditionBucket::Good => "good",
            ConditionBucket::Fair => "fair",
        }
    }
}

/// Immutable grouping key identifying a comparable-items bucket.
///
/// Derived deterministically from extracted attributes. Equality and
/// hashing are over the full tuple, so a `HashMap`/`IndexMap` keyed by
/// `CanonicalKey` gives exact-tuple grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalKey {
    pub family: ProductFamily,
    pub model_variant: Option<String>,
    pub storage_bucket: Option<StorageBucket>,
    pub condition_bucket: Option<ConditionBucket>,
}

impl CanonicalKey {
    /// Key with only the family populated (maximum relaxation).
    pub fn family_only(family: ProductFamily) -> Self {
        Self {
            family,
            model_variant: None,
            storage_bucket: None,
            condition_bucket: None,
        }
    }

    /// Relax this key by dropping dimensions in the fixed order:
    ///
    /// - level 0: full key
    /// - level 1: drop `condition_bucket`
    /// - level 2: additionally drop `storage_bucket`
    /// - level 3 (and beyond): only `family` retained
    ///
    /// Pure and total; levels above 3 behave like 3.
    pub fn relax(&self, level: u8) -> CanonicalKey {
        match level {
            0 => self.clone(),
            1 => CanonicalKey {
                family: self.family,
                model_variant: self.model_variant.clone(),
                storage_bucket: self.storage_bucket,
                condition_bucket: None,
            },
            2 => CanonicalKey {
                family: self.family,
                model_variant: self.model_variant.clone(),
                storage_bucket: None,
                condition_bucket: None,
            },
            _ => CanonicalKey::family_only(self.family),
        }
    }

    /// Compact "family|model|storage|condition" label for display and
    /// export.
    pub fn label(&self) -> String {
        format!(
            "{}|{}|{}|{}",
            self.family.label(),
            self.model_variant.as_deref().unwrap_or("*"),
            self.storage_bucket.map(|b| b.label()).unwrap_or("*"),
            self.condition_bucket.map(|b| b.label()).unwrap_or("*"),
        )
    }
}

/// Robust statistics over a comps group's positive asking prices.
///
/// Invariants: `q1 <= median <= q3` and `iqr = q3 - q1 >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompsStats {
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub min: f64,
    pub max: f64,
    /// Number of prices behind these statistics
    pub n: usize,
}

/// A group of comparable listings with market statistics.
///
/// Rebuilt fresh each run; never persisted by the core. Unpriced
/// listings are members (`listing_ids`) but do not contribute to
/// `stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompsGroup {
    pub key: CanonicalKey,

    /// Member listing ids in ingestion order
    pub listing_ids: Vec<String>,

    /// `None` when no member has a positive price
    pub stats: Option<CompsStats>,

    /// Whether the priced sample reaches the configured minimum
    pub is_sufficient: bool,

    /// Relaxation level at which this group was assembled (0 = exact)
    pub relaxation_level: u8,
}

impl CompsGroup {
    /// Number of prices behind this group's statistics.
    pub fn comps_n(&self) -> usize {
        self.stats.map(|s| s.n).unwrap_or(0)
    }
}
