//! Extracted-attribute types and the closed condition/family vocabularies.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Normalized item condition, ordered best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Ok,
    Defect,
    #[default]
    Unknown,
}

impl Condition {
    /// Position on the ordered scale (0 = best). `Unknown` sorts last.
    pub fn rank(&self) -> u8 {
        match self {
            Condition::New => 0,
            Condition::LikeNew => 1,
            Condition::Good => 2,
            Condition::Ok => 3,
            Condition::Defect => 4,
            Condition::Unknown => 5,
        }
    }

    /// Whether this condition meets a required minimum.
    ///
    /// `Unknown` never *fails* a minimum — missing information is
    /// penalized, not disqualifying.
    pub fn is_at_least(&self, minimum: Condition) -> bool {
        if *self == Condition::Unknown {
            return true;
        }
        self.rank() <= minimum.rank()
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like new",
            Condition::Good => "good",
            Condition::Ok => "ok",
            Condition::Defect => "defect",
            Condition::Unknown => "unknown",
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = crate::error::EvaluatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(Condition::New),
            "like_new" | "like new" => Ok(Condition::LikeNew),
            "good" => Ok(Condition::Good),
            "ok" => Ok(Condition::Ok),
            "defect" => Ok(Condition::Defect),
            "unknown" => Ok(Condition::Unknown),
            other => Err(crate::error::EvaluatorError::Config {
                reason: format!("unrecognized condition value: {other:?}"),
            }),
        }
    }
}

/// Closed set of product families with dedicated extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductFamily {
    Phone,
    Laptop,
    Tablet,
    Camera,
    #[default]
    Generic,
}

impl ProductFamily {
    pub fn label(&self) -> &'static str {
        match self {
            ProductFamily::Phone => "phone",
            ProductFamily::Laptop => "laptop",
            ProductFamily::Tablet => "tablet",
            ProductFamily::Camera => "camera",
            ProductFamily::Generic => "generic",
        }
    }
}

impl std::str::FromStr for ProductFamily {
    type Err = crate::error::EvaluatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "phone" => Ok(ProductFamily::Phone),
            "laptop" => Ok(ProductFamily::Laptop),
            "tablet" => Ok(ProductFamily::Tablet),
            "camera" => Ok(ProductFamily::Camera),
            "generic" => Ok(ProductFamily::Generic),
            other => Err(crate::error::EvaluatorError::Config {
                reason: format!("unrecognized product family: {other:?}"),
            }),
        }
    }
}

/// Where an attribute value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AttributeSource {
    /// Pattern recognizer over title + description
    #[default]
    Regex,
    /// LLM fallback collaborator
    Llm,
    /// Structured marketplace field
    Structured,
}

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Text(String),
    Condition(Condition),
}

impl AttributeValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_condition(&self) -> Option<Condition> {
        match self {
            AttributeValue::Condition(c) => Some(*c),
            _ => None,
        }
    }
}

/// A single extracted attribute with confidence and evidence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAttribute {
    /// Attribute name (e.g. "storage_gb", "has_cracks")
    pub name: String,

    /// The extracted value
    pub value: AttributeValue,

    /// Extraction confidence in [0, 1]
    pub confidence: f64,

    /// Text span that supports the extraction
    #[serde(default)]
    pub evidence_span: Option<String>,

    /// Extraction method
    #[serde(default)]
    pub source: AttributeSource,
}

impl ExtractedAttribute {
    pub fn new(name: impl Into<String>, value: AttributeValue, confidence: f64) -> Self {
        Self {
            name: name.into(),
            value,
            confidence,
            evidence_span: None,
            source: AttributeSource::Regex,
        }
    }

    pub fn with_evidence(mut self, span: impl Into<String>) -> Self {
        self.evidence_span = Some(span.into());
        self
    }

    pub fn with_source(mut self, source: AttributeSource) -> Self {
        self.source = source;
        self
    }
}

/// All extracted attributes for one listing.
///
/// Created once per run and never mutated afterwards. The `attributes`
/// map holds every emitted attribute; the typed fields below are
/// convenience projections of the well-known ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedAttributes {
    pub listing_id: String,
    pub family: ProductFamily,

    /// Attribute name -> extracted attribute, in emission order
    pub attributes: IndexMap<String, ExtractedAttribute>,

    // Typed projections
    pub storage_gb: Option<u32>,
    pub condition: Condition,
    pub battery_health: Option<u8>,
    pub has_cracks: Option<bool>,
    pub has_warranty: Option<bool>,
    pub has_receipt: Option<bool>,
    pub is_locked: Option<bool>,
    pub color: Option<String>,
    pub model_variant: Option<String>,

    /// Fraction of the family's key attributes that resolved
    pub extraction_confidence: f64,

    /// Whether the LLM fallback contributed any attribute
    pub llm_fallback_used: bool,
}

impl ExtractedAttributes {
    /// Build from a list of emitted attributes, projecting the
    /// well-known names onto typed fields and computing the aggregate
    /// confidence against the family's key attributes.
    pub fn from_attributes(
        listing_id: impl Into<String>,
        family: ProductFamily,
        attributes: Vec<ExtractedAttribute>,
        key_attributes: &[&str],
    ) -> Self {
        let mut result = Self {
            listing_id: listing_id.into(),
            family,
            attributes: IndexMap::new(),
            storage_gb: None,
            condition: Condition::Unknown,
            battery_health: None,
            has_cracks: None,
            has_warranty: None,
            has_receipt: None,
            is_locked: None,
            color: None,
            model_variant: None,
            extraction_confidence: 0.5,
            llm_fallback_used: false,
        };
        for attr in attributes {
            result.absorb(attr);
        }
        result.recompute_confidence(key_attributes);
        result
    }

    /// Project an attribute onto its typed field and record it in the
    /// map. Later attributes with the same name replace earlier ones.
    pub fn absorb(&mut self, attr: ExtractedAttribute) {
        match attr.name.as_str() {
            "storage_gb" => {
                self.storage_gb = attr.value.as_integer().and_then(|v| u32::try_from(v).ok());
            }
            "condition" => {
                if let Some(c) = attr.value.as_condition() {
                    self.condition = c;
                }
            }
            "battery_health" => {
                self.battery_health = attr
                    .value
                    .as_integer()
                    .and_then(|v| u8::try_from(v).ok())
                    .filter(|v| *v <= 100);
            }
            "has_cracks" => self.has_cracks = attr.value.as_bool(),
            "has_warranty" => self.has_warranty = attr.value.as_bool(),
            "has_receipt" => self.has_receipt = attr.value.as_bool(),
            "is_locked" => self.is_locked = attr.value.as_bool(),
            "color" => self.color = attr.value.as_text().map(|s| s.to_string()),
            "model_variant" => self.model_variant = attr.value.as_text().map(|s| s.to_string()),
            _ => {}
        }
        if attr.source == AttributeSource::Llm {
            self.llm_fallback_used = true;
        }
        self.attributes.insert(attr.name.clone(), attr);
    }

    /// Recompute the aggregate confidence (resolved key attributes /
    /// total key attributes, 0.5 when the family declares none).
    pub fn recompute_confidence(&mut self, key_attributes: &[&str]) {
        if key_attributes.is_empty() {
            self.extraction_confidence = 0.5;
            return;
        }
        let found = key_attributes
            .iter()
            .filter(|name| self.is_resolved(name))
            .count();
        self.extraction_confidence = found as f64 / key_attributes.len() as f64;
    }

    /// Whether a well-known attribute resolved to a usable value.
    ///
    /// Condition counts as resolved only when it is not `Unknown` —
    /// condition is always emitted, even when unresolved.
    pub fn is_resolved(&self, name: &str) -> bool {
        match name {
            "storage_gb" => self.storage_gb.is_some(),
            "condition" => self.condition != Condition::Unknown,
            "battery_health" => self.battery_health.is_some(),
            "has_cracks" => self.has_cracks.is_some(),
            "has_warranty" => self.has_warranty.is_some(),
            "has_receipt" => self.has_receipt.is_some(),
            "is_locked" => self.is_locked.is_some(),
            "color" => self.color.is_some(),
            "model_variant" => self.model_variant.is_some(),
            other => self.attributes.contains_key(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_ordering() {
        assert!(Condition::LikeNew.is_at_least(Condition::Good));
        assert!(!Condition::Defect.is_at_least(Condition::Good));
        assert!(Condition::Good.is_at_least(Condition::Good));
        // Unknown never fails a minimum
        assert!(Condition::Unknown.is_at_least(Condition::New));
    }

    #[test]
    fn test_condition_parse_rejects_unknown_values() {
        assert!("like_new".parse::<Condition>().is_ok());
        assert!("pristine".parse::<Condition>().is_err());
    }

    #[test]
    fn test_typed_projection_and_confidence() {
        let attrs = ExtractedAttributes::from_attributes(
            "l1",
            ProductFamily::Phone,
            vec![
                ExtractedAttribute::new("storage_gb", AttributeValue::Integer(256), 0.95),
                ExtractedAttribute::new(
                    "condition",
                    AttributeValue::Condition(Condition::LikeNew),
                    0.8,
                ),
            ],
            &["model_variant", "storage_gb", "condition", "battery_health"],
        );
        assert_eq!(attrs.storage_gb, Some(256));
        assert_eq!(attrs.condition, Condition::LikeNew);
        assert!(attrs.model_variant.is_none());
        assert!((attrs.extraction_confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_battery_out_of_range_dropped() {
        let attrs = ExtractedAttributes::from_attributes(
            "l1",
            ProductFamily::Phone,
            vec![ExtractedAttribute::new(
                "battery_health",
                AttributeValue::Integer(180),
                0.95,
            )],
            &[],
        );
        assert_eq!(attrs.battery_health, None);
    }
}
