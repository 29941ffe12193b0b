//! Listing types - the normalized marketplace input to the pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A normalized marketplace listing.
///
/// This is the immutable external input to the pipeline. The evaluator
/// never mutates listings; all derived data lives in per-run maps keyed
/// by `listing_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    /// Stable marketplace identifier
    pub listing_id: String,

    /// Link back to the advertisement
    #[serde(default)]
    pub url: String,

    /// Advertisement title
    pub title: String,

    /// Free-text body, if any
    #[serde(default)]
    pub description: Option<String>,

    /// Asking price. Accepts numbers, formatted strings ("7 500 kr"),
    /// and `{ "amount": ... }` / `{ "value": ... }` objects.
    #[serde(default, deserialize_with = "deserialize_price")]
    pub price: Option<f64>,

    /// Price currency code
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Seller location, if stated
    #[serde(default)]
    pub location: Option<String>,

    /// When the advertisement was published
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,

    /// Whether the seller offers shipping
    #[serde(default)]
    pub shipping_available: Option<bool>,

    /// Number of images in the advertisement
    #[serde(default)]
    pub image_count: u32,
}

fn default_currency() -> String {
    "SEK".to_string()
}

impl RawListing {
    /// Create a minimal listing (mostly useful in tests and examples).
    pub fn new(listing_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            listing_id: listing_id.into(),
            url: String::new(),
            title: title.into(),
            description: None,
            price: None,
            currency: default_currency(),
            location: None,
            published_at: None,
            shipping_available: None,
            image_count: 0,
        }
    }

    /// Set the asking price.
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the image count.
    pub fn with_images(mut self, count: u32) -> Self {
        self.image_count = count;
        self
    }

    /// Set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Combined lowercase title + description used by all pattern
    /// recognizers.
    pub fn search_text(&self) -> String {
        match &self.description {
            Some(desc) => format!("{} {}", self.title, desc).to_lowercase(),
            None => self.title.to_lowercase(),
        }
    }

    /// Total character length of title + description (low-information
    /// risk signal).
    pub fn text_length(&self) -> usize {
        self.title.chars().count()
            + self
                .description
                .as_deref()
                .map(|d| d.chars().count())
                .unwrap_or(0)
    }

    /// Whether the listing carries a positive numeric asking price.
    ///
    /// Only such listings contribute to comps statistics.
    pub fn has_positive_price(&self) -> bool {
        matches!(self.price, Some(p) if p > 0.0)
    }
}

/// Tolerant price parsing.
///
/// Marketplace feeds deliver prices as numbers, formatted strings
/// ("7 500 kr", "7,500 SEK"), or nested objects. Anything unparseable
/// becomes `None` rather than failing the whole listing.
fn deserialize_price<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_price_value))
}

fn parse_price_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        serde_json::Value::Object(map) => map
            .get("amount")
            .or_else(|| map.get("value"))
            .and_then(parse_price_value),
        _ => None,
    }
}
