//! Recommendation items as returned by `/api/recommend`, plus the resolved image.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::numeric::coerce_number;

/// Maximum number of reasons shown on a card.
pub const MAX_SHOWN_REASONS: usize = 3;

/// Static image used when resolution fails or returns nothing.
pub const PLACEHOLDER_IMAGE_PATH: &str = "/static/stock_images/motorcycle_ride.jpg";

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_number)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32))
}

fn lenient_f32<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .as_ref()
        .and_then(coerce_number)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as f32))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Bool(b)) => Some(b),
        Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        Some(Value::Number(n)) => n.as_i64().map(|n| n != 0),
        _ => None,
    })
}

fn null_as_empty_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(values)) => values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) if !s.trim().is_empty() => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

/// A bike recommendation merged with its resolved image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bike_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty_string")]
    pub name: String,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub engine_cc: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub seat_height_mm: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub wet_weight_kg: Option<u32>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub abs: Option<bool>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub top_speed_mph: Option<u32>,
    #[serde(
        default,
        alias = "zero_to_60_s",
        alias = "zero_to_sixty",
        deserialize_with = "lenient_f32"
    )]
    pub zero_to_sixty_s: Option<f32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub msrp_usd: Option<u32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reasons: Vec<String>,
    #[serde(default, alias = "official_site")]
    pub official_url: Option<String>,
    #[serde(default)]
    pub mfr_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// True for items synthesized from a chat description rather than the catalog.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub external: bool,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl RecommendationItem {
    /// Identity used for deduplication: `id`, then `bike_id`, then `name`.
    #[must_use]
    pub fn identity(&self) -> &str {
        non_empty(self.id.as_ref())
            .or_else(|| non_empty(self.bike_id.as_ref()))
            .unwrap_or_else(|| self.name.trim())
    }

    #[must_use]
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { self.identity() } else { name }
    }

    #[must_use]
    pub fn shown_reasons(&self) -> &[String] {
        &self.reasons[..self.reasons.len().min(MAX_SHOWN_REASONS)]
    }

    /// Only an explicit `abs: false` counts; unknown ABS fitment does not.
    #[must_use]
    pub fn lacks_abs(&self) -> bool {
        self.abs == Some(false)
    }

    /// Query sent to the image endpoint: explicit hint, else "manufacturer name".
    #[must_use]
    pub fn image_search_query(&self) -> String {
        if let Some(query) = non_empty(self.image_query.as_ref()) {
            return query.to_string();
        }
        let name = self.display_name();
        match non_empty(self.manufacturer.as_ref()) {
            Some(mfr) if !name.to_ascii_lowercase().starts_with(&mfr.to_ascii_lowercase()) => {
                format!("{mfr} {name}")
            }
            _ => name.to_string(),
        }
    }

    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        non_empty(self.image_url.as_ref()).unwrap_or(PLACEHOLDER_IMAGE_PATH)
    }

    #[must_use]
    pub fn official_link(&self) -> Option<&str> {
        non_empty(self.official_url.as_ref())
    }
}
