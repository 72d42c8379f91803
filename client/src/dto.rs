//! Request and response bodies of the advisor backend.

use std::collections::BTreeMap;

use rideready_types::{
    Experience, MAX_IMAGE_FIELD_CHARS, Profile, RecommendationItem, RunOverrides, cap_chars,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `GET /healthz`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Health {
    pub status: String,
    pub offline_mode: bool,
    pub keys_present: BTreeMap<String, bool>,
    pub whitelist: Whitelist,
    pub boot_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Whitelist {
    pub bikes: usize,
    pub gear: usize,
}

impl Health {
    /// Boot identifier used for session bootstrapping; servers that do not
    /// publish one are treated as a single stable boot.
    #[must_use]
    pub fn boot_id(&self) -> &str {
        self.boot_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or("unknown")
    }
}

/// `POST /api/recommend`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendRequest {
    pub experience: Experience,
    pub height_cm: u32,
    pub budget_usd: u32,
    pub bike_types: Vec<String>,
    pub k: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pin_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub external_items: Vec<RecommendationItem>,
}

impl RecommendRequest {
    #[must_use]
    pub fn new(profile: &Profile, overrides: RunOverrides) -> Self {
        Self {
            experience: profile.experience(),
            height_cm: profile.height_cm(),
            budget_usd: profile.budget_usd(),
            bike_types: profile.bike_types().iter().cloned().collect(),
            k: profile.k(),
            pin_ids: overrides.pin_ids,
            external_items: overrides.external_items,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecommendResponse {
    pub count: Option<usize>,
    pub items: Vec<RecommendationItem>,
    /// Server-validated profile echo; informational only.
    pub profile: Option<Value>,
}

/// `POST /api/images`. Every string is trimmed and capped to what the server keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub query: String,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mfr_domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_image: Option<String>,
}

fn capped(value: Option<&String>) -> Option<String> {
    value
        .map(|v| cap_chars(v, MAX_IMAGE_FIELD_CHARS))
        .filter(|v| !v.is_empty())
}

impl ImageRequest {
    #[must_use]
    pub fn for_item(item: &RecommendationItem) -> Self {
        Self {
            id: Some(cap_chars(item.identity(), MAX_IMAGE_FIELD_CHARS)).filter(|v| !v.is_empty()),
            query: cap_chars(&item.image_search_query(), MAX_IMAGE_FIELD_CHARS),
            limit: 1,
            mfr_domain: capped(item.mfr_domain.as_ref()),
            local_image: capped(item.local_image.as_ref()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageResponse {
    /// "local", "google", "fallback", "offline", ...
    pub source: Option<String>,
    pub images: Vec<ImageHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageHit {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ImageResponse {
    #[must_use]
    pub fn first_url(&self) -> Option<&str> {
        self.images
            .iter()
            .map(|hit| hit.url.trim())
            .find(|url| !url.is_empty())
    }
}

/// `POST /api/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
    pub profile: &'a Profile,
}
