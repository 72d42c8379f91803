//! Chat planner responses and the one-shot overrides they produce.
//!
//! The planner behind `/api/chat` is a language model, so everything here
//! parses leniently from `serde_json::Value`: unknown action types are kept
//! as [`PlanAction::Unknown`], numbers may be strings, and a free-form bike
//! may arrive flat (`{model, brand}`) or nested (`{details: {...}}`).

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::item::RecommendationItem;
use crate::numeric::coerce_number;
use crate::profile::ProfilePatch;

/// Manufacturer prefixes recognised when a planner sends only `"Yamaha MT-03"`.
/// Longer names first so "Harley-Davidson" wins over "Harley".
pub const KNOWN_BRANDS: &[&str] = &[
    "Harley-Davidson",
    "Royal Enfield",
    "Moto Guzzi",
    "Kawasaki",
    "Triumph",
    "Aprilia",
    "Benelli",
    "Yamaha",
    "Suzuki",
    "Ducati",
    "Harley",
    "CFMoto",
    "Honda",
    "Bajaj",
    "BMW",
    "KTM",
    "Zero",
];

/// Topic the planner uses for requests outside the motorcycle domain.
pub const OFFTOPIC_TOPIC: &str = "OFFTOPIC";

/// Nested objects a free-form bike description may hide its fields in.
const NESTED_KEYS: &[&str] = &["details", "bike", "item"];

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatPlan {
    pub message: Option<String>,
    pub topic: Option<String>,
    pub actions: Vec<PlanAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    UpdateProfile(ProfilePatch),
    Recommend(RecommendAction),
    Unknown(String),
}

/// A `RECOMMEND` action: always asks for a fresh run, optionally steering it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendAction {
    pub pin_ids: Vec<String>,
    pub external_items: Vec<RecommendationItem>,
}

impl<'de> Deserialize<'de> for ChatPlan {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

impl ChatPlan {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);
        let topic = value
            .get("topic")
            .and_then(Value::as_str)
            .map(ToString::to_string);
        let actions = value
            .get("actions")
            .and_then(Value::as_array)
            .map(|actions| actions.iter().map(PlanAction::from_value).collect())
            .unwrap_or_default();

        Self {
            message,
            topic,
            actions,
        }
    }

    #[must_use]
    pub fn is_offtopic(&self) -> bool {
        self.topic
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(OFFTOPIC_TOPIC))
    }

    /// Fold all actions into one set of effects for a single chat turn.
    #[must_use]
    pub fn effects(&self) -> PlanEffects {
        let mut effects = PlanEffects::default();
        for action in &self.actions {
            match action {
                PlanAction::UpdateProfile(patch) if patch.is_empty() => {
                    tracing::debug!("Ignoring empty profile patch");
                }
                PlanAction::UpdateProfile(patch) => {
                    effects.patches.push(patch.clone());
                    effects.needs_refresh = true;
                }
                PlanAction::Recommend(recommend) => {
                    effects.overrides.absorb(recommend);
                    effects.needs_refresh = true;
                }
                PlanAction::Unknown(kind) => {
                    tracing::debug!(kind = %kind, "Ignoring unknown plan action");
                }
            }
        }
        if self.is_offtopic() {
            effects.needs_refresh = false;
            effects.overrides = RunOverrides::default();
        }
        effects
    }
}

impl PlanAction {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .trim()
            .to_ascii_uppercase();

        match kind.as_str() {
            "UPDATE_PROFILE" => {
                let patch = value
                    .get("patch")
                    .map(ProfilePatch::from_value)
                    .unwrap_or_default();
                Self::UpdateProfile(patch)
            }
            "RECOMMEND" => Self::Recommend(RecommendAction::from_value(value)),
            _ => Self::Unknown(kind),
        }
    }
}

impl RecommendAction {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut action = Self::default();

        for key in ["pin_ids", "ids"] {
            if let Some(ids) = value.get(key).and_then(Value::as_array) {
                action.pin_ids.extend(ids.iter().filter_map(id_string));
            }
        }

        if let Some(items) = value.get("items").and_then(Value::as_array) {
            for item in items {
                if let Some(id) = catalog_id(item) {
                    action.pin_ids.push(id);
                } else if let Some(external) = normalize_external(item) {
                    action.external_items.push(external);
                }
            }
        }

        if let Some(external) = normalize_external(value) {
            action.external_items.push(external);
        }

        action
    }
}

/// Everything one chat turn asks of the next recommendation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanEffects {
    pub patches: Vec<ProfilePatch>,
    pub needs_refresh: bool,
    pub overrides: RunOverrides,
}

/// Pinned catalog ids and external items for exactly one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOverrides {
    pub pin_ids: Vec<String>,
    pub external_items: Vec<RecommendationItem>,
}

impl RunOverrides {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pin_ids.is_empty() && self.external_items.is_empty()
    }

    pub fn absorb(&mut self, action: &RecommendAction) {
        for id in &action.pin_ids {
            self.push_pin(id);
        }
        for item in &action.external_items {
            if !self
                .external_items
                .iter()
                .any(|existing| existing.identity() == item.identity())
            {
                self.external_items.push(item.clone());
            }
        }
    }

    pub fn push_pin(&mut self, id: &str) {
        let id = id.trim();
        if !id.is_empty() && !self.pin_ids.iter().any(|p| p == id) {
            self.pin_ids.push(id.to_string());
        }
    }
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A plain string, or any object with a non-empty `id` or `bike_id`, is a catalog pin.
fn catalog_id(value: &Value) -> Option<String> {
    match value {
        Value::String(_) | Value::Number(_) => id_string(value),
        Value::Object(map) => ["id", "bike_id"]
            .iter()
            .find_map(|key| map.get(*key).and_then(id_string)),
        _ => None,
    }
}

fn lookup<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    let object = value.as_object()?;
    let nested: Vec<&Map<String, Value>> = NESTED_KEYS
        .iter()
        .filter_map(|k| object.get(*k).and_then(Value::as_object))
        .collect();

    keys.iter().find_map(|key| {
        object
            .get(*key)
            .filter(|v| !v.is_null())
            .or_else(|| nested.iter().find_map(|m| m.get(*key).filter(|v| !v.is_null())))
    })
}

fn lookup_str(value: &Value, keys: &[&str]) -> Option<String> {
    lookup(value, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

fn lookup_u32(value: &Value, keys: &[&str]) -> Option<u32> {
    lookup(value, keys)
        .and_then(coerce_number)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.round() as u32)
}

/// Split a known manufacturer off the front of a model string.
#[must_use]
pub fn split_brand(model: &str) -> Option<(&'static str, String)> {
    let trimmed = model.trim();
    let lower = trimmed.to_ascii_lowercase();
    KNOWN_BRANDS.iter().find_map(|brand| {
        let prefix = brand.to_ascii_lowercase();
        let rest = lower.strip_prefix(&prefix)?;
        if !rest.is_empty() && !rest.starts_with(' ') {
            return None;
        }
        let model = trimmed[brand.len()..].trim();
        if model.is_empty() {
            None
        } else {
            Some((*brand, model.to_string()))
        }
    })
}

fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Turn a free-form bike description into a non-catalog recommendation item.
///
/// Returns `None` when no model or name can be found.
#[must_use]
pub fn normalize_external(value: &Value) -> Option<RecommendationItem> {
    let raw_model = lookup_str(value, &["model", "name", "title"])?;
    let mut brand = lookup_str(value, &["brand", "make", "manufacturer"]);

    let model = match split_brand(&raw_model) {
        Some((found, rest)) if brand.is_none() => {
            brand = Some(found.to_string());
            rest
        }
        Some((found, rest)) if brand.as_deref().is_some_and(|b| b.eq_ignore_ascii_case(found)) => {
            rest
        }
        _ => raw_model,
    };

    let full_name = match &brand {
        Some(b) => format!("{b} {model}"),
        None => model.clone(),
    };

    let mut reasons = Vec::new();
    for key in ["description", "notes", "reason"] {
        if let Some(text) = lookup_str(value, &[key]) {
            reasons.push(text);
        }
    }
    if let Some(list) = lookup(value, &["reasons"]).and_then(Value::as_array) {
        reasons.extend(
            list.iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string),
        );
    }

    let seat_height_mm = lookup_u32(value, &["seat_height_mm"])
        .or_else(|| lookup_u32(value, &["seat_height_cm"]).map(|cm| cm * 10));

    let abs = lookup(value, &["abs"]).and_then(Value::as_bool);

    Some(RecommendationItem {
        id: Some(format!("ext_{}", slug(&full_name))),
        bike_id: None,
        name: model,
        manufacturer: brand,
        category: lookup_str(value, &["category", "type_tag", "bike_type", "style"]),
        engine_cc: lookup_u32(value, &["engine_cc", "cc", "displacement", "engine"]),
        seat_height_mm,
        wet_weight_kg: lookup_u32(value, &["wet_weight_kg", "weight_kg", "weight"]),
        abs,
        top_speed_mph: lookup_u32(value, &["top_speed_mph", "top_speed"]),
        zero_to_sixty_s: lookup(value, &["zero_to_sixty_s", "zero_to_60_s"])
            .and_then(coerce_number)
            .map(|n| n as f32),
        msrp_usd: lookup_u32(value, &["msrp_usd", "msrp", "price_usd"]),
        reasons,
        official_url: lookup_str(value, &["official_url", "url", "link"]),
        mfr_domain: lookup_str(value, &["mfr_domain", "domain"]),
        local_image: None,
        image_query: Some(lookup_str(value, &["image_query"]).unwrap_or(full_name)),
        image_url: None,
        external: true,
    })
}
