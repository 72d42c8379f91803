//! Rider profile: the parameters every recommendation request is built from.
//!
//! All numeric fields are clamped to their bounds on construction, on
//! deserialization, and after every patch, so a `Profile` value is always
//! within range.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::numeric::coerce_number;

pub const HEIGHT_CM_RANGE: RangeInclusive<u32> = 140..=210;
pub const BUDGET_USD_RANGE: RangeInclusive<u32> = 1_000..=20_000;
pub const K_RANGE: RangeInclusive<u32> = 1..=6;

pub const DEFAULT_HEIGHT_CM: u32 = 170;
pub const DEFAULT_BUDGET_USD: u32 = 6_000;
pub const DEFAULT_K: u32 = 3;

/// Bike type tags offered by the advisor form.
pub const KNOWN_BIKE_TYPES: &[&str] = &[
    "sportbike",
    "naked",
    "standard",
    "cruiser",
    "adv",
    "dual-sport",
    "touring",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Experience {
    #[default]
    NoExperience,
    #[serde(alias = "little_experience")]
    SomeExperience,
}

impl Experience {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoExperience => "no_experience",
            Self::SomeExperience => "some_experience",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoExperience => "New rider",
            Self::SomeExperience => "Some experience",
        }
    }

    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::NoExperience => Self::SomeExperience,
            Self::SomeExperience => Self::NoExperience,
        }
    }

    /// Parse the wire spelling, accepting the legacy `little_experience`
    /// and a few free-form spellings the chat planner produces.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace([' ', '-'], "_").as_str() {
            "no_experience" | "none" | "beginner" | "new" => Some(Self::NoExperience),
            "some_experience" | "little_experience" | "some" | "intermediate" => {
                Some(Self::SomeExperience)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
struct RawProfile {
    #[serde(default)]
    experience: Experience,
    #[serde(default = "default_height")]
    height_cm: u32,
    #[serde(default = "default_budget")]
    budget_usd: u32,
    #[serde(default)]
    bike_types: BTreeSet<String>,
    #[serde(default = "default_k")]
    k: u32,
}

const fn default_height() -> u32 {
    DEFAULT_HEIGHT_CM
}

const fn default_budget() -> u32 {
    DEFAULT_BUDGET_USD
}

const fn default_k() -> u32 {
    DEFAULT_K
}

/// Rider-entered preferences. An empty `bike_types` set means "any type".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawProfile")]
pub struct Profile {
    experience: Experience,
    height_cm: u32,
    budget_usd: u32,
    bike_types: BTreeSet<String>,
    k: u32,
}

impl From<RawProfile> for Profile {
    fn from(raw: RawProfile) -> Self {
        Self::new(
            raw.experience,
            raw.height_cm,
            raw.budget_usd,
            raw.bike_types,
            raw.k,
        )
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            experience: Experience::default(),
            height_cm: DEFAULT_HEIGHT_CM,
            budget_usd: DEFAULT_BUDGET_USD,
            bike_types: BTreeSet::new(),
            k: DEFAULT_K,
        }
    }
}

fn clamp(value: u32, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(*range.start(), *range.end())
}

fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim().to_ascii_lowercase();
    if tag.is_empty() { None } else { Some(tag) }
}

impl Profile {
    #[must_use]
    pub fn new(
        experience: Experience,
        height_cm: u32,
        budget_usd: u32,
        bike_types: impl IntoIterator<Item = String>,
        k: u32,
    ) -> Self {
        Self {
            experience,
            height_cm: clamp(height_cm, &HEIGHT_CM_RANGE),
            budget_usd: clamp(budget_usd, &BUDGET_USD_RANGE),
            bike_types: bike_types
                .into_iter()
                .filter_map(|t| normalize_tag(&t))
                .collect(),
            k: clamp(k, &K_RANGE),
        }
    }

    #[must_use]
    pub fn experience(&self) -> Experience {
        self.experience
    }

    #[must_use]
    pub fn height_cm(&self) -> u32 {
        self.height_cm
    }

    #[must_use]
    pub fn budget_usd(&self) -> u32 {
        self.budget_usd
    }

    #[must_use]
    pub fn bike_types(&self) -> &BTreeSet<String> {
        &self.bike_types
    }

    #[must_use]
    pub fn k(&self) -> u32 {
        self.k
    }

    pub fn set_experience(&mut self, experience: Experience) {
        self.experience = experience;
    }

    pub fn set_height_cm(&mut self, height_cm: u32) {
        self.height_cm = clamp(height_cm, &HEIGHT_CM_RANGE);
    }

    pub fn set_budget_usd(&mut self, budget_usd: u32) {
        self.budget_usd = clamp(budget_usd, &BUDGET_USD_RANGE);
    }

    pub fn set_k(&mut self, k: u32) {
        self.k = clamp(k, &K_RANGE);
    }

    /// Toggle a bike type tag; returns whether the tag is now selected.
    pub fn toggle_bike_type(&mut self, tag: &str) -> bool {
        let Some(tag) = normalize_tag(tag) else {
            return false;
        };
        if self.bike_types.remove(&tag) {
            false
        } else {
            self.bike_types.insert(tag);
            true
        }
    }

    pub fn set_bike_types(&mut self, tags: impl IntoIterator<Item = String>) {
        self.bike_types = tags.into_iter().filter_map(|t| normalize_tag(&t)).collect();
    }

    /// Merge a partial patch. Absent patch fields leave the profile unchanged.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) {
        if let Some(experience) = patch.experience {
            self.experience = experience;
        }
        if let Some(height) = patch.height_cm {
            self.set_height_cm(height);
        }
        if let Some(budget) = patch.budget_usd {
            self.set_budget_usd(budget);
        }
        if let Some(types) = &patch.bike_types {
            self.set_bike_types(types.iter().cloned());
        }
        if let Some(k) = patch.k {
            self.set_k(k);
        }
    }

    /// One-line summary used by the timeline and status bar.
    #[must_use]
    pub fn summary(&self) -> String {
        let types = if self.bike_types.is_empty() {
            "any type".to_string()
        } else {
            self.bike_types
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} · {} cm · {} · {} · top {}",
            self.experience.label(),
            self.height_cm,
            format_usd(self.budget_usd),
            types,
            self.k
        )
    }
}

/// Format whole dollars with thousands separators (`$6,000`).
#[must_use]
pub fn format_usd(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    format!("${out}")
}

/// Partial profile produced by an `UPDATE_PROFILE` chat action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfilePatch {
    pub experience: Option<Experience>,
    pub height_cm: Option<u32>,
    pub budget_usd: Option<u32>,
    pub bike_types: Option<Vec<String>>,
    pub k: Option<u32>,
}

impl ProfilePatch {
    /// Parse a patch leniently: numbers may arrive as numeric-looking strings,
    /// `bike_types` may be a single string, unknown keys are ignored.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Some(map) = value.as_object() else {
            return Self::default();
        };

        let mut patch = Self::default();
        for (key, raw) in map {
            match key.as_str() {
                "experience" | "experience_level" => {
                    patch.experience = raw.as_str().and_then(Experience::parse);
                }
                "height_cm" | "height" => patch.height_cm = coerce_u32(raw),
                "budget_usd" | "budget" | "max_price" => patch.budget_usd = coerce_u32(raw),
                "k" | "count" => patch.k = coerce_u32(raw),
                "bike_types" | "bike_type" | "category" => {
                    patch.bike_types = match raw {
                        Value::String(s) => Some(vec![s.clone()]),
                        Value::Array(values) => Some(
                            values
                                .iter()
                                .filter_map(|v| v.as_str().map(ToString::to_string))
                                .collect(),
                        ),
                        Value::Null => Some(Vec::new()),
                        _ => None,
                    };
                }
                other => tracing::debug!(key = other, "Ignoring unknown profile patch field"),
            }
        }
        patch
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

fn coerce_u32(value: &Value) -> Option<u32> {
    let n = coerce_number(value)?;
    if n.is_finite() && n >= 0.0 {
        Some(n.round().min(f64::from(u32::MAX)) as u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{Experience, Profile, ProfilePatch, format_usd};
    use serde_json::json;

    #[test]
    fn defaults_match_documented_values() {
        let profile = Profile::default();
        assert_eq!(profile.experience(), Experience::NoExperience);
        assert_eq!(profile.height_cm(), 170);
        assert_eq!(profile.budget_usd(), 6000);
        assert!(profile.bike_types().is_empty());
        assert_eq!(profile.k(), 3);
    }

    #[test]
    fn constructor_clamps_out_of_range_values() {
        let profile = Profile::new(Experience::SomeExperience, 100, 50_000, Vec::new(), 12);
        assert_eq!(profile.height_cm(), 140);
        assert_eq!(profile.budget_usd(), 20_000);
        assert_eq!(profile.k(), 6);

        let profile = Profile::new(Experience::NoExperience, 300, 10, Vec::new(), 0);
        assert_eq!(profile.height_cm(), 210);
        assert_eq!(profile.budget_usd(), 1_000);
        assert_eq!(profile.k(), 1);
    }

    #[test]
    fn deserialize_fills_missing_fields_and_clamps() {
        let profile: Profile = serde_json::from_value(json!({
            "height_cm": 250,
            "bike_types": ["Naked", " cruiser "]
        }))
        .unwrap();
        assert_eq!(profile.height_cm(), 210);
        assert_eq!(profile.budget_usd(), 6000);
        assert!(profile.bike_types().contains("naked"));
        assert!(profile.bike_types().contains("cruiser"));
    }

    #[test]
    fn legacy_experience_spelling_is_accepted() {
        let profile: Profile =
            serde_json::from_value(json!({ "experience": "little_experience" })).unwrap();
        assert_eq!(profile.experience(), Experience::SomeExperience);
        let wire = serde_json::to_value(&profile).unwrap();
        assert_eq!(wire["experience"], "some_experience");
    }

    #[test]
    fn patch_parses_numeric_strings_and_single_type() {
        let patch = ProfilePatch::from_value(&json!({
            "budget_usd": "8000",
            "bike_types": "sportbike",
            "engine_cc_min": 400
        }));
        assert_eq!(patch.budget_usd, Some(8000));
        assert_eq!(patch.bike_types, Some(vec!["sportbike".to_string()]));
        assert_eq!(patch.height_cm, None);
    }

    #[test]
    fn apply_patch_merges_and_clamps() {
        let mut profile = Profile::default();
        profile.toggle_bike_type("naked");
        let patch = ProfilePatch::from_value(&json!({ "budget_usd": 99_999, "k": 2 }));
        profile.apply_patch(&patch);
        assert_eq!(profile.budget_usd(), 20_000);
        assert_eq!(profile.k(), 2);
        assert!(profile.bike_types().contains("naked"));
        assert_eq!(profile.height_cm(), 170);
    }

    #[test]
    fn toggle_bike_type_round_trips() {
        let mut profile = Profile::default();
        assert!(profile.toggle_bike_type("ADV"));
        assert!(profile.bike_types().contains("adv"));
        assert!(!profile.toggle_bike_type("adv"));
        assert!(profile.bike_types().is_empty());
    }

    #[test]
    fn usd_formatting_groups_thousands() {
        assert_eq!(format_usd(6000), "$6,000");
        assert_eq!(format_usd(20_000), "$20,000");
        assert_eq!(format_usd(999), "$999");
    }

    #[test]
    fn summary_mentions_any_type_when_empty() {
        let summary = Profile::default().summary();
        assert!(summary.contains("any type"));
        assert!(summary.contains("$6,000"));
    }
}
