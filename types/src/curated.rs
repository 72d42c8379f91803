//! Curated "common" bikes that bias the first run of a session.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::item::RecommendationItem;

const DEFAULT_GLOBAL: &[&str] = &["yamaha_r3", "kawasaki_ninja_400", "honda_rebel_500"];

const DEFAULT_BY_TYPE: &[(&str, &[&str])] = &[
    ("sportbike", &["yamaha_r3", "kawasaki_ninja_400", "honda_cbr500r"]),
    ("naked", &["yamaha_mt03", "kawasaki_z400", "honda_cb500f"]),
    ("standard", &["honda_cb500f", "yamaha_mt03", "kawasaki_z400"]),
    (
        "cruiser",
        &["honda_rebel_500", "kawasaki_vulcan_s", "royal_enfield_meteor_350"],
    ),
    (
        "adv",
        &["honda_crf300l", "kawasaki_versys_x300", "royal_enfield_himalayan"],
    ),
    (
        "dual-sport",
        &["honda_crf300l", "kawasaki_versys_x300", "royal_enfield_himalayan"],
    ),
];

/// Hand-picked catalog ids per bike type, plus a global fallback list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuratedLists {
    pub global: Vec<String>,
    pub by_type: BTreeMap<String, Vec<String>>,
}

impl Default for CuratedLists {
    fn default() -> Self {
        Self {
            global: DEFAULT_GLOBAL.iter().map(ToString::to_string).collect(),
            by_type: DEFAULT_BY_TYPE
                .iter()
                .map(|(tag, ids)| {
                    (
                        (*tag).to_string(),
                        ids.iter().map(ToString::to_string).collect(),
                    )
                })
                .collect(),
        }
    }
}

impl CuratedLists {
    /// Curated ids for the selected bike types, deduplicated in order.
    ///
    /// Types without a list contribute nothing; if no selected type has a
    /// list (or none are selected), the global list is used.
    #[must_use]
    pub fn ids_for(&self, bike_types: &BTreeSet<String>) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for tag in bike_types {
            let Some(list) = self.by_type.get(tag.as_str()) else {
                continue;
            };
            for id in list {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        if ids.is_empty() {
            ids = self.global.clone();
            ids.dedup();
        }
        ids
    }

    /// Curated ids sent as pins on a first run: at most `k`.
    #[must_use]
    pub fn first_run_pins(&self, bike_types: &BTreeSet<String>, k: usize) -> Vec<String> {
        let mut ids = self.ids_for(bike_types);
        ids.truncate(k);
        ids
    }
}

fn matches_id(item: &RecommendationItem, id: &str) -> bool {
    [item.id.as_deref(), item.bike_id.as_deref()]
        .into_iter()
        .flatten()
        .any(|candidate| candidate.trim() == id)
}

/// Reorder a first run's results to prefer the given ids.
///
/// Items matching a preferred id come first, in that order, up to `k`; the
/// remaining ranked items backfill in their original order; the result is
/// truncated to `k`.
#[must_use]
pub fn apply_first_run_bias(
    items: Vec<RecommendationItem>,
    preferred_ids: &[String],
    k: usize,
) -> Vec<RecommendationItem> {
    let mut remaining: Vec<Option<RecommendationItem>> = items.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(k);

    for id in preferred_ids {
        if ordered.len() >= k {
            break;
        }
        let found = remaining
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(|item| matches_id(item, id)));
        if let Some(item) = found.and_then(Option::take) {
            ordered.push(item);
        }
    }

    ordered.extend(remaining.into_iter().flatten());
    ordered.truncate(k);
    ordered
}
