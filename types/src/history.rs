//! Session history of recommendation runs.
//!
//! `History` owns the snapshots (newest first, capped) and derives the two
//! views the recommendations page shows: the deduplicated "latest per bike"
//! list and the full timeline.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::RecommendationItem;
use crate::profile::Profile;

pub const DEFAULT_HISTORY_CAP: usize = 10;

pub const EMPTY_HISTORY_MESSAGE: &str =
    "No recommendations yet. Fill in your profile and run the advisor.";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SnapshotId(String);

impl SnapshotId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SnapshotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One completed recommendation run. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    id: SnapshotId,
    created_at: DateTime<Utc>,
    profile: Profile,
    #[serde(default)]
    items: Vec<RecommendationItem>,
}

impl Snapshot {
    #[must_use]
    pub fn new(
        id: SnapshotId,
        created_at: DateTime<Utc>,
        profile: Profile,
        items: Vec<RecommendationItem>,
    ) -> Self {
        Self {
            id,
            created_at,
            profile,
            items,
        }
    }

    #[must_use]
    pub fn id(&self) -> &SnapshotId {
        &self.id
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn items(&self) -> &[RecommendationItem] {
        &self.items
    }

    #[must_use]
    pub fn has_non_abs_item(&self) -> bool {
        self.items.iter().any(RecommendationItem::lacks_abs)
    }
}

/// Snapshots newest first, never longer than `cap`.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    snapshots: Vec<Snapshot>,
    cap: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAP)
    }
}

impl Serialize for History {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshots.serialize(serializer)
    }
}

impl History {
    #[must_use]
    pub fn new(cap: usize) -> Self {
        Self {
            snapshots: Vec::new(),
            cap: cap.max(1),
        }
    }

    /// Rebuild from persisted snapshots in any order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<Snapshot>, cap: usize) -> Self {
        let cap = cap.max(1);
        snapshots.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        snapshots.truncate(cap);
        Self { snapshots, cap }
    }

    #[must_use]
    pub fn cap(&self) -> usize {
        self.cap
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    /// Prepend a snapshot and drop the oldest beyond the cap.
    /// Returns how many snapshots were evicted.
    pub fn push(&mut self, snapshot: Snapshot) -> usize {
        self.snapshots.insert(0, snapshot);
        let evicted = self.snapshots.len().saturating_sub(self.cap);
        self.snapshots.truncate(self.cap);
        evicted
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    /// Every snapshot, newest first.
    #[must_use]
    pub fn timeline(&self) -> &[Snapshot] {
        &self.snapshots
    }

    /// Latest recommendation per item identity.
    ///
    /// Snapshots are walked newest first and items in their per-run order;
    /// the first occurrence of each identity wins.
    #[must_use]
    pub fn visible_items(&self) -> Vec<&RecommendationItem> {
        let mut ordered: Vec<&Snapshot> = self.snapshots.iter().collect();
        ordered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut seen = HashSet::new();
        ordered
            .into_iter()
            .flat_map(|snapshot| snapshot.items.iter())
            .filter(|&item| seen.insert(item.identity()))
            .collect()
    }
}
