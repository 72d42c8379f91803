//! Core domain types for RideReady.
//!
//! This crate contains pure domain types with no IO and no async. Everything
//! here can be used from any layer of the application.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)]

pub mod curated;
pub mod history;
pub mod item;
mod numeric;
pub mod plan;
pub mod profile;
mod sanitize;
mod text;
pub mod ui;

pub use curated::{CuratedLists, apply_first_run_bias};
pub use history::{DEFAULT_HISTORY_CAP, EMPTY_HISTORY_MESSAGE, History, Snapshot, SnapshotId};
pub use item::{PLACEHOLDER_IMAGE_PATH, RecommendationItem};
pub use numeric::{coerce_number, parse_numeric_str};
pub use plan::{
    ChatPlan, PlanAction, PlanEffects, RecommendAction, RunOverrides, normalize_external,
};
pub use profile::{Experience, KNOWN_BIKE_TYPES, Profile, ProfilePatch, format_usd};
pub use sanitize::{sanitize_terminal_text, single_line};
pub use text::{MAX_IMAGE_FIELD_CHARS, cap_chars, truncate_with_ellipsis};
