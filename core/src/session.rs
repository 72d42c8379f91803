//! Typed view over [`SessionStorage`] using the canonical key schema.
//!
//! Reads never fail: missing or malformed values fall back to defaults with a
//! warning. Writes return [`StorageError`] so callers can surface them.

use rideready_types::{History, Profile, Snapshot};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::{SessionStorage, StorageError};

pub mod keys {
    pub const BOOT_ID: &str = "rr.boot_id";
    pub const PROFILE: &str = "rr.profile";
    pub const HISTORY: &str = "rr.history";
    pub const ABS_WARNED: &str = "rr.abs_warned";
    pub const MSRP_WARNED: &str = "rr.msrp_warned";
    pub const COMMON_BIAS_USED: &str = "rr.common_bias_used";
}

const FLAG_SET: &str = "1";

/// Once-per-session markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flag {
    AbsWarned,
    MsrpWarned,
    CommonBiasUsed,
}

impl Flag {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Flag::AbsWarned => keys::ABS_WARNED,
            Flag::MsrpWarned => keys::MSRP_WARNED,
            Flag::CommonBiasUsed => keys::COMMON_BIAS_USED,
        }
    }
}

/// Everything restored by [`Session::load`].
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSession {
    pub profile: Profile,
    pub history: History,
}

pub struct Session {
    storage: Box<dyn SessionStorage>,
    history_cap: usize,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("history_cap", &self.history_cap)
            .finish_non_exhaustive()
    }
}

impl Session {
    #[must_use]
    pub fn new(storage: Box<dyn SessionStorage>, history_cap: usize) -> Self {
        Self {
            storage,
            history_cap: history_cap.max(1),
        }
    }

    #[must_use]
    pub fn history_cap(&self) -> usize {
        self.history_cap
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.storage.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, "Ignoring malformed session value: {e}");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(value)?;
        self.storage.set(key, encoded)
    }

    /// Reset storage if `boot_id` differs from the stored one.
    ///
    /// Returns `true` when a reset happened (including the first ever load).
    pub fn bootstrap(&mut self, boot_id: &str) -> Result<bool, StorageError> {
        let stored = self.storage.get(keys::BOOT_ID);
        if stored.as_deref() == Some(boot_id) {
            return Ok(false);
        }
        tracing::info!(
            previous = stored.as_deref().unwrap_or("<none>"),
            current = boot_id,
            "New backend boot observed; resetting session"
        );
        self.storage.clear()?;
        self.storage.set(keys::BOOT_ID, boot_id.to_string())?;
        Ok(true)
    }

    #[must_use]
    pub fn boot_id(&self) -> Option<String> {
        self.storage.get(keys::BOOT_ID)
    }

    #[must_use]
    pub fn load(&self) -> LoadedSession {
        LoadedSession {
            profile: self.load_profile(),
            history: self.load_history(),
        }
    }

    #[must_use]
    pub fn load_profile(&self) -> Profile {
        self.read_json(keys::PROFILE).unwrap_or_default()
    }

    pub fn save_profile(&mut self, profile: &Profile) -> Result<(), StorageError> {
        self.write_json(keys::PROFILE, profile)
    }

    #[must_use]
    pub fn load_history(&self) -> History {
        let snapshots: Vec<Snapshot> = self.read_json(keys::HISTORY).unwrap_or_default();
        History::from_snapshots(snapshots, self.history_cap)
    }

    pub fn save_history(&mut self, history: &History) -> Result<(), StorageError> {
        self.write_json(keys::HISTORY, history)
    }

    #[must_use]
    pub fn flag(&self, flag: Flag) -> bool {
        self.storage.get(flag.key()).as_deref() == Some(FLAG_SET)
    }

    pub fn set_flag(&mut self, flag: Flag) -> Result<(), StorageError> {
        self.storage.set(flag.key(), FLAG_SET.to_string())
    }
}
