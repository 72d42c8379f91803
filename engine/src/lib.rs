//! Application state machine and orchestration for RideReady.
//!
//! The [`App`] owns the whole session: profile, history, view routing, the
//! chat transcript, the open modal, and any in-flight network work. The TUI
//! reads state from it and forwards input back; no rendering lives here.
//!
//! Network work comes in two flavours sharing the same bookkeeping:
//!
//! - `start_run` / `submit_chat` spawn tasks that [`App::tick`] polls, so the
//!   frame loop never blocks.
//! - [`App::run_and_save`] / [`App::chat_turn`] await the same steps inline.

mod app;
mod images;
mod opener;
mod state;

use rideready_client::ApiError;
use rideready_types::SnapshotId;
use thiserror::Error;

pub use app::{App, FormState};
pub use images::resolve_images;
pub use opener::{LinkOpener, RecordingOpener, SystemOpener, validate_link};
pub use state::{PreparedRun, RunOrigin};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunError {
    #[error("a recommendation run is already in progress")]
    InFlight,
    #[error("{0}")]
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRejection {
    Empty,
    Busy,
}

/// What one chat turn did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatTurnOutcome {
    Rejected(ChatRejection),
    /// The planner call failed; one generic error bubble was added.
    NetworkError,
    Replied {
        profile_updated: bool,
        /// Present when the plan asked for a refresh.
        run: Option<Result<SnapshotId, RunError>>,
    },
}
