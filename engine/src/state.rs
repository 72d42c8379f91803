//! In-flight operation state.

use rideready_client::{ApiError, RecommendRequest};
use rideready_types::{ChatPlan, Profile, RecommendationItem, RunOverrides};
use tokio::task::JoinHandle;

/// Who asked for a run; decides where its outcome is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOrigin {
    User,
    Chat,
}

/// Everything a run needs, computed up front from the current state.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub profile: Profile,
    pub request: RecommendRequest,
    /// First run of the session: the curated bias applies.
    pub first_run: bool,
    /// Chat-override ids, then curated ids, in the order the bias prefers them.
    pub preferred_ids: Vec<String>,
    pub origin: RunOrigin,
}

impl PreparedRun {
    #[must_use]
    pub fn k(&self) -> usize {
        self.profile.k() as usize
    }
}

pub type RunResult = Result<Vec<RecommendationItem>, ApiError>;

#[derive(Debug)]
pub struct RunTask {
    pub(crate) prepared: PreparedRun,
    pub(crate) handle: JoinHandle<RunResult>,
}

#[derive(Debug, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running(RunTask),
}

impl RunState {
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running(_))
    }

    /// Skeleton count while running.
    #[must_use]
    pub fn pending_k(&self) -> Option<usize> {
        match self {
            RunState::Running(task) => Some(task.prepared.k()),
            RunState::Idle => None,
        }
    }
}

/// A chat turn spans the planner call and, optionally, one run.
#[derive(Debug, Default)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingPlan(JoinHandle<Result<ChatPlan, ApiError>>),
    /// Plan applied; its run waits for the current user run to finish.
    QueuedRun(RunOverrides),
    /// Plan applied; its run is the active [`RunState::Running`].
    AwaitingRun,
}

impl ChatState {
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !matches!(self, ChatState::Idle)
    }
}
