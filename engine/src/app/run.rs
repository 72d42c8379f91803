//! Recommendation runs: prepare, fetch, bias, snapshot, persist.
//!
//! - `start_run` - user-initiated run, spawned and polled from `tick`
//! - `poll_run` - completes a finished run task
//! - `run_and_save` - the same pipeline awaited inline

use chrono::Utc;
use rideready_client::{ApiClient, RecommendRequest};
use rideready_core::{ChatEntry, Flag, describe_api_error, gate};
use rideready_types::ui::Modal;
use rideready_types::{RunOverrides, Snapshot, SnapshotId, apply_first_run_bias};
use uuid::Uuid;

use super::App;
use crate::RunError;
use crate::images::resolve_images;
use crate::state::{ChatState, PreparedRun, RunOrigin, RunResult, RunState, RunTask};

pub(super) async fn fetch_run(client: ApiClient, request: RecommendRequest) -> RunResult {
    let response = client.recommend(&request).await?;
    Ok(resolve_images(&client, response.items).await)
}

impl App {
    /// Snapshot the inputs of a run from current state.
    ///
    /// The first run of a session pins the curated ids for the selected
    /// types so the server ranks them alongside its own picks. Chat
    /// overrides rank ahead of the curated ids.
    pub(crate) fn prepare_run(&self, mut overrides: RunOverrides, origin: RunOrigin) -> PreparedRun {
        let profile = self.profile.clone();
        let first_run = self.history.is_empty() && !self.session.flag(Flag::CommonBiasUsed);
        let k = profile.k() as usize;

        let preferred_ids = if first_run {
            let mut ids: Vec<String> = overrides.pin_ids.clone();
            ids.extend(
                overrides
                    .external_items
                    .iter()
                    .map(|item| item.identity().to_string()),
            );
            for id in self.curated.ids_for(profile.bike_types()) {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            for id in self.curated.first_run_pins(profile.bike_types(), k) {
                overrides.push_pin(&id);
            }
            ids
        } else {
            Vec::new()
        };

        PreparedRun {
            request: RecommendRequest::new(&profile, overrides),
            profile,
            first_run,
            preferred_ids,
            origin,
        }
    }

    /// Start a user-initiated run. Returns false if one is already running.
    pub fn start_run(&mut self) -> bool {
        if self.run.is_running() {
            self.status = Some("Recommendations are already updating.".to_string());
            return false;
        }
        let prepared = self.prepare_run(RunOverrides::default(), RunOrigin::User);
        self.spawn_run(prepared);
        true
    }

    pub(crate) fn spawn_run(&mut self, prepared: PreparedRun) {
        tracing::info!(
            k = prepared.k(),
            first_run = prepared.first_run,
            origin = ?prepared.origin,
            "Starting recommendation run"
        );
        let handle = tokio::spawn(fetch_run(self.client.clone(), prepared.request.clone()));
        self.list_error = None;
        self.run = RunState::Running(RunTask { prepared, handle });
    }

    /// Await one full run inline. Used by the CLI one-shots and tests.
    pub async fn run_and_save(&mut self, overrides: RunOverrides) -> Result<SnapshotId, RunError> {
        if self.run.is_running() {
            return Err(RunError::InFlight);
        }
        let prepared = self.prepare_run(overrides, RunOrigin::User);
        let result = fetch_run(self.client.clone(), prepared.request.clone()).await;
        self.finish_run(prepared, result)
    }

    pub(crate) fn poll_run(&mut self) {
        use futures_util::future::FutureExt;

        let finished = match &self.run {
            RunState::Running(task) => task.handle.is_finished(),
            RunState::Idle => return,
        };
        if !finished {
            return;
        }

        let RunState::Running(RunTask { prepared, handle }) =
            std::mem::replace(&mut self.run, RunState::Idle)
        else {
            return;
        };

        let origin = prepared.origin;
        let outcome = match handle.now_or_never() {
            Some(Ok(result)) => self.finish_run(prepared, result),
            Some(Err(e)) => {
                tracing::error!("Recommendation task failed: {e}");
                let message = "Recommendation request was interrupted.".to_string();
                self.list_error = Some(message.clone());
                Err(RunError::Failed(message))
            }
            None => {
                self.list_error = Some("Recommendation request was interrupted.".to_string());
                Err(RunError::Failed("task did not complete".to_string()))
            }
        };
        self.after_run(origin, &outcome);
    }

    /// Report a finished run and start any chat run queued behind it.
    pub(crate) fn after_run(&mut self, origin: RunOrigin, outcome: &Result<SnapshotId, RunError>) {
        if origin == RunOrigin::Chat {
            if matches!(self.chat, ChatState::AwaitingRun) {
                self.chat = ChatState::Idle;
            }
            match outcome {
                Ok(_) => {
                    let items: Vec<_> = self
                        .history
                        .latest()
                        .map(|s| s.items().to_vec())
                        .unwrap_or_default();
                    self.transcript.attach_cards(&items);
                }
                Err(RunError::Failed(message)) => {
                    self.transcript.push(ChatEntry::Error(message.clone()));
                }
                Err(RunError::InFlight) => {}
            }
        }

        if matches!(self.chat, ChatState::QueuedRun(_))
            && let ChatState::QueuedRun(overrides) =
                std::mem::replace(&mut self.chat, ChatState::AwaitingRun)
        {
            let prepared = self.prepare_run(overrides, RunOrigin::Chat);
            self.spawn_run(prepared);
        }
    }

    /// Turn a fetch result into a persisted snapshot.
    pub(crate) fn finish_run(
        &mut self,
        prepared: PreparedRun,
        result: RunResult,
    ) -> Result<SnapshotId, RunError> {
        let items = match result {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Recommendation run failed: {e}");
                let message = describe_api_error(&e);
                self.list_error = Some(message.clone());
                self.status = Some(message.clone());
                return Err(RunError::Failed(message));
            }
        };

        let k = prepared.k();
        let items = if prepared.first_run {
            let biased = apply_first_run_bias(items, &prepared.preferred_ids, k);
            if let Err(e) = self.session.set_flag(Flag::CommonBiasUsed) {
                tracing::warn!("Failed to record first-run bias: {e}");
            }
            biased
        } else {
            items
        };

        let id = SnapshotId::new(Uuid::new_v4().to_string());
        let snapshot = Snapshot::new(id.clone(), Utc::now(), prepared.profile, items);
        let count = snapshot.items().len();
        let evicted = self.history.push(snapshot);
        self.persist_history();
        tracing::info!(id = id.as_str(), count, evicted, "Snapshot saved");

        self.selected = 0;
        self.list_error = None;
        if count == 0 {
            self.status = Some("No bikes matched this profile.".to_string());
        }

        if self.modal.is_some() {
            self.abs_check_pending = true;
        } else {
            self.check_abs_warning();
        }
        Ok(id)
    }

    /// Raise the ABS modal if the latest snapshot calls for it.
    pub(crate) fn check_abs_warning(&mut self) {
        self.abs_check_pending = false;
        let Some(latest) = self.history.latest().cloned() else {
            return;
        };
        match gate::abs_warning(&mut self.session, &latest) {
            Ok(true) => self.modal = Some(Modal::AbsWarning),
            Ok(false) => {}
            Err(e) => tracing::warn!("Failed to record ABS warning: {e}"),
        }
    }

    /// Empty both views. The first-run bias stays spent.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.selected = 0;
        self.list_error = None;
        self.persist_history();
        tracing::info!("History cleared");
    }
}
