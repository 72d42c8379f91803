//! Chat turns: send the message, apply the returned plan, maybe run.

use rideready_client::{ApiClient, ApiError, ChatRequest};
use rideready_core::{CHAT_NETWORK_ERROR, ChatEntry};
use rideready_types::{ChatPlan, Profile, RunOverrides, sanitize_terminal_text};

use super::App;
use crate::state::{ChatState, RunOrigin};
use crate::{ChatRejection, ChatTurnOutcome, RunError};

const OFFTOPIC_REPLY: &str = "I can only help with picking a motorcycle.";
const REFRESH_REPLY: &str = "Updating your recommendations.";
const EMPTY_REPLY: &str = "Okay.";
const QUEUED_STATUS: &str = "Waiting for the current update to finish.";

async fn fetch_plan(client: ApiClient, message: String, profile: Profile) -> Result<ChatPlan, ApiError> {
    client
        .chat(&ChatRequest {
            message: &message,
            profile: &profile,
        })
        .await
}

impl App {
    /// Send the chat input box. The box is cleared only when accepted.
    pub fn submit_chat(&mut self) -> Result<(), ChatRejection> {
        let raw = self.chat_input.clone();
        let message = self.begin_chat(&raw)?;
        self.chat_input.clear();
        let handle = tokio::spawn(fetch_plan(self.client.clone(), message, self.profile.clone()));
        self.chat = ChatState::AwaitingPlan(handle);
        Ok(())
    }

    /// Validate a message and record it in the transcript.
    fn begin_chat(&mut self, raw: &str) -> Result<String, ChatRejection> {
        let message = raw.trim();
        if message.is_empty() {
            return Err(ChatRejection::Empty);
        }
        if self.chat.is_busy() {
            self.status = Some("Still working on your last message.".to_string());
            return Err(ChatRejection::Busy);
        }
        self.input_history.push(message);
        self.transcript.push(ChatEntry::User(message.to_string()));
        tracing::debug!(chars = message.chars().count(), "Chat message sent");
        Ok(message.to_string())
    }

    /// Apply a plan (or its failure) to profile and transcript.
    ///
    /// Returns whether the profile changed, and the overrides for the
    /// follow-up run when the plan asks for one.
    fn apply_plan(&mut self, result: Result<ChatPlan, ApiError>) -> (bool, Option<RunOverrides>) {
        let plan = match result {
            Ok(plan) => plan,
            Err(e) => {
                tracing::warn!("Chat request failed: {e}");
                self.transcript.push(ChatEntry::Error(CHAT_NETWORK_ERROR.to_string()));
                return (false, None);
            }
        };

        let effects = plan.effects();
        let profile_updated = !effects.patches.is_empty();
        if profile_updated {
            for patch in &effects.patches {
                self.profile.apply_patch(patch);
            }
            self.persist_profile();
            self.form.reset_draft(self.profile.clone());
            tracing::info!(profile = %self.profile.summary(), "Profile updated from chat");
        }

        let text = match plan.message.as_deref() {
            Some(message) => sanitize_terminal_text(message).into_owned(),
            None if plan.is_offtopic() => OFFTOPIC_REPLY.to_string(),
            None if effects.needs_refresh => REFRESH_REPLY.to_string(),
            None => EMPTY_REPLY.to_string(),
        };
        self.transcript.push(ChatEntry::Assistant {
            text,
            cards: Vec::new(),
        });

        let run = effects.needs_refresh.then_some(effects.overrides);
        (profile_updated, run)
    }

    /// Start the plan's run now, or queue it behind a run already in flight.
    fn schedule_chat_run(&mut self, overrides: RunOverrides) {
        if self.run.is_running() {
            self.queue_chat_run(overrides);
            return;
        }
        let prepared = self.prepare_run(overrides, RunOrigin::Chat);
        self.spawn_run(prepared);
        self.chat = ChatState::AwaitingRun;
    }

    fn queue_chat_run(&mut self, overrides: RunOverrides) {
        tracing::debug!("Chat run queued behind in-flight run");
        self.transcript.push(ChatEntry::Status(QUEUED_STATUS.to_string()));
        self.chat = ChatState::QueuedRun(overrides);
    }

    pub(crate) fn poll_chat(&mut self) {
        use futures_util::future::FutureExt;

        let finished = match &self.chat {
            ChatState::AwaitingPlan(handle) => handle.is_finished(),
            _ => return,
        };
        if !finished {
            return;
        }
        let ChatState::AwaitingPlan(handle) = std::mem::replace(&mut self.chat, ChatState::Idle)
        else {
            return;
        };

        let result = match handle.now_or_never() {
            Some(Ok(result)) => result,
            Some(Err(e)) => {
                tracing::error!("Chat task failed: {e}");
                self.transcript.push(ChatEntry::Error(CHAT_NETWORK_ERROR.to_string()));
                return;
            }
            None => return,
        };

        if let (_, Some(overrides)) = self.apply_plan(result) {
            self.schedule_chat_run(overrides);
        }
    }

    /// One chat turn awaited inline, including its follow-up run.
    ///
    /// If a spawned run is still in flight the follow-up is queued behind it
    /// and reported as [`RunError::InFlight`].
    pub async fn chat_turn(&mut self, message: &str) -> ChatTurnOutcome {
        let message = match self.begin_chat(message) {
            Ok(message) => message,
            Err(rejection) => return ChatTurnOutcome::Rejected(rejection),
        };

        let result = fetch_plan(self.client.clone(), message, self.profile.clone()).await;
        let network_error = result.is_err();
        let (profile_updated, overrides) = self.apply_plan(result);
        if network_error {
            return ChatTurnOutcome::NetworkError;
        }

        let run = match overrides {
            None => None,
            Some(overrides) if self.run.is_running() => {
                self.queue_chat_run(overrides);
                Some(Err(RunError::InFlight))
            }
            Some(overrides) => {
                let prepared = self.prepare_run(overrides, RunOrigin::Chat);
                let result = super::run::fetch_run(self.client.clone(), prepared.request.clone()).await;
                let outcome = self.finish_run(prepared, result);
                self.after_run(RunOrigin::Chat, &outcome);
                Some(outcome)
            }
        };

        ChatTurnOutcome::Replied {
            profile_updated,
            run,
        }
    }
}
