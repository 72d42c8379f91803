//! The [`App`] state container.

mod chat;
mod form;
mod links;
mod run;


use std::time::{Duration, Instant};

use rideready_client::{ApiClient, ApiError, Health};
use rideready_config::Settings;
use rideready_core::{
    ChatTranscript, FileStorage, MemoryStorage, Session, SessionStorage, StorageError,
    describe_api_error, describe_storage_error,
};
use rideready_types::ui::{Focus, InputHistory, ListMode, Modal, UiOptions, View};
use rideready_types::{CuratedLists, History, Profile, RecommendationItem, Snapshot};

use crate::EngineError;
use crate::opener::LinkOpener;
use crate::state::{ChatState, RunState};

pub use form::FormState;

const UI_TICK: Duration = Duration::from_millis(100);

pub struct App {
    client: ApiClient,
    session: Session,
    curated: CuratedLists,
    options: UiOptions,
    opener: Box<dyn LinkOpener>,

    profile: Profile,
    history: History,

    view: View,
    list_mode: ListMode,
    focus: Focus,
    selected: usize,
    form: FormState,
    modal: Option<Modal>,
    /// A run finished while another modal was open; check ABS once it closes.
    abs_check_pending: bool,

    run: RunState,
    chat: ChatState,
    transcript: ChatTranscript,
    chat_input: String,
    input_history: InputHistory,

    health: Option<Health>,
    list_error: Option<String>,
    status: Option<String>,

    tick: usize,
    last_tick: Instant,
    should_quit: bool,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("view", &self.view)
            .field("profile", &self.profile)
            .field("snapshots", &self.history.len())
            .field("modal", &self.modal)
            .finish_non_exhaustive()
    }
}

impl App {
    #[must_use]
    pub fn new(
        client: ApiClient,
        session: Session,
        curated: CuratedLists,
        options: UiOptions,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        let loaded = session.load();
        Self {
            client,
            session,
            curated,
            options,
            opener,
            form: FormState::new(loaded.profile.clone()),
            profile: loaded.profile,
            history: loaded.history,
            view: View::Home,
            list_mode: ListMode::Cards,
            focus: Focus::List,
            selected: 0,
            modal: None,
            abs_check_pending: false,
            run: RunState::Idle,
            chat: ChatState::Idle,
            transcript: ChatTranscript::default(),
            chat_input: String::new(),
            input_history: InputHistory::default(),
            health: None,
            list_error: None,
            status: None,
            tick: 0,
            last_tick: Instant::now(),
            should_quit: false,
        }
    }

    /// Build from resolved settings. A session directory that cannot be
    /// opened degrades to in-memory storage.
    pub fn from_settings(settings: &Settings, opener: Box<dyn LinkOpener>) -> Result<Self, EngineError> {
        let client = ApiClient::new(
            &settings.base_url,
            settings.timeout,
            settings.connect_timeout,
        )?;

        let (storage, warning): (Box<dyn SessionStorage>, _) =
            match FileStorage::open(&settings.session_dir) {
                Ok(storage) => (Box::new(storage), None),
                Err(e) => {
                    tracing::warn!("Session storage unavailable, using memory: {e}");
                    (
                        Box::new(MemoryStorage::new()),
                        Some(describe_storage_error(&e)),
                    )
                }
            };

        let session = Session::new(storage, settings.history_cap);
        let mut app = Self::new(
            client,
            session,
            settings.curated.clone(),
            settings.ui,
            opener,
        );
        app.status = warning;
        Ok(app)
    }

    /// Check the backend and reconcile the session with its boot id.
    pub async fn startup(&mut self) {
        let result = self.client.health().await;
        self.apply_health(result);
    }

    /// Bootstrapping: a new boot id wipes the session; an unreachable
    /// server leaves stored state alone.
    pub fn apply_health(&mut self, result: Result<Health, ApiError>) {
        match result {
            Ok(health) => {
                match self.session.bootstrap(health.boot_id()) {
                    Ok(true) => {
                        self.reload_session();
                        self.transcript.clear();
                        tracing::info!(boot_id = health.boot_id(), "Session reset for new boot");
                    }
                    Ok(false) => {}
                    Err(e) => {
                        tracing::warn!("Session bootstrap failed: {e}");
                        self.status = Some(describe_storage_error(&e));
                    }
                }
                if health.offline_mode {
                    self.status = Some("Advisor server is running in offline mode.".to_string());
                }
                self.health = Some(health);
            }
            Err(e) => {
                tracing::warn!("Health check failed; keeping stored session: {e}");
                self.status = Some(format!("Health check failed. {}", describe_api_error(&e)));
                self.health = None;
            }
        }
    }

    /// Rebuild profile, history and form from storage.
    pub fn reload_session(&mut self) {
        let loaded = self.session.load();
        self.form = FormState::new(loaded.profile.clone());
        self.profile = loaded.profile;
        self.history = loaded.history;
        self.selected = 0;
        self.list_error = None;
    }

    pub fn tick(&mut self) {
        self.poll_run();
        self.poll_chat();

        let now = Instant::now();
        if now.duration_since(self.last_tick) >= UI_TICK {
            self.last_tick = now;
            self.tick = self.tick.wrapping_add(1);
        }
    }

    // ------------------------------------------------------------------
    // Read access for rendering
    // ------------------------------------------------------------------

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn visible_items(&self) -> Vec<&RecommendationItem> {
        self.history.visible_items()
    }

    #[must_use]
    pub fn timeline(&self) -> &[Snapshot] {
        self.history.timeline()
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.view
    }

    #[must_use]
    pub fn list_mode(&self) -> ListMode {
        self.list_mode
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn form(&self) -> &FormState {
        &self.form
    }

    #[must_use]
    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run.is_running()
    }

    /// Number of skeleton cards to draw while a run is in flight.
    #[must_use]
    pub fn pending_k(&self) -> Option<usize> {
        self.run.pending_k()
    }

    #[must_use]
    pub fn chat_busy(&self) -> bool {
        self.chat.is_busy()
    }

    #[must_use]
    pub fn transcript(&self) -> &ChatTranscript {
        &self.transcript
    }

    #[must_use]
    pub fn chat_input(&self) -> &str {
        &self.chat_input
    }

    #[must_use]
    pub fn health(&self) -> Option<&Health> {
        self.health.as_ref()
    }

    #[must_use]
    pub fn list_error(&self) -> Option<&str> {
        self.list_error.as_deref()
    }

    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    #[must_use]
    pub fn options(&self) -> UiOptions {
        self.options
    }

    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.tick
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn server_url(&self) -> &str {
        self.client.base_url().as_str()
    }

    // ------------------------------------------------------------------
    // Navigation and simple UI state
    // ------------------------------------------------------------------

    pub fn request_quit(&mut self) {
        self.should_quit = true;
    }

    pub fn navigate(&mut self, view: View) {
        if self.view != view {
            tracing::debug!(from = self.view.route(), to = view.route(), "Navigate");
        }
        if view == View::Advisor {
            self.form.reset_draft(self.profile.clone());
        }
        self.view = view;
        self.focus = Focus::List;
    }

    /// Navigate by route string; unknown routes are ignored.
    pub fn navigate_route(&mut self, route: &str) -> bool {
        match View::from_route(route) {
            Some(view) => {
                self.navigate(view);
                true
            }
            None => false,
        }
    }

    pub fn toggle_list_mode(&mut self) {
        self.list_mode = self.list_mode.toggle();
        self.selected = 0;
    }

    fn list_len(&self) -> usize {
        match self.list_mode {
            ListMode::Cards => self.history.visible_items().len(),
            ListMode::Timeline => self.history.len(),
        }
    }

    pub fn select_next(&mut self) {
        let len = self.list_len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn focus_chat(&mut self) {
        self.focus = Focus::Chat;
    }

    pub fn focus_list(&mut self) {
        self.focus = Focus::List;
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ------------------------------------------------------------------
    // Chat input editing
    // ------------------------------------------------------------------

    pub fn chat_input_push(&mut self, ch: char) {
        if !ch.is_control() {
            self.chat_input.push(ch);
        }
    }

    pub fn chat_input_backspace(&mut self) {
        self.chat_input.pop();
    }

    pub fn chat_history_up(&mut self) {
        if let rideready_types::ui::NavOutcome::Moved(text) = self.input_history.up(&self.chat_input) {
            self.chat_input = text;
        }
    }

    pub fn chat_history_down(&mut self) {
        if let rideready_types::ui::NavOutcome::Moved(text) = self.input_history.down() {
            self.chat_input = text;
        }
    }

    // ------------------------------------------------------------------
    // Persistence helpers
    // ------------------------------------------------------------------

    fn report_storage(&mut self, what: &str, result: Result<(), StorageError>) {
        if let Err(e) = result {
            tracing::warn!(what, "Failed to persist session data: {e}");
            self.status = Some(describe_storage_error(&e));
        }
    }

    fn persist_profile(&mut self) {
        let result = self.session.save_profile(&self.profile);
        self.report_storage("profile", result);
    }

    fn persist_history(&mut self) {
        let result = self.session.save_history(&self.history);
        self.report_storage("history", result);
    }
}
