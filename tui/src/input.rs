//! Input handling for the RideReady TUI.

use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing::debug;

use rideready_engine::App;
use rideready_types::ui::{Focus, Modal, View};

const INPUT_POLL_TIMEOUT: Duration = Duration::from_millis(25); // shutdown responsiveness
const INPUT_CHANNEL_CAPACITY: usize = 1024; // bounded: no OOM
const MAX_EVENTS_PER_FRAME: usize = 64; // never starve rendering

enum InputMsg {
    Event(Event),
    Error(String),
}

/// Reads terminal events on a blocking thread and hands them to the frame
/// loop through a bounded channel.
pub struct InputPump {
    rx: mpsc::Receiver<InputMsg>,
    stop: Arc<AtomicBool>,
    join: Option<tokio::task::JoinHandle<()>>,
}

impl InputPump {
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let stop = Arc::new(AtomicBool::new(false));
        let stop2 = stop.clone();

        let join = tokio::task::spawn_blocking(move || input_loop(stop2, tx));
        Self {
            rx,
            stop,
            join: Some(join),
        }
    }

    pub async fn shutdown(&mut self) {
        // Close the receiver first so a sender blocked on capacity wakes up.
        self.rx.close();

        self.stop.store(true, Ordering::Release);
        if let Some(join) = self.join.take() {
            let _ = tokio::time::timeout(Duration::from_secs(2), join).await;
        }
    }
}

impl Default for InputPump {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        // Best-effort stop if caller exits early; do not block in Drop.
        self.rx.close();
        self.stop.store(true, Ordering::Release);
    }
}

fn input_loop(stop: Arc<AtomicBool>, tx: mpsc::Sender<InputMsg>) {
    while !stop.load(Ordering::Acquire) {
        match event::poll(INPUT_POLL_TIMEOUT) {
            Ok(true) => match event::read() {
                Ok(ev) => {
                    // Bounded queue: apply backpressure instead of dropping events.
                    if tx.blocking_send(InputMsg::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                    break;
                }
            },
            Ok(false) => {}
            Err(e) => {
                let _ = tx.blocking_send(InputMsg::Error(e.to_string()));
                break;
            }
        }
    }
}

/// Drain pending input. Returns `Ok(true)` when the app should quit.
pub fn handle_events(app: &mut App, input: &mut InputPump) -> Result<bool> {
    let mut processed = 0;
    while processed < MAX_EVENTS_PER_FRAME {
        let ev = match input.rx.try_recv() {
            Ok(InputMsg::Event(ev)) => ev,
            Ok(InputMsg::Error(msg)) => return Err(anyhow!("input error: {msg}")),
            Err(mpsc::error::TryRecvError::Empty) => break,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                return Err(anyhow!("input pump disconnected"));
            }
        };

        if apply_event(app, ev) {
            return Ok(true);
        }
        processed += 1;
    }
    Ok(app.should_quit())
}

/// Apply one terminal event. Returns `true` when the app should quit.
pub fn apply_event(app: &mut App, ev: Event) -> bool {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => apply_key(app, key),
        Event::Paste(text) if app.focus() == Focus::Chat && app.modal().is_none() => {
            for ch in text.chars() {
                app.chat_input_push(if ch.is_whitespace() { ' ' } else { ch });
            }
        }
        _ => {}
    }
    app.should_quit()
}

fn apply_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.request_quit();
        return;
    }

    if let Some(modal) = app.modal() {
        let abs = matches!(modal, Modal::AbsWarning);
        match (abs, key.code) {
            (true, KeyCode::Enter | KeyCode::Esc) => app.dismiss_abs_warning(),
            (false, KeyCode::Char('y' | 'Y')) => app.confirm_open_link(),
            (false, KeyCode::Char('n' | 'N') | KeyCode::Esc) => app.cancel_open_link(),
            _ => {}
        }
        return;
    }

    if app.status().is_some() {
        app.clear_status();
    }

    if app.focus() == Focus::Chat {
        apply_chat_key(app, key);
        return;
    }

    if let KeyCode::Char(c @ '1'..='4') = key.code {
        let index = c as usize - '1' as usize;
        app.navigate(View::ALL[index]);
        return;
    }

    match app.view() {
        View::Home => match key.code {
            KeyCode::Enter => app.navigate(View::Advisor),
            KeyCode::Char('q') => app.request_quit(),
            _ => {}
        },
        View::Advisor => match key.code {
            KeyCode::Up | KeyCode::BackTab => app.form_prev_field(),
            KeyCode::Down | KeyCode::Tab => app.form_next_field(),
            KeyCode::Left => app.form_decrement(),
            KeyCode::Right => app.form_increment(),
            KeyCode::Char(' ') => app.form_toggle_type(),
            KeyCode::Enter => app.submit_profile(),
            KeyCode::Esc => app.navigate(View::Home),
            KeyCode::Char('q') => app.request_quit(),
            _ => {}
        },
        View::Recommendations => match key.code {
            KeyCode::Tab => app.toggle_list_mode(),
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Char('r') => {
                app.start_run();
            }
            KeyCode::Char('c') => app.clear_history(),
            KeyCode::Char('o') => app.open_selected_link(),
            KeyCode::Char('/') => app.focus_chat(),
            KeyCode::Char('a') => app.navigate(View::Advisor),
            KeyCode::Esc => app.navigate(View::Home),
            KeyCode::Char('q') => app.request_quit(),
            _ => {}
        },
        View::Disclaimer => match key.code {
            KeyCode::Esc => app.navigate(View::Home),
            KeyCode::Char('q') => app.request_quit(),
            _ => {}
        },
    }
}

fn apply_chat_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.focus_list(),
        KeyCode::Enter => {
            if let Err(rejection) = app.submit_chat() {
                debug!(?rejection, "Chat submission rejected");
            }
        }
        KeyCode::Backspace => app.chat_input_backspace(),
        KeyCode::Up => app.chat_history_up(),
        KeyCode::Down => app.chat_history_down(),
        KeyCode::Char(c) => app.chat_input_push(c),
        _ => {}
    }
}
