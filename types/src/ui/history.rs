//! Recall of previously sent chat messages with Up/Down.

const MAX_ENTRIES: usize = 50;

#[derive(Debug, Default, Clone)]
enum NavState {
    #[default]
    Idle,
    Browsing {
        index: usize,
        stash: String,
    },
}

/// Result of a navigation attempt.
#[derive(Debug, PartialEq, Eq)]
pub enum NavOutcome {
    Moved(String),
    AtBoundary,
}

/// Sent chat messages, oldest first, with a draft stash while browsing.
#[derive(Debug, Default, Clone)]
pub struct InputHistory {
    entries: Vec<String>,
    nav: NavState,
}

impl InputHistory {
    /// Record a sent message. Blank messages and repeats of the last entry are skipped.
    pub fn push(&mut self, text: &str) {
        self.nav = NavState::Idle;
        let text = text.trim();
        if text.is_empty() || self.entries.last().is_some_and(|last| last == text) {
            return;
        }
        self.entries.push(text.to_string());
        if self.entries.len() > MAX_ENTRIES {
            self.entries.remove(0);
        }
    }

    /// Step to an older entry, stashing `current` on the first step.
    pub fn up(&mut self, current: &str) -> NavOutcome {
        match &mut self.nav {
            NavState::Idle => {
                let Some(last) = self.entries.len().checked_sub(1) else {
                    return NavOutcome::AtBoundary;
                };
                self.nav = NavState::Browsing {
                    index: last,
                    stash: current.to_string(),
                };
                NavOutcome::Moved(self.entries[last].clone())
            }
            NavState::Browsing { index: 0, .. } => NavOutcome::AtBoundary,
            NavState::Browsing { index, .. } => {
                *index -= 1;
                NavOutcome::Moved(self.entries[*index].clone())
            }
        }
    }

    /// Step to a newer entry; past the newest, the stashed draft comes back.
    pub fn down(&mut self) -> NavOutcome {
        match std::mem::take(&mut self.nav) {
            NavState::Idle => NavOutcome::AtBoundary,
            NavState::Browsing { index, stash } if index + 1 >= self.entries.len() => {
                NavOutcome::Moved(stash)
            }
            NavState::Browsing { index, stash } => {
                self.nav = NavState::Browsing {
                    index: index + 1,
                    stash,
                };
                NavOutcome::Moved(self.entries[index + 1].clone())
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{InputHistory, NavOutcome};

    fn moved(s: &str) -> NavOutcome {
        NavOutcome::Moved(s.to_string())
    }

    #[test]
    fn browse_and_restore_draft() {
        let mut history = InputHistory::default();
        history.push("cheaper please");
        history.push("show cruisers");

        assert_eq!(history.up("draft"), moved("show cruisers"));
        assert_eq!(history.up("ignored"), moved("cheaper please"));
        assert_eq!(history.up("ignored"), NavOutcome::AtBoundary);
        assert_eq!(history.down(), moved("show cruisers"));
        assert_eq!(history.down(), moved("draft"));
        assert_eq!(history.down(), NavOutcome::AtBoundary);
    }

    #[test]
    fn skips_blank_and_repeated_entries() {
        let mut history = InputHistory::default();
        history.push("  ");
        history.push("hi");
        history.push("hi");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn empty_history_is_boundary() {
        let mut history = InputHistory::default();
        assert_eq!(history.up(""), NavOutcome::AtBoundary);
    }
}
