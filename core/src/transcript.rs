//! Chat transcript shown beside the recommendations.

use rideready_types::RecommendationItem;

/// Assistant replies echo at most this many result cards.
pub const MAX_ECHO_CARDS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEntry {
    User(String),
    Assistant {
        text: String,
        cards: Vec<RecommendationItem>,
    },
    /// Neutral progress or outcome line ("Updating recommendations...").
    Status(String),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct ChatTranscript {
    entries: Vec<ChatEntry>,
}

impl ChatTranscript {
    #[must_use]
    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push(&mut self, entry: ChatEntry) {
        self.entries.push(entry);
    }

    /// Attach cards to the most recent assistant reply, or add a bare one.
    pub fn attach_cards(&mut self, items: &[RecommendationItem]) {
        let cards: Vec<_> = items.iter().take(MAX_ECHO_CARDS).cloned().collect();
        if cards.is_empty() {
            return;
        }
        match self.entries.last_mut() {
            Some(ChatEntry::Assistant { cards: existing, .. }) if existing.is_empty() => {
                *existing = cards;
            }
            _ => self.entries.push(ChatEntry::Assistant {
                text: String::new(),
                cards,
            }),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
