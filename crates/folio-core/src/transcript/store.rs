//! In-memory transcript store.

use super::turn::Turn;
use tokio::sync::watch;

/// Holds the ordered transcript of the active conversation.
///
/// The store is the single source of truth for rendering. It is append-only:
/// prior turns are never edited, reordered, or deduplicated. The only bulk
/// mutation is [`TranscriptStore::replace_all`], used during hydration from
/// a persisted copy.
///
/// Every mutation bumps a revision observable through
/// [`TranscriptStore::watch_revision`], which is the render-notification
/// channel for whatever UI consumes the store.
pub struct TranscriptStore {
    turns: Vec<Turn>,
    revision: watch::Sender<u64>,
}

impl TranscriptStore {
    /// Creates an empty store at revision 0.
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            turns: Vec::new(),
            revision,
        }
    }

    /// Appends a turn at the end of the transcript.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
        self.bump();
    }

    /// Replaces the whole transcript. Used only during hydration.
    pub fn replace_all(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
        self.bump();
    }

    /// Returns the turns in conversation order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true when no interaction has occurred yet.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Subscribes to revision changes for render notifications.
    ///
    /// Dropping the receiver unsubscribes; the store itself never blocks on
    /// slow or absent observers.
    pub fn watch_revision(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }
}

impl Default for TranscriptStore {
    fn default() -> Self {
        Self::new()
    }
}
