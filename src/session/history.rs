use std::sync::Arc;

use crate::session::model::TextLayer;

/// One immutable snapshot of the full layer sequence; the unit of undo/redo.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    layers: Arc<[TextLayer]>,
}

impl HistoryEntry {
    /// The snapshotted layer sequence.
    pub fn layers(&self) -> &[TextLayer] {
        &self.layers
    }
}

/// Append-only, branch-discarding undo/redo stack over layer snapshots.
///
/// The cursor is `None` before the first commit. Committing while the cursor
/// is not at the end truncates the redo branch first, so the history is
/// always linear. Undo past the first entry and redo past the last are
/// defined no-ops, never errors.
#[derive(Debug, Default)]
pub struct EditHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl EditHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a full snapshot of `layers`, discarding any redo branch.
    pub fn commit(&mut self, layers: &[TextLayer]) {
        let keep = match self.cursor {
            Some(i) => i + 1,
            None => 0,
        };
        self.entries.truncate(keep);
        self.entries.push(HistoryEntry {
            layers: layers.to_vec().into(),
        });
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Move the cursor back one entry and return its snapshot.
    ///
    /// No-op (returns `None`) when already at the first entry or empty.
    pub fn undo(&mut self) -> Option<&[TextLayer]> {
        let i = self.cursor?;
        if i == 0 {
            return None;
        }
        self.cursor = Some(i - 1);
        Some(self.entries[i - 1].layers())
    }

    /// Move the cursor forward one entry and return its snapshot.
    ///
    /// No-op (returns `None`) when already at the last entry or empty.
    pub fn redo(&mut self) -> Option<&[TextLayer]> {
        let i = self.cursor?;
        if i + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(i + 1);
        Some(self.entries[i + 1].layers())
    }

    /// Number of recorded snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been committed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current cursor position, `None` before the first commit.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Whether [`EditHistory::undo`] would change state.
    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    /// Whether [`EditHistory::redo`] would change state.
    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(i) if i + 1 < self.entries.len())
    }

    /// Snapshot at `index`, if recorded.
    pub fn entry(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/history.rs"]
mod tests;
