//! View derivation rules
//!
//! Pure, side-effect-free computation of what a presentation surface shows:
//! the search predicate, the active/archived gate, and the stable
//! pinned-first partition. Given the same collection, search term, and view
//! mode, the result is always the same.

use crate::models::Note;

/// Which side of the archive gate the user is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Notes with `is_archived = false`, split into pinned and other groups
    #[default]
    Active,
    /// Notes with `is_archived = true`, one flat list
    Archived,
}

/// Display subsets derived from the full collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NoteView {
    /// Pinned active notes, collection order preserved
    pub pinned: Vec<Note>,
    /// Unpinned active notes, collection order preserved
    pub others: Vec<Note>,
    /// Archived notes, collection order preserved, no pin partition
    pub archived: Vec<Note>,
}

impl NoteView {
    /// Display order for the active view: pinned group, then the rest
    #[must_use]
    pub fn active_display_order(&self) -> Vec<Note> {
        let mut ordered = self.pinned.clone();
        ordered.extend(self.others.iter().cloned());
        ordered
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pinned.is_empty() && self.others.is_empty() && self.archived.is_empty()
    }
}

/// Case-insensitive substring match over title, content, and tags.
///
/// An empty (or whitespace-only) term matches every note.
#[must_use]
pub fn matches_search(note: &Note, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }

    note.title.to_lowercase().contains(&term)
        || note.content.to_lowercase().contains(&term)
        || note.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
}

/// Derive the display subsets for one view.
///
/// The archive gate and the search predicate are ANDed; the partition is a
/// stable split, never a resort by timestamp. In the archived view the pin
/// flag carries no meaning (archiving forces it off), so `pinned` and
/// `others` stay empty there, and `archived` stays empty in the active view.
#[must_use]
pub fn partition(notes: &[Note], search_term: &str, mode: ViewMode) -> NoteView {
    let mut view = NoteView::default();

    for note in notes {
        if !matches_search(note, search_term) {
            continue;
        }

        match mode {
            ViewMode::Active if !note.is_archived => {
                if note.is_pinned {
                    view.pinned.push(note.clone());
                } else {
                    view.others.push(note.clone());
                }
            }
            ViewMode::Archived if note.is_archived => {
                view.archived.push(note.clone());
            }
            ViewMode::Active | ViewMode::Archived => {}
        }
    }

    view
}
