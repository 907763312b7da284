//! Note mutation API
//!
//! Every operation is a pure transform `(collection, ...) -> collection`.
//! Nothing here touches durable storage; the caller commits the returned
//! collection through [`crate::store::NoteStore`], which keeps the single
//! logical writer at one place and makes the model testable without a UI.

use crate::error::{Error, Result};
use crate::models::{normalize_tags, Note, NoteId};

/// Insert a new note at the head of the collection.
///
/// The note's id must not already exist; callers obtain fresh ids from
/// [`Note::new`], so a collision means a caller bug and is rejected.
/// Blank notes (no title, no content, no tags) are rejected before the
/// collection changes.
pub fn create(notes: &[Note], note: Note) -> Result<Vec<Note>> {
    validate(&note)?;

    if notes.iter().any(|existing| existing.id == note.id) {
        return Err(Error::Validation(format!(
            "note id already exists: {}",
            note.id
        )));
    }

    let mut next = Vec::with_capacity(notes.len() + 1);
    next.push(note);
    next.extend_from_slice(notes);
    Ok(next)
}

/// Replace an existing note in place.
///
/// Keeps the entry's position and its original `created_at`, stamps
/// `updated_at` with now, and re-normalizes tags. A missing id is a
/// [`Error::NotFound`]; there is no silent fall-back to insert.
pub fn update(notes: &[Note], note: Note) -> Result<Vec<Note>> {
    validate(&note)?;

    let position = notes
        .iter()
        .position(|existing| existing.id == note.id)
        .ok_or_else(|| Error::NotFound(note.id.to_string()))?;

    let mut next = notes.to_vec();
    let created_at = next[position].created_at;
    next[position] = Note {
        created_at,
        updated_at: chrono::Utc::now().timestamp_millis().max(created_at),
        tags: normalize_tags(note.tags),
        ..note
    };
    Ok(next)
}

/// Remove the note with the given id. Removing a missing id is a no-op.
#[must_use]
pub fn delete(notes: &[Note], id: &NoteId) -> Vec<Note> {
    notes
        .iter()
        .filter(|note| &note.id != id)
        .cloned()
        .collect()
}

/// Flip a note's pinned flag.
///
/// Pinning forces the archive flag off; unpinning leaves it untouched.
/// A missing id leaves the collection unchanged.
#[must_use]
pub fn toggle_pin(notes: &[Note], id: &NoteId) -> Vec<Note> {
    notes
        .iter()
        .map(|note| {
            if &note.id == id {
                let pinned = !note.is_pinned;
                let mut next = note.clone();
                next.is_pinned = pinned;
                if pinned {
                    next.is_archived = false;
                }
                next
            } else {
                note.clone()
            }
        })
        .collect()
}

/// Flip a note's archived flag.
///
/// Archiving forces the pin flag off; unarchiving leaves it untouched.
/// A missing id leaves the collection unchanged.
#[must_use]
pub fn toggle_archive(notes: &[Note], id: &NoteId) -> Vec<Note> {
    notes
        .iter()
        .map(|note| {
            if &note.id == id {
                let archived = !note.is_archived;
                let mut next = note.clone();
                next.is_archived = archived;
                if archived {
                    next.is_pinned = false;
                }
                next
            } else {
                note.clone()
            }
        })
        .collect()
}

fn validate(note: &Note) -> Result<()> {
    if note.is_blank() {
        return Err(Error::Validation(
            "note needs a title, content, or at least one tag".to_string(),
        ));
    }
    Ok(())
}
