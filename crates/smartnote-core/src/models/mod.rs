//! Data models for SmartNote

mod note;

pub use note::{normalize_tags, EmptyNoteId, Note, NoteId, UNTITLED_NOTE};
