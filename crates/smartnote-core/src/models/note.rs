//! Note model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Title shown for notes whose stored title is empty.
///
/// Applied at render time only; the stored title stays as the user left it.
pub const UNTITLED_NOTE: &str = "Untitled Note";

/// A unique identifier for a note.
///
/// Fresh ids are UUID v7 (time-sortable), but the type is an opaque string
/// so collections written by other SmartNote clients load unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Create a new unique note ID using UUID v7
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing an empty note ID
#[derive(Debug, thiserror::Error)]
#[error("note ID must not be empty")]
pub struct EmptyNoteId;

impl FromStr for NoteId {
    type Err = EmptyNoteId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err(EmptyNoteId)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

/// A note in the system
///
/// Serialized in the persisted-collection layout: camelCase field names,
/// with unknown fields round-tripped losslessly through `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier
    pub id: NoteId,
    /// Display title; may be empty (see [`UNTITLED_NOTE`])
    pub title: String,
    /// Free-form text body, opaque to the store
    pub content: String,
    /// Ordered tag list, deduplicated case-insensitively at mutation time
    #[serde(default)]
    pub tags: Vec<String>,
    /// Creation timestamp (Unix ms), fixed at first save
    pub created_at: i64,
    /// Last update timestamp (Unix ms), bumped on every save
    pub updated_at: i64,
    /// Priority-display flag; mutually exclusive with `is_archived`
    #[serde(default)]
    pub is_pinned: bool,
    /// Hidden-from-default-view flag; mutually exclusive with `is_pinned`
    #[serde(default)]
    pub is_archived: bool,
    /// Fields this version does not know about, preserved on round-trip
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Note {
    /// Create a new note with fresh id and equal created/updated timestamps
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>, tags: Vec<String>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: NoteId::new(),
            title: title.into(),
            content: content.into(),
            tags: normalize_tags(tags),
            created_at: now,
            updated_at: now,
            is_pinned: false,
            is_archived: false,
            extra: serde_json::Map::new(),
        }
    }

    /// Title to show in any presentation surface
    #[must_use]
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED_NOTE
        } else {
            &self.title
        }
    }

    /// A note with no title, no content, and no tags cannot be saved
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty() && self.tags.is_empty()
    }
}

/// Normalize a tag list for storage.
///
/// Trims whitespace, drops empties, and removes case-insensitive duplicates.
/// The first occurrence wins and keeps its original casing, so the list order
/// the user built is preserved.
#[must_use]
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    let mut normalized = Vec::new();

    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            continue;
        }
        let key = trimmed.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        normalized.push(trimmed.to_string());
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_note_id_unique() {
        let id1 = NoteId::new();
        let id2 = NoteId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_note_id_parse_accepts_opaque_strings() {
        let parsed: NoteId = "1".parse().unwrap();
        assert_eq!(parsed.as_str(), "1");

        let id = NoteId::new();
        let round_tripped: NoteId = id.as_str().parse().unwrap();
        assert_eq!(id, round_tripped);
    }

    #[test]
    fn test_note_id_parse_rejects_empty() {
        assert!(" \t ".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_note_new() {
        let note = Note::new("Groceries", "Milk and eggs", vec!["shopping".to_string()]);
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "Milk and eggs");
        assert_eq!(note.tags, vec!["shopping"]);
        assert!(!note.is_pinned);
        assert!(!note.is_archived);
        assert!(note.created_at > 0);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn test_display_title_placeholder() {
        let untitled = Note::new("", "milk, eggs", vec![]);
        assert_eq!(untitled.display_title(), UNTITLED_NOTE);
        assert_eq!(untitled.title, "");

        let titled = Note::new("Plans", "", vec![]);
        assert_eq!(titled.display_title(), "Plans");
    }

    #[test]
    fn test_is_blank() {
        assert!(Note::new("  ", " \n ", vec![]).is_blank());
        assert!(!Note::new("", "content", vec![]).is_blank());
        assert!(!Note::new("", "", vec!["tag".to_string()]).is_blank());
    }

    #[test]
    fn test_normalize_tags_dedupes_case_insensitively() {
        let tags = normalize_tags(vec![
            "Work".to_string(),
            "work".to_string(),
            "WORK".to_string(),
            "ideas".to_string(),
        ]);
        assert_eq!(tags, vec!["Work", "ideas"]);
    }

    #[test]
    fn test_normalize_tags_trims_and_drops_empties() {
        let tags = normalize_tags(vec![
            "  urgent ".to_string(),
            "   ".to_string(),
            String::new(),
        ]);
        assert_eq!(tags, vec!["urgent"]);
    }

    #[test]
    fn test_persisted_layout_field_names() {
        let note = Note::new("Title", "Body", vec!["a".to_string()]);
        let value = serde_json::to_value(&note).unwrap();

        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
        assert!(value.get("isPinned").is_some());
        assert!(value.get("isArchived").is_some());
        assert!(value.get("created_at").is_none());
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let raw = r#"{
            "id": "1",
            "title": "Meeting Notes",
            "content": "Discussed milestones.",
            "createdAt": 100,
            "updatedAt": 200,
            "isPinned": true,
            "isArchived": false,
            "color": "amber"
        }"#;

        let note: Note = serde_json::from_str(raw).unwrap();
        assert_eq!(note.extra.get("color").and_then(|v| v.as_str()), Some("amber"));

        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value.get("color").and_then(|v| v.as_str()), Some("amber"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let raw = r#"{
            "id": "2",
            "title": "Bare",
            "content": "",
            "createdAt": 1,
            "updatedAt": 1
        }"#;

        let note: Note = serde_json::from_str(raw).unwrap();
        assert!(note.tags.is_empty());
        assert!(!note.is_pinned);
        assert!(!note.is_archived);
    }
}
