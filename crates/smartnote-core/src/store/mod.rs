//! Note store
//!
//! Owns the authoritative in-memory collection and its durable mirror: a
//! single JSON file holding the serialized note array, rewritten in full on
//! every commit. There is one logical writer by construction, so no locking
//! is involved.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::models::Note;

/// The note collection plus its durable mirror on disk
#[derive(Debug)]
pub struct NoteStore {
    path: PathBuf,
    notes: Vec<Note>,
}

impl NoteStore {
    /// Load the persisted collection, seeding a demonstration set on first run.
    ///
    /// A missing file is first-run and yields the seed notes; a present but
    /// malformed file is an error rather than silently trusted or discarded.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let notes = if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            tracing::debug!(path = %path.display(), "no persisted notes, seeding demo set");
            seed_notes()
        };

        Ok(Self { path, notes })
    }

    /// Current snapshot of the collection
    #[must_use]
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Location of the durable mirror
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit a new collection: replace in-memory state, then persist.
    ///
    /// The in-memory replacement always happens; persistence is optimistic.
    /// Returns whether the durable write succeeded. On failure the new state
    /// stands and the next commit rewrites the full collection anyway.
    pub fn commit(&mut self, notes: Vec<Note>) -> bool {
        self.notes = notes;

        match self.persist() {
            Ok(()) => true,
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %error,
                    "failed to persist notes, in-memory state kept"
                );
                false
            }
        }
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&self.notes)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// First-run demonstration notes.
///
/// Purely a UX nicety; nothing in the model depends on them.
#[must_use]
pub fn seed_notes() -> Vec<Note> {
    const HOUR_MS: i64 = 60 * 60 * 1000;
    const DAY_MS: i64 = 24 * HOUR_MS;
    let now = chrono::Utc::now().timestamp_millis();

    let mut meeting = Note::new(
        "Meeting Notes - Project Alpha",
        "Discussed project milestones. Q3 goals set. Action items: John to finalize budget, \
         Sarah to draft proposal. Next meeting scheduled for next Tuesday.",
        vec![
            "project alpha".to_string(),
            "meeting".to_string(),
            "q3 goals".to_string(),
        ],
    );
    meeting.created_at = now - 2 * DAY_MS;
    meeting.updated_at = now - 3 * HOUR_MS;
    meeting.is_pinned = true;

    let mut brainstorm = Note::new(
        "Brainstorming Ideas for New App",
        "Idea 1: AI-powered recipe generator. Idea 2: Local event discovery platform. \
         Idea 3: Personalized fitness planner. Need to research market viability for each.",
        vec![
            "ideas".to_string(),
            "app development".to_string(),
            "brainstorming".to_string(),
        ],
    );
    brainstorm.created_at = now - 5 * DAY_MS;
    brainstorm.updated_at = now - DAY_MS;

    let mut groceries = Note::new(
        "Grocery List",
        "- Milk\n- Eggs\n- Bread\n- Apples\n- Chicken Breast\n- Spinach",
        vec!["shopping".to_string(), "urgent".to_string()],
    );
    groceries.created_at = now - 30 * 60 * 1000;
    groceries.updated_at = groceries.created_at;

    let mut old_ideas = Note::new(
        "Old Project Ideas",
        "Some ideas from last year that were never pursued. Might be worth revisiting.",
        vec!["archive".to_string(), "old ideas".to_string()],
    );
    old_ideas.created_at = now - 300 * DAY_MS;
    old_ideas.updated_at = now - 250 * DAY_MS;
    old_ideas.is_archived = true;

    vec![meeting, brainstorm, groceries, old_ideas]
}
