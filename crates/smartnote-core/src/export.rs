//! Note export helpers shared by the CLI and any future surfaces.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::models::Note;

/// Export output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    Json,
    Markdown,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Markdown => "md",
        }
    }
}

/// Serializable note representation used in JSON and Markdown exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportNote {
    pub id: String,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub pinned: bool,
    pub archived: bool,
}

/// Convert a note into an export record.
///
/// Empty titles are exported with the display placeholder so the result
/// stands on its own outside the app.
#[must_use]
pub fn note_to_export_item(note: &Note) -> ExportNote {
    ExportNote {
        id: note.id.to_string(),
        title: note.display_title().to_string(),
        content: note.content.clone(),
        tags: note.tags.clone(),
        created_at: note.created_at,
        updated_at: note.updated_at,
        pinned: note.is_pinned,
        archived: note.is_archived,
    }
}

/// Render notes as pretty-printed JSON.
pub fn render_json_export(notes: &[Note]) -> serde_json::Result<String> {
    let items = notes
        .iter()
        .map(note_to_export_item)
        .collect::<Vec<ExportNote>>();
    serde_json::to_string_pretty(&items)
}

/// Render notes in Markdown with frontmatter blocks.
#[must_use]
pub fn render_markdown_export(notes: &[Note]) -> String {
    let mut output = String::new();

    for (index, note) in notes.iter().enumerate() {
        if index > 0 {
            output.push('\n');
        }

        let export_note = note_to_export_item(note);
        let _ = writeln!(output, "---");
        let _ = writeln!(output, "id: {}", export_note.id);
        let _ = writeln!(output, "created_at: {}", export_note.created_at);
        let _ = writeln!(output, "updated_at: {}", export_note.updated_at);
        let _ = writeln!(output, "pinned: {}", export_note.pinned);
        let _ = writeln!(output, "archived: {}", export_note.archived);
        let _ = writeln!(output, "tags:");
        for tag in export_note.tags {
            let _ = writeln!(output, "  - {tag}");
        }
        let _ = writeln!(output, "---");
        let _ = writeln!(output);
        let _ = writeln!(output, "# {}", export_note.title);
        let _ = writeln!(output);
        output.push_str(&export_note.content);
        output.push('\n');
    }

    output
}

/// Render notes based on selected export format.
pub fn render_notes_export(notes: &[Note], format: ExportFormat) -> serde_json::Result<String> {
    match format {
        ExportFormat::Json => render_json_export(notes),
        ExportFormat::Markdown => Ok(render_markdown_export(notes)),
    }
}

/// Build a deterministic default file name for export flows.
#[must_use]
pub fn suggested_export_file_name(format: ExportFormat, timestamp_ms: i64) -> String {
    format!("smartnote-export-{timestamp_ms}.{}", format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn export_item_uses_display_title_for_untitled_notes() {
        let note = Note::new("", "milk, eggs", vec!["shopping".to_string()]);
        let export = note_to_export_item(&note);

        assert_eq!(export.title, "Untitled Note");
        assert_eq!(export.tags, vec!["shopping"]);
    }

    #[test]
    fn render_markdown_export_includes_frontmatter_and_content() {
        let mut note = Note::new(
            "Launch Checklist",
            "Ship it #soon",
            vec!["release".to_string()],
        );
        note.created_at = 123;
        note.updated_at = 456;
        note.is_pinned = true;

        let rendered = render_markdown_export(&[note]);
        assert!(rendered.contains("created_at: 123"));
        assert!(rendered.contains("updated_at: 456"));
        assert!(rendered.contains("pinned: true"));
        assert!(rendered.contains("archived: false"));
        assert!(rendered.contains("tags:\n  - release"));
        assert!(rendered.contains("# Launch Checklist"));
        assert!(rendered.contains("Ship it #soon"));
    }

    #[test]
    fn render_json_export_includes_all_fields() {
        let note = Note::new("Json Note", "body", vec![]);
        let rendered = render_json_export(&[note]).unwrap();

        assert!(rendered.contains("\"title\": \"Json Note\""));
        assert!(rendered.contains("\"pinned\": false"));
    }

    #[test]
    fn suggested_export_file_name_uses_format_extension() {
        assert_eq!(
            suggested_export_file_name(ExportFormat::Json, 123),
            "smartnote-export-123.json"
        );
        assert_eq!(
            suggested_export_file_name(ExportFormat::Markdown, 456),
            "smartnote-export-456.md"
        );
    }
}
