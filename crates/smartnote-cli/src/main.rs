//! SmartNote CLI - AI-assisted note taking from the command line
//!
//! Quick capture plus the full pin/archive/search model and the AI
//! authoring helpers, against a local JSON-backed store.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Utc;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::aot::Generator;
use clap_complete::{generate, shells};
use serde::Serialize;
use smartnote_core::ai::{AiError, AiService};
use smartnote_core::export::{render_notes_export, ExportFormat as CoreExportFormat};
use smartnote_core::view::{partition, NoteView, ViewMode};
use smartnote_core::{mutations, Note, NoteStore};
use thiserror::Error;

#[derive(Parser)]
#[command(name = "smartnote")]
#[command(about = "AI-assisted notes from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Optional path to the notes JSON file
    #[arg(long, value_name = "PATH")]
    notes_path: Option<PathBuf>,

    /// Quick capture: smartnote "my note here"
    #[arg(trailing_var_arg = true)]
    note: Vec<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new note
    #[command(alias = "new")]
    Add {
        /// Note content
        content: Vec<String>,
        /// Note title
        #[arg(short, long)]
        title: Option<String>,
        /// Tags (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// List notes in display order (pinned first)
    List {
        /// Show the archived view instead of the active one
        #[arg(long)]
        archived: bool,
        /// Filter by a search term (title, content, or tags)
        #[arg(short, long, default_value = "")]
        search: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Search notes (shorthand for list --search)
    Search {
        /// Search query
        query: String,
        /// Search the archived view
        #[arg(long)]
        archived: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Edit an existing note's content in $EDITOR
    Edit {
        /// Note ID or unique ID prefix
        id: String,
        /// Replace the title
        #[arg(short, long)]
        title: Option<String>,
        /// Replace the tags (repeatable)
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// Delete a note permanently
    Delete {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Toggle a note's pinned flag
    Pin {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Toggle a note's archived flag
    Archive {
        /// Note ID or unique ID prefix
        id: String,
    },
    /// Export notes
    Export {
        /// Export format
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// AI authoring helpers
    Ai {
        #[command(subcommand)]
        command: AiCommands,
    },
}

#[derive(Subcommand)]
enum AiCommands {
    /// Suggest a title for note content
    Title {
        #[command(flatten)]
        input: AiContentArgs,
    },
    /// Suggest tags for note content
    Tags {
        #[command(flatten)]
        input: AiContentArgs,
    },
    /// Summarize note content
    Summarize {
        #[command(flatten)]
        input: AiContentArgs,
    },
    /// Translate note content
    Translate {
        /// Target language (e.g. Bangla, Spanish)
        #[arg(long = "to", value_name = "LANGUAGE")]
        target_language: String,
        #[command(flatten)]
        input: AiContentArgs,
    },
    /// Get actionable advice for note content
    Advise {
        #[command(flatten)]
        input: AiContentArgs,
    },
    /// Transcribe an audio recording to text
    Transcribe {
        /// Path to the audio file (wav, mp3, ogg, webm, m4a)
        file: PathBuf,
    },
    /// One conversational turn with the advisor
    Chat {
        /// Message for the advisor
        message: Vec<String>,
    },
    /// Store the Gemini API key in the OS keychain
    SetKey {
        /// API key value
        key: String,
    },
    /// Remove the Gemini API key from the OS keychain
    ClearKey,
    /// Show AI configuration status
    Status,
}

/// Content source for AI helpers: inline text or an existing note.
#[derive(clap::Args)]
struct AiContentArgs {
    /// Inline content
    content: Vec<String>,
    /// Read content from an existing note instead
    #[arg(long = "note", value_name = "ID")]
    note_id: Option<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] smartnote_core::Error),
    #[error(transparent)]
    Ai(#[from] AiError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Note ID cannot be empty")]
    EmptyNoteId,
    #[error("Note not found for id/prefix: {0}")]
    NoteNotFound(String),
    #[error("{0}")]
    AmbiguousNoteId(String),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Unsupported audio file extension: {0}")]
    UnsupportedAudio(String),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum ExportFormat {
    Json,
    Markdown,
}

impl From<ExportFormat> for CoreExportFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => Self::Json,
            ExportFormat::Markdown => Self::Markdown,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("smartnote=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let notes_path = resolve_notes_path(cli.notes_path);
    tracing::debug!(path = %notes_path.display(), "using notes file");

    match cli.command {
        Some(Commands::Add {
            content,
            title,
            tags,
        }) => run_add(&content, title.as_deref(), tags, &notes_path)?,
        Some(Commands::List {
            archived,
            search,
            json,
        }) => run_list(archived, &search, json, &notes_path)?,
        Some(Commands::Search {
            query,
            archived,
            json,
        }) => run_list(archived, &query, json, &notes_path)?,
        Some(Commands::Edit { id, title, tags }) => run_edit(&id, title, tags, &notes_path)?,
        Some(Commands::Delete { id }) => run_delete(&id, &notes_path)?,
        Some(Commands::Pin { id }) => run_pin(&id, &notes_path)?,
        Some(Commands::Archive { id }) => run_archive(&id, &notes_path)?,
        Some(Commands::Export { format, output }) => {
            run_export(format, output.as_deref(), &notes_path)?;
        }
        Some(Commands::Completions { shell, output }) => {
            run_completions(shell, output.as_deref())?;
        }
        Some(Commands::Ai { command }) => run_ai(command, &notes_path).await?,
        None => {
            // Quick capture mode: smartnote "my note"
            if cli.note.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                run_add(&cli.note, None, Vec::new(), &notes_path)?;
            }
        }
    }

    Ok(())
}

fn run_add(
    content_parts: &[String],
    title: Option<&str>,
    tags: Vec<String>,
    notes_path: &Path,
) -> Result<(), CliError> {
    let content = normalize_content(&content_parts.join(" ")).unwrap_or_default();
    let title = title.unwrap_or_default();
    if content.is_empty() && title.trim().is_empty() && tags.is_empty() {
        return Err(CliError::EmptyContent);
    }

    let mut store = NoteStore::load(notes_path)?;
    let note = Note::new(title, content, tags);
    let id = note.id.clone();
    let next = mutations::create(store.notes(), note)?;
    store.commit(next);

    println!("{id}");
    Ok(())
}

#[derive(Debug, Serialize)]
struct NoteListItem {
    id: String,
    title: String,
    preview: String,
    content: String,
    tags: Vec<String>,
    created_at: i64,
    updated_at: i64,
    pinned: bool,
    archived: bool,
    relative_time: String,
}

fn run_list(
    archived: bool,
    search: &str,
    as_json: bool,
    notes_path: &Path,
) -> Result<(), CliError> {
    let store = NoteStore::load(notes_path)?;
    let mode = if archived {
        ViewMode::Archived
    } else {
        ViewMode::Active
    };
    let view = partition(store.notes(), search, mode);

    if as_json {
        let items = display_notes(&view, mode)
            .iter()
            .map(note_to_list_item)
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if view.is_empty() {
        if archived {
            println!("No archived notes found.");
        } else {
            println!("No active notes found.");
        }
        return Ok(());
    }

    if archived {
        println!("Archived Notes");
        for line in format_note_lines(&view.archived) {
            println!("{line}");
        }
    } else {
        if !view.pinned.is_empty() {
            println!("Pinned Notes");
            for line in format_note_lines(&view.pinned) {
                println!("{line}");
            }
            if !view.others.is_empty() {
                println!();
            }
        }
        if !view.others.is_empty() {
            let heading = if view.pinned.is_empty() {
                "Your Notes"
            } else {
                "Other Notes"
            };
            println!("{heading}");
            for line in format_note_lines(&view.others) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

fn display_notes(view: &NoteView, mode: ViewMode) -> Vec<Note> {
    match mode {
        ViewMode::Active => view.active_display_order(),
        ViewMode::Archived => view.archived.clone(),
    }
}

fn run_edit(
    id: &str,
    title: Option<String>,
    tags: Vec<String>,
    notes_path: &Path,
) -> Result<(), CliError> {
    let mut store = NoteStore::load(notes_path)?;
    let note = resolve_note(id, store.notes())?;

    let edited_content = capture_editor_input_with_initial(&note.content)?.unwrap_or_default();

    let mut edited = note.clone();
    edited.content = edited_content;
    if let Some(title) = title {
        edited.title = title;
    }
    if !tags.is_empty() {
        edited.tags = tags;
    }

    let next = mutations::update(store.notes(), edited)?;
    store.commit(next);
    println!("{}", note.id);
    Ok(())
}

fn run_delete(id: &str, notes_path: &Path) -> Result<(), CliError> {
    let mut store = NoteStore::load(notes_path)?;
    let note = resolve_note(id, store.notes())?;

    let next = mutations::delete(store.notes(), &note.id);
    store.commit(next);
    println!("{}", note.id);
    Ok(())
}

fn run_pin(id: &str, notes_path: &Path) -> Result<(), CliError> {
    let mut store = NoteStore::load(notes_path)?;
    let note = resolve_note(id, store.notes())?;
    let was_pinned = note.is_pinned;

    let next = mutations::toggle_pin(store.notes(), &note.id);
    store.commit(next);
    println!(
        "{}",
        if was_pinned {
            "Note Unpinned"
        } else {
            "Note Pinned"
        }
    );
    Ok(())
}

fn run_archive(id: &str, notes_path: &Path) -> Result<(), CliError> {
    let mut store = NoteStore::load(notes_path)?;
    let note = resolve_note(id, store.notes())?;
    let was_archived = note.is_archived;

    let next = mutations::toggle_archive(store.notes(), &note.id);
    store.commit(next);
    println!(
        "{}",
        if was_archived {
            "Note Unarchived"
        } else {
            "Note Archived"
        }
    );
    Ok(())
}

fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    notes_path: &Path,
) -> Result<(), CliError> {
    let store = NoteStore::load(notes_path)?;
    let rendered = render_notes_export(store.notes(), format.into())?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

fn run_completions(shell: CompletionShell, output_path: Option<&Path>) -> Result<(), CliError> {
    let mut command = Cli::command();
    let mut buffer = Vec::new();

    match shell {
        CompletionShell::Bash => generate_for_shell(shells::Bash, &mut command, &mut buffer),
        CompletionShell::Zsh => generate_for_shell(shells::Zsh, &mut command, &mut buffer),
        CompletionShell::Fish => generate_for_shell(shells::Fish, &mut command, &mut buffer),
    }

    if let Some(path) = output_path {
        std::fs::write(path, &buffer)?;
        println!("{}", path.display());
    } else {
        io::stdout().write_all(&buffer)?;
    }

    Ok(())
}

fn generate_for_shell<G: Generator>(
    generator: G,
    command: &mut clap::Command,
    buffer: &mut Vec<u8>,
) {
    generate(generator, command, "smartnote", buffer);
}

async fn run_ai(command: AiCommands, notes_path: &Path) -> Result<(), CliError> {
    match command {
        AiCommands::Title { input } => {
            let content = resolve_ai_content(&input, notes_path)?;
            let service = AiService::new()?;
            println!("{}", service.suggest_title(&content).await?);
        }
        AiCommands::Tags { input } => {
            let content = resolve_ai_content(&input, notes_path)?;
            let service = AiService::new()?;
            for tag in service.suggest_tags(&content).await? {
                println!("{tag}");
            }
        }
        AiCommands::Summarize { input } => {
            let content = resolve_ai_content(&input, notes_path)?;
            let service = AiService::new()?;
            println!("{}", service.summarize(&content).await?);
        }
        AiCommands::Translate {
            target_language,
            input,
        } => {
            let content = resolve_ai_content(&input, notes_path)?;
            let service = AiService::new()?;
            println!("{}", service.translate(&content, &target_language).await?);
        }
        AiCommands::Advise { input } => {
            let content = resolve_ai_content(&input, notes_path)?;
            let service = AiService::new()?;
            println!("{}", service.advise(&content).await?);
        }
        AiCommands::Transcribe { file } => {
            let mime_type = mime_for_audio_path(&file)?;
            let audio_bytes = std::fs::read(&file)?;
            let service = AiService::new()?;
            println!("{}", service.transcribe(mime_type, &audio_bytes).await?);
        }
        AiCommands::Chat { message } => {
            let message = normalize_content(&message.join(" ")).ok_or(CliError::EmptyContent)?;
            let service = AiService::new()?;
            println!("{}", service.chat(&message).await?);
        }
        AiCommands::SetKey { key } => {
            AiService::store_api_key(&key)?;
            println!("API key stored");
        }
        AiCommands::ClearKey => {
            AiService::clear_api_key()?;
            println!("API key cleared");
        }
        AiCommands::Status => {
            let service = AiService::new()?;
            let status = service.config_status();
            println!("enabled:  {}", status.enabled);
            println!("provider: {}", status.provider);
            println!("model:    {}", status.model.as_deref().unwrap_or("-"));
        }
    }

    Ok(())
}

/// Resolve AI helper input: `--note <id>` reads the note's content,
/// otherwise the inline text is used.
fn resolve_ai_content(input: &AiContentArgs, notes_path: &Path) -> Result<String, CliError> {
    if let Some(id) = &input.note_id {
        let store = NoteStore::load(notes_path)?;
        let note = resolve_note(id, store.notes())?;
        return Ok(note.content);
    }

    normalize_content(&input.content.join(" ")).ok_or(CliError::EmptyContent)
}

/// Resolve a note by exact id or unique id prefix.
fn resolve_note(note_query: &str, notes: &[Note]) -> Result<Note, CliError> {
    let query = note_query.trim();
    if query.is_empty() {
        return Err(CliError::EmptyNoteId);
    }

    if let Some(note) = notes.iter().find(|note| note.id.as_str() == query) {
        return Ok(note.clone());
    }

    let matches: Vec<&Note> = notes
        .iter()
        .filter(|note| note.id.as_str().starts_with(query))
        .collect();

    match matches.len() {
        0 => Err(CliError::NoteNotFound(query.to_string())),
        1 => Ok(matches[0].clone()),
        _ => {
            let options = matches
                .iter()
                .take(3)
                .map(|note| note.id.as_str().chars().take(13).collect::<String>())
                .collect::<Vec<_>>()
                .join(", ");
            Err(CliError::AmbiguousNoteId(format!(
                "ID prefix '{query}' is ambiguous; matches: {options}"
            )))
        }
    }
}

fn format_note_lines(notes: &[Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let id = note.id.to_string();
            let short_id = id.chars().take(13).collect::<String>();
            let title = truncate_chars(note.display_title(), 28);
            let preview = note_preview(note, 40);
            let relative_time = format_relative_time(note.updated_at, now_ms);
            let tags = render_tags(note);

            if tags.is_empty() {
                format!("{short_id:<13}  {title:<28}  {preview:<40}  {relative_time}")
            } else {
                format!("{short_id:<13}  {title:<28}  {preview:<40}  {relative_time:<10}  {tags}")
            }
        })
        .collect()
}

fn note_to_list_item(note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();

    NoteListItem {
        id: note.id.to_string(),
        title: note.display_title().to_string(),
        preview: note_preview(note, 80),
        content: note.content.clone(),
        tags: note.tags.clone(),
        created_at: note.created_at,
        updated_at: note.updated_at,
        pinned: note.is_pinned,
        archived: note.is_archived,
        relative_time: format_relative_time(note.updated_at, now_ms),
    }
}

fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.content.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

fn render_tags(note: &Note) -> String {
    note.tags
        .iter()
        .map(|tag| format!("#{tag}"))
        .collect::<Vec<String>>()
        .join(" ")
}

fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn mime_for_audio_path(path: &Path) -> Result<&'static str, CliError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "wav" => Ok("audio/wav"),
        "mp3" => Ok("audio/mpeg"),
        "ogg" => Ok("audio/ogg"),
        "webm" => Ok("audio/webm"),
        "m4a" => Ok("audio/mp4"),
        "flac" => Ok("audio/flac"),
        other => Err(CliError::UnsupportedAudio(other.to_string())),
    }
}

fn capture_editor_input_with_initial(initial_content: &str) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // Fallback for editor commands with args, e.g. "code --wait"
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let mut command = Command::new(program);
            command.args(parts).arg(file_path);

            let status = command.status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("smartnote-{}-{now}.md", std::process::id()))
}

fn resolve_notes_path(cli_notes_path: Option<PathBuf>) -> PathBuf {
    cli_notes_path
        .or_else(|| env::var_os("SMARTNOTE_NOTES_PATH").map(PathBuf::from))
        .unwrap_or_else(default_notes_path)
}

fn default_notes_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("smartnote")
        .join("notes.json")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use smartnote_core::{mutations, Note, NoteStore};
    use tempfile::tempdir;

    use super::{
        default_editor, format_relative_time, mime_for_audio_path, normalize_content,
        note_preview, resolve_note, run_completions, run_delete, run_export, run_pin,
        truncate_chars, CliError, CompletionShell, ExportFormat,
    };

    fn seeded_store_path(dir: &tempfile::TempDir, notes: Vec<Note>) -> PathBuf {
        let path = dir.path().join("notes.json");
        let mut store = NoteStore::load(&path).unwrap();
        store.commit(notes);
        path
    }

    #[test]
    fn normalize_content_trims_and_rejects_empty() {
        assert_eq!(normalize_content("  hello  "), Some("hello".to_string()));
        assert_eq!(normalize_content(" \n\t "), None);
    }

    #[test]
    fn normalize_content_keeps_multiline_text() {
        assert_eq!(
            normalize_content("line 1\nline 2\n"),
            Some("line 1\nline 2".to_string())
        );
    }

    #[test]
    fn default_editor_is_defined() {
        assert!(!default_editor().is_empty());
    }

    #[test]
    fn format_relative_time_units() {
        let now = 10_000_000;
        assert_eq!(format_relative_time(now - 30_000, now), "just now");
        assert_eq!(format_relative_time(now - 120_000, now), "2m ago");
        assert_eq!(format_relative_time(now - 2 * 60 * 60_000, now), "2h ago");
    }

    #[test]
    fn note_preview_truncates_with_ellipsis() {
        let note = Note::new(
            "",
            "This is a very long sentence that should be shortened",
            vec![],
        );
        let preview = note_preview(&note, 20);
        assert_eq!(preview, "This is a very lo...");
    }

    #[test]
    fn truncate_chars_leaves_short_strings_alone() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("much longer title here", 10), "much lo...");
    }

    #[test]
    fn mime_for_audio_path_maps_known_extensions() {
        assert_eq!(
            mime_for_audio_path(&PathBuf::from("memo.wav")).unwrap(),
            "audio/wav"
        );
        assert_eq!(
            mime_for_audio_path(&PathBuf::from("memo.MP3")).unwrap(),
            "audio/mpeg"
        );
        assert!(matches!(
            mime_for_audio_path(&PathBuf::from("clip.mp4")),
            Err(CliError::UnsupportedAudio(_))
        ));
    }

    #[test]
    fn resolve_note_supports_exact_and_prefix_id() {
        let mut a = Note::new("Note A", "left", vec![]);
        a.id = "11111111-aaaa".parse().unwrap();
        let mut b = Note::new("Note B", "right", vec![]);
        b.id = "11111111-bbbb".parse().unwrap();
        let notes = vec![a, b];

        let by_exact = resolve_note("11111111-aaaa", &notes).unwrap();
        assert_eq!(by_exact.title, "Note A");

        let by_prefix = resolve_note("11111111-b", &notes).unwrap();
        assert_eq!(by_prefix.title, "Note B");
    }

    #[test]
    fn resolve_note_rejects_ambiguous_prefix() {
        let mut a = Note::new("Left", "one", vec![]);
        a.id = "aaaa-1111".parse().unwrap();
        let mut b = Note::new("Right", "two", vec![]);
        b.id = "aaaa-2222".parse().unwrap();
        let notes = vec![a, b];

        let error = resolve_note("aaaa", &notes).unwrap_err();
        assert!(matches!(error, CliError::AmbiguousNoteId(_)));
    }

    #[test]
    fn resolve_note_rejects_missing_and_empty_ids() {
        let notes = vec![Note::new("Only", "body", vec![])];
        assert!(matches!(
            resolve_note("does-not-exist", &notes),
            Err(CliError::NoteNotFound(_))
        ));
        assert!(matches!(
            resolve_note("  ", &notes),
            Err(CliError::EmptyNoteId)
        ));
    }

    #[test]
    fn run_delete_removes_note_permanently() {
        let dir = tempdir().unwrap();
        let keep = Note::new("Keep me", "stays", vec![]);
        let drop = Note::new("Delete me", "goes", vec![]);
        let drop_id = drop.id.clone();
        let path = seeded_store_path(&dir, vec![keep.clone(), drop]);

        run_delete(drop_id.as_str(), &path).unwrap();

        let store = NoteStore::load(&path).unwrap();
        assert_eq!(store.notes().len(), 1);
        assert_eq!(store.notes()[0].id, keep.id);
    }

    #[test]
    fn run_pin_toggles_and_persists() {
        let dir = tempdir().unwrap();
        let mut archived = Note::new("Was archived", "body", vec![]);
        archived.is_archived = true;
        let id = archived.id.clone();
        let path = seeded_store_path(&dir, vec![archived]);

        run_pin(id.as_str(), &path).unwrap();

        let store = NoteStore::load(&path).unwrap();
        assert!(store.notes()[0].is_pinned);
        assert!(!store.notes()[0].is_archived);
    }

    #[test]
    fn run_export_writes_json_file() {
        let dir = tempdir().unwrap();
        let path = seeded_store_path(
            &dir,
            vec![Note::new("Export me", "body text", vec!["one".to_string()])],
        );

        let output_path = dir.path().join("export.json");
        run_export(ExportFormat::Json, Some(&output_path), &path).unwrap();

        let exported = std::fs::read_to_string(&output_path).unwrap();
        assert!(exported.contains("\"title\": \"Export me\""));
        assert!(exported.contains("\"one\""));
    }

    #[test]
    fn run_completions_writes_bash_script_file() {
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("completions.bash");

        run_completions(CompletionShell::Bash, Some(&output_path)).unwrap();

        let script = std::fs::read_to_string(&output_path).unwrap();
        assert!(script.contains("_smartnote()"));
        assert!(script.contains("complete -F _smartnote"));
    }

    #[test]
    fn quick_capture_note_displays_untitled() {
        let note = Note::new("", "captured on the go", vec![]);
        let notes = mutations::create(&[], note).unwrap();
        assert_eq!(notes[0].display_title(), "Untitled Note");
        assert_eq!(notes[0].title, "");
    }
}
