//! notedump - Read, search, and export Apple Notes from the command line
//!
//! This tool reads the Apple Notes SQLite database directly, recovers note
//! text from its binary body format, and can list, search, read, and export
//! notes without touching Notes.app.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use notedump_core::{dates, export, extract_text, ExportFormat, ExportNote, NoteRecord, NoteStore};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

/// Default database location inside the Notes group container, relative to $HOME
const DEFAULT_DB_SUBPATH: &str =
    "Library/Group Containers/group.com.apple.notes/NoteStore.sqlite";

/// Widest a title gets in tabular output before truncation
const TITLE_WIDTH: usize = 50;

/// Read, search, and export Apple Notes
#[derive(Parser, Debug)]
#[command(name = "notedump")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to NoteStore.sqlite (defaults to the Notes group container)
    #[arg(long, env = "NOTEDUMP_DB")]
    db: Option<PathBuf>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List recent notes
    List {
        /// Number of notes to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Search notes by title and content
    Search {
        /// Search query (case-insensitive)
        query: String,
    },
    /// Read a specific note
    Read {
        /// Note ID
        note_id: i64,
    },
    /// List all folders
    Folders,
    /// Export notes to JSON, CSV, or Markdown
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: FormatArg,

        /// Only export notes modified in the last N hours
        #[arg(long, conflicts_with = "days")]
        hours: Option<u64>,

        /// Only export notes modified in the last N days
        #[arg(long)]
        days: Option<u64>,

        /// Output file path (writes to this specific file)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,

        /// Output directory (auto-generates a filename like notes.json)
        #[arg(short = 'O', long)]
        output_dir: Option<PathBuf>,
    },
}

/// Export format argument
#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
    /// Markdown document
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Markdown => ExportFormat::Markdown,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    let db_path = resolve_db_path(cli.db.as_deref())?;
    debug!("using database at {}", db_path.display());
    let store = NoteStore::open(&db_path)?;

    match cli.command {
        Command::List { limit } => cmd_list(&store, limit),
        Command::Search { ref query } => cmd_search(&store, query),
        Command::Read { note_id } => cmd_read(&store, note_id),
        Command::Folders => cmd_folders(&store),
        Command::Export {
            format,
            hours,
            days,
            ref output,
            ref output_dir,
        } => cmd_export(
            &store,
            format,
            hours,
            days,
            output.as_deref(),
            output_dir.as_deref(),
        ),
    }
}

/// Resolve the database path from the flag, or fall back to the default
/// location under $HOME.
fn resolve_db_path(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }

    let home = std::env::var_os("HOME")
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty());
    match home {
        Some(home) => Ok(home.join(DEFAULT_DB_SUBPATH)),
        None => bail!("cannot locate the notes database: $HOME is unset and --db was not given"),
    }
}

/// List recent notes in a table
fn cmd_list(store: &NoteStore, limit: usize) -> Result<()> {
    let notes = store.list(limit)?;

    println!("\n{:<8} {:<18} {:<20} {}", "ID", "Modified", "Folder", "Title");
    println!("{}", "-".repeat(100));

    for note in &notes {
        let pin = if note.pinned { "* " } else { "" };
        let folder = note.folder.as_deref().unwrap_or("Notes");
        println!(
            "{:<8} {:<18} {:<20} {}{}",
            note.id,
            dates::format_core_data(note.modified),
            folder,
            pin,
            truncate(&note.title, TITLE_WIDTH),
        );
    }

    Ok(())
}

/// A search hit with an optional content snippet
struct SearchHit {
    id: i64,
    title: String,
    modified: Option<f64>,
    snippet: Option<String>,
    title_match: bool,
}

/// Search note titles and decoded content for a query
fn cmd_search(store: &NoteStore, query: &str) -> Result<()> {
    let query_lower = query.to_lowercase();
    let records = store.notes_since(None)?;
    debug!("searching {} notes", records.len());

    let mut hits = Vec::new();
    for record in &records {
        if let Some(hit) = match_record(record, &query_lower) {
            hits.push(hit);
        }
    }

    println!("\nFound {} notes matching '{}':\n", hits.len(), query);
    println!("{:<8} {:<18} {}", "ID", "Modified", "Title");
    println!("{}", "-".repeat(80));

    for hit in hits.iter().take(20) {
        let marker = if hit.title_match { "*" } else { " " };
        println!(
            "{:<8} {:<18} {} {}",
            hit.id,
            dates::format_core_data(hit.modified),
            marker,
            truncate(&hit.title, 45),
        );
        if let Some(ref snippet) = hit.snippet {
            println!("         {}", truncate(snippet, 70));
        }
        println!();
    }

    Ok(())
}

/// Check one record against the lowercased query, decoding content on demand
fn match_record(record: &NoteRecord, query_lower: &str) -> Option<SearchHit> {
    let title = &record.summary.title;
    let title_match = title.to_lowercase().contains(query_lower);

    let content = record.data.as_deref().map(extract_text).unwrap_or_default();
    let snippet = snippet_around(&content, query_lower);

    if !title_match && snippet.is_none() {
        return None;
    }

    Some(SearchHit {
        id: record.summary.id,
        title: title.clone(),
        modified: record.summary.modified,
        snippet,
        title_match,
    })
}

/// Build a `...context...` snippet around the first match of the query, or
/// `None` when the content does not match
fn snippet_around(content: &str, query_lower: &str) -> Option<String> {
    let idx = content.to_lowercase().find(query_lower)?;

    // Lowercasing can shift byte offsets for non-ASCII text, so clamp both
    // edges back onto character boundaries of the original string
    let start = floor_boundary(content, idx.saturating_sub(40));
    let end = floor_boundary(content, idx + query_lower.len() + 40);
    let end = end.max(start);

    Some(format!("...{}...", content[start..end].replace('\n', " ")))
}

/// Largest char boundary in `s` that is `<= i`
fn floor_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Print a single note with its metadata banner
fn cmd_read(store: &NoteStore, note_id: i64) -> Result<()> {
    let record = store
        .note(note_id)
        .with_context(|| format!("cannot read note {}", note_id))?;

    let summary = &record.summary;
    let content = record.data.as_deref().map(extract_text).unwrap_or_default();
    let content = if content.is_empty() {
        "(No content)"
    } else {
        &content
    };

    println!("\n{}", "=".repeat(60));
    println!("Title:    {}", summary.title);
    println!("Folder:   {}", summary.folder.as_deref().unwrap_or("Notes"));
    println!("Created:  {}", dates::format_core_data(summary.created));
    println!("Modified: {}", dates::format_core_data(summary.modified));
    println!("{}\n", "=".repeat(60));
    println!("{}\n", content);

    Ok(())
}

/// List all folders with note counts
fn cmd_folders(store: &NoteStore) -> Result<()> {
    let folders = store.folders()?;

    println!("\n{:<8} {:<8} {}", "ID", "Notes", "Folder Name");
    println!("{}", "-".repeat(50));

    for folder in &folders {
        println!("{:<8} {:<8} {}", folder.id, folder.note_count, folder.name);
    }

    Ok(())
}

/// Export notes in the chosen format, to a file or stdout
fn cmd_export(
    store: &NoteStore,
    format: FormatArg,
    hours: Option<u64>,
    days: Option<u64>,
    output: Option<&Path>,
    output_dir: Option<&Path>,
) -> Result<()> {
    let cutoff = match (hours, days) {
        (Some(h), _) => Some(dates::cutoff_hours_ago(h)),
        (None, Some(d)) => Some(dates::cutoff_days_ago(d)),
        (None, None) => None,
    };

    let records = store.notes_since(cutoff)?;
    let notes: Vec<ExportNote> = records.iter().map(export_note).collect();
    debug!("exporting {} notes", notes.len());

    let format = ExportFormat::from(format);
    let document = export::render(&notes, format)?;

    let output_path = match (output, output_dir) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(dir)) => Some(dir.join(export_filename(format, hours, days))),
        (None, None) => None,
    };

    match output_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create directory: {}", parent.display()))?;
            }
            fs::write(&path, &document)
                .with_context(|| format!("failed to write file: {}", path.display()))?;
            info!("wrote {} bytes to {}", document.len(), path.display());
            eprintln!("Exported {} notes to {}", notes.len(), path.display());
        }
        None => println!("{}", document),
    }

    Ok(())
}

/// Build an export record, falling back to the title when decoding yields
/// nothing (short notes often keep all their text in the title)
fn export_note(record: &NoteRecord) -> ExportNote {
    let summary = &record.summary;
    let content = record.data.as_deref().map(extract_text).unwrap_or_default();
    let content = if content.is_empty() {
        summary.title.clone()
    } else {
        content
    };

    ExportNote {
        id: summary.id,
        title: summary.title.clone(),
        folder: summary.folder.clone().unwrap_or_else(|| "Notes".to_string()),
        pinned: summary.pinned,
        created: dates::format_core_data(summary.created),
        modified: dates::format_core_data(summary.modified),
        content,
    }
}

/// Auto-generated filename for --output-dir exports
fn export_filename(format: ExportFormat, hours: Option<u64>, days: Option<u64>) -> String {
    let ext = format.extension();
    match (hours, days) {
        (Some(h), _) => format!("notes_last_{}_hours.{}", h, ext),
        (None, Some(d)) => format!("notes_last_{}_days.{}", d, ext),
        (None, None) => format!("notes.{}", ext),
    }
}

/// Truncate a string to at most `max` characters, appending `...` when cut
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max).collect();
        format!("{}...", cut)
    } else {
        s.to_string()
    }
}
