//! Export rendering for decoded notes.
//!
//! Takes fully decoded [`ExportNote`] records and renders them as JSON, CSV,
//! or Markdown. Rendering produces a complete document as a `String`; where
//! that document lands (file or stdout) is the caller's business.

use serde::Serialize;

use crate::error::Result;

/// One fully decoded note, ready for export
#[derive(Debug, Clone, Serialize)]
pub struct ExportNote {
    /// Note identifier
    pub id: i64,
    /// Note title
    pub title: String,
    /// Folder name ("Notes" for the default folder)
    pub folder: String,
    /// Whether the note is pinned
    pub pinned: bool,
    /// Formatted creation time
    pub created: String,
    /// Formatted modification time
    pub modified: String,
    /// Decoded note text
    pub content: String,
}

/// Supported export document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Pretty-printed JSON array
    Json,
    /// CSV with a header row
    Csv,
    /// Markdown document with one section per note
    Markdown,
}

impl ExportFormat {
    /// Conventional file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Markdown => "md",
        }
    }
}

/// Render notes into a complete document in the given format.
pub fn render(notes: &[ExportNote], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(notes)?),
        ExportFormat::Csv => Ok(render_csv(notes)),
        ExportFormat::Markdown => Ok(render_markdown(notes)),
    }
}

fn render_csv(notes: &[ExportNote]) -> String {
    let mut out = String::from("ID,Title,Folder,Pinned,Created,Modified,Content\n");

    for note in notes {
        let fields = [
            note.id.to_string(),
            note.title.clone(),
            note.folder.clone(),
            note.pinned.to_string(),
            note.created.clone(),
            note.modified.clone(),
            note.content.clone(),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Quote a CSV field when it contains a delimiter, quote, or line break.
fn csv_field(value: &str) -> String {
    if value.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_markdown(notes: &[ExportNote]) -> String {
    let mut lines = Vec::new();
    lines.push("# Apple Notes Export".to_string());
    lines.push(format!("\nExported {} notes\n", notes.len()));

    for note in notes {
        lines.push("\n---\n".to_string());
        lines.push(format!("## {}", note.title));
        lines.push(format!(
            "\n**Folder:** {} | **Modified:** {}",
            note.folder, note.modified
        ));
        if note.pinned {
            lines.push("**Pinned:** Yes".to_string());
        }
        lines.push(format!("\n{}", note.content));
    }

    lines.join("\n")
}
