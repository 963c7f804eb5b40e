//! # notedump-core
//!
//! A library for reading, searching, and exporting Apple Notes from the
//! `NoteStore.sqlite` database.
//!
//! This crate provides the core functionality for:
//! - Recovering readable text from the schema-less, gzip-wrapped binary blobs
//!   Apple Notes stores note bodies in
//! - Read-only access to note and folder metadata in the SQLite store
//! - Rendering decoded notes as JSON, CSV, or Markdown
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`extract`]: Heuristic binary scanning and text recovery (the core)
//! - [`store`]: Read-only SQLite access to notes and folders
//! - [`dates`]: Core Data timestamp conversion
//! - [`export`]: Export document rendering
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```no_run
//! use notedump_core::{extract_text, NoteStore};
//!
//! let store = NoteStore::open("NoteStore.sqlite")?;
//! for record in store.notes_since(None)? {
//!     let text = record.data.as_deref().map(extract_text).unwrap_or_default();
//!     println!("{}: {}", record.summary.title, text);
//! }
//! # Ok::<(), notedump_core::Error>(())
//! ```
//!
//! The extraction pipeline itself never fails: noisy, truncated, or
//! uncompressed input all degrade to a (possibly empty) string.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod dates;
pub mod error;
pub mod export;
pub mod extract;
pub mod store;

// Re-export primary types for convenience
pub use error::{Error, Result};
pub use export::{render, ExportFormat, ExportNote};
pub use extract::{extract_text, ExtractorConfig, FieldScanner, TextExtractor};
pub use store::{FolderSummary, NoteRecord, NoteStore, NoteSummary};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
