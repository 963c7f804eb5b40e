//! Read-only access to the Apple Notes SQLite database.
//!
//! Notes live in `NoteStore.sqlite` inside the Notes group container. The
//! interesting tables are `ZICCLOUDSYNCINGOBJECT`, which holds both notes
//! (`ZTITLE1`) and folders (`ZTITLE2`) in one Core Data entity table, and
//! `ZICNOTEDATA`, which carries the compressed body blob in `ZDATA`.
//!
//! The store never writes. The database is opened with
//! `SQLITE_OPEN_READ_ONLY` so a running Notes.app cannot be disturbed.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OpenFlags, Row};
use tracing::debug;

use crate::error::{Error, Result};

/// Metadata for one note, without its body
#[derive(Debug, Clone)]
pub struct NoteSummary {
    /// Primary key in `ZICCLOUDSYNCINGOBJECT`
    pub id: i64,
    /// Note title
    pub title: String,
    /// Containing folder name, if the note is in a named folder
    pub folder: Option<String>,
    /// Creation time as a raw Core Data timestamp
    pub created: Option<f64>,
    /// Last modification time as a raw Core Data timestamp
    pub modified: Option<f64>,
    /// Whether the note is pinned
    pub pinned: bool,
}

/// A note together with its raw body blob
#[derive(Debug, Clone)]
pub struct NoteRecord {
    /// Note metadata
    pub summary: NoteSummary,
    /// Raw body data from `ZICNOTEDATA.ZDATA`; `None` when the note has no
    /// body row (the extractor treats absence as an empty string)
    pub data: Option<Vec<u8>>,
}

/// A folder and how many titled notes it contains
#[derive(Debug, Clone)]
pub struct FolderSummary {
    /// Primary key in `ZICCLOUDSYNCINGOBJECT`
    pub id: i64,
    /// Folder name
    pub name: String,
    /// Number of titled notes in the folder
    pub note_count: i64,
}

const SUMMARY_COLUMNS: &str = "
    o.Z_PK,
    o.ZTITLE1,
    folder.ZTITLE2,
    o.ZCREATIONDATE1,
    o.ZMODIFICATIONDATE1,
    o.ZISPINNED";

/// Read-only handle on a NoteStore database
#[derive(Debug)]
pub struct NoteStore {
    conn: Connection,
    path: PathBuf,
}

impl NoteStore {
    /// Open the database at the given path, read-only.
    ///
    /// Fails with [`Error::DatabaseOpen`] when the file is missing or is not
    /// a readable SQLite database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| Error::database_open(&path, e))?;

        debug!("opened notes database at {}", path.display());
        Ok(Self { conn, path })
    }

    /// Path this store was opened from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List the most recently modified notes, newest first.
    pub fn list(&self, limit: usize) -> Result<Vec<NoteSummary>> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS}
             FROM ZICCLOUDSYNCINGOBJECT o
             LEFT JOIN ZICCLOUDSYNCINGOBJECT folder ON o.ZFOLDER = folder.Z_PK
             WHERE o.ZTITLE1 IS NOT NULL
               AND o.ZMARKEDFORDELETION != 1
             ORDER BY o.ZMODIFICATIONDATE1 DESC
             LIMIT ?1"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![limit as i64], summary_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Fetch a single note by id, including its body blob.
    ///
    /// Missing ids surface as [`Error::NoteNotFound`]; absence is never
    /// silently absorbed at this boundary.
    pub fn note(&self, id: i64) -> Result<NoteRecord> {
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS}, n.ZDATA
             FROM ZICCLOUDSYNCINGOBJECT o
             LEFT JOIN ZICCLOUDSYNCINGOBJECT folder ON o.ZFOLDER = folder.Z_PK
             LEFT JOIN ZICNOTEDATA n ON o.ZNOTEDATA = n.Z_PK
             WHERE o.Z_PK = ?1
               AND o.ZTITLE1 IS NOT NULL"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query_map(params![id], record_from_row)?;

        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(Error::note_not_found(id)),
        }
    }

    /// All notes with their body blobs, newest-modified first.
    ///
    /// With a cutoff, only notes whose Core Data modification timestamp is at
    /// or after the cutoff are returned.
    pub fn notes_since(&self, cutoff: Option<f64>) -> Result<Vec<NoteRecord>> {
        let filter = match cutoff {
            Some(_) => "AND o.ZMODIFICATIONDATE1 >= ?1",
            None => "",
        };
        let sql = format!(
            "SELECT {SUMMARY_COLUMNS}, n.ZDATA
             FROM ZICCLOUDSYNCINGOBJECT o
             LEFT JOIN ZICCLOUDSYNCINGOBJECT folder ON o.ZFOLDER = folder.Z_PK
             LEFT JOIN ZICNOTEDATA n ON o.ZNOTEDATA = n.Z_PK
             WHERE o.ZTITLE1 IS NOT NULL
               AND o.ZMARKEDFORDELETION != 1
               {filter}
             ORDER BY o.ZMODIFICATIONDATE1 DESC"
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let records = match cutoff {
            Some(cutoff) => stmt
                .query_map(params![cutoff], record_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
            None => stmt
                .query_map([], record_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?,
        };

        debug!("loaded {} note records", records.len());
        Ok(records)
    }

    /// List all named folders with their note counts, sorted by name.
    pub fn folders(&self) -> Result<Vec<FolderSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                f.Z_PK,
                f.ZTITLE2,
                COUNT(n.Z_PK)
             FROM ZICCLOUDSYNCINGOBJECT f
             LEFT JOIN ZICCLOUDSYNCINGOBJECT n
                ON n.ZFOLDER = f.Z_PK AND n.ZTITLE1 IS NOT NULL
             WHERE f.ZTITLE2 IS NOT NULL
             GROUP BY f.Z_PK
             ORDER BY f.ZTITLE2",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(FolderSummary {
                id: row.get(0)?,
                name: row.get(1)?,
                note_count: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<NoteSummary> {
    Ok(NoteSummary {
        id: row.get(0)?,
        title: row.get(1)?,
        folder: row.get(2)?,
        created: row.get(3)?,
        modified: row.get(4)?,
        pinned: row.get::<_, Option<i64>>(5)?.unwrap_or(0) != 0,
    })
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<NoteRecord> {
    Ok(NoteRecord {
        summary: summary_from_row(row)?,
        data: row.get(6)?,
    })
}
