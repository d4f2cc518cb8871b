//! `notes.txt` export and share text.

use crate::model::note::Note;
use chrono::{DateTime, Utc};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name written by `write_text_export`.
pub const TEXT_EXPORT_FILE_NAME: &str = "notes.txt";

const EXPORT_DATE_FORMAT: &str = "%a %b %d %H:%M:%S UTC %Y";
const CARD_DATE_FORMAT: &str = "%d %b %Y, %I:%M %p";
const SHARE_PREFIX: &str = "From Note App: ";

/// Export failures.
#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: io::Error },
    InvalidTimestamp(i64),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
            Self::InvalidTimestamp(value) => {
                write!(f, "timestamp {value} is outside the representable range")
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::InvalidTimestamp(_) => None,
        }
    }
}

/// Renders notes in the `notes.txt` layout, one blank-line separated block
/// per note.
pub fn export_notes_as_text(notes: &[Note]) -> Result<String, ExportError> {
    let mut out = String::new();
    for note in notes {
        let date = format_millis(note.created_at, EXPORT_DATE_FORMAT)?;
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "Title: {}\nDescription: {}\nDate: {}\n\n",
            note.title, note.description, date
        );
    }
    Ok(out)
}

/// Writes `notes.txt` into `dir`, creating the directory when needed.
///
/// Returns the path of the written file; an existing export is replaced.
pub fn write_text_export(notes: &[Note], dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    let path = dir.join(TEXT_EXPORT_FILE_NAME);
    let body = export_notes_as_text(notes)?;

    let written = fs::create_dir_all(dir).and_then(|()| fs::write(&path, body.as_bytes()));
    if let Err(source) = written {
        error!(
            "event=export_text module=export status=error count={} error={}",
            notes.len(),
            source
        );
        return Err(ExportError::Io { path, source });
    }

    info!(
        "event=export_text module=export status=ok count={} bytes={}",
        notes.len(),
        body.len()
    );
    Ok(path)
}

/// Text handed to a share sheet for one note.
pub fn share_text(note: &Note) -> String {
    format!("{SHARE_PREFIX}{}\n\n{}", note.title, note.description)
}

/// Creation label shown on a note card, e.g. `05 Mar 2024, 02:07 PM`.
pub fn created_label(created_at: i64) -> Result<String, ExportError> {
    format_millis(created_at, CARD_DATE_FORMAT)
}

fn format_millis(millis: i64, pattern: &str) -> Result<String, ExportError> {
    let at: DateTime<Utc> =
        DateTime::from_timestamp_millis(millis).ok_or(ExportError::InvalidTimestamp(millis))?;
    Ok(at.format(pattern).to_string())
}
