//! Reading and writing the per-item metadata records.
//!
//! A record is a flat text block with a fixed header and two keys in fixed
//! order. Parsers tolerate trailing whitespace on each line but not
//! reordered keys.
//!
//! ```text
//! [Trash Info]
//! Path=/home/u/notes.txt
//! DeletionDate=2024-01-01T15:30:45
//! ```

use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::fs::FileSystem;
use crate::helpers::parse_trash_datetime;
use crate::models::WasteDirectory;

pub const TRASHINFO_HEADER: &str = "[Trash Info]";
const PATH_KEY: &str = "Path=";
const DATE_KEY: &str = "DeletionDate=";

/// Parsed metadata record.
#[derive(Debug, Clone)]
pub struct TrashInfo {
    pub original_path: PathBuf,
    pub deleted_at: Option<DateTime<Local>>,
}

/// Writes the record for a freshly trashed item, keyed by the (possibly
/// disambiguated) destination base name. Failures here are per-item: the
/// move already happened and is never rolled back.
pub fn write_record(
    fs: &dyn FileSystem,
    waste: &WasteDirectory,
    dest_base: &str,
    original: &Path,
    deletion_stamp: &str,
) -> Result<()> {
    let record_path = waste.record_path(dest_base);
    let body = render(original, deletion_stamp);
    fs.write_to_string(&record_path, &body)
        .map_err(|err| match err {
            Error::Io(path, source) => Error::MetadataWriteFailure { path, source },
            other => other,
        })
}

pub fn render(original: &Path, deletion_stamp: &str) -> String {
    format!(
        "{TRASHINFO_HEADER}\n{PATH_KEY}{}\n{DATE_KEY}{deletion_stamp}\n",
        original.display()
    )
}

/// Parses a record body. Key order is fixed; a reordered or truncated block
/// is rejected so purge/restore can skip it with a warning instead of acting
/// on half-read state. An unparseable date degrades to `None` rather than
/// invalidating the whole record, since restore only needs the path.
pub fn parse(contents: &str) -> Option<TrashInfo> {
    let mut lines = contents.lines();
    if lines.next().map(str::trim_end) != Some(TRASHINFO_HEADER) {
        return None;
    }
    let path_line = lines.next()?.trim_end();
    let original = path_line.strip_prefix(PATH_KEY)?;
    if original.is_empty() {
        return None;
    }
    let deleted_at = lines
        .next()
        .and_then(|line| line.trim_end().strip_prefix(DATE_KEY))
        .and_then(parse_trash_datetime);
    Some(TrashInfo {
        original_path: PathBuf::from(original),
        deleted_at,
    })
}

/// Reads and parses the record for a destination base name. A missing file
/// is the recoverable `RestoreTargetNotFound` inconsistency.
pub fn read_record(
    fs: &dyn FileSystem,
    waste: &WasteDirectory,
    dest_base: &str,
) -> Result<TrashInfo> {
    let record_path = waste.record_path(dest_base);
    let contents = match fs.read_to_string(&record_path) {
        Ok(contents) => contents,
        Err(Error::Io(_, err)) if err.kind() == io::ErrorKind::NotFound => {
            return Err(Error::RestoreTargetNotFound(dest_base.to_string()));
        }
        Err(err) => return Err(err),
    };
    parse(&contents).ok_or_else(|| Error::RestoreTargetNotFound(dest_base.to_string()))
}
