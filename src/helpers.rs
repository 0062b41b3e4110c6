//! Shared constants and small utilities for waste metadata and paths.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

/// File extension used by waste metadata records.
pub const TRASHINFO_EXTENSION: &str = ".trashinfo";

/// Deletion date format used inside metadata records.
pub const TRASHINFO_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format of the suffix appended to a colliding destination name.
pub const DUPLICATE_SUFFIX_FORMAT: &str = "_%H%M%S-%y%m%d";

#[cfg(unix)]
pub const MAX_PATH_BYTES: usize = libc::PATH_MAX as usize;
#[cfg(not(unix))]
pub const MAX_PATH_BYTES: usize = 4096;

/// Single boundary validation applied when a path is composed. Everything
/// downstream handles plain `PathBuf`s without further length arithmetic.
pub fn check_path_len(path: &Path) -> Result<()> {
    if path.as_os_str().len() >= MAX_PATH_BYTES {
        return Err(Error::PathTooLong(path.to_path_buf()));
    }
    Ok(())
}

/// Parses a metadata deletion date, tolerating trailing whitespace.
pub fn parse_trash_datetime(value: &str) -> Option<DateTime<Local>> {
    NaiveDateTime::parse_from_str(value.trim_end(), TRASHINFO_TIME_FORMAT)
        .ok()
        .and_then(|naive| Local.from_local_datetime(&naive).single())
}

/// Serializes a timestamp into the metadata deletion-date format.
pub fn serialize_datetime(time: DateTime<Local>) -> String {
    time.format(TRASHINFO_TIME_FORMAT).to_string()
}

/// Renders the collision suffix for the given run timestamp.
pub fn duplicate_suffix(time: DateTime<Local>) -> String {
    time.format(DUPLICATE_SUFFIX_FORMAT).to_string()
}

/// Expands a leading `~` or `$HOME` in configured paths.
pub fn expand_home(value: &str) -> PathBuf {
    let rest = if value == "~" || value == "$HOME" {
        ""
    } else if let Some(rest) = value.strip_prefix("~/") {
        rest
    } else if let Some(rest) = value.strip_prefix("$HOME/") {
        rest
    } else {
        return PathBuf::from(value);
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => PathBuf::from(value),
    }
}

/// Base name of a target path as a displayable string.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}
