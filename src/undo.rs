//! The per-run undo log: destination paths of everything successfully
//! trashed, one per line, in trash order.
//!
//! A run that trashes anything replaces the previous run's log wholesale
//! (single-slot semantics). The file is opened lazily on the first success
//! and exactly once per run; the handle lives inside `UndoLog` so every exit
//! path, including early aborts, closes it when the value drops.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::fs::FileSystem;
use crate::helpers;

pub struct UndoLog<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
    file: Option<File>,
}

impl<'a> UndoLog<'a> {
    /// Validates the log path up front. An overlong undo-log path is the one
    /// `PathTooLong` that is fatal to the whole run, so it surfaces here,
    /// before any file is touched.
    pub fn prepare(fs: &'a dyn FileSystem, path: PathBuf) -> Result<Self> {
        helpers::check_path_len(&path)?;
        Ok(Self {
            fs,
            path,
            file: None,
        })
    }

    /// Appends one destination, truncating any previous run's log on the
    /// first call. Any failure here leaves the undo record untrustworthy
    /// and aborts the run.
    pub fn record(&mut self, destination: &Path) -> Result<()> {
        let fs = self.fs;
        let path = &self.path;
        let file = match &mut self.file {
            Some(file) => file,
            slot => {
                let file = fs
                    .create_file(path)
                    .map_err(|source| Error::UndoLogOpenFailure {
                        path: path.clone(),
                        source,
                    })?;
                slot.insert(file)
            }
        };
        writeln!(file, "{}", destination.display()).map_err(|source| Error::UndoLogOpenFailure {
            path: path.clone(),
            source,
        })
    }

    pub fn was_opened(&self) -> bool {
        self.file.is_some()
    }

    /// Flushes and closes the log. A no-op when nothing was trashed.
    pub fn finish(mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|source| Error::UndoLogOpenFailure {
                path: self.path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

/// Reads the previous run's log, `None` when no run left one behind.
pub fn read_entries(fs: &dyn FileSystem, path: &Path) -> Result<Option<Vec<PathBuf>>> {
    match fs.read_to_string(path) {
        Ok(contents) => Ok(Some(
            contents
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(PathBuf::from)
                .collect(),
        )),
        Err(Error::Io(_, err)) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Removes the log so a second undo has nothing to act on.
pub fn discard(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    fs.remove_file(path)
}
