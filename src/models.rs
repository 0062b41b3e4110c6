use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::fs::FileSystem;
use crate::helpers::{self, TRASHINFO_EXTENSION};

/// One configured waste folder, serving a single filesystem.
/// Immutable after load.
#[derive(Debug, Clone)]
pub struct WasteDirectory {
    pub parent: PathBuf,
    pub files: PathBuf,
    pub info: PathBuf,
    pub device: u64,
}

impl WasteDirectory {
    /// Prepares the waste folder rooted at `parent`: ensures the `files/` and
    /// `info/` subareas exist and records the device it serves.
    pub fn open(fs: &dyn FileSystem, parent: PathBuf) -> crate::Result<Self> {
        let files = parent.join("files");
        let info = parent.join("info");
        fs.create_dir_all(&files)?;
        fs.create_dir_all(&info)?;
        let device = fs.device_of(&parent)?;
        Ok(Self {
            parent,
            files,
            info,
            device,
        })
    }

    /// Payload location for a (possibly suffixed) destination base name.
    pub fn payload_path(&self, base: &str) -> PathBuf {
        self.files.join(base)
    }

    /// Metadata record location for a destination base name.
    pub fn record_path(&self, base: &str) -> PathBuf {
        self.info.join(format!("{base}{TRASHINFO_EXTENSION}"))
    }
}

/// One file being moved to waste. Created fresh per target, discarded after
/// the operation completes or fails.
#[derive(Debug, Clone)]
pub struct Target {
    /// The path exactly as the caller gave it; the rename acts on this.
    pub given: PathBuf,
    /// Symlink-resolved path, used only for the protection check and the
    /// recorded original location.
    pub real: PathBuf,
    pub base_name: String,
    pub destination: PathBuf,
    pub is_duplicate: bool,
}

/// Per-run context threaded through every component call. Replaces any
/// ambient verbosity or time state: the run timestamp is sampled once and
/// reused for metadata, collision suffixes, and purge age comparisons.
pub struct RunContext<'a> {
    pub fs: &'a dyn FileSystem,
    pub now: DateTime<Local>,
    pub verbose: bool,
    pub bypass: bool,
    pub force: bool,
}

impl<'a> RunContext<'a> {
    pub fn new(fs: &'a dyn FileSystem, verbose: bool, bypass: bool, force: bool) -> Self {
        let now = DateTime::<Local>::from(fs.now());
        Self {
            fs,
            now,
            verbose,
            bypass,
            force,
        }
    }

    /// Deletion timestamp written into metadata records this run.
    pub fn deletion_stamp(&self) -> String {
        helpers::serialize_datetime(self.now)
    }

    /// Suffix appended to colliding destination names this run.
    pub fn duplicate_suffix(&self) -> String {
        helpers::duplicate_suffix(self.now)
    }

    pub fn announce_move(&self, from: &Path, to: &Path) {
        if self.verbose {
            println!("'{}' -> '{}'", from.display(), to.display());
        }
    }
}
