use std::{io, path::PathBuf};

/// Error type shared by every waste operation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A composed path would exceed the platform path limit.
    #[error("path exceeds the platform limit: {}", .0.display())]
    PathTooLong(PathBuf),

    /// The requested path does not resolve to any filesystem entry.
    /// A broken symlink is *not* this error; the link itself exists.
    #[error("file not found: '{}'", .0.display())]
    NotFound(PathBuf),

    /// The resolved path falls under a protected prefix.
    #[error("file is in protected directory: {}", .0.display())]
    ProtectedPath(PathBuf),

    /// No configured waste folder lives on the target's filesystem.
    #[error("no suitable waste folder found for \"{}\"", .0.display())]
    NoDestinationFilesystem(PathBuf),

    /// The rename into the waste folder failed.
    #[error("unable to move '{}' to waste", .path.display())]
    RenameFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The metadata record could not be written. The move itself stands.
    #[error("unable to write metadata record {}", .path.display())]
    MetadataWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration produced no usable waste folder.
    #[error("no usable waste folder is configured")]
    NoWasteFolder,

    /// The undo log could not be opened for writing.
    #[error("unable to open undo log {}", .path.display())]
    UndoLogOpenFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A restore target was absent from every waste folder.
    #[error("not found in any waste folder: {0}")]
    RestoreTargetNotFound(String),

    /// Any other filesystem failure.
    #[error("I/O error while accessing {}", .0.display())]
    Io(PathBuf, #[source] io::Error),
}

/// What a failure means for the rest of the run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Disposition {
    /// Report, skip this item, continue with the remaining ones.
    SkipItem,
    /// A shared invariant cannot be upheld; stop the whole run.
    AbortRun,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io(path.into(), error)
    }

    /// Classifies the failure once, per kind. `PathTooLong` on the undo-log
    /// path is fatal too, but that is decided where the log path is composed,
    /// before any per-item work starts.
    pub fn disposition(&self) -> Disposition {
        match self {
            Self::PathTooLong(_)
            | Self::NotFound(_)
            | Self::ProtectedPath(_)
            | Self::MetadataWriteFailure { .. }
            | Self::RestoreTargetNotFound(_)
            | Self::Io(..) => Disposition::SkipItem,
            Self::NoDestinationFilesystem(_)
            | Self::RenameFailure { .. }
            | Self::NoWasteFolder
            | Self::UndoLogOpenFailure { .. } => Disposition::AbortRun,
        }
    }
}

/// Shared result alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
