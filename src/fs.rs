use crate::errors::Error;
use std::fs::{self, File, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Filesystem abstraction boundary for the waste engines.
///
/// Keeping this trait narrow makes it easy to write deterministic tests and
/// allows alternative backends if callers need them.
pub trait FileSystem: Send + Sync {
    /// Returns the current time in wall-clock format.
    fn now(&self) -> SystemTime;

    /// Returns true when the path names an entry, counting broken symlinks.
    fn entry_exists(&self, path: &Path) -> bool;

    /// Reads symlink metadata (never follows the link).
    fn symlink_metadata(&self, path: &Path) -> crate::Result<Metadata>;

    /// Returns the device identifier of the entry itself, not a link target.
    fn device_of(&self, path: &Path) -> crate::Result<u64>;

    /// Resolves symlinks and relative segments to a real absolute path.
    fn canonicalize(&self, path: &Path) -> crate::Result<PathBuf>;

    /// Creates a directory and all missing parent directories.
    fn create_dir_all(&self, path: &Path) -> crate::Result<()>;

    /// Writes UTF-8 text.
    fn write_to_string(&self, path: &Path, content: &str) -> crate::Result<()>;

    /// Reads UTF-8 text.
    fn read_to_string(&self, path: &Path) -> crate::Result<String>;

    /// Creates (or truncates) a file open for writing.
    fn create_file(&self, path: &Path) -> io::Result<File>;

    /// Removes a file.
    fn remove_file(&self, path: &Path) -> crate::Result<()>;

    /// Renames/moves a path.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Lists directory children as concrete paths.
    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>>;

    /// Removes a payload entry, whether it is a file, symlink, or directory.
    fn remove_entry(&self, path: &Path) -> crate::Result<()>;
}

/// Default filesystem implementation backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }

    fn entry_exists(&self, path: &Path) -> bool {
        fs::symlink_metadata(path).is_ok()
    }

    fn symlink_metadata(&self, path: &Path) -> crate::Result<Metadata> {
        fs::symlink_metadata(path).map_err(|err| Error::io(path, err))
    }

    #[cfg(unix)]
    fn device_of(&self, path: &Path) -> crate::Result<u64> {
        use std::os::unix::fs::MetadataExt;
        Ok(self.symlink_metadata(path)?.dev())
    }

    #[cfg(not(unix))]
    fn device_of(&self, path: &Path) -> crate::Result<u64> {
        self.symlink_metadata(path)?;
        Ok(0)
    }

    fn canonicalize(&self, path: &Path) -> crate::Result<PathBuf> {
        fs::canonicalize(path).map_err(|err| Error::io(path, err))
    }

    fn create_dir_all(&self, path: &Path) -> crate::Result<()> {
        fs::create_dir_all(path).map_err(|err| Error::io(path, err))
    }

    fn write_to_string(&self, path: &Path, content: &str) -> crate::Result<()> {
        fs::write(path, content).map_err(|err| Error::io(path, err))
    }

    fn read_to_string(&self, path: &Path) -> crate::Result<String> {
        fs::read_to_string(path).map_err(|err| Error::io(path, err))
    }

    fn create_file(&self, path: &Path) -> io::Result<File> {
        File::create(path)
    }

    fn remove_file(&self, path: &Path) -> crate::Result<()> {
        fs::remove_file(path).map_err(|err| Error::io(path, err))
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn list_dir(&self, path: &Path) -> crate::Result<Vec<PathBuf>> {
        fs::read_dir(path)
            .map_err(|err| Error::io(path, err))?
            .map(|entry| entry.map(|v| v.path()))
            .collect::<Result<Vec<PathBuf>, io::Error>>()
            .map_err(|err| Error::io(path, err))
    }

    fn remove_entry(&self, path: &Path) -> crate::Result<()> {
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            // A trashed directory needs the recursive removal instead.
            Err(err) => match fs::remove_dir_all(path) {
                Ok(()) => Ok(()),
                Err(_) => Err(Error::io(path, err)),
            },
        }
    }
}
