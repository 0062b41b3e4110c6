//! Loads the key/value configuration file and turns it into the shared
//! run state: the waste registry, the protected-path guard, and the purge
//! retention.
//!
//! The format is one `key = value` pair per line. `WASTE` and `PROTECT` are
//! repeatable and keep file order, which is what gives the registry its
//! first-entry-wins device policy. `#` starts a comment.

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::fs::FileSystem;
use crate::guard::ProtectedPathGuard;
use crate::helpers::expand_home;
use crate::models::WasteDirectory;
use crate::registry::WasteRegistry;

const CONFIG_FILE: &str = "config";
const UNDO_FILE: &str = "lastwaste";
const PURGE_STAMP_FILE: &str = "lastpurge";

const DEFAULT_CONFIG: &str = "\
# rmwaste configuration
#
# WASTE lines name waste folders, one per filesystem. The first folder on a
# given filesystem serves it. PROTECT lines name directories rmwaste refuses
# to touch without --bypass. purge_after is the retention in days; 0 turns
# purging off.

WASTE = ~/.waste

purge_after = 90

PROTECT = /usr
PROTECT = /etc
PROTECT = /var
";

/// Everything the configuration file contributes to a run.
pub struct Config {
    pub registry: WasteRegistry,
    pub guard: ProtectedPathGuard,
    pub purge_after_days: u32,
    /// Config may force-enable the bypass-adjacent force flag.
    pub force: bool,
}

/// Per-user data directory holding the config file, the undo log, and the
/// last-purge stamp.
pub fn data_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".config").join("rmwaste"))
        .ok_or_else(|| {
            Error::io(
                PathBuf::from("$HOME"),
                std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory"),
            )
        })
}

pub fn undo_log_path(data_dir: &Path) -> PathBuf {
    data_dir.join(UNDO_FILE)
}

pub fn purge_stamp_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PURGE_STAMP_FILE)
}

impl Config {
    /// Loads configuration from `alt_config` or the default location,
    /// writing a default file there first if none exists. Waste entries are
    /// prepared as they are read; unusable ones are skipped with a warning.
    /// No surviving entry is the fatal `NoWasteFolder` condition.
    pub fn load(fs: &dyn FileSystem, data_dir: &Path, alt_config: Option<&Path>) -> Result<Self> {
        fs.create_dir_all(data_dir)?;
        let config_path = match alt_config {
            Some(path) => path.to_path_buf(),
            None => {
                let path = data_dir.join(CONFIG_FILE);
                if !fs.entry_exists(&path) {
                    fs.write_to_string(&path, DEFAULT_CONFIG)?;
                    eprintln!("created default configuration at {}", path.display());
                }
                path
            }
        };
        let contents = fs.read_to_string(&config_path)?;
        Self::parse(fs, &contents)
    }

    /// Parses configuration text against the live filesystem.
    pub fn parse(fs: &dyn FileSystem, contents: &str) -> Result<Self> {
        let mut waste_dirs = Vec::new();
        let mut protected = Vec::new();
        let mut purge_after_days = 0u32;
        let mut force = false;

        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                eprintln!("ignoring malformed configuration line: {line}");
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "WASTE" => {
                    let parent = expand_home(value);
                    match WasteDirectory::open(fs, parent) {
                        Ok(dir) => waste_dirs.push(dir),
                        Err(err) => eprintln!("skipping waste folder '{value}': {err}"),
                    }
                }
                "PROTECT" => protected.push(expand_home(value)),
                "purge_after" => match value.parse() {
                    Ok(days) => purge_after_days = days,
                    Err(_) => eprintln!("ignoring non-numeric purge_after value: {value}"),
                },
                "force" => force = matches!(value, "true" | "1" | "yes"),
                _ => eprintln!("ignoring unknown configuration key: {key}"),
            }
        }

        Ok(Self {
            registry: WasteRegistry::new(waste_dirs)?,
            guard: ProtectedPathGuard::new(protected),
            purge_after_days,
            force,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;

    #[test]
    fn parses_waste_protect_and_retention() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fs = RealFileSystem;
        let contents = format!(
            "# comment\n\nWASTE = {root}/w1\nWASTE = {root}/w2\nPROTECT = /usr\npurge_after = 30\n",
            root = dir.path().display()
        );
        let config = Config::parse(&fs, &contents).expect("config");
        assert_eq!(config.registry.len(), 2);
        assert_eq!(config.purge_after_days, 30);
        assert!(!config.force);
        assert!(dir.path().join("w1/files").is_dir());
        assert!(dir.path().join("w1/info").is_dir());
        assert!(config
            .guard
            .matching_prefix(Path::new("/usr/bin/vi"))
            .is_some());
    }

    #[test]
    fn registration_order_is_preserved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fs = RealFileSystem;
        let contents = format!(
            "WASTE = {root}/first\nWASTE = {root}/second\n",
            root = dir.path().display()
        );
        let config = Config::parse(&fs, &contents).expect("config");
        // Both live on the same device; the first registered entry serves it.
        let device = fs.device_of(dir.path()).expect("device");
        let chosen = config.registry.for_device(device).expect("match");
        assert!(chosen.parent.ends_with("first"));
    }

    #[test]
    fn no_usable_waste_folder_is_fatal() {
        let fs = RealFileSystem;
        assert!(matches!(
            Config::parse(&fs, "purge_after = 9\n"),
            Err(Error::NoWasteFolder)
        ));
    }

    #[test]
    fn force_flag_can_come_from_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fs = RealFileSystem;
        let contents = format!("WASTE = {}/w\nforce = true\n", dir.path().display());
        let config = Config::parse(&fs, &contents).expect("config");
        assert!(config.force);
    }
}
