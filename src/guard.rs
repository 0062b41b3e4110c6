use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};

/// Checks whether a resolved path falls under a configured protected prefix.
///
/// Matching is case sensitive and on whole path segments: `/usr` protects
/// `/usr/bin/vi` but not `/usr2`. Pure; the only state is the ordered prefix
/// set loaded from configuration.
#[derive(Debug, Clone, Default)]
pub struct ProtectedPathGuard {
    prefixes: Vec<PathBuf>,
}

impl ProtectedPathGuard {
    pub fn new(prefixes: Vec<PathBuf>) -> Self {
        Self { prefixes }
    }

    /// The protected prefix covering `real`, if any.
    pub fn matching_prefix(&self, real: &Path) -> Option<&Path> {
        self.prefixes
            .iter()
            .map(PathBuf::as_path)
            .find(|prefix| real.starts_with(prefix))
    }

    /// Rejects protected paths unless the bypass flag short-circuits the
    /// whole check.
    pub fn check(&self, real: &Path, bypass: bool) -> Result<()> {
        if bypass {
            return Ok(());
        }
        match self.matching_prefix(real) {
            Some(_) => Err(Error::ProtectedPath(real.to_path_buf())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guard() -> ProtectedPathGuard {
        ProtectedPathGuard::new(vec![PathBuf::from("/usr"), PathBuf::from("/etc")])
    }

    #[test]
    fn prefix_matches_whole_segments_only() {
        let guard = guard();
        assert!(guard.check(Path::new("/usr/bin/vi"), false).is_err());
        assert!(guard.check(Path::new("/usr"), false).is_err());
        assert!(guard.check(Path::new("/usr2/bin"), false).is_ok());
        assert!(guard.check(Path::new("/home/u/file"), false).is_ok());
    }

    #[test]
    fn matching_is_case_sensitive() {
        let guard = guard();
        assert!(guard.check(Path::new("/Usr/bin"), false).is_ok());
    }

    #[test]
    fn bypass_short_circuits() {
        let guard = guard();
        assert!(guard.check(Path::new("/usr/bin/vi"), true).is_ok());
    }
}
