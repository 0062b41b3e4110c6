use crate::errors::{Error, Result};
use crate::models::WasteDirectory;

/// Ordered set of waste folders, loaded once at startup.
///
/// Device affinity is first-match-wins in registration order; when two
/// entries share a device the earlier one serves it. That tie break is
/// policy, not happenstance, so the collection stays a plain ordered list.
#[derive(Debug, Clone)]
pub struct WasteRegistry {
    dirs: Vec<WasteDirectory>,
}

impl WasteRegistry {
    /// Builds the registry. An empty set means configuration supplied no
    /// usable waste folder, which is a fatal startup condition.
    pub fn new(dirs: Vec<WasteDirectory>) -> Result<Self> {
        if dirs.is_empty() {
            return Err(Error::NoWasteFolder);
        }
        Ok(Self { dirs })
    }

    /// First registered waste folder living on the given device.
    pub fn for_device(&self, device: u64) -> Option<&WasteDirectory> {
        self.dirs.iter().find(|dir| dir.device == device)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WasteDirectory> {
        self.dirs.iter()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn dir(parent: &str, device: u64) -> WasteDirectory {
        let parent = PathBuf::from(parent);
        WasteDirectory {
            files: parent.join("files"),
            info: parent.join("info"),
            parent,
            device,
        }
    }

    #[test]
    fn empty_registry_is_fatal() {
        assert!(matches!(
            WasteRegistry::new(Vec::new()),
            Err(Error::NoWasteFolder)
        ));
    }

    #[test]
    fn first_registered_entry_wins_device_ties() {
        let registry =
            WasteRegistry::new(vec![dir("/a", 1), dir("/b", 2), dir("/c", 1)]).expect("registry");
        let found = registry.for_device(1).expect("device 1");
        assert_eq!(found.parent, PathBuf::from("/a"));
        assert!(registry.for_device(9).is_none());
    }
}
