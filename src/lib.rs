//! Safe-delete core: moves files into per-filesystem waste folders instead
//! of unlinking them, keeping enough metadata to restore them, undo the most
//! recent run, and purge entries past a retention age.

pub mod config;
pub mod errors;
pub mod fs;
pub mod guard;
pub mod helpers;
pub mod models;
pub mod purge;
pub mod put;
pub mod registry;
pub mod restore;
pub mod trashinfo;
pub mod undo;

pub use config::Config;
pub use errors::{Disposition, Error, Result};
pub use fs::{FileSystem, RealFileSystem};
pub use guard::ProtectedPathGuard;
pub use models::{RunContext, Target, WasteDirectory};
pub use registry::WasteRegistry;

/// Re-export a small stable API surface for the command-line front end.
pub mod prelude {
    pub use crate::{
        config::Config,
        errors::{Disposition, Error, Result},
        fs::{FileSystem, RealFileSystem},
        guard::ProtectedPathGuard,
        models::{RunContext, Target, WasteDirectory},
        registry::WasteRegistry,
    };
}
