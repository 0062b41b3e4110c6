//! Restoring waste entries: by name, or by undoing the most recent run.
//!
//! Both modes share one primitive: move a destination back to its recorded
//! original path and drop the metadata record. Per-item failures are
//! reported and never abort the remaining restores.

use std::path::{Path, PathBuf};

use crate::errors::{Error, Result};
use crate::helpers::base_name;
use crate::models::{RunContext, WasteDirectory};
use crate::registry::WasteRegistry;
use crate::trashinfo;
use crate::undo;

/// Restores each named item, searching every waste folder. Names are
/// destination base names; a path into a known `files/` area is accepted
/// too. Returns the number restored.
pub fn restore_by_name(ctx: &RunContext, registry: &WasteRegistry, names: &[String]) -> usize {
    let mut restored = 0usize;
    for name in names {
        let located = locate(ctx, registry, name);
        let result = match located {
            Some((waste, dest_base)) => restore_entry(ctx, waste, &dest_base),
            None => Err(Error::RestoreTargetNotFound(name.clone())),
        };
        match result {
            Ok(original) => {
                restored += 1;
                if ctx.verbose {
                    println!("restored '{}'", original.display());
                }
            }
            Err(err) => eprintln!("{err}"),
        }
    }
    restored
}

/// Replays the most recent run's undo log, first trashed first restored,
/// then discards the log so a second undo has nothing to act on.
pub fn undo_last(ctx: &RunContext, registry: &WasteRegistry, undo_path: &Path) -> Result<usize> {
    let Some(entries) = undo::read_entries(ctx.fs, undo_path)? else {
        println!("there is no record of a previous run to undo");
        return Ok(0);
    };

    let mut restored = 0usize;
    for destination in &entries {
        let result = match destination_in_registry(registry, destination) {
            Some((waste, dest_base)) => restore_entry(ctx, waste, &dest_base),
            None => Err(Error::RestoreTargetNotFound(
                destination.display().to_string(),
            )),
        };
        match result {
            Ok(original) => {
                restored += 1;
                if ctx.verbose {
                    println!("restored '{}'", original.display());
                }
            }
            Err(err) => eprintln!("{err}"),
        }
    }

    undo::discard(ctx.fs, undo_path)?;
    println!(
        "{restored} {} restored",
        if restored == 1 { "file was" } else { "files were" }
    );
    Ok(restored)
}

/// The shared move-back primitive. The metadata record must exist; its
/// absence for a present payload is the recoverable inconsistency reported
/// as `RestoreTargetNotFound`, leaving the waste folder unchanged.
fn restore_entry(
    ctx: &RunContext,
    waste: &WasteDirectory,
    dest_base: &str,
) -> Result<PathBuf> {
    let destination = waste.payload_path(dest_base);
    if !ctx.fs.entry_exists(&destination) {
        return Err(Error::RestoreTargetNotFound(dest_base.to_string()));
    }
    let info = trashinfo::read_record(ctx.fs, waste, dest_base)?;

    let mut original = info.original_path.clone();
    if ctx.fs.entry_exists(&original) {
        // Occupied original location: keep the restored item, disambiguated
        // with the run's time suffix.
        let renamed = format!(
            "{}{}",
            base_name(&original).unwrap_or_else(|| dest_base.to_string()),
            ctx.duplicate_suffix()
        );
        original = original
            .parent()
            .map(|parent| parent.join(&renamed))
            .unwrap_or_else(|| PathBuf::from(&renamed));
        eprintln!(
            "'{}' already exists; restoring as '{}'",
            info.original_path.display(),
            original.display()
        );
    }

    ctx.fs
        .rename(&destination, &original)
        .map_err(|source| Error::RenameFailure {
            path: destination.clone(),
            source,
        })?;
    ctx.announce_move(&destination, &original);

    if let Err(err) = ctx.fs.remove_file(&waste.record_path(dest_base)) {
        eprintln!("{err}");
    }
    Ok(original)
}

/// Finds which waste folder holds the named item. A bare name is searched
/// across every `files/` area in registration order.
fn locate<'a>(
    ctx: &RunContext,
    registry: &'a WasteRegistry,
    name: &str,
) -> Option<(&'a WasteDirectory, String)> {
    let as_path = Path::new(name);
    if as_path.components().count() > 1 {
        return destination_in_registry(registry, as_path);
    }
    registry
        .iter()
        .find(|waste| ctx.fs.entry_exists(&waste.payload_path(name)))
        .map(|waste| (waste, name.to_string()))
}

fn destination_in_registry<'a>(
    registry: &'a WasteRegistry,
    destination: &Path,
) -> Option<(&'a WasteDirectory, String)> {
    let waste = registry
        .iter()
        .find(|waste| destination.starts_with(&waste.files))?;
    Some((waste, base_name(destination)?))
}
