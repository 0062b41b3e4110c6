//! The move engine: relocates requested paths into waste folders selected by
//! device affinity, writing metadata and the undo log as it goes.

use std::path::{Path, PathBuf};

use crate::errors::{Disposition, Error, Result};
use crate::guard::ProtectedPathGuard;
use crate::helpers::{self, base_name};
use crate::models::{RunContext, Target, WasteDirectory};
use crate::registry::WasteRegistry;
use crate::trashinfo;
use crate::undo::UndoLog;

/// Trashes every target in order. A recoverable per-item failure is reported
/// and skipped; a systemic one (no matching filesystem, rename failure,
/// unusable undo log) ends the run. Returns the number of items trashed.
pub fn run(
    ctx: &RunContext,
    registry: &WasteRegistry,
    guard: &ProtectedPathGuard,
    targets: &[PathBuf],
    undo_path: PathBuf,
) -> Result<usize> {
    // Fatal when the fixed undo-log path itself is overlong.
    let mut undo = UndoLog::prepare(ctx.fs, undo_path)?;
    let mut trashed = 0usize;

    for given in targets {
        match trash_one(ctx, registry, guard, given, &mut undo) {
            Ok(()) => trashed += 1,
            Err(err) => {
                if err.disposition() == Disposition::AbortRun {
                    // The undo log closes on drop; entries written so far
                    // stay valid for a later undo.
                    return Err(err);
                }
                eprintln!("{err}");
            }
        }
    }

    undo.finish()?;
    println!(
        "{trashed} {} moved to waste",
        if trashed == 1 { "file was" } else { "files were" }
    );
    Ok(trashed)
}

fn trash_one(
    ctx: &RunContext,
    registry: &WasteRegistry,
    guard: &ProtectedPathGuard,
    given: &Path,
    undo: &mut UndoLog,
) -> Result<()> {
    let (target, waste) = prepare_target(ctx, registry, guard, given)?;

    // The rename acts on the path as given, preserving symlink-ness.
    ctx.fs
        .rename(&target.given, &target.destination)
        .map_err(|source| Error::RenameFailure {
            path: target.given.clone(),
            source,
        })?;
    ctx.announce_move(&target.given, &target.destination);

    let dest_base = base_name(&target.destination).unwrap_or_else(|| target.base_name.clone());

    // Deliberate asymmetry: a failed metadata write is reported, but the
    // already-moved file is still logged so it stays auditable by path.
    if let Err(err) = trashinfo::write_record(
        ctx.fs,
        waste,
        &dest_base,
        &target.real,
        &ctx.deletion_stamp(),
    ) {
        eprintln!("{err}");
    }

    undo.record(&target.destination)
}

/// Resolves one requested path into a ready-to-rename target, paired with
/// the waste folder that will receive it.
fn prepare_target<'r>(
    ctx: &RunContext,
    registry: &'r WasteRegistry,
    guard: &ProtectedPathGuard,
    given: &Path,
) -> Result<(Target, &'r WasteDirectory)> {
    helpers::check_path_len(given)?;

    // Existence of the entry itself; a broken symlink is a valid target.
    if !ctx.fs.entry_exists(given) {
        return Err(Error::NotFound(given.to_path_buf()));
    }

    let real = resolve_real(ctx, given)?;
    guard.check(&real, ctx.bypass)?;

    // Stat the link itself so a symlink is matched to the filesystem it
    // lives on, not the one its target lives on.
    let device = ctx.fs.device_of(given)?;
    let waste = registry
        .for_device(device)
        .ok_or_else(|| Error::NoDestinationFilesystem(given.to_path_buf()))?;

    let base = base_name(given).ok_or_else(|| Error::NotFound(given.to_path_buf()))?;
    let mut destination = waste.payload_path(&base);
    let mut is_duplicate = false;
    if ctx.fs.entry_exists(&destination) {
        // Suffix applied once; the suffixed name is not re-checked.
        destination = waste.payload_path(&format!("{base}{}", ctx.duplicate_suffix()));
        is_duplicate = true;
    }
    helpers::check_path_len(&destination)?;

    Ok((
        Target {
            given: given.to_path_buf(),
            real,
            base_name: base,
            destination,
            is_duplicate,
        },
        waste,
    ))
}

/// Canonical path used only for the protection check and the recorded
/// original location. A broken symlink cannot be fully canonicalized, so
/// its parent is resolved and the link name re-attached.
fn resolve_real(ctx: &RunContext, given: &Path) -> Result<PathBuf> {
    match ctx.fs.canonicalize(given) {
        Ok(real) => Ok(real),
        Err(_) => {
            let name = given
                .file_name()
                .ok_or_else(|| Error::NotFound(given.to_path_buf()))?;
            let parent = match given.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
                _ => PathBuf::from("."),
            };
            Ok(ctx.fs.canonicalize(&parent)?.join(name))
        }
    }
}
