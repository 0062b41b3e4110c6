//! Age-based purging of waste entries, plus the maintenance pass that
//! re-adopts orphaned payloads.

use chrono::{Duration, NaiveDate};
use std::path::Path;

use crate::config;
use crate::fs::FileSystem;
use crate::helpers::{base_name, TRASHINFO_EXTENSION};
use crate::models::RunContext;
use crate::registry::WasteRegistry;
use crate::trashinfo;

/// Deletes every entry whose recorded deletion time is older than the
/// retention. Whether purging should run at all is the caller's decision;
/// this engine purges unconditionally when invoked. Returns the number of
/// entries fully removed.
pub fn run(ctx: &RunContext, registry: &WasteRegistry, retention_days: u32) -> usize {
    let cutoff = Duration::days(i64::from(retention_days));
    let mut purged = 0usize;

    for waste in registry.iter() {
        let records = match ctx.fs.list_dir(&waste.info) {
            Ok(records) => records,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        for record_path in records {
            let Some(dest_base) = record_base_name(&record_path) else {
                continue;
            };
            let info = match ctx
                .fs
                .read_to_string(&record_path)
                .map(|contents| trashinfo::parse(&contents))
            {
                Ok(Some(info)) => info,
                Ok(None) => {
                    eprintln!(
                        "skipping unreadable metadata record {}",
                        record_path.display()
                    );
                    continue;
                }
                Err(err) => {
                    eprintln!("{err}");
                    continue;
                }
            };
            let Some(deleted_at) = info.deleted_at else {
                eprintln!(
                    "skipping record without deletion date {}",
                    record_path.display()
                );
                continue;
            };
            if ctx.now.signed_duration_since(deleted_at) <= cutoff {
                continue;
            }

            // Payload and record removal are attempted independently;
            // a failure of one never blocks the other.
            let payload = waste.payload_path(&dest_base);
            let mut ok = true;
            if ctx.fs.entry_exists(&payload) {
                if let Err(err) = ctx.fs.remove_entry(&payload) {
                    eprintln!("{err}");
                    ok = false;
                }
            } else {
                eprintln!("no payload for record {}", record_path.display());
            }
            if let Err(err) = ctx.fs.remove_file(&record_path) {
                eprintln!("{err}");
                ok = false;
            }
            if ok {
                purged += 1;
                if ctx.verbose {
                    println!("purged '{}'", info.original_path.display());
                }
            }
        }
    }

    println!(
        "{purged} {} purged",
        if purged == 1 { "item was" } else { "items were" }
    );
    purged
}

/// Writes a fresh metadata record for every payload that lacks one, so stray
/// items re-enter the purge/restore lifecycle. The recorded original path is
/// the payload itself and the deletion clock restarts now.
pub fn adopt_orphans(ctx: &RunContext, registry: &WasteRegistry) -> usize {
    let mut adopted = 0usize;

    for waste in registry.iter() {
        let payloads = match ctx.fs.list_dir(&waste.files) {
            Ok(payloads) => payloads,
            Err(err) => {
                eprintln!("{err}");
                continue;
            }
        };
        for payload in payloads {
            let Some(dest_base) = base_name(&payload) else {
                continue;
            };
            if ctx.fs.entry_exists(&waste.record_path(&dest_base)) {
                continue;
            }
            match trashinfo::write_record(ctx.fs, waste, &dest_base, &payload, &ctx.deletion_stamp())
            {
                Ok(()) => {
                    adopted += 1;
                    if ctx.verbose {
                        println!("adopted orphan '{}'", payload.display());
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
        }
    }

    println!(
        "{adopted} orphaned {} given new metadata",
        if adopted == 1 { "item was" } else { "items were" }
    );
    adopted
}

/// Day-granularity gate: purging is due when the persisted stamp names a
/// different day than today (or is missing). Updates the stamp whenever it
/// fires so at most one timed purge happens per day.
pub fn is_time_to_purge(fs: &dyn FileSystem, stamp_path: &Path, today: NaiveDate) -> bool {
    let today_str = today.format("%Y-%m-%d").to_string();
    let due = match fs.read_to_string(stamp_path) {
        Ok(stamp) => stamp.trim() != today_str,
        Err(_) => true,
    };
    if due {
        if let Err(err) = fs.write_to_string(stamp_path, &today_str) {
            eprintln!("{err}");
        }
    }
    due
}

fn record_base_name(record_path: &Path) -> Option<String> {
    let name = record_path.file_name()?.to_str()?;
    let base = name.strip_suffix(TRASHINFO_EXTENSION)?;
    (!base.is_empty()).then(|| base.to_string())
}

/// Caller-level gate combining retention, explicit request, the daily stamp,
/// and the force flag, mirroring the reference behavior.
pub fn maybe_run(
    ctx: &RunContext,
    registry: &WasteRegistry,
    retention_days: u32,
    requested: bool,
    data_dir: &Path,
) {
    if requested && retention_days == 0 {
        println!("purging is disabled, 'purge_after' is set to '0'");
    }
    if retention_days == 0 {
        return;
    }
    let stamp = config::purge_stamp_path(data_dir);
    if is_time_to_purge(ctx.fs, &stamp, ctx.now.date_naive()) || requested {
        if ctx.force {
            run(ctx, registry, retention_days);
        } else {
            eprintln!("purge skipped: use -f or --force");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::RealFileSystem;
    use chrono::NaiveDate;

    #[test]
    fn stamp_gate_fires_once_per_day() {
        let dir = tempfile::tempdir().expect("tempdir");
        let fs = RealFileSystem;
        let stamp = dir.path().join("lastpurge");
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).expect("date");

        assert!(is_time_to_purge(&fs, &stamp, today));
        assert!(!is_time_to_purge(&fs, &stamp, today));
        let tomorrow = today.succ_opt().expect("date");
        assert!(is_time_to_purge(&fs, &stamp, tomorrow));
    }

    #[test]
    fn record_names_strip_extension() {
        assert_eq!(
            record_base_name(Path::new("/w/info/notes.txt.trashinfo")).as_deref(),
            Some("notes.txt")
        );
        assert_eq!(record_base_name(Path::new("/w/info/notes.txt")), None);
        assert_eq!(record_base_name(Path::new("/w/info/.trashinfo")), None);
    }
}
