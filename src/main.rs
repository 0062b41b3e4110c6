use std::path::PathBuf;
use std::process;

use clap::Parser;

use rmwaste::{config, purge, put, restore, Config, RealFileSystem, RunContext};

#[derive(Parser, Debug)]
#[command(
    name = "rmwaste",
    version,
    about = "Safely move files to a waste folder instead of unlinking them"
)]
struct Cli {
    /// Files to move to waste (or names to restore with --restore)
    files: Vec<PathBuf>,

    /// Print each move as it happens
    #[arg(short, long)]
    verbose: bool,

    /// Use an alternate configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List configured waste folders and exit
    #[arg(short, long)]
    list: bool,

    /// Purge expired waste entries this run
    #[arg(short = 'g', long)]
    purge: bool,

    /// Rewrite missing metadata for orphaned waste entries
    #[arg(short, long)]
    orphaned: bool,

    /// Restore the named items from waste
    #[arg(short = 'z', long)]
    restore: bool,

    /// Undo the most recent run, restoring everything it trashed
    #[arg(short, long)]
    undo_last: bool,

    /// Bypass the protected-path check
    #[arg(short = 'B', long)]
    bypass: bool,

    /// Allow the purge to actually delete
    #[arg(short, long)]
    force: bool,

    /// Not implemented; accepted for compatibility
    #[arg(short, long)]
    interactive: bool,

    /// Not implemented; accepted for compatibility
    #[arg(short, long)]
    recurse: bool,
}

fn main() {
    process::exit(run());
}

fn run() -> i32 {
    let cli = Cli::parse();

    if cli.interactive {
        println!("-i / --interactive: not implemented");
    }
    if cli.recurse {
        println!("-r / --recurse: not implemented");
    }

    let fs = RealFileSystem;
    let data_dir = match config::data_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let config = match Config::load(&fs, &data_dir, cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return 1;
        }
    };
    let ctx = RunContext::new(&fs, cli.verbose, cli.bypass, cli.force || config.force);

    purge::maybe_run(
        &ctx,
        &config.registry,
        config.purge_after_days,
        cli.purge,
        &data_dir,
    );

    // Listing combines with nothing else; show the roots and leave.
    if cli.list {
        for waste in config.registry.iter() {
            println!("{}", waste.parent.display());
        }
        return 0;
    }

    if cli.orphaned {
        purge::adopt_orphans(&ctx, &config.registry);
        return 0;
    }

    if cli.undo_last {
        return match restore::undo_last(&ctx, &config.registry, &config::undo_log_path(&data_dir))
        {
            Ok(_) => 0,
            Err(err) => {
                eprintln!("{err}");
                1
            }
        };
    }

    if cli.restore {
        let names: Vec<String> = cli
            .files
            .iter()
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        if names.is_empty() {
            eprintln!("--restore needs at least one name");
            return 1;
        }
        restore::restore_by_name(&ctx, &config.registry, &names);
        return 0;
    }

    if cli.files.is_empty() {
        if !cli.purge {
            eprintln!("missing filenames or command line options\nTry 'rmwaste --help' for more information");
        }
        return 0;
    }

    match put::run(
        &ctx,
        &config.registry,
        &config.guard,
        &cli.files,
        config::undo_log_path(&data_dir),
    ) {
        Ok(_) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}
