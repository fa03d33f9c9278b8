use clap::Parser;
use plainpad::config::{RcConfig, RcLoader};
use plainpad::session::Session;
use plainpad::shell::{Shell, spawn_stdin_reader};
use plainpad::storage::RecentFiles;
use std::io;
use std::path::PathBuf;
use tracing::{Level, info};

#[derive(Parser, Debug)]
#[command(name = "plainpad")]
#[command(about = "A plain-text editor with find/replace and auto-save")]
#[command(version)]
struct Args {
    /// File to edit (starts an untitled document if omitted)
    file: Option<PathBuf>,

    /// Read settings from this file instead of .plainpadrc
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable auto-save for this run
    #[arg(long)]
    no_autosave: bool,

    /// Seconds between auto-saves
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    autosave_interval: Option<u64>,

    /// Print a sample .plainpadrc and exit
    #[arg(long)]
    sample_rc: bool,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.sample_rc {
        print!("{}", RcLoader::generate_sample_rc());
        return Ok(());
    }

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = load_config(&args);
    info!(?config, "configuration loaded");

    let recent = match RecentFiles::default_storage() {
        Some(storage) if config.remember_recent => RecentFiles::load(storage),
        _ => RecentFiles::in_memory(),
    };

    let mut session = Session::new(&config, recent);
    if let Some(file) = &args.file {
        session.open_initial(file)?;
    }

    let mut shell = Shell::new(session, spawn_stdin_reader(), io::stdout());
    shell.run()?;
    Ok(())
}

fn load_config(args: &Args) -> RcConfig {
    let mut config = match &args.config {
        Some(path) => RcLoader::load_from(path),
        None => RcLoader::load_config(),
    };
    if args.no_autosave {
        config.autosave = false;
    }
    if let Some(secs) = args.autosave_interval {
        config.autosave_interval_secs = secs;
    }
    config
}
