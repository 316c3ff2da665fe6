use clap::{CommandFactory, Parser, Subcommand};
use log::error;
use serde::Serialize;
use cfgmigrate::container::read_container;
use cfgmigrate::migrate::{migrate, MigrateOptions};
use cfgmigrate::{HashCode, Record};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[cfg(debug_assertions)]
const DEFAULT_LOG_LEVEL: &str = "debug";

#[cfg(not(debug_assertions))]
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser)]
#[command(name = "cfgmigrate", about = "Migrate container-indexed save blobs to named .cfg files")]
struct Cli {
    /// Container file name, resolved inside the source directory
    #[arg(long, global = true, default_value = "container.51")]
    container: String,
    /// Directory holding the container and the hash-named save blobs
    #[arg(long, global = true, default_value = "./")]
    source: PathBuf,
    /// Directory receiving the .cfg saves
    #[arg(long, global = true, default_value = "./cfg")]
    dest: PathBuf,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy every blob to its named .cfg file (default)
    Migrate {
        /// Attempt every record and report all failures at the end
        #[arg(long)]
        continue_on_error: bool,
        /// Create the destination directory if it does not exist
        #[arg(long)]
        create_dest: bool,
        /// Resolve and check every transfer without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
    /// List the records in the container
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct ListEntry<'a> {
    index:     usize,
    hash_code: HashCode,
    #[serde(flatten)]
    record:    &'a Record,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL)
    ).init();

    let cli = Cli::parse();
    if cli.container.is_empty()
        || cli.source.as_os_str().is_empty()
        || cli.dest.as_os_str().is_empty()
    {
        println!("Usage:");
        let _ = Cli::command().print_help();
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let container_path = cli.source.join(&cli.container);
    let records = read_container(&container_path)?;

    match cli.command.unwrap_or(Commands::Migrate {
        continue_on_error: false,
        create_dest:       false,
        dry_run:           false,
    }) {

        // ── Migrate ──────────────────────────────────────────────────────────
        Commands::Migrate { continue_on_error, create_dest, dry_run } => {
            let opts = MigrateOptions {
                continue_on_error,
                create_dest_dir: create_dest,
                dry_run,
            };
            let mut print_copy = |src: &Path, dst: &Path| {
                println!("Copy {} -> {}", src.display(), dst.display());
            };
            let report = migrate(&records, &cli.source, &cli.dest, &opts, Some(&mut print_copy))?;

            if dry_run {
                for t in &report.transferred {
                    println!("Would copy {} -> {}", t.src.display(), t.dst.display());
                }
            }
            let report = report.check()?;
            println!("Migrated {} record(s), {} bytes", report.transferred.len(), report.total_bytes());
        }

        // ── List ─────────────────────────────────────────────────────────────
        Commands::List { json } => {
            if json {
                let entries: Vec<ListEntry> = records.iter()
                    .enumerate()
                    .map(|(index, record)| ListEntry { index, hash_code: record.hash_code(), record })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("Container: {} ({} record(s))", container_path.display(), records.len());
                println!("{:>5}  {:<32}  {:>10} {:>6} {:>6} {:>20}  {}",
                         "#", "Hash code", "Value1", "Value2", "Value3", "Value4", "Filename");
                for (i, r) in records.iter().enumerate() {
                    println!("{:>5}  {}  {:>10} {:>6} {:>6} {:>20}  {}",
                        i, r.hash_code(), r.value1, r.value2, r.value3, r.value4, r.filename);
                }
            }
        }
    }

    Ok(())
}
