//! hook-lineage CLI: run instrumented file operations and print their lineage.
//!
//! Usage:
//!   hook-lineage copy <src> <dst> [--config path]
//!   hook-lineage cat <path>...
//!   hook-lineage rm <path> [--missing-ok]

use clap::{Parser, Subcommand};
use hook_lineage::{
    DatasetFactoryRegistry, HookLineageCollector, LineageConfig, LocalFileSystem, StoragePath,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;

#[derive(Parser)]
#[command(
    name = "hook-lineage",
    version,
    about = "Run file operations and report the dataset lineage they produce"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Path to a YAML lineage configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy a file, recording the source as input and the target as output
    Copy {
        /// File to read
        src: PathBuf,
        /// File to write
        dst: PathBuf,
    },
    /// Print files, recording each as an input
    Cat {
        /// Files to read
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Delete a file
    Rm {
        /// File to delete
        path: PathBuf,
        /// Do not fail if the file does not exist
        #[arg(long)]
        missing_ok: bool,
    },
}

/// Get the default config path (~/.config/hook-lineage/config.yaml)
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hook-lineage").join("config.yaml"))
}

/// Load `explicit` if given, else `default` when it exists, else built-in defaults.
fn load_config(
    explicit: Option<PathBuf>,
    default: Option<PathBuf>,
) -> Result<LineageConfig, String> {
    let path = match (explicit, default) {
        (Some(path), _) => path,
        (None, Some(path)) if path.exists() => path,
        _ => return Ok(LineageConfig::default()),
    };
    LineageConfig::load(&path)
        .map_err(|e| format!("Failed to load config '{}': {}", path.display(), e))
}

fn storage_path(path: &Path, collector: &HookLineageCollector) -> Result<StoragePath, String> {
    let uri = LocalFileSystem::path_to_uri(path)
        .map_err(|e| format!("cannot resolve '{}': {}", path.display(), e))?;
    Ok(StoragePath::new(Arc::new(LocalFileSystem::new()), uri).with_collector(collector.clone()))
}

fn cmd_copy(collector: &HookLineageCollector, src: &Path, dst: &Path) -> Result<(), String> {
    let source = storage_path(src, collector)?;
    let target = storage_path(dst, collector)?;
    let data = source
        .read_bytes()
        .map_err(|e| format!("reading '{}': {}", src.display(), e))?;
    let written = target
        .write_bytes(&data)
        .map_err(|e| format!("writing '{}': {}", dst.display(), e))?;
    tracing::info!(src = %source, dst = %target, bytes = written, "Copied");
    Ok(())
}

fn cmd_cat(collector: &HookLineageCollector, paths: &[PathBuf]) -> Result<(), String> {
    let mut stdout = std::io::stdout().lock();
    for path in paths {
        let data = storage_path(path, collector)?
            .read_bytes()
            .map_err(|e| format!("reading '{}': {}", path.display(), e))?;
        stdout.write_all(&data).map_err(|e| e.to_string())?;
    }
    stdout.flush().map_err(|e| e.to_string())
}

fn cmd_rm(collector: &HookLineageCollector, path: &Path, missing_ok: bool) -> Result<(), String> {
    storage_path(path, collector)?
        .unlink(missing_ok)
        .map_err(|e| format!("deleting '{}': {}", path.display(), e))
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(cli.config, default_config_path()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let registry = DatasetFactoryRegistry::global();
    config.register_into(&registry);
    let collector = HookLineageCollector::with_config(registry, &config);

    let result = match &cli.command {
        Commands::Copy { src, dst } => cmd_copy(&collector, src, dst),
        Commands::Cat { paths } => cmd_cat(&collector, paths),
        Commands::Rm { path, missing_ok } => cmd_rm(&collector, path, *missing_ok),
    };

    // The report covers whatever completed, including before a failure.
    match serde_json::to_string_pretty(&collector.collected()) {
        Ok(json) => {
            // `cat` output and the lineage report share stdout
            if matches!(cli.command, Commands::Cat { .. }) {
                println!();
            }
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
