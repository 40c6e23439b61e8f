//! hookgen CLI - generate `On.` / `IL.` hook endpoints for C# projects

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hookgen_core::Config;
use std::path::{Path, PathBuf};

mod commands;
mod logging;

use commands::{GenerateOptions, cmd_config_init, cmd_config_show, cmd_generate, cmd_scan, cmd_types};
use logging::init_logging;

#[derive(Parser)]
#[command(name = "hookgen", version)]
#[command(about = "Generate On./IL. hook endpoints for C# projects")]
#[command(after_help = "\
QUICK START:
  hookgen config init             # Create .hookgen.toml in the project
  hookgen scan                    # List hook references found in sources
  hookgen generate                # Write hook endpoints to Generated/Hooks

COMMON WORKFLOWS:
  hookgen generate --dry-run      # Preview units without writing
  hookgen types --export t.json   # Dump collected types as a JSON table
  hookgen generate --types t.json # Resolve against extra type tables")]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Scan, resolve and write generated hook endpoints
  Generate {
    /// Project root (default: current directory)
    path: Option<PathBuf>,
    /// Output directory (default: configured output.directory)
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,
    /// Extra JSON type table, may be repeated
    #[arg(long = "types", value_name = "FILE")]
    types: Vec<PathBuf>,
    /// List units without writing them
    #[arg(long)]
    dry_run: bool,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// List hook references per kind
  Scan {
    /// Project root (default: current directory)
    path: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Show or export the type table collected from sources
  Types {
    /// Project root (default: current directory)
    path: Option<PathBuf>,
    /// Write the table as JSON to this file
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
    /// Output as JSON
    #[arg(long)]
    json: bool,
  },
  /// Manage configuration
  Config {
    #[command(subcommand)]
    command: ConfigCommand,
  },
}

#[derive(Subcommand)]
enum ConfigCommand {
  /// Show effective configuration
  Show {
    /// Project root (default: current directory)
    path: Option<PathBuf>,
  },
  /// Write a commented .hookgen.toml template
  Init {
    /// Project root (default: current directory)
    path: Option<PathBuf>,
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
  },
}

impl Commands {
  fn path(&self) -> Option<&Path> {
    match self {
      Commands::Generate { path, .. } | Commands::Scan { path, .. } | Commands::Types { path, .. } => path.as_deref(),
      Commands::Config { command } => match command {
        ConfigCommand::Show { path } | ConfigCommand::Init { path, .. } => path.as_deref(),
      },
    }
  }
}

fn project_root(path: Option<&Path>) -> Result<PathBuf> {
  match path {
    Some(path) => Ok(path.to_path_buf()),
    None => std::env::current_dir().context("Failed to determine current directory"),
  }
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  let root = project_root(cli.command.path())?;
  let config = Config::load_for_project(&root).context("Failed to load configuration")?;
  init_logging(&config.log);

  match cli.command {
    Commands::Generate {
      path: _,
      out,
      types,
      dry_run,
      json,
    } => cmd_generate(
      &root,
      &config,
      GenerateOptions {
        out,
        types,
        dry_run,
        json,
      },
    ),
    Commands::Scan { path: _, json } => cmd_scan(&root, &config, json),
    Commands::Types { path: _, export, json } => cmd_types(&root, &config, export.as_deref(), json),
    Commands::Config { command } => match command {
      ConfigCommand::Show { .. } => cmd_config_show(&root, &config),
      ConfigCommand::Init { path: _, force } => cmd_config_init(&root, force),
    },
  }
}
