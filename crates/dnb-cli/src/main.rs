//! dnb CLI — daily notebook
//!
//! Commands: open, path, list, completions

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use dnb_core::config::{default_config_path, Config, Notebook, SystemHome};
use dnb_vault::{resolve_and_rollover, DailyEntry, RolloverOptions, RolloverOutcome};

const DEFAULT_EDITOR: &str = "vim";

#[derive(Parser)]
#[command(name = "dnb")]
#[command(version)]
#[command(about = "Daily notebook: one text file per day, seeded from the day before")]
struct Cli {
    /// Config file [default: ~/.dnbconf/config.yaml]
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start new days empty instead of copying the latest earlier day
    #[arg(long, global = true)]
    no_rollover: bool,

    /// More log output (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Open today's file of a notebook in the editor
    #[command(alias = "o")]
    Open { notebook: String },
    /// Resolve today's file and print its path
    Path {
        notebook: String,
        /// Print a JSON report instead of the bare path
        #[arg(long)]
        json: bool,
    },
    /// List configured notebooks
    #[command(alias = "ls")]
    List {
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions { shell: Shell },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Open { notebook } => {
            let config = load_config(config_path)?;
            let (_, entry) = today_entry(&config, &notebook, cli.no_rollover)?;
            let editor = resolve_editor(&config);
            launch_editor(&editor, &entry.path)
        }
        Commands::Path { notebook, json } => {
            let config = load_config(config_path)?;
            let (notebook, entry) = today_entry(&config, &notebook, cli.no_rollover)?;
            if json {
                let out = PathOutput::new(&notebook.name, &entry);
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                println!("{}", entry.path.display());
            }
            Ok(())
        }
        Commands::List { json } => {
            let config = load_config(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config.notebooks)?);
            } else {
                println!("Notebooks:");
                for name in &config.notebooks {
                    println!("- {name}");
                }
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "dnb", &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path(&SystemHome)?,
    };
    tracing::debug!(path = %path.display(), "loading config");
    Config::load(&path).with_context(|| format!("cannot load config {}", path.display()))
}

/// Resolve today's file for `name`, rolling over when it is new.
fn today_entry(
    config: &Config,
    name: &str,
    no_rollover: bool,
) -> Result<(Notebook, DailyEntry)> {
    let notebook = config.notebook(name, &SystemHome)?;
    let options = RolloverOptions {
        enabled: config.rollover && !no_rollover,
    };
    let today = Local::now().date_naive();

    let entry = resolve_and_rollover(&notebook.root, today, options)
        .with_context(|| format!("cannot open today's file in notebook '{}'", notebook.name))?;

    if let RolloverOutcome::RolledOver { from } | RolloverOutcome::CopyFailed { from } =
        &entry.report.outcome
    {
        eprintln!("Rolling over from {}", from.display());
    }
    if !entry.report.is_clean() {
        eprintln!("warning: today's file was created, but:");
        for err in &entry.report.errors {
            eprintln!("  {err}");
        }
    }
    for skipped in &entry.report.skipped {
        tracing::warn!(
            path = ?skipped.path,
            reason = %skipped.reason,
            "skipped while scanning notebook"
        );
    }
    Ok((notebook, entry))
}

/// Editor command: config, then `$EDITOR`, then vim.
fn resolve_editor(config: &Config) -> String {
    config
        .editor
        .clone()
        .or_else(|| std::env::var("EDITOR").ok())
        .filter(|editor| !editor.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_EDITOR.to_string())
}

fn launch_editor(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts.next().context("editor command is empty")?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .with_context(|| format!("cannot launch editor '{program}'"))?;
    if !status.success() {
        bail!("editor '{program}' exited with {status}");
    }
    Ok(())
}

#[derive(Serialize)]
struct PathOutput<'a> {
    notebook: &'a str,
    path: &'a Path,
    outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a Path>,
    header_written: bool,
    errors: Vec<String>,
    skipped: usize,
}

impl<'a> PathOutput<'a> {
    fn new(notebook: &'a str, entry: &'a DailyEntry) -> Self {
        let (outcome, from) = match &entry.report.outcome {
            RolloverOutcome::Existing => ("existing", None),
            RolloverOutcome::Fresh => ("fresh", None),
            RolloverOutcome::RolledOver { from } => ("rolled_over", Some(from.as_path())),
            RolloverOutcome::CopyFailed { from } => ("copy_failed", Some(from.as_path())),
        };
        Self {
            notebook,
            path: &entry.path,
            outcome,
            from,
            header_written: entry.report.header_written,
            errors: entry.report.errors.iter().map(ToString::to_string).collect(),
            skipped: entry.report.skipped.len(),
        }
    }
}
