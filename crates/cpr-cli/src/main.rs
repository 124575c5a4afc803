//! cubase-project-plugins - List the plugins used by Cubase projects
//!
//! This tool walks directories for `.cpr` project files, reads the Cubase
//! version and plugins out of each one and summarises plugin usage across
//! all of them.

mod config;
mod discovery;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use cpr_core::{NulPolicy, ReaderConfig};
use report::Reporter;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace, warn, Level};
use tracing_subscriber::EnvFilter;

/// Displays all plugins used in your Cubase projects along with the Cubase
/// version the project was created with
#[derive(Parser, Debug)]
#[command(name = "cubase-project-plugins")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project files or directories to search for projects
    #[arg(required = true, value_name = "PROJECT_PATH")]
    project_paths: Vec<PathBuf>,

    /// Config file path (defaults to ~/.config/cubase-project-plugins.toml)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Fail on tokens missing a NUL terminator instead of reading the whole token
    #[arg(long)]
    strict: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let config = Config::load(cli.config.as_deref())?;
    let filter = config.path_filter()?;

    let policy = if cli.strict {
        NulPolicy::Strict
    } else {
        NulPolicy::Lenient
    };
    let reader_config = ReaderConfig::new().nul_policy(policy);

    let stdout = io::stdout();
    let color = stdout.is_terminal();
    let mut reporter = Reporter::new(stdout.lock(), color);

    let mut failed = 0;
    for root in &cli.project_paths {
        info!("Searching {}", root.display());
        for path in discovery::find_projects(root, &filter) {
            if let Err(e) = process_project(reader_config, &config, &path, &mut reporter) {
                // Log error but continue with other files
                warn!("Skipping {}: {:#}", path.display(), e);
                failed += 1;
            }
        }
    }

    reporter.summary().context("Failed to write summary")?;

    info!(
        "Reported {} projects using {} distinct plugins, skipped {} unreadable projects",
        reporter.projects_reported(),
        reporter.counts().all.len(),
        failed
    );

    Ok(())
}

/// Read one project file and add it to the report
fn process_project<W: Write>(
    reader_config: ReaderConfig,
    config: &Config,
    path: &Path,
    reporter: &mut Reporter<W>,
) -> Result<()> {
    trace!("Reading {}", path.display());
    let project = cpr_core::parse_file_with_config(path, reader_config)?;
    debug!(
        "{}: {} {} ({}), {} plugins",
        path.display(),
        project.metadata.application,
        project.metadata.version,
        project.metadata.architecture,
        project.plugins.len()
    );

    if !reporter.project(path, &project, config)? {
        debug!("Not reporting {} ({})", path.display(), project.metadata.architecture);
    }

    Ok(())
}
