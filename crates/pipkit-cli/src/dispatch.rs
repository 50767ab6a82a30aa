use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use pipkit_core::ManagerConfig;
use pipkit_installer::PackageManager;
use pipkit_registry::{DirectorySource, PackageSource};
use pipkit_tree::{DirTree, FileTree};
use tracing::debug;

use crate::render::{
    current_output_style, format_listing_lines, format_search_lines, render_error_line,
    render_status_line, OutputStyle,
};
use crate::session::{execute, parse_script, Outcome, SessionCommand};
use crate::{Cli, Commands};

pub(crate) fn run_cli(cli: Cli) -> Result<()> {
    let style = current_output_style(cli.plain);

    match cli.command {
        Commands::Completion { shell } => write_completions(shell, &mut io::stdout()),
        Commands::Install { requirement, names } => {
            if requirement.is_none() && names.is_empty() {
                bail!("install needs package names or --requirement FILE");
            }
            let config = load_config(cli.config.as_deref())?;
            let source = DirectorySource::new(require_path(cli.registry, "--registry")?);
            let workspace = open_workspace(&require_path(cli.workspace, "--workspace")?)?;
            let mut manager = PackageManager::with_config(workspace, &source, config)?;

            let mut commands = Vec::new();
            if let Some(file) = requirement {
                commands.push(SessionCommand::InstallRequirements(file));
            }
            if !names.is_empty() {
                commands.push(SessionCommand::Install(names));
            }
            let cwd = std::env::current_dir().context("failed to resolve current directory")?;
            for command in &commands {
                let outcome = execute(&mut manager, command, &cwd)?;
                print_outcome(&outcome, style, cli.json)?;
            }
            println!(
                "{}",
                render_status_line(
                    style,
                    "ok",
                    &format!(
                        "{} packages in workspace ({} explicit)",
                        manager.materialized_packages().len(),
                        manager.explicit_packages().len()
                    ),
                )
            );
            Ok(())
        }
        Commands::Run { script } => {
            let config = load_config(cli.config.as_deref())?;
            let source = DirectorySource::new(require_path(cli.registry, "--registry")?);
            let workspace = open_workspace(&require_path(cli.workspace, "--workspace")?)?;
            let mut manager = PackageManager::with_config(workspace, &source, config)?;
            run_script(&mut manager, &script, style, cli.json)
        }
    }
}

/// Executes every command of the script against one manager. A failing
/// command is reported and the session continues; the run fails at the
/// end when any command failed.
pub(crate) fn run_script<S, W>(
    manager: &mut PackageManager<'_, S, W>,
    script: &Path,
    style: OutputStyle,
    json: bool,
) -> Result<()>
where
    S: PackageSource + ?Sized,
    W: FileTree,
{
    let text = fs::read_to_string(script)
        .with_context(|| format!("failed to read session script: {}", script.display()))?;
    let commands = parse_script(&text)
        .with_context(|| format!("invalid session script: {}", script.display()))?;
    let base_dir = script
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut failures = 0_usize;
    for entry in &commands {
        debug!(line = entry.line, command = ?entry.command, "running session command");
        match execute(manager, &entry.command, base_dir) {
            Ok(outcome) => print_outcome(&outcome, style, json)?,
            Err(err) => {
                failures += 1;
                eprintln!("{}", render_error_line(style, &err));
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} session commands failed", commands.len());
    }
    Ok(())
}

fn print_outcome(outcome: &Outcome, style: OutputStyle, json: bool) -> Result<()> {
    let lines = match outcome {
        Outcome::Done(message) => vec![render_status_line(style, "ok", message)],
        Outcome::Listing(listing) => format_listing_lines(listing, style, json)?,
        Outcome::Search(results) => format_search_lines(results, style, json)?,
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

fn require_path(value: Option<PathBuf>, flag: &str) -> Result<PathBuf> {
    value.ok_or_else(|| anyhow!("{flag} is required (flag or environment variable)"))
}

pub(crate) fn load_config(path: Option<&Path>) -> Result<ManagerConfig> {
    let Some(path) = path else {
        return Ok(ManagerConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    ManagerConfig::from_toml_str(&raw)
        .with_context(|| format!("invalid config: {}", path.display()))
}

/// Opens the workspace directory, which must be empty: manager state lives
/// only as long as one process.
pub(crate) fn open_workspace(path: &Path) -> Result<DirTree> {
    if path.exists() {
        let mut entries = fs::read_dir(path)
            .with_context(|| format!("failed to read workspace: {}", path.display()))?;
        if entries.next().is_some() {
            bail!(
                "workspace {} is not empty; state is not kept between runs",
                path.display()
            );
        }
    }
    DirTree::open(path).with_context(|| format!("failed to open workspace: {}", path.display()))
}

pub(crate) fn write_completions<W: Write>(shell: Shell, writer: &mut W) -> Result<()> {
    let mut command = Cli::command();
    let mut generated = Vec::new();
    clap_complete::generate(shell, &mut command, "pipkit", &mut generated);
    writer
        .write_all(&generated)
        .context("failed writing generated completion script")?;
    Ok(())
}
