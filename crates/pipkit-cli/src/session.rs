use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use pipkit_core::PipError;
use pipkit_installer::PackageManager;
use pipkit_registry::PackageSource;
use pipkit_tree::{DirTree, FileTree};

use crate::render::{PackageListing, SearchResults};

/// One line of a session script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    Install(Vec<String>),
    InstallRequirements(PathBuf),
    Uninstall(Vec<String>),
    ForceUninstall(Vec<String>),
    Check,
    Fix,
    ImportCheck(PathBuf),
    Search(String),
    List,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ScriptLine {
    pub(crate) line: usize,
    pub(crate) command: SessionCommand,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Outcome {
    Done(String),
    Listing(PackageListing),
    Search(SearchResults),
}

/// Parses a script: one command per line, blank lines and `#` comments
/// skipped.
pub(crate) fn parse_script(text: &str) -> Result<Vec<ScriptLine>> {
    let mut commands = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        let command =
            parse_command(line).map_err(|reason| anyhow!("line {}: {reason}", index + 1))?;
        commands.push(ScriptLine {
            line: index + 1,
            command,
        });
    }
    Ok(commands)
}

fn parse_command(line: &str) -> Result<SessionCommand, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Err("empty command".to_string());
    };
    let args = words.map(str::to_string).collect::<Vec<_>>();

    match verb {
        "install" => at_least_one(verb, args).map(SessionCommand::Install),
        "install-r" => {
            exactly_one(verb, args).map(|file| SessionCommand::InstallRequirements(file.into()))
        }
        "uninstall" => at_least_one(verb, args).map(SessionCommand::Uninstall),
        "force-uninstall" => at_least_one(verb, args).map(SessionCommand::ForceUninstall),
        "check" => no_args(verb, &args).map(|()| SessionCommand::Check),
        "fix" => no_args(verb, &args).map(|()| SessionCommand::Fix),
        "import-check" => {
            exactly_one(verb, args).map(|file| SessionCommand::ImportCheck(file.into()))
        }
        "search" => exactly_one(verb, args).map(SessionCommand::Search),
        "list" => no_args(verb, &args).map(|()| SessionCommand::List),
        other => Err(format!("unknown command '{other}'")),
    }
}

fn at_least_one(verb: &str, args: Vec<String>) -> Result<Vec<String>, String> {
    if args.is_empty() {
        return Err(format!("{verb} needs at least one package name"));
    }
    Ok(args)
}

fn exactly_one(verb: &str, mut args: Vec<String>) -> Result<String, String> {
    if args.len() != 1 {
        return Err(format!(
            "{verb} takes exactly one argument, got {}",
            args.len()
        ));
    }
    Ok(args.remove(0))
}

fn no_args(verb: &str, args: &[String]) -> Result<(), String> {
    if !args.is_empty() {
        return Err(format!("{verb} takes no arguments"));
    }
    Ok(())
}

/// Runs one command. Relative file arguments resolve against `base_dir`.
pub(crate) fn execute<S, W>(
    manager: &mut PackageManager<'_, S, W>,
    command: &SessionCommand,
    base_dir: &Path,
) -> pipkit_core::Result<Outcome>
where
    S: PackageSource + ?Sized,
    W: FileTree,
{
    match command {
        SessionCommand::Install(names) => {
            manager.install(names)?;
            Ok(Outcome::Done(format!("installed {}", names.join(", "))))
        }
        SessionCommand::InstallRequirements(file) => {
            let path = base_dir.join(file);
            let (tree, file_name) = open_parent(&path)?;
            manager.install_requirements(&tree, &file_name)?;
            Ok(Outcome::Done(format!(
                "installed requirements from {}",
                path.display()
            )))
        }
        SessionCommand::Uninstall(names) => {
            manager.uninstall(names)?;
            Ok(Outcome::Done(format!("uninstalled {}", names.join(", "))))
        }
        SessionCommand::ForceUninstall(names) => {
            manager.force_uninstall(names)?;
            Ok(Outcome::Done(format!(
                "force-uninstalled {}",
                names.join(", ")
            )))
        }
        SessionCommand::Check => {
            manager.check()?;
            Ok(Outcome::Done("workspace is consistent".to_string()))
        }
        SessionCommand::Fix => {
            manager.fix()?;
            Ok(Outcome::Done("workspace repaired".to_string()))
        }
        SessionCommand::ImportCheck(file) => {
            let path = base_dir.join(file);
            let source_text = fs::read_to_string(&path)
                .map_err(|err| PipError::workspace("read", path.display().to_string(), err))?;
            manager.import_check(&source_text)?;
            Ok(Outcome::Done(format!(
                "all imports of {} are satisfied",
                path.display()
            )))
        }
        SessionCommand::Search(term) => Ok(Outcome::Search(SearchResults {
            term: term.clone(),
            matches: manager.local_search(term),
        })),
        SessionCommand::List => Ok(Outcome::Listing(PackageListing {
            explicit: manager.explicit_packages(),
            materialized: manager.materialized_packages(),
        })),
    }
}

fn open_parent(path: &Path) -> pipkit_core::Result<(DirTree, String)> {
    let display = path.display().to_string();
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            PipError::workspace(
                "read",
                display.as_str(),
                io::Error::new(io::ErrorKind::InvalidInput, "not a UTF-8 file name"),
            )
        })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tree = DirTree::existing(parent)
        .map_err(|err| PipError::workspace("open", parent.display().to_string(), err))?;
    Ok((tree, file_name))
}
