use std::env;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::config::load_settings;
use crate::location;
use crate::manifest;
use crate::utils::shell::{self, CommandLine};

/// Arguments that turn the installer into an editable install of the cwd.
pub const EDITABLE_ARGS: &[&str] = &["install", "-e", "."];

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Installed,
    DryRun { command: String },
}

/// Failures that carry their own process exit code.
#[derive(Debug)]
pub enum InstallError {
    /// Neither `setup.py` nor `pyproject.toml` exists in the project root.
    ManifestMissing { dir: PathBuf },
    /// The installer ran and failed. `code` is `None` when killed by `signal`.
    Delegate {
        command: String,
        code: Option<i32>,
        signal: Option<i32>,
    },
    /// The installer could not be started at all.
    Spawn { command: String, source: io::Error },
    /// The project root could not be determined.
    Location { source: anyhow::Error },
}

impl InstallError {
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallError::ManifestMissing { .. } | InstallError::Location { .. } => 1,
            InstallError::Delegate { code: Some(code), .. } => *code,
            // Same status a shell reports for a child killed by a signal.
            InstallError::Delegate {
                signal: Some(sig), ..
            } => 128 + sig,
            InstallError::Delegate { .. } => 1,
            InstallError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => 127,
            InstallError::Spawn { .. } => 126,
        }
    }
}

impl fmt::Display for InstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallError::ManifestMissing { dir } => write!(
                f,
                "Warning: No {} found in {}",
                manifest::expected_names(),
                dir.display()
            ),
            InstallError::Delegate {
                command,
                code,
                signal,
            } => match (code, signal) {
                (Some(code), _) => write!(f, "command `{command}` exited with code {code}"),
                (None, Some(sig)) => write!(f, "command `{command}` was terminated by signal {sig}"),
                (None, None) => write!(f, "command `{command}` was terminated by a signal"),
            },
            InstallError::Spawn { command, .. } => write!(f, "failed to start `{command}`"),
            InstallError::Location { .. } => f.write_str("could not locate the project directory"),
        }
    }
}

impl std::error::Error for InstallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InstallError::Spawn { source, .. } => Some(source),
            InstallError::Location { source } => Some(&**source),
            _ => None,
        }
    }
}

/// Entry point from CLI.
pub fn install(dry_run: bool) -> Result<Outcome> {
    let root = location::project_root().map_err(|source| InstallError::Location { source })?;
    println!("Installing package in editable mode...");
    install_at(&root, dry_run)
}

/// Editable-install the project in `root`, which becomes the working directory.
pub fn install_at(root: &Path, dry_run: bool) -> Result<Outcome> {
    env::set_current_dir(root)
        .with_context(|| format!("changing directory to {}", root.display()))?;

    let Some(found) = manifest::detect(root) else {
        return Err(InstallError::ManifestMissing {
            dir: root.to_path_buf(),
        }
        .into());
    };
    println!("Found {found} in {}", root.display());

    let settings = load_settings(root)?;
    let command = editable_command(&settings.installer, &settings.extra_args);

    if dry_run {
        return Ok(Outcome::DryRun {
            command: command.to_string(),
        });
    }

    println!("Executing: {command}");
    let status = shell::run_in(&command, root).map_err(|source| InstallError::Spawn {
        command: command.to_string(),
        source,
    })?;

    if !status.success() {
        return Err(InstallError::Delegate {
            command: command.to_string(),
            code: status.code(),
            signal: termination_signal(&status),
        }
        .into());
    }
    Ok(Outcome::Installed)
}

#[cfg(unix)]
fn termination_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn termination_signal(_status: &ExitStatus) -> Option<i32> {
    None
}

/// Both manifest kinds install the same way; the package manager reads them.
fn editable_command(installer: &CommandLine, extra: &[String]) -> CommandLine {
    installer
        .with_args(EDITABLE_ARGS.iter().copied())
        .with_args(extra.iter().cloned())
}
