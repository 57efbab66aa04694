use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

/// Overrides the executable's own directory as the project root.
pub const ROOT_ENV: &str = "EDITABLE_INSTALL_ROOT";

/// Resolve the directory the installer operates on.
///
/// Defaults to the directory holding the running executable. Symlinks in the
/// invocation path are followed, so a link placed elsewhere still resolves to
/// the real project.
pub fn project_root() -> Result<PathBuf> {
    if let Some(root) = env::var_os(ROOT_ENV).filter(|v| !v.is_empty()) {
        return resolve_dir(Path::new(&root))
            .with_context(|| format!("resolving {ROOT_ENV}={}", Path::new(&root).display()));
    }

    let exe = env::current_exe().context("locating the running executable")?;
    containing_dir(&exe)
}

/// Canonical parent directory of `file`, following symlinks.
pub fn containing_dir(file: &Path) -> Result<PathBuf> {
    let real = file
        .canonicalize()
        .with_context(|| format!("resolving {}", file.display()))?;
    match real.parent() {
        Some(parent) => Ok(parent.to_path_buf()),
        None => bail!("{} has no parent directory", real.display()),
    }
}

fn resolve_dir(dir: &Path) -> Result<PathBuf> {
    let real = dir
        .canonicalize()
        .with_context(|| format!("resolving {}", dir.display()))?;
    if !real.is_dir() {
        bail!("{} is not a directory", real.display());
    }
    Ok(real)
}
