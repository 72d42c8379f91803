//! Atomic file write helpers.
//!
//! The payload goes to a temp file in the destination directory, which is then
//! renamed over the target. Where rename-over-existing fails (Windows), the old
//! file is moved to `.bak` first and restored if the second rename fails.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// `fsync` the temp file before the rename.
    pub sync: bool,
    /// Restrict the result to the owner (0o600 on Unix, no-op elsewhere).
    pub owner_only: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: true,
            owner_only: true,
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Put back a `.bak` left behind by a crash between the two renames.
pub fn recover_bak_file(path: &Path) {
    let backup = path.with_extension("bak");
    if path.exists() || !backup.exists() {
        return;
    }
    match fs::rename(&backup, path) {
        Ok(()) => tracing::warn!(path = %path.display(), "Recovered .bak file from interrupted write"),
        Err(e) => tracing::warn!(path = %path.display(), "Failed to recover .bak file: {e}"),
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with_options(path, bytes, WriteOptions::default())
}

pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let mut tmp = NamedTempFile::new_in(parent_dir(path))?;
    if options.owner_only {
        restrict_to_owner(tmp.path())?;
    }

    tmp.write_all(bytes)?;
    if options.sync {
        tmp.as_file().sync_all()?;
    }

    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        let backup = path.with_extension("bak");
        let _ = fs::remove_file(&backup);
        fs::rename(path, &backup)?;
        if let Err(retry) = err.file.persist(path) {
            let _ = fs::rename(&backup, path);
            return Err(retry.error);
        }
        if let Err(e) = fs::remove_file(&backup) {
            tracing::warn!(path = %backup.display(), "Failed to remove .bak after write: {e}");
        }
    }

    if options.owner_only {
        restrict_to_owner(path)?;
    }
    Ok(())
}
